//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Overrides;

/// An `--inputs KEY=VALUE` override.
pub type InputOverride = (String, serde_yaml::Value);

/// slsctl - Deploy and manage serverless component instances.
#[derive(Debug, Parser)]
#[command(name = "slsctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Stage to resolve (overrides the instance file)
    #[arg(long, global = true)]
    pub stage: Option<String>,

    /// Organization (overrides the instance file and remote lookup)
    #[arg(long, global = true)]
    pub org: Option<String>,

    /// Application (overrides the instance file)
    #[arg(long, global = true)]
    pub app: Option<String>,

    /// Resolve only the instance in this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub target: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Enable debug logging and platform debug mode
    #[arg(long, global = true)]
    pub debug: bool,

    /// Run the platform action in dev mode
    #[arg(long, global = true)]
    pub dev: bool,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Deployment platform endpoint
    #[arg(
        long,
        global = true,
        env = "SLSCTL_PLATFORM_URL",
        default_value = "https://platform.slsctl.dev/v1"
    )]
    pub platform_url: String,

    /// Identity service endpoint used to look up the org
    #[arg(
        long,
        global = true,
        env = "SLSCTL_IDENTITY_URL",
        default_value = "https://identity.slsctl.dev/v1"
    )]
    pub identity_url: String,

    /// Access key sent to the platform and identity services
    #[arg(long, global = true, env = "SLSCTL_ACCESS_KEY", hide_env_values = true)]
    pub access_key: Option<String>,

    /// Timeout for remote calls, in seconds
    #[arg(long, global = true, env = "SLSCTL_TIMEOUT", default_value_t = 10)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Remote call timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Overrides from global flags plus the subcommand's `--inputs`.
    pub fn overrides(&self) -> Overrides {
        let inputs = match &self.command {
            Some(Commands::Deploy(args)) => args.inputs.as_slice(),
            Some(Commands::Run(args)) => args.inputs.as_slice(),
            _ => &[][..],
        };

        Overrides {
            stage: self.stage.clone(),
            org: self.org.clone(),
            app: self.app.clone(),
            inputs: inputs.iter().cloned().collect(),
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Deploy the instance or template (default if no command specified)
    Deploy(DeployArgs),

    /// Remove the deployed instance or template
    Remove(RemoveArgs),

    /// Invoke a custom component method
    Run(RunArgs),

    /// Show the resolved configuration without contacting the platform
    Info(InfoArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

fn parse_input(arg: &str) -> Result<InputOverride, String> {
    Overrides::parse_input(arg)
}

/// Arguments for the `deploy` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DeployArgs {
    /// Deploy even when the platform sees no changes
    #[arg(long)]
    pub force: bool,

    /// Return once the platform accepts the deployment
    #[arg(long = "async")]
    pub no_wait: bool,

    /// Override a top-level input (repeatable)
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_input)]
    pub inputs: Vec<InputOverride>,
}

/// Arguments for the `remove` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RemoveArgs {
    /// Return once the platform accepts the removal
    #[arg(long = "async")]
    pub no_wait: bool,
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    /// Component method to invoke
    pub method: String,

    /// Override a top-level input (repeatable)
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_input)]
    pub inputs: Vec<InputOverride>,
}

/// Arguments for the `info` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InfoArgs {
    /// Print JSON instead of YAML
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["slsctl"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn global_flags_become_overrides() {
        let cli =
            Cli::try_parse_from(["slsctl", "info", "--stage", "prod", "--org", "acme"]).unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.stage.as_deref(), Some("prod"));
        assert_eq!(overrides.org.as_deref(), Some("acme"));
        assert_eq!(overrides.app, None);
        assert!(overrides.inputs.is_empty());
    }

    #[test]
    fn deploy_inputs_are_parsed() {
        let cli = Cli::try_parse_from([
            "slsctl",
            "deploy",
            "--inputs",
            "memory=128",
            "--inputs",
            "region=ap-guangzhou",
            "--force",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.inputs["memory"].as_u64(), Some(128));
        assert_eq!(overrides.inputs["region"].as_str(), Some("ap-guangzhou"));
        match cli.command {
            Some(Commands::Deploy(args)) => {
                assert!(args.force);
                assert!(!args.no_wait);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn malformed_input_is_rejected() {
        let result = Cli::try_parse_from(["slsctl", "deploy", "--inputs", "novalue"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_requires_method() {
        assert!(Cli::try_parse_from(["slsctl", "run"]).is_err());
        let cli = Cli::try_parse_from(["slsctl", "run", "invoke"]).unwrap();
        match cli.command {
            Some(Commands::Run(args)) => assert_eq!(args.method, "invoke"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn remove_async_flag() {
        let cli = Cli::try_parse_from(["slsctl", "remove", "--async"]).unwrap();
        match cli.command {
            Some(Commands::Remove(args)) => assert!(args.no_wait),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn target_flag_is_global() {
        let cli = Cli::try_parse_from(["slsctl", "info", "--target", "api"]).unwrap();
        assert_eq!(cli.target, Some(PathBuf::from("api")));
    }
}
