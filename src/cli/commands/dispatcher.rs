//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`Services`] for the collaborators commands work against
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, DeployArgs};
use crate::config::Environment;
use crate::error::Result;
use crate::remote::{ActionOptions, OrgResolver, Platform};
use crate::ui::UserInterface;

use super::resolve::ResolveRequest;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    /// * `services` - Environment and remote collaborators
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(
        &self,
        ui: &mut dyn UserInterface,
        services: &mut Services<'_>,
    ) -> Result<CommandResult>;
}

/// Collaborators shared by all commands.
///
/// The binary wires the process environment and HTTP clients; tests wire
/// in-memory doubles.
pub struct Services<'a> {
    pub env: &'a mut dyn Environment,
    pub org_resolver: &'a dyn OrgResolver,
    pub platform: &'a dyn Platform,
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it. With no subcommand, deploys.
    pub fn dispatch(
        &self,
        cli: &Cli,
        ui: &mut dyn UserInterface,
        services: &mut Services<'_>,
    ) -> Result<CommandResult> {
        let request = ResolveRequest {
            project_root: self.project_root.clone(),
            target: cli.target.clone(),
            overrides: cli.overrides(),
        };
        let options = ActionOptions {
            debug: cli.debug,
            dev: cli.dev,
            sync: true,
            force: false,
        };

        match &cli.command {
            Some(Commands::Deploy(args)) => {
                let cmd = super::deploy::DeployCommand::new(request, args.clone(), options);
                cmd.execute(ui, services)
            }
            Some(Commands::Remove(args)) => {
                let cmd = super::remove::RemoveCommand::new(request, args.clone(), options);
                cmd.execute(ui, services)
            }
            Some(Commands::Run(args)) => {
                let cmd = super::run::RunCommand::new(request, args.clone(), options);
                cmd.execute(ui, services)
            }
            Some(Commands::Info(args)) => {
                let cmd = super::info::InfoCommand::new(request, args.clone());
                cmd.execute(ui, services)
            }
            Some(Commands::Completions(args)) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui, services)
            }
            None => {
                let cmd =
                    super::deploy::DeployCommand::new(request, DeployArgs::default(), options);
                cmd.execute(ui, services)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryEnvironment;
    use crate::remote::{Action, MockPlatform, StaticOrgResolver};
    use crate::ui::MockUI;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn project(content: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("serverless.yml"), content).unwrap();
        temp
    }

    fn dispatch(
        temp: &TempDir,
        args: &[&str],
        platform: &MockPlatform,
    ) -> (Result<CommandResult>, MockUI) {
        let cli = Cli::try_parse_from(args).unwrap();
        let mut env = MemoryEnvironment::new();
        let orgs = StaticOrgResolver::new("acme");
        let mut services = Services {
            env: &mut env,
            org_resolver: &orgs,
            platform,
        };
        let mut ui = MockUI::new();
        let dispatcher = CommandDispatcher::new(temp.path().to_path_buf());
        let result = dispatcher.dispatch(&cli, &mut ui, &mut services);
        (result, ui)
    }

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn dispatcher_project_root() {
        let dispatcher = CommandDispatcher::new(PathBuf::from("/tmp/test"));
        assert_eq!(dispatcher.project_root(), Path::new("/tmp/test"));
    }

    #[test]
    fn no_subcommand_deploys() {
        let temp = project("name: api\ncomponent: scf\n");
        let platform = MockPlatform::new();

        let (result, _) = dispatch(&temp, &["slsctl"], &platform);

        assert!(result.unwrap().success);
        let calls = platform.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].action, Action::Deploy);
        assert!(calls[0].options.sync);
    }

    #[test]
    fn global_flags_reach_the_platform() {
        let temp = project("name: api\ncomponent: scf\n");
        let platform = MockPlatform::new();

        let (result, _) = dispatch(
            &temp,
            &["slsctl", "remove", "--async", "--debug", "--stage", "prod"],
            &platform,
        );

        assert!(result.unwrap().success);
        let call = &platform.calls()[0];
        assert_eq!(call.action, Action::Remove);
        assert!(call.options.debug);
        assert!(!call.options.sync);
        assert_eq!(call.instance.stage.as_deref(), Some("prod"));
    }

    #[test]
    fn missing_config_exits_with_two() {
        let temp = TempDir::new().unwrap();
        let platform = MockPlatform::new();

        let (result, ui) = dispatch(&temp, &["slsctl", "info"], &platform);

        let result = result.unwrap();
        assert_eq!(result.exit_code, 2);
        assert!(ui.has_error("No instance file"));
    }
}
