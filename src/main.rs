//! slsctl CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use slsctl::cli::{Cli, CommandDispatcher, Services};
use slsctl::config::ProcessEnvironment;
use slsctl::remote::{AuthHeader, HttpOrgResolver, HttpPlatform};
use slsctl::ui::{create_ui, OutputMode, UserInterface};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("slsctl=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("slsctl=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli, ui: &mut dyn UserInterface) -> slsctl::Result<ExitCode> {
    let project_root = match &cli.project {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };

    let mut org_resolver = HttpOrgResolver::new(&cli.identity_url, cli.timeout())?;
    let mut platform = HttpPlatform::new(&cli.platform_url, cli.timeout())?;
    if let Some(key) = &cli.access_key {
        org_resolver = org_resolver.with_auth(AuthHeader::bearer(key));
        platform = platform.with_auth(AuthHeader::bearer(key));
    }

    let mut env = ProcessEnvironment;
    let mut services = Services {
        env: &mut env,
        org_resolver: &org_resolver,
        platform: &platform,
    };

    let dispatcher = CommandDispatcher::new(project_root);
    let result = dispatcher.dispatch(cli, ui, &mut services)?;
    Ok(ExitCode::from(result.exit_code as u8))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("slsctl starting with command: {:?}", cli.command);

    // Handle --no-color
    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let output_mode = OutputMode::from_flags(cli.verbose, cli.quiet);
    let mut ui = create_ui(true, output_mode);

    match run(&cli, ui.as_mut()) {
        Ok(code) => code,
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
