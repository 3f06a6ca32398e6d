//! Deploy command implementation.
//!
//! `slsctl deploy` resolves the project and deploys every instance.

use crate::cli::args::DeployArgs;
use crate::error::Result;
use crate::remote::{Action, ActionOptions};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Services};
use super::resolve::{run_action, ResolveRequest};

/// The deploy command implementation.
pub struct DeployCommand {
    request: ResolveRequest,
    args: DeployArgs,
    options: ActionOptions,
}

impl DeployCommand {
    /// Create a new deploy command.
    pub fn new(request: ResolveRequest, args: DeployArgs, options: ActionOptions) -> Self {
        Self {
            request,
            args,
            options,
        }
    }

    /// Options sent to the platform.
    pub fn options(&self) -> ActionOptions {
        ActionOptions {
            force: self.args.force,
            sync: !self.args.no_wait,
            ..self.options
        }
    }
}

impl Command for DeployCommand {
    fn execute(
        &self,
        ui: &mut dyn UserInterface,
        services: &mut Services<'_>,
    ) -> Result<CommandResult> {
        run_action(
            &Action::Deploy,
            &self.options(),
            &self.request,
            services,
            ui,
        )
    }
}
