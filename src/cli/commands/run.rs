//! Run command implementation.
//!
//! `slsctl run <METHOD>` invokes a custom component method on every
//! resolved instance.

use crate::cli::args::RunArgs;
use crate::error::Result;
use crate::remote::{Action, ActionOptions};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Services};
use super::resolve::{run_action, ResolveRequest};

/// The run command implementation.
pub struct RunCommand {
    request: ResolveRequest,
    args: RunArgs,
    options: ActionOptions,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(request: ResolveRequest, args: RunArgs, options: ActionOptions) -> Self {
        Self {
            request,
            args,
            options,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }
}

impl Command for RunCommand {
    fn execute(
        &self,
        ui: &mut dyn UserInterface,
        services: &mut Services<'_>,
    ) -> Result<CommandResult> {
        let action = Action::Run(self.args.method.clone());
        run_action(&action, &self.options, &self.request, services, ui)
    }
}
