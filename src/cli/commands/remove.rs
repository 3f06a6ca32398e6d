//! Remove command implementation.

use crate::cli::args::RemoveArgs;
use crate::error::Result;
use crate::remote::{Action, ActionOptions};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Services};
use super::resolve::{run_action, ResolveRequest};

/// The remove command implementation.
pub struct RemoveCommand {
    request: ResolveRequest,
    args: RemoveArgs,
    options: ActionOptions,
}

impl RemoveCommand {
    /// Create a new remove command.
    pub fn new(request: ResolveRequest, args: RemoveArgs, options: ActionOptions) -> Self {
        Self {
            request,
            args,
            options,
        }
    }
}

impl Command for RemoveCommand {
    fn execute(
        &self,
        ui: &mut dyn UserInterface,
        services: &mut Services<'_>,
    ) -> Result<CommandResult> {
        let options = ActionOptions {
            sync: !self.args.no_wait,
            ..self.options
        };
        run_action(&Action::Remove, &options, &self.request, services, ui)
    }
}
