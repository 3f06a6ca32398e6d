//! Info command implementation.
//!
//! `slsctl info` prints the resolved instance or template without contacting
//! the platform. Credentials are never printed.

use std::collections::BTreeMap;

use anyhow::Context;
use serde::Serialize;

use crate::cli::args::InfoArgs;
use crate::config::InstanceConfig;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Services};
use super::resolve::{resolve_or_report, ResolveRequest, Resolved};

/// The info command implementation.
pub struct InfoCommand {
    request: ResolveRequest,
    args: InfoArgs,
}

#[derive(Serialize)]
#[serde(untagged)]
enum InfoView<'a> {
    Instance(&'a InstanceConfig),
    Template {
        template: &'a str,
        org: Option<&'a str>,
        app: Option<&'a str>,
        stage: Option<&'a str>,
        instances: &'a BTreeMap<String, InstanceConfig>,
    },
}

impl<'a> From<&'a Resolved> for InfoView<'a> {
    fn from(resolved: &'a Resolved) -> Self {
        match resolved {
            Resolved::Instance(instance) => Self::Instance(instance),
            Resolved::Template(template) => Self::Template {
                template: &template.name,
                org: template.org.as_deref(),
                app: template.app.as_deref(),
                stage: template.stage.as_deref(),
                instances: &template.instances,
            },
        }
    }
}

impl InfoCommand {
    /// Create a new info command.
    pub fn new(request: ResolveRequest, args: InfoArgs) -> Self {
        Self { request, args }
    }

    fn render(&self, resolved: &Resolved) -> Result<String> {
        let view = InfoView::from(resolved);
        let text = if self.args.json {
            serde_json::to_string_pretty(&view).context("Failed to render JSON")?
        } else {
            serde_yaml::to_string(&view).context("Failed to render YAML")?
        };
        Ok(text)
    }
}

impl Command for InfoCommand {
    fn execute(
        &self,
        ui: &mut dyn UserInterface,
        services: &mut Services<'_>,
    ) -> Result<CommandResult> {
        let Some(resolution) = resolve_or_report(&self.request, services, ui)? else {
            return Ok(CommandResult::failure(2));
        };

        ui.data(&self.render(&resolution.resolved)?);
        Ok(CommandResult::success())
    }
}
