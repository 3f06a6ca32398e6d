//! Shared resolution for commands.
//!
//! Picks single-instance or template mode, resolves, and fans a platform
//! action out over the resulting instances.

use std::path::PathBuf;

use crate::config::{
    load_template, resolve_against, CredentialSet, InstanceConfig, InstanceLoader, Overrides,
    Template,
};
use crate::error::{Result, SlsError};
use crate::remote::{Action, ActionOptions, Outputs};
use crate::ui::UserInterface;

use super::dispatcher::{CommandResult, Services};

/// Where resolution starts and what the user overrode.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub project_root: PathBuf,
    /// Single instance directory, relative to the project root.
    pub target: Option<PathBuf>,
    pub overrides: Overrides,
}

/// A resolved project.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Instance(InstanceConfig),
    Template(Template),
}

impl Resolved {
    /// Instances to act on, in name order for templates.
    pub fn instances(&self) -> Vec<&InstanceConfig> {
        match self {
            Self::Instance(instance) => vec![instance],
            Self::Template(template) => template.instances.values().collect(),
        }
    }

    /// Stage shared by every instance.
    pub fn stage(&self) -> Option<&str> {
        match self {
            Self::Instance(instance) => instance.stage.as_deref(),
            Self::Template(template) => template.stage.as_deref(),
        }
    }

    /// Header line, e.g. `acme/shop/dev` or `acme/shop/dev (template shop)`.
    pub fn title(&self) -> String {
        match self {
            Self::Instance(instance) => format!(
                "{}/{}/{}",
                instance.org,
                instance.app,
                instance.stage.as_deref().unwrap_or("-")
            ),
            Self::Template(template) => format!(
                "{}/{}/{} (template {})",
                template.org.as_deref().unwrap_or("-"),
                template.app.as_deref().unwrap_or("-"),
                template.stage.as_deref().unwrap_or("-"),
                template.name
            ),
        }
    }
}

/// Resolution result plus the credentials to act with.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub resolved: Resolved,
    pub credentials: CredentialSet,
}

/// Resolve the project described by `request`.
///
/// `--target` selects single-instance mode. Otherwise the root is read as a
/// template first, and only when no subdirectory holds an instance file is
/// the root's own instance file loaded.
///
/// # Errors
///
/// Returns `ConfigNotFound` when neither mode finds an instance file, and
/// any loader or aggregation error unchanged.
pub fn resolve(request: &ResolveRequest, services: &mut Services<'_>) -> Result<Resolution> {
    let root = &request.project_root;
    let mut loader = InstanceLoader::new(root, &mut *services.env, services.org_resolver)
        .with_overrides(request.overrides.clone());

    let resolved = if let Some(target) = &request.target {
        Resolved::Instance(loader.load(&resolve_against(root, target))?)
    } else {
        let template = if root.is_dir() {
            load_template(root, &mut loader)?
        } else {
            None
        };
        match template {
            Some(template) => Resolved::Template(template),
            None => Resolved::Instance(loader.load(root)?),
        }
    };

    let credentials = loader.credentials(resolved.stage())?;
    tracing::debug!(
        "Resolved {} instance(s) for {}",
        resolved.instances().len(),
        resolved.title()
    );
    Ok(Resolution {
        resolved,
        credentials,
    })
}

/// Resolve, reporting a missing instance file through the UI.
///
/// Returns `Ok(None)` after reporting; the caller exits with code 2.
pub fn resolve_or_report(
    request: &ResolveRequest,
    services: &mut Services<'_>,
    ui: &mut dyn UserInterface,
) -> Result<Option<Resolution>> {
    match resolve(request, services) {
        Ok(resolution) => Ok(Some(resolution)),
        Err(SlsError::ConfigNotFound { path }) => {
            ui.error(&format!(
                "No instance file found at {} or in its subdirectories",
                path.display()
            ));
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Run `action` on every resolved instance, stopping at the first failure.
pub fn run_action(
    action: &Action,
    options: &ActionOptions,
    request: &ResolveRequest,
    services: &mut Services<'_>,
    ui: &mut dyn UserInterface,
) -> Result<CommandResult> {
    let Some(resolution) = resolve_or_report(request, services, ui)? else {
        return Ok(CommandResult::failure(2));
    };

    ui.show_header(&resolution.resolved.title());
    let show_status = ui.output_mode().shows_platform_status();
    let (doing, done) = verbs(action);

    for instance in resolution.resolved.instances() {
        tracing::debug!("{} {}", action, instance.qualified_name());
        let mut spinner = ui.start_spinner(&format!("{} {}...", doing, instance.name));
        let result = services.platform.execute(
            action,
            instance,
            &resolution.credentials,
            options,
            &mut |msg: &str| {
                if show_status {
                    spinner.set_message(msg);
                }
            },
        );

        match result {
            Ok(outputs) => {
                spinner.finish_success(&format!("{} {}", done, instance.name));
                show_outputs(ui, &outputs);
            }
            Err(e) => {
                spinner.finish_error(&format!("{} failed for {}", action, instance.name));
                return Err(e);
            }
        }
    }

    Ok(CommandResult::success())
}

fn verbs(action: &Action) -> (String, String) {
    match action {
        Action::Deploy => ("Deploying".into(), "Deployed".into()),
        Action::Remove => ("Removing".into(), "Removed".into()),
        Action::Run(method) => (format!("Running {} on", method), format!("Ran {} on", method)),
    }
}

/// Show platform outputs as `key: value` fields.
pub fn show_outputs(ui: &mut dyn UserInterface, outputs: &Outputs) {
    for (key, value) in outputs {
        let text = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        ui.show_field(key, &text);
    }
}
