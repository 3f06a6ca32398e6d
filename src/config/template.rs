//! Multi-instance templates.
//!
//! A template is a directory whose immediate subdirectories each hold an
//! instance file. All instances of a template must share one org, app and
//! stage; the first instance visited sets them.
//!
//! ```text
//! shop/
//! ├── api/serverless.yml       # name: api,  org: acme, app: shop
//! ├── web/serverless.yml       # name: web,  org: acme, app: shop
//! └── .cache/                  # hidden, skipped
//! ```

use crate::config::instance::InstanceConfig;
use crate::config::loader::{find_instance_file, InstanceLoader};
use crate::error::{Result, SlsError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const UNSET: &str = "<unset>";

/// Instances aggregated from a template directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// Basename of the template directory.
    pub name: String,
    pub org: Option<String>,
    pub app: Option<String>,
    pub stage: Option<String>,
    /// Instances keyed by instance name.
    pub instances: BTreeMap<String, InstanceConfig>,
    seeded: bool,
}

impl Template {
    /// Create an empty template named after `root`.
    pub fn new(root: &Path) -> Self {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            org: None,
            app: None,
            stage: None,
            instances: BTreeMap::new(),
            seeded: false,
        }
    }

    /// Add an instance, enforcing a single org/app/stage.
    pub fn add(&mut self, instance: InstanceConfig) -> Result<()> {
        if self.seeded {
            check_field("org", self.org.as_deref(), Some(&instance.org))?;
            check_field("app", self.app.as_deref(), Some(&instance.app))?;
            check_field("stage", self.stage.as_deref(), instance.stage.as_deref())?;
        } else {
            self.org = Some(instance.org.clone());
            self.app = Some(instance.app.clone());
            self.stage = instance.stage.clone();
            self.seeded = true;
        }

        if self.instances.contains_key(&instance.name) {
            tracing::warn!(
                "Template '{}' has more than one instance named '{}'; keeping the last one",
                self.name,
                instance.name
            );
        }
        self.instances.insert(instance.name.clone(), instance);
        Ok(())
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// True when no instance has been added.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

fn check_field(field: &str, expected: Option<&str>, actual: Option<&str>) -> Result<()> {
    if expected == actual {
        return Ok(());
    }
    Err(SlsError::InconsistentTemplate {
        field: field.to_string(),
        expected: expected.unwrap_or(UNSET).to_string(),
        actual: actual.unwrap_or(UNSET).to_string(),
    })
}

/// Immediate subdirectories of `root` that hold an instance file, in name
/// order. Hidden directories are skipped.
pub fn instance_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();

    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        let hidden = path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().starts_with('.'));
        if hidden || !path.is_dir() {
            continue;
        }
        if find_instance_file(&path).is_some() {
            dirs.push(path);
        } else {
            tracing::debug!("Skipping {}: no instance file", path.display());
        }
    }

    dirs.sort();
    Ok(dirs)
}

/// Load `root` as a template.
///
/// Returns `Ok(None)` when no immediate subdirectory holds an instance file.
/// Each instance is loaded with its subdirectory as base directory, so its
/// `src` paths resolve under that subdirectory. Any inconsistency aborts the
/// whole aggregation.
pub fn load_template(root: &Path, loader: &mut InstanceLoader<'_>) -> Result<Option<Template>> {
    let dirs = instance_dirs(root)?;
    if dirs.is_empty() {
        return Ok(None);
    }

    let mut template = Template::new(root);
    for dir in dirs {
        let instance = loader.load(&dir)?;
        tracing::debug!(
            "Adding {} to template '{}'",
            instance.qualified_name(),
            template.name
        );
        template.add(instance)?;
    }

    Ok(Some(template))
}
