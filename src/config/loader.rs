//! Instance configuration loading and resolution.
//!
//! [`InstanceLoader::load`] turns one directory's instance file into a fully
//! resolved [`InstanceConfig`]:
//!
//! 1. Read `serverless.yml` (or `.yaml` / `.json`) from the directory
//! 2. Require `name` and `component`
//! 3. Apply CLI overrides for `stage`, `org`, `app` (flags win)
//! 4. Look up `org` remotely when still unset
//! 5. Default `app` to `name`
//! 6. For `inputs`: apply credentials to the environment and `.env`, resolve
//!    `${...}` references, then resolve `src` paths against the directory

use crate::config::credentials::{CredentialSet, CredentialStore};
use crate::config::env_file::EnvFileSync;
use crate::config::environment::Environment;
use crate::config::instance::{InstanceConfig, Inputs, RawInstanceFile};
use crate::config::interpolation::{Interpolator, VariableResolver, VariableScope};
use crate::error::{Result, SlsError};
use crate::remote::OrgResolver;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Instance file names, in lookup order.
pub const INSTANCE_FILE_NAMES: &[&str] = &["serverless.yml", "serverless.yaml", "serverless.json"];

/// Values supplied on the command line. Each one, when present, replaces the
/// file's value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub stage: Option<String>,
    pub org: Option<String>,
    pub app: Option<String>,
    /// Top-level `inputs` keys, from `--inputs key=value`.
    pub inputs: BTreeMap<String, serde_yaml::Value>,
}

impl Overrides {
    /// Parse a `key=value` input override. The value is read as a YAML scalar,
    /// so `memory=128` yields a number and `name=api` a string.
    pub fn parse_input(arg: &str) -> std::result::Result<(String, serde_yaml::Value), String> {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", arg))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("missing key in '{}'", arg));
        }
        let value = serde_yaml::from_str(value)
            .unwrap_or_else(|_| serde_yaml::Value::String(value.to_string()));
        Ok((key.to_string(), value))
    }
}

/// Find the instance file in `dir`, if any.
pub fn find_instance_file(dir: &Path) -> Option<PathBuf> {
    INSTANCE_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Read and parse the instance file in `dir` without resolving anything.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the directory has no instance file.
/// Returns `ConfigParseError` if the file is not valid YAML/JSON.
pub fn load_instance_file(dir: &Path) -> Result<(PathBuf, RawInstanceFile)> {
    let path = find_instance_file(dir).ok_or_else(|| SlsError::ConfigNotFound {
        path: dir.join(INSTANCE_FILE_NAMES[0]),
    })?;

    let content = fs::read_to_string(&path)?;
    let raw = serde_yaml::from_str(&content).map_err(|e| SlsError::ConfigParseError {
        path: path.clone(),
        message: e.to_string(),
    })?;

    Ok((path, raw))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Resolves instance directories into [`InstanceConfig`]s.
///
/// # Example
///
/// ```
/// use slsctl::config::{InstanceLoader, MemoryEnvironment};
/// use slsctl::remote::StaticOrgResolver;
/// use std::fs;
/// use tempfile::TempDir;
///
/// let temp = TempDir::new().unwrap();
/// fs::write(temp.path().join("serverless.yml"), "name: api\ncomponent: scf\n").unwrap();
///
/// let mut env = MemoryEnvironment::new();
/// let orgs = StaticOrgResolver::new("acme");
/// let mut loader = InstanceLoader::new(temp.path(), &mut env, &orgs);
///
/// let instance = loader.load(temp.path()).unwrap();
/// assert_eq!(instance.org, "acme");
/// assert_eq!(instance.app, "api");
/// ```
pub struct InstanceLoader<'a> {
    env: &'a mut dyn Environment,
    org_resolver: &'a dyn OrgResolver,
    variables: &'a dyn VariableResolver,
    credentials: CredentialStore,
    env_sync: EnvFileSync,
    overrides: Overrides,
}

impl<'a> InstanceLoader<'a> {
    /// Create a loader whose `.env` files live in `work_dir`.
    pub fn new(
        work_dir: &Path,
        env: &'a mut dyn Environment,
        org_resolver: &'a dyn OrgResolver,
    ) -> Self {
        Self {
            env,
            org_resolver,
            variables: &Interpolator,
            credentials: CredentialStore::new(work_dir.to_path_buf()),
            env_sync: EnvFileSync::in_dir(work_dir),
            overrides: Overrides::default(),
        }
    }

    /// Apply CLI overrides to every loaded instance.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Resolve credentials for `stage` from the loader's environment.
    pub fn credentials(&self, stage: Option<&str>) -> Result<CredentialSet> {
        self.credentials.resolve(&*self.env, stage)
    }

    /// Load and resolve the instance in `dir`.
    pub fn load(&mut self, dir: &Path) -> Result<InstanceConfig> {
        let (path, raw) = load_instance_file(dir)?;
        tracing::debug!("Loading instance from {}", path.display());

        let name = non_empty(raw.name).ok_or_else(|| SlsError::missing("name"))?;
        let component = non_empty(raw.component).ok_or_else(|| SlsError::missing("component"))?;

        let stage = non_empty(self.overrides.stage.clone()).or(non_empty(raw.stage));
        let app = non_empty(self.overrides.app.clone()).or(non_empty(raw.app));
        let org = match non_empty(self.overrides.org.clone()).or(non_empty(raw.org)) {
            Some(org) => org,
            None => self.lookup_org(stage.as_deref())?,
        };
        let app = app.unwrap_or_else(|| name.clone());

        let inputs = match self.merge_input_overrides(raw.inputs) {
            Some(value) => {
                self.apply_credentials(stage.as_deref())?;

                let scope = VariableScope {
                    env: &*self.env,
                    name: &name,
                    component: &component,
                    org: &org,
                    app: &app,
                    stage: stage.as_deref(),
                };
                let value = self.variables.resolve(value, &scope)?;

                let mut inputs: Inputs =
                    serde_yaml::from_value(value).map_err(|e| SlsError::ConfigParseError {
                        path: path.clone(),
                        message: format!("invalid inputs: {}", e),
                    })?;
                inputs.resolve_paths(dir);
                Some(inputs)
            }
            None => None,
        };

        let instance = InstanceConfig {
            name,
            component,
            org,
            app,
            stage,
            inputs,
        };
        tracing::debug!("Resolved instance {}", instance.qualified_name());
        Ok(instance)
    }

    fn lookup_org(&self, stage: Option<&str>) -> Result<String> {
        let credentials = self.credentials(stage)?;
        let org = self.org_resolver.resolve_org(&credentials)?;
        non_empty(org).ok_or_else(|| SlsError::missing("org"))
    }

    /// Push resolved credentials into the environment and `.env` so inputs
    /// can reference them.
    fn apply_credentials(&mut self, stage: Option<&str>) -> Result<()> {
        let values = self.credentials.resolve_variables(&*self.env, stage)?;
        if values.is_empty() {
            return Ok(());
        }
        self.env_sync.sync(&mut *self.env, &values)
    }

    fn merge_input_overrides(&self, inputs: Option<serde_yaml::Value>) -> Option<serde_yaml::Value> {
        if self.overrides.inputs.is_empty() {
            return inputs;
        }

        let mut map = match inputs {
            Some(serde_yaml::Value::Mapping(map)) => map,
            Some(other) => return Some(other),
            None => serde_yaml::Mapping::new(),
        };
        for (key, value) in &self.overrides.inputs {
            map.insert(serde_yaml::Value::String(key.clone()), value.clone());
        }
        Some(serde_yaml::Value::Mapping(map))
    }
}
