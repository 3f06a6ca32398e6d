//! Provider credential resolution.
//!
//! Credentials come from well-known environment variables. Each supported
//! provider is described by a [`ProviderCredentialSpec`] mapping its
//! variables to the field names the platform expects. Values in the live
//! environment win; the working directory's `.env` and `.env.<stage>` files
//! are the fallback.

use crate::config::env_file::EnvFileParser;
use crate::config::environment::Environment;
use crate::error::Result;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// Environment variable names for one provider, and the platform-facing
/// field each one fills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCredentialSpec {
    /// Provider identifier, e.g. `tencent`.
    pub provider: String,
    /// `(environment variable, credential field)` pairs.
    pub fields: Vec<(String, String)>,
}

impl ProviderCredentialSpec {
    /// Create a spec from static pairs.
    pub fn new(provider: &str, fields: &[(&str, &str)]) -> Self {
        Self {
            provider: provider.to_string(),
            fields: fields
                .iter()
                .map(|(var, field)| (var.to_string(), field.to_string()))
                .collect(),
        }
    }

    /// The built-in Tencent Cloud provider.
    pub fn tencent() -> Self {
        Self::new(
            "tencent",
            &[
                ("TENCENT_APP_ID", "AppId"),
                ("TENCENT_SECRET_ID", "SecretId"),
                ("TENCENT_SECRET_KEY", "SecretKey"),
                ("TENCENT_TOKEN", "Token"),
            ],
        )
    }
}

/// Resolved credentials: provider → field → value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CredentialSet(BTreeMap<String, BTreeMap<String, String>>);

impl CredentialSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one field for a provider.
    pub fn insert(&mut self, provider: &str, field: &str, value: &str) {
        self.0
            .entry(provider.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
    }

    /// Fields resolved for a provider.
    pub fn provider(&self, provider: &str) -> Option<&BTreeMap<String, String>> {
        self.0.get(provider)
    }

    /// Look up a single field.
    pub fn get(&self, provider: &str, field: &str) -> Option<&str> {
        self.0.get(provider)?.get(field).map(String::as_str)
    }

    /// Iterate providers in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, String>)> {
        self.0.iter()
    }

    /// True when no provider has any field.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Resolves credentials from the environment and persisted env files.
///
/// # Example
///
/// ```
/// use slsctl::config::{CredentialStore, MemoryEnvironment};
///
/// let env = MemoryEnvironment::new().with_var("TENCENT_SECRET_ID", "AKIDexample");
/// let store = CredentialStore::new(std::env::temp_dir().join("slsctl-doc-missing"));
///
/// let creds = store.resolve(&env, None).unwrap();
/// assert_eq!(creds.get("tencent", "SecretId"), Some("AKIDexample"));
/// assert_eq!(creds.get("tencent", "Token"), None);
/// ```
#[derive(Debug, Clone)]
pub struct CredentialStore {
    providers: Vec<ProviderCredentialSpec>,
    env_dir: PathBuf,
}

impl CredentialStore {
    /// Store with the built-in providers, reading env files from `env_dir`.
    pub fn new(env_dir: PathBuf) -> Self {
        Self {
            providers: vec![ProviderCredentialSpec::tencent()],
            env_dir,
        }
    }

    /// Store with an explicit provider registry.
    pub fn with_providers(env_dir: PathBuf, providers: Vec<ProviderCredentialSpec>) -> Self {
        Self { providers, env_dir }
    }

    /// Resolve the credential environment variables that have a value,
    /// keyed by variable name.
    pub fn resolve_variables(
        &self,
        env: &dyn Environment,
        stage: Option<&str>,
    ) -> Result<BTreeMap<String, String>> {
        let persisted = self.load_env_files(stage)?;
        let mut resolved = BTreeMap::new();

        for spec in &self.providers {
            for (var, _) in &spec.fields {
                let value = env.get(var).or_else(|| persisted.get(var).cloned());
                if let Some(value) = value {
                    resolved.insert(var.clone(), value);
                }
            }
        }

        Ok(resolved)
    }

    /// Resolve the credential set for a stage.
    pub fn resolve(&self, env: &dyn Environment, stage: Option<&str>) -> Result<CredentialSet> {
        let variables = self.resolve_variables(env, stage)?;
        let mut set = CredentialSet::new();

        for spec in &self.providers {
            for (var, field) in &spec.fields {
                if let Some(value) = variables.get(var) {
                    set.insert(&spec.provider, field, value);
                }
            }
        }

        tracing::debug!(
            "Resolved credentials for {} provider(s)",
            set.iter().count()
        );
        Ok(set)
    }

    /// `.env`, overlaid by `.env.<stage>` when a stage is given.
    fn load_env_files(&self, stage: Option<&str>) -> Result<HashMap<String, String>> {
        let mut vars = EnvFileParser::load_optional(&self.env_dir.join(".env"))?;
        if let Some(stage) = stage {
            let staged = EnvFileParser::load_optional(&self.env_dir.join(format!(".env.{}", stage)))?;
            vars.extend(staged);
        }
        Ok(vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::environment::MemoryEnvironment;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn empty_when_nothing_is_set() {
        let temp = TempDir::new().unwrap();
        let store = CredentialStore::new(temp.path().to_path_buf());
        let creds = store.resolve(&MemoryEnvironment::new(), None).unwrap();
        assert!(creds.is_empty());
    }

    #[test]
    fn maps_variables_to_sdk_fields() {
        let temp = TempDir::new().unwrap();
        let env = MemoryEnvironment::new()
            .with_var("TENCENT_APP_ID", "125")
            .with_var("TENCENT_SECRET_ID", "id")
            .with_var("TENCENT_SECRET_KEY", "key")
            .with_var("TENCENT_TOKEN", "tok");
        let store = CredentialStore::new(temp.path().to_path_buf());

        let creds = store.resolve(&env, None).unwrap();
        let tencent = creds.provider("tencent").unwrap();
        assert_eq!(tencent.len(), 4);
        assert_eq!(tencent["AppId"], "125");
        assert_eq!(tencent["SecretId"], "id");
        assert_eq!(tencent["SecretKey"], "key");
        assert_eq!(tencent["Token"], "tok");
    }

    #[test]
    fn live_environment_wins_over_env_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".env"),
            "TENCENT_SECRET_ID=from-file\nTENCENT_SECRET_KEY=file-key\n",
        )
        .unwrap();
        let env = MemoryEnvironment::new().with_var("TENCENT_SECRET_ID", "from-env");
        let store = CredentialStore::new(temp.path().to_path_buf());

        let creds = store.resolve(&env, None).unwrap();
        assert_eq!(creds.get("tencent", "SecretId"), Some("from-env"));
        assert_eq!(creds.get("tencent", "SecretKey"), Some("file-key"));
    }

    #[test]
    fn stage_env_file_overlays_default_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".env"), "TENCENT_SECRET_ID=base\n").unwrap();
        fs::write(temp.path().join(".env.prod"), "TENCENT_SECRET_ID=prod\n").unwrap();
        let store = CredentialStore::new(temp.path().to_path_buf());

        let prod = store.resolve(&MemoryEnvironment::new(), Some("prod")).unwrap();
        assert_eq!(prod.get("tencent", "SecretId"), Some("prod"));

        let dev = store.resolve(&MemoryEnvironment::new(), Some("dev")).unwrap();
        assert_eq!(dev.get("tencent", "SecretId"), Some("base"));
    }

    #[test]
    fn unknown_variables_are_ignored() {
        let temp = TempDir::new().unwrap();
        let env = MemoryEnvironment::new().with_var("AWS_ACCESS_KEY_ID", "x");
        let store = CredentialStore::new(temp.path().to_path_buf());
        assert!(store.resolve(&env, None).unwrap().is_empty());
    }

    #[test]
    fn custom_provider_registry_is_iterated() {
        let temp = TempDir::new().unwrap();
        let env = MemoryEnvironment::new()
            .with_var("ACME_KEY", "k")
            .with_var("TENCENT_SECRET_ID", "ignored");
        let store = CredentialStore::with_providers(
            temp.path().to_path_buf(),
            vec![ProviderCredentialSpec::new("acme", &[("ACME_KEY", "ApiKey")])],
        );

        let creds = store.resolve(&env, None).unwrap();
        assert_eq!(creds.get("acme", "ApiKey"), Some("k"));
        assert!(creds.provider("tencent").is_none());
    }

    #[test]
    fn resolve_variables_keys_by_env_name() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".env"), "TENCENT_TOKEN=t\n").unwrap();
        let store = CredentialStore::new(temp.path().to_path_buf());

        let vars = store
            .resolve_variables(&MemoryEnvironment::new(), None)
            .unwrap();
        assert_eq!(vars.get("TENCENT_TOKEN"), Some(&"t".to_string()));
        assert_eq!(vars.len(), 1);
    }
}
