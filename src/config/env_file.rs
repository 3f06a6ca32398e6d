//! `.env` file reading and synchronization.
//!
//! [`EnvFileParser`] reads `KEY=value` files used as the fallback source for
//! credentials. [`EnvFileSync`] writes resolved values back, both into the
//! live environment and into the working directory's `.env`.

use crate::config::environment::Environment;
use crate::error::{SlsError, Result};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Parses .env files into a map of environment variables.
///
/// # Supported Formats
///
/// - Simple: `KEY=value`
/// - Quoted: `KEY="value with spaces"` or `KEY='single quoted'`
/// - Empty: `KEY=`
/// - Comments: `# This is a comment`
/// - Values with equals signs: `URL=https://example.com?foo=bar`
///
/// Lines without `=` are ignored. When a key repeats, the last one wins.
///
/// # Example
///
/// ```
/// use slsctl::config::EnvFileParser;
///
/// let content = r#"
/// # Tencent credentials
/// TENCENT_SECRET_ID=AKIDexample
/// TENCENT_SECRET_KEY="with spaces"
/// "#;
///
/// let vars = EnvFileParser::parse(content);
/// assert_eq!(vars.get("TENCENT_SECRET_ID"), Some(&"AKIDexample".to_string()));
/// assert_eq!(vars.get("TENCENT_SECRET_KEY"), Some(&"with spaces".to_string()));
/// ```
pub struct EnvFileParser;

impl EnvFileParser {
    /// Parse env file content into a map of variables.
    pub fn parse(content: &str) -> HashMap<String, String> {
        let mut vars = HashMap::new();

        for line in content.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = Self::parse_line(line) {
                vars.insert(key, value);
            }
        }

        vars
    }

    fn parse_line(line: &str) -> Option<(String, String)> {
        let (key, value) = line.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some((key.to_string(), Self::unquote(value.trim())))
    }

    fn unquote(value: &str) -> String {
        let quoted = value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')));
        if quoted {
            value[1..value.len() - 1].to_string()
        } else {
            value.to_string()
        }
    }

    /// Load and parse an env file, returning an empty map if it doesn't exist.
    pub fn load_optional(path: &Path) -> Result<HashMap<String, String>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Self::parse(&content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(SlsError::Io(e)),
        }
    }
}

/// Writes key/value pairs into the environment and a persisted `.env` file.
///
/// Each synchronized key replaces any existing `KEY=...` line; new
/// assignments are appended at the end. The file is rewritten in full and is
/// not protected against concurrent writers.
#[derive(Debug, Clone)]
pub struct EnvFileSync {
    path: PathBuf,
}

impl EnvFileSync {
    /// Synchronize into the `.env` file of `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(".env"),
        }
    }

    /// Synchronize into an explicit file.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the file being written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `values` to `env`, then persist them.
    pub fn sync(&self, env: &mut dyn Environment, values: &BTreeMap<String, String>) -> Result<()> {
        for (key, value) in values {
            if value.contains('\n') || value.contains('\r') {
                return Err(SlsError::InvalidEnvValue { key: key.clone() });
            }
        }

        for (key, value) in values {
            env.set(key, value);
        }

        let existing = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(SlsError::Io(e)),
        };

        let updated = merge_assignments(&existing, values);
        fs::write(&self.path, updated)?;

        tracing::debug!(
            "Synchronized {} variable(s) into {}",
            values.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Drop existing assignments for `values`' keys and append the new ones.
fn merge_assignments(content: &str, values: &BTreeMap<String, String>) -> String {
    let mut content = content.to_string();

    for key in values.keys() {
        let pattern = format!(r"(?m)^{}=.*(\r?\n)?", regex::escape(key));
        // Escaped key always yields a valid pattern
        if let Ok(re) = Regex::new(&pattern) {
            content = re.replace_all(&content, "").into_owned();
        }
    }

    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }

    for (key, value) in values {
        content.push_str(&format!("{}={}\n", key, value));
    }

    content
}
