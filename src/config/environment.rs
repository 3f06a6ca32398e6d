//! Environment variable access.
//!
//! Credential resolution and `.env` synchronization both read and write
//! environment variables. They do so through the [`Environment`] trait so the
//! real process environment can be swapped for an in-memory map in tests.

use std::collections::HashMap;

/// Read/write access to a set of environment variables.
pub trait Environment {
    /// Get the value of a variable, if set.
    fn get(&self, key: &str) -> Option<String>;

    /// Set a variable, replacing any previous value.
    fn set(&mut self, key: &str, value: &str);
}

/// The live process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        std::env::set_var(key, value);
    }
}

/// An in-memory environment.
///
/// # Example
///
/// ```
/// use slsctl::config::{Environment, MemoryEnvironment};
///
/// let mut env = MemoryEnvironment::new().with_var("TENCENT_APP_ID", "1250000000");
/// env.set("TENCENT_TOKEN", "t0k3n");
/// assert_eq!(env.get("TENCENT_APP_ID").as_deref(), Some("1250000000"));
/// assert_eq!(env.get("TENCENT_TOKEN").as_deref(), Some("t0k3n"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryEnvironment {
    vars: HashMap<String, String>,
}

impl MemoryEnvironment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    /// All variables currently set.
    pub fn vars(&self) -> &HashMap<String, String> {
        &self.vars
    }
}

impl Environment for MemoryEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }
}
