//! In-process platform for testing.
//!
//! `MockPlatform` records every call and answers with canned outputs, so
//! commands can be exercised without a network.
//!
//! # Example
//!
//! ```
//! use slsctl::config::{CredentialSet, InstanceConfig};
//! use slsctl::remote::{Action, ActionOptions, MockPlatform, Platform};
//!
//! let platform = MockPlatform::new().with_output("url", "https://api.example.com");
//! let instance = InstanceConfig {
//!     name: "api".into(),
//!     component: "scf".into(),
//!     org: "acme".into(),
//!     app: "shop".into(),
//!     stage: None,
//!     inputs: None,
//! };
//!
//! let outputs = platform
//!     .deploy(&instance, &CredentialSet::new(), &ActionOptions::default(), &mut |_: &str| {})
//!     .unwrap();
//! assert_eq!(outputs["url"], "https://api.example.com");
//! assert_eq!(platform.calls()[0].action, Action::Deploy);
//! ```

use std::cell::RefCell;

use crate::config::{CredentialSet, InstanceConfig};
use crate::error::{Result, SlsError};

use super::platform::{Action, ActionOptions, Outputs, Platform};

/// One recorded platform call.
#[derive(Debug, Clone)]
pub struct PlatformCall {
    pub action: Action,
    pub instance: InstanceConfig,
    pub credentials: CredentialSet,
    pub options: ActionOptions,
}

/// Platform double that records calls.
#[derive(Debug, Default)]
pub struct MockPlatform {
    outputs: Outputs,
    fail_with: Option<String>,
    calls: RefCell<Vec<PlatformCall>>,
}

impl MockPlatform {
    /// Create a platform that succeeds with empty outputs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an output returned for every call.
    pub fn with_output(mut self, key: &str, value: &str) -> Self {
        self.outputs
            .insert(key.to_string(), serde_json::Value::String(value.to_string()));
        self
    }

    /// Make every call fail with a platform error carrying `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Default::default()
        }
    }

    /// Calls made so far.
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.borrow().clone()
    }

    fn record(
        &self,
        action: Action,
        instance: &InstanceConfig,
        credentials: &CredentialSet,
        options: &ActionOptions,
        status: &mut dyn FnMut(&str),
    ) -> Result<Outputs> {
        status(&format!("{} {}", action, instance.name));
        self.calls.borrow_mut().push(PlatformCall {
            action: action.clone(),
            instance: instance.clone(),
            credentials: credentials.clone(),
            options: *options,
        });

        match &self.fail_with {
            Some(message) => Err(SlsError::Platform {
                action: action.to_string(),
                message: message.clone(),
            }),
            None => Ok(self.outputs.clone()),
        }
    }
}

impl Platform for MockPlatform {
    fn deploy(
        &self,
        instance: &InstanceConfig,
        credentials: &CredentialSet,
        options: &ActionOptions,
        status: &mut dyn FnMut(&str),
    ) -> Result<Outputs> {
        self.record(Action::Deploy, instance, credentials, options, status)
    }

    fn remove(
        &self,
        instance: &InstanceConfig,
        credentials: &CredentialSet,
        options: &ActionOptions,
        status: &mut dyn FnMut(&str),
    ) -> Result<Outputs> {
        self.record(Action::Remove, instance, credentials, options, status)
    }

    fn run(
        &self,
        method: &str,
        instance: &InstanceConfig,
        credentials: &CredentialSet,
        options: &ActionOptions,
        status: &mut dyn FnMut(&str),
    ) -> Result<Outputs> {
        self.record(
            Action::Run(method.to_string()),
            instance,
            credentials,
            options,
            status,
        )
    }
}
