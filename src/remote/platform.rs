//! Deployment platform collaborator.

use crate::config::{CredentialSet, InstanceConfig};
use crate::error::{Result, SlsError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::{build_client, endpoint, AuthHeader};

/// Outputs returned by the platform for one instance.
pub type Outputs = serde_json::Map<String, serde_json::Value>;

/// What to do with an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Deploy,
    Remove,
    /// Invoke a component's custom method.
    Run(String),
}

impl Action {
    fn path(&self) -> &'static str {
        match self {
            Self::Deploy => "deploy",
            Self::Remove => "remove",
            Self::Run(_) => "run",
        }
    }

    fn method(&self) -> Option<&str> {
        match self {
            Self::Run(method) => Some(method),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Run(method) => write!(f, "run {}", method),
            other => f.write_str(other.path()),
        }
    }
}

/// Flags passed through to the platform with every action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActionOptions {
    pub debug: bool,
    pub dev: bool,
    /// Wait for the action to finish instead of returning once accepted.
    pub sync: bool,
    pub force: bool,
}

/// Deploys, removes and runs methods on resolved instances.
///
/// `status` receives progress messages while the action runs. Errors from
/// the platform propagate unchanged.
pub trait Platform {
    fn deploy(
        &self,
        instance: &InstanceConfig,
        credentials: &CredentialSet,
        options: &ActionOptions,
        status: &mut dyn FnMut(&str),
    ) -> Result<Outputs>;

    fn remove(
        &self,
        instance: &InstanceConfig,
        credentials: &CredentialSet,
        options: &ActionOptions,
        status: &mut dyn FnMut(&str),
    ) -> Result<Outputs>;

    fn run(
        &self,
        method: &str,
        instance: &InstanceConfig,
        credentials: &CredentialSet,
        options: &ActionOptions,
        status: &mut dyn FnMut(&str),
    ) -> Result<Outputs>;

    /// Dispatch on [`Action`].
    fn execute(
        &self,
        action: &Action,
        instance: &InstanceConfig,
        credentials: &CredentialSet,
        options: &ActionOptions,
        status: &mut dyn FnMut(&str),
    ) -> Result<Outputs> {
        match action {
            Action::Deploy => self.deploy(instance, credentials, options, status),
            Action::Remove => self.remove(instance, credentials, options, status),
            Action::Run(method) => self.run(method, instance, credentials, options, status),
        }
    }
}

#[derive(Serialize)]
struct ActionRequest<'a> {
    instance: &'a InstanceConfig,
    credentials: &'a CredentialSet,
    options: &'a ActionOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<&'a str>,
}

#[derive(Deserialize)]
struct ActionResponse {
    #[serde(default)]
    outputs: Outputs,
}

/// Platform reached over HTTP: `POST {platform_url}/instances/{action}`.
pub struct HttpPlatform {
    platform_url: String,
    auth: Option<AuthHeader>,
    client: reqwest::blocking::Client,
}

impl HttpPlatform {
    /// Create a client for the given platform endpoint.
    pub fn new(platform_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            platform_url: platform_url.to_string(),
            auth: None,
            client: build_client(timeout)?,
        })
    }

    /// Send `auth` with every request.
    pub fn with_auth(mut self, auth: AuthHeader) -> Self {
        self.auth = Some(auth);
        self
    }

    fn call(
        &self,
        action: &Action,
        instance: &InstanceConfig,
        credentials: &CredentialSet,
        options: &ActionOptions,
        status: &mut dyn FnMut(&str),
    ) -> Result<Outputs> {
        let url = endpoint(&self.platform_url, &format!("instances/{}", action.path()));
        let body = ActionRequest {
            instance,
            credentials,
            options,
            method: action.method(),
        };

        status(&format!("Sending {} request for {}", action, instance.name));
        tracing::debug!("POST {} for {}", url, instance.qualified_name());

        let mut request = self.client.post(&url).json(&body);
        if let Some(auth) = &self.auth {
            request = request.header(&auth.header_name, &auth.header_value);
        }

        let response = request
            .send()
            .with_context(|| format!("Failed to reach {}", url))?;

        let code = response.status();
        if !code.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(SlsError::Platform {
                action: action.to_string(),
                message: format!("HTTP {}: {}", code, text.trim()),
            });
        }

        let parsed: ActionResponse = response
            .json()
            .with_context(|| format!("Invalid response from {}", url))?;

        status(&format!("{} finished for {}", action, instance.name));
        Ok(parsed.outputs)
    }
}

impl Platform for HttpPlatform {
    fn deploy(
        &self,
        instance: &InstanceConfig,
        credentials: &CredentialSet,
        options: &ActionOptions,
        status: &mut dyn FnMut(&str),
    ) -> Result<Outputs> {
        self.call(&Action::Deploy, instance, credentials, options, status)
    }

    fn remove(
        &self,
        instance: &InstanceConfig,
        credentials: &CredentialSet,
        options: &ActionOptions,
        status: &mut dyn FnMut(&str),
    ) -> Result<Outputs> {
        self.call(&Action::Remove, instance, credentials, options, status)
    }

    fn run(
        &self,
        method: &str,
        instance: &InstanceConfig,
        credentials: &CredentialSet,
        options: &ActionOptions,
        status: &mut dyn FnMut(&str),
    ) -> Result<Outputs> {
        self.call(
            &Action::Run(method.to_string()),
            instance,
            credentials,
            options,
            status,
        )
    }
}
