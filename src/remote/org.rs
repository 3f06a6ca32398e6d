//! Organization lookup.

use crate::config::CredentialSet;
use crate::error::Result;
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{build_client, endpoint, AuthHeader};

/// Finds the organization of the currently authenticated identity.
pub trait OrgResolver {
    /// Returns `Ok(None)` when the identity has no organization or the lookup
    /// could not answer in time.
    fn resolve_org(&self, credentials: &CredentialSet) -> Result<Option<String>>;
}

/// Always returns the same answer.
#[derive(Debug, Clone, Default)]
pub struct StaticOrgResolver(pub Option<String>);

impl StaticOrgResolver {
    /// Resolver that knows `org`.
    pub fn new(org: &str) -> Self {
        Self(Some(org.to_string()))
    }

    /// Resolver that never finds an org.
    pub fn none() -> Self {
        Self(None)
    }
}

impl OrgResolver for StaticOrgResolver {
    fn resolve_org(&self, _credentials: &CredentialSet) -> Result<Option<String>> {
        Ok(self.0.clone())
    }
}

#[derive(Serialize)]
struct OrgRequest<'a> {
    credentials: &'a CredentialSet,
}

#[derive(Deserialize)]
struct OrgResponse {
    #[serde(rename = "orgName", default)]
    org_name: Option<String>,
}

/// Looks up the org via `POST {identity_url}/org`.
///
/// The request body carries the resolved credentials; the response is
/// `{"orgName": "..."}`. A 404 or empty name means "no org". A timeout is
/// logged and treated the same way.
///
/// # Example
///
/// ```no_run
/// use slsctl::config::CredentialSet;
/// use slsctl::remote::{HttpOrgResolver, OrgResolver};
/// use std::time::Duration;
///
/// let resolver = HttpOrgResolver::new("https://identity.example.com", Duration::from_secs(5)).unwrap();
/// let org = resolver.resolve_org(&CredentialSet::new()).unwrap();
/// ```
pub struct HttpOrgResolver {
    identity_url: String,
    timeout: Duration,
    auth: Option<AuthHeader>,
    client: reqwest::blocking::Client,
}

impl HttpOrgResolver {
    /// Create a resolver for the given identity service.
    pub fn new(identity_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            identity_url: identity_url.to_string(),
            timeout,
            auth: None,
            client: build_client(timeout)?,
        })
    }

    /// Send `auth` with every request.
    pub fn with_auth(mut self, auth: AuthHeader) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl OrgResolver for HttpOrgResolver {
    fn resolve_org(&self, credentials: &CredentialSet) -> Result<Option<String>> {
        let url = endpoint(&self.identity_url, "org");
        let mut request = self.client.post(&url).json(&OrgRequest { credentials });
        if let Some(auth) = &self.auth {
            request = request.header(&auth.header_name, &auth.header_value);
        }

        let response = match request.send() {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                tracing::warn!(
                    "Org lookup at {} timed out after {:?}",
                    url,
                    self.timeout
                );
                return Ok(None);
            }
            Err(e) => return Err(anyhow!(e).context(format!("Failed to reach {}", url)).into()),
        };

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!("Identity service has no org for these credentials");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(anyhow!("HTTP {} looking up org at {}", status, url).into());
        }

        let body: OrgResponse = response
            .json()
            .with_context(|| format!("Invalid org response from {}", url))?;

        Ok(body.org_name.filter(|name| !name.trim().is_empty()))
    }
}
