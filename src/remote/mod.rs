//! Remote collaborators: org lookup and the deployment platform.
//!
//! Both are traits so resolution and commands can run against in-process
//! doubles:
//! - [`OrgResolver`] finds the organization of the authenticated identity
//! - [`Platform`] deploys, removes and runs methods on resolved instances
//!
//! The HTTP implementations share a blocking `reqwest` client with a bounded
//! timeout and an optional [`AuthHeader`].

pub mod mock;
pub mod org;
pub mod platform;

pub use mock::{MockPlatform, PlatformCall};
pub use org::{HttpOrgResolver, OrgResolver, StaticOrgResolver};
pub use platform::{Action, ActionOptions, HttpPlatform, Outputs, Platform};

use anyhow::{Context, Result};
use std::time::Duration;

/// Default timeout for remote calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Authentication header for remote calls.
#[derive(Debug, Clone)]
pub struct AuthHeader {
    /// Header name (e.g., "Authorization").
    pub header_name: String,
    /// Header value (e.g., "Bearer token123").
    pub header_value: String,
}

impl AuthHeader {
    /// Create a Bearer token auth header.
    pub fn bearer(token: &str) -> Self {
        Self {
            header_name: "Authorization".to_string(),
            header_value: format!("Bearer {}", token),
        }
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("slsctl/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")
}

fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}
