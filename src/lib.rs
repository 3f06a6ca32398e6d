//! slsctl - Resolve and deploy serverless component instances.
//!
//! slsctl reads `serverless.yml` instance files, fills in what they leave
//! out (org, app, credentials, `${...}` references, source paths) and hands
//! fully resolved instances to a deployment platform.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Instance loading, templates, credentials and `.env` files
//! - [`error`] - Error types and result aliases
//! - [`remote`] - Org lookup and deployment platform clients
//! - [`ui`] - Spinners and terminal output
//!
//! # Example
//!
//! ```
//! use slsctl::config::{Interpolator, MemoryEnvironment, VariableResolver, VariableScope};
//!
//! let env = MemoryEnvironment::new().with_var("REGION", "ap-guangzhou");
//! let scope = VariableScope {
//!     env: &env,
//!     name: "api",
//!     component: "scf",
//!     org: "acme",
//!     app: "shop",
//!     stage: Some("dev"),
//! };
//! let value = serde_yaml::Value::String("${app}-${stage} in ${env:REGION}".into());
//! let resolved = Interpolator.resolve(value, &scope).unwrap();
//! assert_eq!(resolved.as_str(), Some("shop-dev in ap-guangzhou"));
//! ```
//!
//! For file-based loading, see the integration tests.

pub mod cli;
pub mod config;
pub mod error;
pub mod remote;
pub mod ui;

pub use error::{Result, SlsError};
