//! Instance configuration resolution.
//!
//! This module turns instance files, CLI flags, environment variables and
//! `.env` files into fully resolved instances:
//! - Instance types in [`instance`]
//! - Single-directory loading in [`loader`]
//! - Multi-instance templates in [`template`]
//! - Provider credentials in [`credentials`]
//! - `.env` reading and writing in [`env_file`]
//! - Environment access in [`environment`]
//! - `${...}` references in [`interpolation`]
//!
//! # Example
//!
//! ```
//! use slsctl::config::{InstanceLoader, MemoryEnvironment, Overrides, SourceSpec};
//! use slsctl::remote::StaticOrgResolver;
//! use std::fs;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(
//!     temp.path().join("serverless.yml"),
//!     "name: api\ncomponent: scf\nstage: dev\ninputs:\n  src: ./code\n",
//! )
//! .unwrap();
//!
//! let mut env = MemoryEnvironment::new();
//! let orgs = StaticOrgResolver::none();
//! let overrides = Overrides {
//!     org: Some("acme".into()),
//!     ..Default::default()
//! };
//! let mut loader = InstanceLoader::new(temp.path(), &mut env, &orgs).with_overrides(overrides);
//!
//! let instance = loader.load(temp.path()).unwrap();
//! assert_eq!(instance.org, "acme");
//! assert_eq!(
//!     instance.inputs.unwrap().src,
//!     Some(SourceSpec::Path(temp.path().join("code")))
//! );
//! ```

pub mod credentials;
pub mod env_file;
pub mod environment;
pub mod instance;
pub mod interpolation;
pub mod loader;
pub mod paths;
pub mod template;

// Instance re-exports
pub use instance::{InstanceConfig, Inputs, RawInstanceFile, SourceSpec};

// Loader re-exports
pub use loader::{
    find_instance_file, load_instance_file, InstanceLoader, Overrides, INSTANCE_FILE_NAMES,
};

// Template re-exports
pub use template::{instance_dirs, load_template, Template};

// Credential re-exports
pub use credentials::{CredentialSet, CredentialStore, ProviderCredentialSpec};

// Env file re-exports
pub use env_file::{EnvFileParser, EnvFileSync};

// Environment re-exports
pub use environment::{Environment, MemoryEnvironment, ProcessEnvironment};

// Interpolation re-exports
pub use interpolation::{
    has_interpolation, parse_interpolation, Interpolator, Segment, VariableResolver,
    VariableScope,
};

// Path re-exports
pub use paths::resolve_against;
