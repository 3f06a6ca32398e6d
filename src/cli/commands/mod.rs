//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Resolution and the per-instance
//! fan-out live in [`resolve`] and are shared by every platform action.

pub mod completions;
pub mod deploy;
pub mod dispatcher;
pub mod info;
pub mod remove;
pub mod resolve;
pub mod run;

pub use dispatcher::{Command, CommandDispatcher, CommandResult, Services};
pub use resolve::{resolve, Resolution, ResolveRequest, Resolved};
