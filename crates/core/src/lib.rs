//! droid-build core - shared settings and project plumbing
//!
//! This crate provides the pieces every other droid-build crate leans on:
//! the on-disk project layout, build settings loaded from file and
//! environment, and the process executor used to drive external tools.

pub mod config;
pub mod error;
pub mod process;
pub mod project;

pub use config::BuildSettings;
pub use error::{CoreError, Result};
pub use process::{ProcessError, ProcessExecutor, SystemExecutor};
pub use project::ProjectLayout;

/// droid-build version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
