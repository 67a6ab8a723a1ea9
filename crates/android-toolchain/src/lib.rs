//! Android Toolchain Checks
//!
//! Handles discovery of:
//! - Android SDK (and the templates it ships for Ant and Gradle)
//! - Ant on `PATH`

pub mod detector;
pub mod sdk;

pub use detector::{DetectionError, RequirementChecker, SystemRequirements};
pub use sdk::AndroidSdk;
