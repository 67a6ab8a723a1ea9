//! droid-build - Android project build orchestration
//!
//! Prepares an Android project for Ant or Gradle, runs the build and
//! locates the resulting APKs.
//!
//! ## Architecture
//!
//! - `droid-build-core`: project layout, settings and process execution
//! - `droid-build-android-toolchain`: SDK location and requirement checks
//! - `droid-build-manifest-manager`: AndroidManifest.xml parsing
//! - `droid-build-emulator-bridge`: adb and device architecture detection
//! - `droid-build-engine`: build backends, artifact discovery and selection

#![warn(clippy::all)]

pub mod commands;

// Re-export main components for library usage
pub use droid_build_core as core;
pub use droid_build_android_toolchain as toolchain;
pub use droid_build_manifest_manager as manifest;
pub use droid_build_emulator_bridge as emulator;
pub use droid_build_engine as build;

/// Prelude module for convenient imports
pub mod prelude {
    pub use droid_build_core::BuildSettings;
    pub use droid_build_engine::{
        select_for_architecture, Architecture, BuildError, BuildMethod, BuildResult, BuildRunner,
        BuildType,
    };
}
