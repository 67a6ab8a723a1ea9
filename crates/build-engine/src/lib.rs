//! Android Build Engine
//!
//! Builds Android projects with Ant or Gradle and locates the resulting
//! APKs. A third, no-op backend only discovers APKs built out-of-band.

pub mod config;
pub mod options;
pub mod artifacts;
pub mod templates;
pub mod backend;
pub mod ant_build;
pub mod gradle_build;
pub mod selector;
pub mod runner;

#[cfg(test)]
mod testing;

pub use config::{BuildMethod, BuildRequest, BuildType, ToolCommand};
pub use options::{resolve, BuildOptions};
pub use artifacts::{scan, sort_by_recency, ArtifactCandidate, ArtifactName};
pub use backend::{Backend, BuildContext};
pub use ant_build::AntBuild;
pub use gradle_build::GradleBuild;
pub use selector::select_for_architecture;
pub use runner::{usage, BuildPhase, BuildResult, BuildRunner};

pub use droid_build_emulator_bridge::Architecture;

use std::path::PathBuf;
use droid_build_android_toolchain::DetectionError;
use droid_build_core::process::{exit_label, ProcessError};

/// Build errors
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Build option '{0}' not recognized.")]
    UnrecognizedOption(String),
    #[error("Environment error: {0}")]
    Environment(String),
    #[error("{tool} failed with {}", exit_label(.code))]
    BuildTool {
        tool: String,
        code: Option<i32>,
        output: String,
    },
    #[error("Could not find apk architecture: {architecture} build-type: {build_type}")]
    ArtifactNotFound {
        architecture: Architecture,
        build_type: BuildType,
    },
    #[error("Manifest error: {0}")]
    Manifest(#[from] droid_build_manifest_manager::ParseError),
    #[error("Could not sync {path:?}: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Device error: {0}")]
    Device(#[from] droid_build_emulator_bridge::AdbError),
    #[error(transparent)]
    Core(#[from] droid_build_core::CoreError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildError {
    /// Map a failed tool invocation. A tool that could not be launched is
    /// an environment problem rather than a build failure.
    pub fn from_process(tool: &str, err: ProcessError) -> Self {
        match err {
            ProcessError::Launch { command, source } => {
                BuildError::Environment(format!("could not launch `{}`: {}", command, source))
            }
            ProcessError::Failed { code, output, .. } => BuildError::BuildTool {
                tool: tool.to_string(),
                code,
                output,
            },
        }
    }

    /// Captured tool output, when the error carries any
    pub fn tool_output(&self) -> Option<&str> {
        match self {
            BuildError::BuildTool { output, .. } => Some(output),
            _ => None,
        }
    }
}

impl From<DetectionError> for BuildError {
    fn from(err: DetectionError) -> Self {
        BuildError::Environment(err.to_string())
    }
}
