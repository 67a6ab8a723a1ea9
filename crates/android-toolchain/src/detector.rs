//! Requirement Checks
//!
//! Verifies that the tools a build backend needs are discoverable before
//! anything is written into the project.

use std::path::PathBuf;
use async_trait::async_trait;
use tracing::{debug, info};
use which::which;

use crate::sdk::AndroidSdk;

/// Requirement check errors
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("Android SDK not found. Set ANDROID_HOME to your SDK location.")]
    SdkNotFound,
    #[error("Android SDK at {path:?} is missing {missing}")]
    InvalidInstallation { path: PathBuf, missing: String },
    #[error("`{0}` not found on PATH")]
    ToolNotFound(String),
}

/// Checks that a build tool is usable, handing back the SDK it found
#[async_trait]
pub trait RequirementChecker: Send + Sync {
    /// Ant on `PATH` plus an SDK with the `build.xml` template
    async fn check_ant(&self) -> Result<AndroidSdk, DetectionError>;

    /// An SDK with the Gradle wrapper template
    async fn check_gradle(&self) -> Result<AndroidSdk, DetectionError>;
}

/// Checks against the real system
#[derive(Debug, Clone, Default)]
pub struct SystemRequirements {
    sdk_path: Option<PathBuf>,
}

impl SystemRequirements {
    /// `sdk_path` is the configured SDK location, if any
    pub fn new(sdk_path: Option<PathBuf>) -> Self {
        Self { sdk_path }
    }

    fn sdk(&self) -> Result<AndroidSdk, DetectionError> {
        AndroidSdk::locate(self.sdk_path.as_deref()).ok_or(DetectionError::SdkNotFound)
    }

    fn require(sdk: &AndroidSdk, path: PathBuf) -> Result<(), DetectionError> {
        if path.exists() {
            return Ok(());
        }
        let missing = path
            .strip_prefix(sdk.path())
            .unwrap_or(&path)
            .display()
            .to_string();
        Err(DetectionError::InvalidInstallation {
            path: sdk.path().to_path_buf(),
            missing,
        })
    }
}

#[async_trait]
impl RequirementChecker for SystemRequirements {
    async fn check_ant(&self) -> Result<AndroidSdk, DetectionError> {
        let ant = which("ant").map_err(|_| DetectionError::ToolNotFound("ant".into()))?;
        debug!("Found ant at {:?}", ant);

        let sdk = self.sdk()?;
        Self::require(&sdk, sdk.build_template())?;
        info!("Ant build environment ready (SDK {:?})", sdk.path());
        Ok(sdk)
    }

    async fn check_gradle(&self) -> Result<AndroidSdk, DetectionError> {
        let sdk = self.sdk()?;
        Self::require(&sdk, sdk.gradle_wrapper_dir())?;
        info!("Gradle build environment ready (SDK {:?})", sdk.path());
        Ok(sdk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_gradle_requires_wrapper_template() {
        let dir = tempfile::tempdir().unwrap();
        let checker = SystemRequirements::new(Some(dir.path().to_path_buf()));

        let err = checker.check_gradle().await.unwrap_err();
        assert!(matches!(err, DetectionError::InvalidInstallation { .. }));

        std::fs::create_dir_all(AndroidSdk::new(dir.path()).gradle_wrapper_dir()).unwrap();
        let sdk = checker.check_gradle().await.unwrap();
        assert_eq!(sdk.path(), dir.path());
    }

    #[tokio::test]
    async fn test_missing_configured_sdk() {
        let dir = tempfile::tempdir().unwrap();
        let checker = SystemRequirements::new(Some(dir.path().join("nope")));
        let err = checker.check_gradle().await.unwrap_err();
        assert!(matches!(err, DetectionError::SdkNotFound));
    }
}
