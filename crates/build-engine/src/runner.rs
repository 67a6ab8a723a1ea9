//! Build Runner
//!
//! Coordinates option resolution, the selected backend and artifact
//! discovery for one project.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, error, info};

use droid_build_android_toolchain::{AndroidSdk, SystemRequirements};
use droid_build_core::{BuildSettings, ProjectLayout, SystemExecutor};
use droid_build_emulator_bridge::{AdbClient, Architecture};

use crate::options::{resolve, BuildOptions};
use crate::{Backend, BuildContext, BuildError, BuildMethod, BuildType};

/// Where a request currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildPhase {
    Unprepared,
    EnvironmentReady,
    Building,
    Cleaning,
    Done,
    Aborted,
}

/// Result of a successful build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildResult {
    /// APKs found after the build, most relevant first
    pub artifact_paths: Vec<PathBuf>,
    pub build_type: BuildType,
    pub build_method: BuildMethod,
}

/// Build runner that coordinates the build process
pub struct BuildRunner {
    ctx: BuildContext,
    default_method: Option<String>,
    sdk_path: Option<PathBuf>,
    phase: Mutex<BuildPhase>,
}

impl BuildRunner {
    /// Create a new build runner
    pub fn new(ctx: BuildContext) -> Self {
        Self {
            ctx,
            default_method: None,
            sdk_path: None,
            phase: Mutex::new(BuildPhase::Unprepared),
        }
    }

    /// Method used when no option names one (`ANDROID_BUILD`)
    pub fn with_default_method(mut self, method: Option<String>) -> Self {
        self.default_method = method;
        self
    }

    /// Configured SDK location, used to find adb
    pub fn with_sdk_path(mut self, path: Option<PathBuf>) -> Self {
        self.sdk_path = path;
        self
    }

    /// Runner for the project at `root` using the real system
    pub fn from_settings(root: &Path, settings: &BuildSettings) -> Self {
        let android = &settings.android;
        let ctx = BuildContext::new(
            ProjectLayout::new(root),
            Arc::new(SystemExecutor::new()),
            Arc::new(SystemRequirements::new(android.sdk_path.clone())),
        )
        .with_multiple_apks(android.multiple_apks);

        Self::new(ctx)
            .with_default_method(android.build_method.clone())
            .with_sdk_path(android.sdk_path.clone())
    }

    pub fn context(&self) -> &BuildContext {
        &self.ctx
    }

    pub fn phase(&self) -> BuildPhase {
        *self.phase.lock()
    }

    fn enter(&self, phase: BuildPhase) {
        debug!("Build phase: {:?}", phase);
        *self.phase.lock() = phase;
    }

    fn track<T>(&self, result: Result<T, BuildError>) -> Result<T, BuildError> {
        if let Err(ref e) = result {
            error!("Aborted: {}", e);
            self.enter(BuildPhase::Aborted);
        }
        result
    }

    /// Build the project and collect the resulting APKs
    pub async fn run_build(&self, options: impl Into<BuildOptions>) -> Result<BuildResult, BuildError> {
        self.enter(BuildPhase::Unprepared);
        let request = self.track(resolve(options, self.default_method.as_deref()))?;
        info!(
            "Starting {} build with {} for {:?}",
            request.build_type,
            request.build_method,
            self.ctx.layout.root()
        );

        let backend = Backend::for_method(request.build_method, &self.ctx);
        self.track(backend.prepare_environment().await)?;
        self.enter(BuildPhase::EnvironmentReady);

        self.enter(BuildPhase::Building);
        self.track(backend.build(request.build_type).await)?;

        let artifact_paths = backend.find_output_artifacts(request.build_type);
        info!("Built the following apk(s):");
        for path in &artifact_paths {
            info!("    {}", path.display());
        }

        self.enter(BuildPhase::Done);
        Ok(BuildResult {
            artifact_paths,
            build_type: request.build_type,
            build_method: request.build_method,
        })
    }

    /// Clean the project and remove the staging directory
    pub async fn run_clean(&self, options: impl Into<BuildOptions>) -> Result<(), BuildError> {
        self.enter(BuildPhase::Unprepared);
        let request = self.track(resolve(options, self.default_method.as_deref()))?;

        let backend = Backend::for_method(request.build_method, &self.ctx);
        self.track(backend.prepare_environment().await)?;
        self.enter(BuildPhase::EnvironmentReady);

        self.enter(BuildPhase::Cleaning);
        self.track(backend.clean().await)?;
        self.track(self.remove_staging_dir().await)?;

        self.enter(BuildPhase::Done);
        Ok(())
    }

    async fn remove_staging_dir(&self) -> Result<(), BuildError> {
        let staging = self.ctx.layout.staging_dir();
        match tokio::fs::remove_dir_all(&staging).await {
            Ok(()) => {
                info!("Removed {:?}", staging);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Processor family of the device or emulator `serial`
    pub async fn detect_architecture(&self, serial: &str) -> Result<Architecture, BuildError> {
        let adb = AndroidSdk::locate(self.sdk_path.as_deref()).map(|sdk| sdk.adb());
        let client = AdbClient::with_sdk_adb(adb, self.ctx.executor.clone());
        Ok(client.detect_architecture(serial).await?)
    }
}

/// Help text for the build command
pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} [build_type]\n\
         Build Types : \n    \
         '--debug': Default build, will build project in debug mode\n    \
         '--release': will build project for release\n    \
         '--ant': Default build, will build project with ant\n    \
         '--gradle': will build project with gradle\n    \
         '--nobuild': will skip build process (can be used with run command)\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{touch, Fixture};
    use std::fs;

    #[tokio::test]
    async fn test_nobuild_only_scans() {
        let fixture = Fixture::new();
        let bin = fixture.root().join("bin");
        touch(&bin.join("HelloCordova-debug.apk"), 100);
        touch(&bin.join("HelloCordova-debug-unaligned.apk"), 200);

        let runner = BuildRunner::new(fixture.context());
        let result = runner.run_build("--nobuild").await.unwrap();

        assert_eq!(result.build_method, BuildMethod::NoBuild);
        assert_eq!(result.build_type, BuildType::Debug);
        assert_eq!(result.artifact_paths, vec![bin.join("HelloCordova-debug.apk")]);
        assert!(fixture.executor.calls().is_empty());
        assert_eq!(runner.phase(), BuildPhase::Done);
    }

    #[tokio::test]
    async fn test_unknown_option_has_no_side_effects() {
        let fixture = Fixture::new();
        let runner = BuildRunner::new(fixture.context());

        let err = runner.run_build(vec!["--release", "--foo"]).await.unwrap_err();
        assert!(err.to_string().contains("--foo"));
        assert!(fixture.executor.calls().is_empty());
        assert!(fixture.requirements.checks().is_empty());
        assert_eq!(runner.phase(), BuildPhase::Aborted);
    }

    #[tokio::test]
    async fn test_ant_build_cleans_then_builds() {
        let fixture = Fixture::new();
        fs::write(fixture.root().join("AndroidManifest.xml"), crate::testing::SAMPLE_MANIFEST).unwrap();
        let runner = BuildRunner::new(fixture.context());

        let result = runner.run_build(Vec::<String>::new()).await.unwrap();

        assert_eq!(result.build_method, BuildMethod::Ant);
        let targets: Vec<String> = fixture
            .executor
            .calls()
            .into_iter()
            .map(|c| c.args[0].clone())
            .collect();
        assert_eq!(targets, vec!["clean", "debug"]);
        assert!(result.artifact_paths.is_empty());
        assert!(fixture.root().join("build.xml").exists());
    }

    #[tokio::test]
    async fn test_default_method_from_settings() {
        let fixture = Fixture::new();
        let runner = BuildRunner::new(fixture.context()).with_default_method(Some("gradle".into()));

        let result = runner.run_build("--release").await.unwrap();
        assert_eq!(result.build_method, BuildMethod::Gradle);
        assert_eq!(fixture.executor.calls()[0].args[0], "assembleRelease");
    }

    #[tokio::test]
    async fn test_failed_build_aborts_before_scanning() {
        let fixture = Fixture::new().failing_with(1);
        let runner = BuildRunner::new(fixture.context());

        let err = runner.run_build("--gradle").await.unwrap_err();
        assert!(matches!(err, BuildError::BuildTool { code: Some(1), .. }));
        assert_eq!(err.tool_output(), Some("BUILD FAILED"));
        assert_eq!(runner.phase(), BuildPhase::Aborted);
    }

    #[tokio::test]
    async fn test_missing_gradle_aborts_before_spawning() {
        let fixture = Fixture::new().without_gradle();
        let runner = BuildRunner::new(fixture.context());

        let err = runner.run_build("--gradle").await.unwrap_err();

        assert!(matches!(err, BuildError::Environment(_)));
        assert!(fixture.executor.calls().is_empty());
        assert!(!fixture.root().join("gradlew").exists());
        assert_eq!(fixture.requirements.checks(), vec!["gradle"]);
        assert_eq!(runner.phase(), BuildPhase::Aborted);
    }

    #[tokio::test]
    async fn test_clean_removes_staging_dir() {
        let fixture = Fixture::new();
        touch(&fixture.root().join("out").join("staged.apk"), 1);
        let runner = BuildRunner::new(fixture.context());

        runner.run_clean("--gradle").await.unwrap();

        assert!(!fixture.root().join("out").exists());
        assert_eq!(fixture.executor.calls()[0].args[0], "clean");
        assert_eq!(runner.phase(), BuildPhase::Done);
    }

    #[tokio::test]
    async fn test_detect_architecture() {
        let fixture = Fixture::new().answering("Processor\t: Intel(R) Atom(TM) CPU\n");
        let missing = fixture.root().join("no-sdk");
        let runner = BuildRunner::new(fixture.context()).with_sdk_path(Some(missing));

        let arch = runner.detect_architecture("emulator-5554").await.unwrap();

        assert_eq!(arch, Architecture::X86);
        let calls = fixture.executor.calls();
        assert_eq!(calls[0].program, PathBuf::from("adb"));
        assert_eq!(calls[0].args, vec!["-s", "emulator-5554", "shell", "cat", "/proc/cpuinfo"]);
    }

    #[test]
    fn test_usage_lists_options() {
        let text = usage("cordova/build");
        assert!(text.starts_with("Usage: cordova/build [build_type]"));
        for option in ["--debug", "--release", "--ant", "--gradle", "--nobuild"] {
            assert!(text.contains(option));
        }
    }
}
