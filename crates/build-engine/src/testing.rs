//! Test doubles for subprocess-free builds

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use async_trait::async_trait;
use parking_lot::Mutex;
use tempfile::TempDir;

use droid_build_android_toolchain::{AndroidSdk, DetectionError, RequirementChecker};
use droid_build_core::process::{command_line, ProcessError, ProcessExecutor};
use droid_build_core::project::gradlew_name;
use droid_build_core::ProjectLayout;

use crate::backend::BuildContext;

pub const SAMPLE_MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<manifest xmlns:android="http://schemas.android.com/apk/res/android" package="io.cordova.hellocordova">
    <application android:label="@string/app_name">
        <activity android:name="HelloCordova" android:label="@string/activity_name">
            <intent-filter>
                <action android:name="android.intent.action.MAIN" />
            </intent-filter>
        </activity>
    </application>
</manifest>
"#;

pub const BUILD_TEMPLATE: &str = "<project name=\"PROJECT_NAME\" default=\"help\"/>\n";

/// Create an empty file at `path` with an mtime `secs` after the epoch
pub fn touch(path: &Path, secs: u64) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let file = File::create(path).unwrap();
    file.set_modified(UNIX_EPOCH + Duration::from_secs(secs)).unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

/// Records every invocation instead of running it
#[derive(Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<Call>>,
    fail_with: Option<i32>,
    stdout: String,
}

impl RecordingExecutor {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn record(&self, program: &Path, args: &[String], cwd: &Path) -> Result<(), ProcessError> {
        self.calls.lock().push(Call {
            program: program.to_path_buf(),
            args: args.to_vec(),
            cwd: cwd.to_path_buf(),
        });
        match self.fail_with {
            Some(code) => Err(ProcessError::Failed {
                command: command_line(program, args),
                code: Some(code),
                output: "BUILD FAILED".to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProcessExecutor for RecordingExecutor {
    async fn spawn(&self, program: &Path, args: &[String], cwd: &Path) -> Result<String, ProcessError> {
        self.record(program, args, cwd)?;
        Ok(String::new())
    }

    async fn exec(&self, program: &Path, args: &[String]) -> Result<String, ProcessError> {
        self.record(program, args, Path::new(""))?;
        Ok(self.stdout.clone())
    }
}

/// Requirement checks that always find `sdk`
pub struct FakeRequirements {
    sdk: AndroidSdk,
    ant_available: bool,
    gradle_available: bool,
    checks: Mutex<Vec<&'static str>>,
}

impl FakeRequirements {
    pub fn checks(&self) -> Vec<&'static str> {
        self.checks.lock().clone()
    }
}

#[async_trait]
impl RequirementChecker for FakeRequirements {
    async fn check_ant(&self) -> Result<AndroidSdk, DetectionError> {
        self.checks.lock().push("ant");
        if !self.ant_available {
            return Err(DetectionError::ToolNotFound("ant".into()));
        }
        Ok(self.sdk.clone())
    }

    async fn check_gradle(&self) -> Result<AndroidSdk, DetectionError> {
        self.checks.lock().push("gradle");
        if !self.gradle_available {
            return Err(DetectionError::InvalidInstallation {
                path: self.sdk.path().to_path_buf(),
                missing: "tools/templates/gradle/wrapper".into(),
            });
        }
        Ok(self.sdk.clone())
    }
}

/// A scratch project next to a scratch SDK carrying both templates
pub struct Fixture {
    pub project: TempDir,
    pub sdk: TempDir,
    pub executor: Arc<RecordingExecutor>,
    pub requirements: Arc<FakeRequirements>,
}

impl Fixture {
    pub fn new() -> Self {
        let project = tempfile::tempdir().unwrap();
        let sdk_dir = tempfile::tempdir().unwrap();
        let sdk = AndroidSdk::new(sdk_dir.path());

        let template = sdk.build_template();
        fs::create_dir_all(template.parent().unwrap()).unwrap();
        fs::write(&template, BUILD_TEMPLATE).unwrap();

        let wrapper = sdk.gradle_wrapper_dir();
        fs::create_dir_all(wrapper.join("gradle").join("wrapper")).unwrap();
        fs::write(wrapper.join(gradlew_name()), "#!/bin/sh\nexec gradle \"$@\"\n").unwrap();
        fs::write(
            wrapper.join("gradle").join("wrapper").join("gradle-wrapper.properties"),
            "distributionUrl=gradle-2.2.1-all.zip\n",
        )
        .unwrap();

        Self {
            project,
            sdk: sdk_dir,
            executor: Arc::new(RecordingExecutor::default()),
            requirements: Arc::new(FakeRequirements {
                sdk,
                ant_available: true,
                gradle_available: true,
                checks: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Ant is missing from `PATH`
    pub fn without_ant(mut self) -> Self {
        self.requirements = Arc::new(FakeRequirements {
            sdk: self.requirements.sdk.clone(),
            ant_available: false,
            gradle_available: self.requirements.gradle_available,
            checks: Mutex::new(Vec::new()),
        });
        self
    }

    /// The SDK lacks the Gradle wrapper template
    pub fn without_gradle(mut self) -> Self {
        self.requirements = Arc::new(FakeRequirements {
            sdk: self.requirements.sdk.clone(),
            ant_available: self.requirements.ant_available,
            gradle_available: false,
            checks: Mutex::new(Vec::new()),
        });
        self
    }

    /// Every subprocess exits with `code`
    pub fn failing_with(mut self, code: i32) -> Self {
        self.executor = Arc::new(RecordingExecutor {
            fail_with: Some(code),
            ..Default::default()
        });
        self
    }

    /// `exec` answers with `stdout`
    pub fn answering(mut self, stdout: &str) -> Self {
        self.executor = Arc::new(RecordingExecutor {
            stdout: stdout.to_string(),
            ..Default::default()
        });
        self
    }

    pub fn root(&self) -> &Path {
        self.project.path()
    }

    pub fn context(&self) -> BuildContext {
        BuildContext::new(
            ProjectLayout::new(self.project.path()),
            self.executor.clone(),
            self.requirements.clone(),
        )
    }
}
