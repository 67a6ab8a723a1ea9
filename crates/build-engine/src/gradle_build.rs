//! Gradle Build for Android Apps
//!
//! Wraps the Gradle wrapper shipped with the SDK. The wrapper scripts are
//! re-copied on every prepare so the project always uses the SDK's version.

use std::path::PathBuf;
use tracing::{debug, info};

use droid_build_android_toolchain::AndroidSdk;
use droid_build_core::project::gradlew_name;

use crate::artifacts::scan;
use crate::backend::BuildContext;
use crate::templates::TemplateSync;
use crate::{BuildError, BuildType, ToolCommand};

/// Lint tasks skipped on every build
pub const LINT_TASKS: [&str; 5] = [
    "lint",
    "lintVitalRelease",
    "compileLint",
    "copyReleaseLint",
    "copyDebugLint",
];

/// Lint tasks skipped when building one APK per architecture
pub const LINT_TASKS_MULTIPLE_APKS: [&str; 6] = [
    "lint",
    "lintVitalX86Release",
    "lintVitalArmv7Release",
    "compileLint",
    "copyReleaseLint",
    "copyDebugLint",
];

/// Gradle build for Android
pub struct GradleBuild<'a> {
    ctx: &'a BuildContext,
}

impl<'a> GradleBuild<'a> {
    pub fn new(ctx: &'a BuildContext) -> Self {
        Self { ctx }
    }

    fn lint_tasks(&self) -> &'static [&'static str] {
        if self.ctx.multiple_apks {
            &LINT_TASKS_MULTIPLE_APKS
        } else {
            &LINT_TASKS
        }
    }

    /// Arguments for `command`
    pub fn args(&self, command: ToolCommand) -> Vec<String> {
        let mut args = vec![
            command.gradle_task(),
            "-b".to_string(),
            self.ctx.layout.build_gradle().display().to_string(),
            "-Dorg.gradle.daemon=true".to_string(),
        ];

        for task in self.lint_tasks() {
            args.push("-x".to_string());
            args.push(task.to_string());
        }

        args
    }

    pub async fn prepare_environment(&self) -> Result<(), BuildError> {
        let sdk = self.ctx.requirements.check_gradle().await?;
        self.sync_templates(&sdk).await
    }

    /// Copy the SDK's wrapper into the project and the plugin build file
    /// into every sub-project
    pub async fn sync_templates(&self, sdk: &AndroidSdk) -> Result<(), BuildError> {
        let layout = &self.ctx.layout;
        let wrapper_dir = sdk.gradle_wrapper_dir();

        TemplateSync::copy_file(&wrapper_dir.join(gradlew_name()), &layout.gradlew()).await?;
        let copied = TemplateSync::replace_dir(
            &wrapper_dir.join("gradle").join("wrapper"),
            &layout.gradle_wrapper_dir(),
        )
        .await?;
        debug!("Gradle wrapper synced ({} file(s))", copied);

        let plugin_build = layout.plugin_build_gradle();
        let subs = layout.sub_projects().await?;
        for sub in &subs {
            let dest = layout.root().join(sub).join("build.gradle");
            TemplateSync::copy_file(&plugin_build, &dest).await?;
        }

        info!("Gradle environment ready ({} sub-project(s))", subs.len());
        Ok(())
    }

    fn gradlew_path(&self) -> PathBuf {
        self.ctx.layout.gradlew()
    }

    /// Build the project
    pub async fn build(&self, build_type: BuildType) -> Result<(), BuildError> {
        info!("Building Android app with Gradle ({})...", build_type);
        let args = self.args(ToolCommand::Build(build_type));
        debug!("Running: gradlew {:?}", args);
        self.ctx.run_tool("gradle", &self.gradlew_path(), &args).await
    }

    /// Clean build
    pub async fn clean(&self) -> Result<(), BuildError> {
        info!("Cleaning Gradle build...");
        let args = self.args(ToolCommand::Clean);
        self.ctx.run_tool("gradle", &self.gradlew_path(), &args).await
    }

    pub fn find_output_artifacts(&self, build_type: BuildType) -> Vec<PathBuf> {
        scan(&self.ctx.layout.gradle_output_dir(), Some(build_type))
    }
}
