//! CLI commands for droid-build
//!
//! Each command loads the project's settings, runs one build operation and
//! prints the outcome.

use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use tracing::info;

use droid_build_core::BuildSettings;
use droid_build_engine::{select_for_architecture, BuildResult, BuildRunner};

async fn runner_for(project: &Path) -> Result<BuildRunner> {
    let settings = BuildSettings::load(project)
        .await
        .with_context(|| format!("Failed to load settings for {}", project.display()))?;
    Ok(BuildRunner::from_settings(project, &settings))
}

fn print_result(result: &BuildResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        for path in &result.artifact_paths {
            println!("{}", path.display());
        }
    }
    Ok(())
}

/// Build command options
pub struct BuildCommand {
    pub project_path: PathBuf,
    pub options: Vec<String>,
    pub json: bool,
}

impl BuildCommand {
    /// Execute the build command
    pub async fn execute(&self) -> Result<BuildResult> {
        info!("Building project: {:?}", self.project_path);

        let runner = runner_for(&self.project_path).await?;
        let result = runner.run_build(self.options.as_slice()).await?;

        if result.artifact_paths.is_empty() {
            info!("No apks found after build");
        }
        print_result(&result, self.json)?;
        Ok(result)
    }
}

/// Clean command options
pub struct CleanCommand {
    pub project_path: PathBuf,
    pub options: Vec<String>,
}

impl CleanCommand {
    /// Execute the clean command
    pub async fn execute(&self) -> Result<()> {
        info!("Cleaning project: {:?}", self.project_path);

        let runner = runner_for(&self.project_path).await?;
        runner.run_clean(self.options.as_slice()).await?;
        Ok(())
    }
}

/// Device architecture command
pub struct ArchCommand {
    pub project_path: PathBuf,
    pub device: String,
}

impl ArchCommand {
    pub async fn execute(&self) -> Result<()> {
        let runner = runner_for(&self.project_path).await?;
        let arch = runner.detect_architecture(&self.device).await?;
        println!("{}", arch);
        Ok(())
    }
}

/// Build, then pick the APK for a device
pub struct SelectCommand {
    pub project_path: PathBuf,
    pub device: String,
    pub options: Vec<String>,
}

impl SelectCommand {
    pub async fn execute(&self) -> Result<PathBuf> {
        let runner = runner_for(&self.project_path).await?;
        let result = runner.run_build(self.options.as_slice()).await?;
        let arch = runner.detect_architecture(&self.device).await?;

        let apk = select_for_architecture(&result, arch)?;
        info!("Best apk for {} ({}): {:?}", self.device, arch, apk);
        println!("{}", apk.display());
        Ok(apk)
    }
}
