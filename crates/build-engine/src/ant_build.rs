//! Ant Build
//!
//! Wraps Ant for projects using the SDK's legacy `build.xml`.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use droid_build_android_toolchain::AndroidSdk;
use droid_build_manifest_manager::ManifestParser;

use crate::artifacts::scan;
use crate::backend::BuildContext;
use crate::templates::TemplateSync;
use crate::{BuildError, BuildType, ToolCommand};

/// Header of a generated `local.properties`
pub const LOCAL_PROPERTIES_TEMPLATE: &str = "# This file is automatically generated.\n\
# Do not modify this file -- YOUR CHANGES WILL BE ERASED!\n";

/// Placeholder in the SDK's `build.template`
const PROJECT_NAME_PLACEHOLDER: &str = "PROJECT_NAME";

/// Ant build for Android
pub struct AntBuild<'a> {
    ctx: &'a BuildContext,
}

impl<'a> AntBuild<'a> {
    pub fn new(ctx: &'a BuildContext) -> Self {
        Self { ctx }
    }

    fn ant_program() -> &'static Path {
        if cfg!(windows) {
            Path::new("ant.bat")
        } else {
            Path::new("ant")
        }
    }

    /// Arguments for `command`
    pub fn args(&self, command: ToolCommand) -> Vec<String> {
        let layout = &self.ctx.layout;
        let mut args = vec![
            command.ant_target().to_string(),
            "-f".to_string(),
            layout.build_xml().display().to_string(),
        ];
        // custom_rules.xml is required for incremental builds.
        if layout.has_custom_rules() {
            args.push("-Dout.dir=ant-build".to_string());
            args.push("-Dgen.absolute.dir=ant-gen".to_string());
        }
        args
    }

    pub async fn prepare_environment(&self) -> Result<(), BuildError> {
        let sdk = self.ctx.requirements.check_ant().await?;
        self.sync_templates(&sdk).await
    }

    /// Write `build.xml` (and a `local.properties` if missing) into the
    /// project and every sub-project, from the SDK's current template
    pub async fn sync_templates(&self, sdk: &AndroidSdk) -> Result<(), BuildError> {
        let layout = &self.ctx.layout;
        let template_path = sdk.build_template();
        let template = tokio::fs::read_to_string(&template_path).await.map_err(|e| {
            BuildError::Environment(format!("could not read {}: {}", template_path.display(), e))
        })?;

        let project_name = ManifestParser::project_name(layout.root()).await?;
        let build_xml = template.replacen(PROJECT_NAME_PLACEHOLDER, &project_name, 1);

        let mut targets: Vec<PathBuf> = vec![layout.root().to_path_buf()];
        for sub in layout.sub_projects().await? {
            targets.push(layout.root().join(sub));
        }

        for dir in &targets {
            TemplateSync::write_file(&dir.join("build.xml"), &build_xml).await?;
            if TemplateSync::write_if_absent(&dir.join("local.properties"), LOCAL_PROPERTIES_TEMPLATE).await? {
                debug!("Created local.properties in {:?}", dir);
            }
        }

        info!("Synced build.xml for {} project(s)", targets.len());
        Ok(())
    }

    /// Build the project
    pub async fn build(&self, build_type: BuildType) -> Result<(), BuildError> {
        // Without custom_rules.xml, incremental builds are unsafe.
        if !self.ctx.layout.has_custom_rules() {
            self.clean().await?;
        }

        self.ctx.requirements.check_ant().await?;
        info!("Building Android app with Ant ({})...", build_type);
        let args = self.args(ToolCommand::Build(build_type));
        self.ctx.run_tool("ant", Self::ant_program(), &args).await
    }

    /// Clean build
    pub async fn clean(&self) -> Result<(), BuildError> {
        self.ctx.requirements.check_ant().await?;
        info!("Cleaning Ant build...");
        let args = self.args(ToolCommand::Clean);
        self.ctx.run_tool("ant", Self::ant_program(), &args).await
    }

    pub fn find_output_artifacts(&self, build_type: BuildType) -> Vec<PathBuf> {
        scan(&self.ctx.layout.ant_output_dir(), Some(build_type))
    }
}
