//! Build Backends
//!
//! Exactly one backend is active per request, selected by [`BuildMethod`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use droid_build_android_toolchain::RequirementChecker;
use droid_build_core::process::ProcessExecutor;
use droid_build_core::ProjectLayout;

use crate::artifacts::sort_by_recency;
use crate::{AntBuild, BuildError, BuildMethod, BuildType, GradleBuild};

/// What every backend needs to run against a project
pub struct BuildContext {
    pub layout: ProjectLayout,
    /// Exclude the per-architecture lint tasks (`BUILD_MULTIPLE_APKS`)
    pub multiple_apks: bool,
    pub executor: Arc<dyn ProcessExecutor>,
    pub requirements: Arc<dyn RequirementChecker>,
}

impl BuildContext {
    pub fn new(
        layout: ProjectLayout,
        executor: Arc<dyn ProcessExecutor>,
        requirements: Arc<dyn RequirementChecker>,
    ) -> Self {
        Self {
            layout,
            multiple_apks: false,
            executor,
            requirements,
        }
    }

    pub fn with_multiple_apks(mut self, multiple_apks: bool) -> Self {
        self.multiple_apks = multiple_apks;
        self
    }

    /// Run a build tool from the project root
    pub(crate) async fn run_tool(&self, tool: &str, program: &Path, args: &[String]) -> Result<(), BuildError> {
        self.executor
            .spawn(program, args, self.layout.root())
            .await
            .map(|_| ())
            .map_err(|e| BuildError::from_process(tool, e))
    }
}

/// A build backend
pub enum Backend<'a> {
    Ant(AntBuild<'a>),
    Gradle(GradleBuild<'a>),
    NoBuild(NoBuild<'a>),
}

impl<'a> Backend<'a> {
    /// The backend implementing `method`
    pub fn for_method(method: BuildMethod, ctx: &'a BuildContext) -> Self {
        match method {
            BuildMethod::Ant => Backend::Ant(AntBuild::new(ctx)),
            BuildMethod::Gradle => Backend::Gradle(GradleBuild::new(ctx)),
            BuildMethod::NoBuild => Backend::NoBuild(NoBuild::new(ctx)),
        }
    }

    pub fn method(&self) -> BuildMethod {
        match self {
            Backend::Ant(_) => BuildMethod::Ant,
            Backend::Gradle(_) => BuildMethod::Gradle,
            Backend::NoBuild(_) => BuildMethod::NoBuild,
        }
    }

    /// Check requirements and sync templates into the project
    pub async fn prepare_environment(&self) -> Result<(), BuildError> {
        match self {
            Backend::Ant(ant) => ant.prepare_environment().await,
            Backend::Gradle(gradle) => gradle.prepare_environment().await,
            Backend::NoBuild(_) => Ok(()),
        }
    }

    pub async fn build(&self, build_type: BuildType) -> Result<(), BuildError> {
        match self {
            Backend::Ant(ant) => ant.build(build_type).await,
            Backend::Gradle(gradle) => gradle.build(build_type).await,
            Backend::NoBuild(_) => {
                info!("Skipping build...");
                Ok(())
            }
        }
    }

    pub async fn clean(&self) -> Result<(), BuildError> {
        match self {
            Backend::Ant(ant) => ant.clean().await,
            Backend::Gradle(gradle) => gradle.clean().await,
            Backend::NoBuild(_) => Ok(()),
        }
    }

    pub fn find_output_artifacts(&self, build_type: BuildType) -> Vec<PathBuf> {
        match self {
            Backend::Ant(ant) => ant.find_output_artifacts(build_type),
            Backend::Gradle(gradle) => gradle.find_output_artifacts(build_type),
            Backend::NoBuild(none) => none.find_output_artifacts(build_type),
        }
    }
}

/// Backend for APKs built out-of-band
pub struct NoBuild<'a> {
    ctx: &'a BuildContext,
}

impl<'a> NoBuild<'a> {
    pub fn new(ctx: &'a BuildContext) -> Self {
        Self { ctx }
    }

    /// APKs from both the Ant and Gradle output directories, most recent first
    pub fn find_output_artifacts(&self, build_type: BuildType) -> Vec<PathBuf> {
        let mut found = AntBuild::new(self.ctx).find_output_artifacts(build_type);
        found.extend(GradleBuild::new(self.ctx).find_output_artifacts(build_type));
        sort_by_recency(found)
    }
}
