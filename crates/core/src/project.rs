//! Project Layout
//!
//! Well-known paths inside an Android application project and the small
//! amount of metadata read from them.

use std::path::{Path, PathBuf};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::Result;

/// Presence-only marker enabling incremental Ant builds
pub const CUSTOM_RULES_FILE: &str = "custom_rules.xml";

/// Project properties listing library sub-projects
pub const PROJECT_PROPERTIES_FILE: &str = "project.properties";

/// Output staging directory removed on clean
pub const STAGING_DIR: &str = "out";

static LIBRARY_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*android\.library\.reference\.\d+=(.*?)\s*$")
        .expect("library reference pattern is valid")
});

/// Paths within a project rooted at `root`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    /// Create a layout for the project at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> PathBuf {
        self.root.join("AndroidManifest.xml")
    }

    pub fn build_xml(&self) -> PathBuf {
        self.root.join("build.xml")
    }

    pub fn build_gradle(&self) -> PathBuf {
        self.root.join("build.gradle")
    }

    pub fn custom_rules(&self) -> PathBuf {
        self.root.join(CUSTOM_RULES_FILE)
    }

    pub fn project_properties(&self) -> PathBuf {
        self.root.join(PROJECT_PROPERTIES_FILE)
    }

    /// Gradle wrapper script for the host platform
    pub fn gradlew(&self) -> PathBuf {
        self.root.join(gradlew_name())
    }

    /// Directory holding the Gradle wrapper jar and properties
    pub fn gradle_wrapper_dir(&self) -> PathBuf {
        self.root.join("gradle").join("wrapper")
    }

    /// Build file template copied into every sub-project for Gradle
    pub fn plugin_build_gradle(&self) -> PathBuf {
        self.root.join("cordova").join("lib").join("plugin-build.gradle")
    }

    /// Whether `custom_rules.xml` exists
    pub fn has_custom_rules(&self) -> bool {
        self.custom_rules().exists()
    }

    /// Ant output directory (`ant-build` with custom rules, `bin` otherwise)
    pub fn ant_output_dir(&self) -> PathBuf {
        if self.has_custom_rules() {
            self.root.join("ant-build")
        } else {
            self.root.join("bin")
        }
    }

    /// Gradle APK output directory
    pub fn gradle_output_dir(&self) -> PathBuf {
        self.root.join("build").join("outputs").join("apk")
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(STAGING_DIR)
    }

    /// Sub-project paths (relative to the root) from `project.properties`.
    ///
    /// A project without the file has no sub-projects.
    pub async fn sub_projects(&self) -> Result<Vec<PathBuf>> {
        let path = self.project_properties();
        if !path.exists() {
            debug!("No {:?}, assuming no sub-projects", path);
            return Ok(Vec::new());
        }
        let content = tokio::fs::read_to_string(&path).await?;
        Ok(parse_library_references(&content))
    }
}

/// Gradle wrapper script name for the host platform
pub fn gradlew_name() -> &'static str {
    if cfg!(windows) {
        "gradlew.bat"
    } else {
        "gradlew"
    }
}

/// Extract `android.library.reference.N` values, first occurrence wins
pub fn parse_library_references(content: &str) -> Vec<PathBuf> {
    let mut refs: Vec<PathBuf> = Vec::new();
    for caps in LIBRARY_REFERENCE.captures_iter(content) {
        let value = caps[1].to_string();
        if value.is_empty() {
            continue;
        }
        let path = PathBuf::from(value);
        if !refs.contains(&path) {
            refs.push(path);
        }
    }
    refs
}
