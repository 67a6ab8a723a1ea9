//! Build Settings
//!
//! Settings are layered:
//! - built-in defaults
//! - `droid-build.toml` at the project root (optional)
//! - environment overrides (`ANDROID_HOME`, `ANDROID_BUILD`, `BUILD_MULTIPLE_APKS`)

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CoreError, Result};

/// Name of the optional settings file at the project root
pub const SETTINGS_FILE: &str = "droid-build.toml";

/// Selects the default build backend
pub const ENV_BUILD_METHOD: &str = "ANDROID_BUILD";

/// Requests multi-architecture lint exclusions for Gradle
pub const ENV_MULTIPLE_APKS: &str = "BUILD_MULTIPLE_APKS";

/// Android SDK location, checked in this order
pub const ENV_SDK_VARS: &[&str] = &["ANDROID_HOME", "ANDROID_SDK_ROOT"];

/// Android-specific settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AndroidSettings {
    /// Path to the Android SDK
    pub sdk_path: Option<PathBuf>,
    /// Default build method (`ant`, `gradle` or `none`)
    pub build_method: Option<String>,
    /// Build one APK per architecture
    pub multiple_apks: bool,
}

/// Settings for one droid-build invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    pub android: AndroidSettings,
}

impl BuildSettings {
    /// Load settings for the project at `project_root`, applying the
    /// process environment on top of the settings file.
    pub async fn load(project_root: &Path) -> Result<Self> {
        let mut settings = Self::load_file(project_root).await?;
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Load only the settings file, falling back to defaults when absent
    pub async fn load_file(project_root: &Path) -> Result<Self> {
        let path = project_root.join(SETTINGS_FILE);
        if !path.exists() {
            debug!("No {} in {:?}, using defaults", SETTINGS_FILE, project_root);
            return Ok(Self::default());
        }

        info!("Loading settings from {:?}", path);
        let content = tokio::fs::read_to_string(&path).await?;
        Self::parse(&content, &path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| CoreError::TomlParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// Empty values are treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(sdk) = ENV_SDK_VARS.iter().find_map(|key| lookup(key)) {
            self.android.sdk_path = Some(PathBuf::from(sdk));
        }
        if let Some(method) = lookup(ENV_BUILD_METHOD) {
            self.android.build_method = Some(method.trim().to_string());
        }
        if let Some(flag) = lookup(ENV_MULTIPLE_APKS) {
            self.android.multiple_apks = is_truthy(&flag);
        }
    }
}

/// Boolean-like environment value: anything but `0`, `false`, `no` or `off`
fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
