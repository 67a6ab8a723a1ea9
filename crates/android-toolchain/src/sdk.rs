//! Android SDK location
//!
//! Templates the SDK ships which are copied into projects on every build.

use std::path::{Path, PathBuf};
use tracing::debug;

/// A located Android SDK installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AndroidSdk {
    path: PathBuf,
}

impl AndroidSdk {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Find the SDK, preferring `configured` (settings or `ANDROID_HOME`)
    /// over well-known install locations.
    pub fn locate(configured: Option<&Path>) -> Option<Self> {
        if let Some(path) = configured {
            // An explicit location is authoritative even when wrong.
            return path.is_dir().then(|| Self::new(path));
        }

        Self::candidates()
            .into_iter()
            .find(|p| p.is_dir())
            .map(|p| {
                debug!("Using Android SDK found at {:?}", p);
                Self::new(p)
            })
    }

    /// Well-known SDK install locations
    fn candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if cfg!(windows) {
            if let Some(local) = dirs::data_local_dir() {
                candidates.push(local.join("Android").join("Sdk"));
            }
            candidates.push(PathBuf::from(r"C:\Android\sdk"));
        }

        if cfg!(target_os = "macos") {
            if let Some(home) = dirs::home_dir() {
                candidates.push(home.join("Library").join("Android").join("sdk"));
            }
        }

        if cfg!(unix) {
            if let Some(home) = dirs::home_dir() {
                candidates.push(home.join("Android").join("Sdk"));
                candidates.push(home.join("android-sdk"));
            }
            candidates.push(PathBuf::from("/opt/android-sdk"));
            candidates.push(PathBuf::from("/usr/local/android-sdk"));
        }

        candidates
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ant `build.xml` template
    pub fn build_template(&self) -> PathBuf {
        self.path.join("tools").join("lib").join("build.template")
    }

    /// Gradle wrapper template directory
    pub fn gradle_wrapper_dir(&self) -> PathBuf {
        self.path.join("tools").join("templates").join("gradle").join("wrapper")
    }

    /// adb inside `platform-tools`
    pub fn adb(&self) -> PathBuf {
        let platform_tools = self.path.join("platform-tools");
        if cfg!(windows) {
            platform_tools.join("adb.exe")
        } else {
            platform_tools.join("adb")
        }
    }
}
