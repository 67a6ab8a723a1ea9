//! APK Discovery
//!
//! Finds the APKs a build produced and orders them so the most relevant
//! one comes first.
//!
//! Names are classified by their `-`-separated segments: `app-armv7-debug.apk`
//! has the segments `app`, `armv7` and `debug`. Markers only match whole
//! segments, so `debuggable` is not a debug marker and only the file name
//! (never the directory) is inspected.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

use droid_build_emulator_bridge::Architecture;

use crate::config::BuildType;

/// Packaged artifact extension
pub const ARTIFACT_EXTENSION: &str = "apk";

/// A file found during a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactCandidate {
    pub path: PathBuf,
    pub modified: SystemTime,
}

impl ArtifactCandidate {
    /// Read the modification time of `path`
    pub fn from_path(path: PathBuf) -> Option<Self> {
        match std::fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(modified) => Some(Self { path, modified }),
            Err(e) => {
                warn!("Skipping {:?}: {}", path, e);
                None
            }
        }
    }

    /// Most recent first, then shorter paths, then by path
    fn recency(&self, other: &Self) -> Ordering {
        other
            .modified
            .cmp(&self.modified)
            .then_with(|| self.path.as_os_str().len().cmp(&other.path.as_os_str().len()))
            .then_with(|| self.path.cmp(&other.path))
    }
}

/// Naming-convention markers of an artifact file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName {
    segments: Vec<String>,
}

impl ArtifactName {
    pub fn of(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            segments: stem.split('-').map(str::to_string).collect(),
        }
    }

    fn has(&self, marker: &str) -> bool {
        self.segments.iter().any(|s| s == marker)
    }

    pub fn is_debug(&self) -> bool {
        self.has("debug")
    }

    pub fn is_release(&self) -> bool {
        self.has("release")
    }

    pub fn is_unaligned(&self) -> bool {
        self.has("unaligned")
    }

    pub fn is_unsigned(&self) -> bool {
        self.has("unsigned")
    }

    /// Architectures named in the file name
    pub fn architectures(&self) -> impl Iterator<Item = Architecture> + '_ {
        self.segments.iter().filter_map(|s| Architecture::from_segment(s))
    }

    /// Whether this is a per-architecture split output
    pub fn has_architecture(&self) -> bool {
        self.architectures().next().is_some()
    }

    /// Whether the name carries `arch`'s marker
    pub fn targets(&self, arch: Architecture) -> bool {
        self.architectures().any(|a| a == arch)
    }

    /// Whether the name fits `build_type` (`None` accepts everything)
    pub fn matches(&self, build_type: Option<BuildType>) -> bool {
        match build_type {
            Some(BuildType::Debug) => self.is_debug() && !self.is_unaligned() && !self.is_unsigned(),
            Some(BuildType::Release) => self.is_release() && !self.is_unaligned(),
            None => true,
        }
    }
}

/// APKs directly inside `directory` that fit `build_type`, most recent first.
///
/// The result never mixes split and universal outputs: it keeps whichever
/// kind the most recent match is. A missing directory yields no artifacts.
pub fn scan(directory: &Path, build_type: Option<BuildType>) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("No artifacts in {:?}: {}", directory, e);
            return Vec::new();
        }
    };

    let mut candidates: Vec<ArtifactCandidate> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && has_artifact_extension(p))
        .filter(|p| ArtifactName::of(p).matches(build_type))
        .filter_map(ArtifactCandidate::from_path)
        .collect();

    candidates.sort_by(ArtifactCandidate::recency);
    let sorted: Vec<PathBuf> = candidates.into_iter().map(|c| c.path).collect();
    let artifacts = keep_consistent_architecture(sorted);

    debug!("Found {} artifact(s) in {:?}", artifacts.len(), directory);
    artifacts
}

/// Order `paths` most recent first, dropping any that cannot be read
pub fn sort_by_recency(paths: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
    let mut candidates: Vec<ArtifactCandidate> = paths
        .into_iter()
        .filter_map(ArtifactCandidate::from_path)
        .collect();
    candidates.sort_by(ArtifactCandidate::recency);
    candidates.into_iter().map(|c| c.path).collect()
}

fn has_artifact_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == ARTIFACT_EXTENSION)
        .unwrap_or(false)
}

fn keep_consistent_architecture(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let Some(first) = paths.first() else {
        return paths;
    };
    let split = ArtifactName::of(first).has_architecture();
    paths
        .into_iter()
        .filter(|p| ArtifactName::of(p).has_architecture() == split)
        .collect()
}
