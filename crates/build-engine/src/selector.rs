//! Artifact selection for a target device

use std::path::PathBuf;
use tracing::debug;

use droid_build_emulator_bridge::Architecture;

use crate::artifacts::ArtifactName;
use crate::runner::BuildResult;
use crate::{BuildError, BuildType};

/// Pick the APK from `result` that installs on an `architecture` device.
///
/// Candidates keep the result's order. A universal APK (no architecture
/// marker) is taken as soon as it is reached; a split APK only when it
/// targets `architecture`.
pub fn select_for_architecture(
    result: &BuildResult,
    architecture: Architecture,
) -> Result<PathBuf, BuildError> {
    let selected = result
        .artifact_paths
        .iter()
        .filter(|path| {
            let name = ArtifactName::of(path);
            match result.build_type {
                BuildType::Debug => name.is_debug(),
                BuildType::Release => !name.is_debug(),
            }
        })
        .find(|path| {
            let name = ArtifactName::of(path);
            !name.has_architecture() || name.targets(architecture)
        });

    match selected {
        Some(path) => {
            debug!("Selected {:?} for {}", path, architecture);
            Ok(path.clone())
        }
        None => Err(BuildError::ArtifactNotFound {
            architecture,
            build_type: result.build_type,
        }),
    }
}
