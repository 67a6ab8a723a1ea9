//! Android Manifest Metadata
//!
//! Reads the project metadata droid-build needs from `AndroidManifest.xml`.

pub mod parser;

pub use parser::{ManifestParser, ParseError};

/// Manifest file name inside a project root
pub const MANIFEST_FILE: &str = "AndroidManifest.xml";
