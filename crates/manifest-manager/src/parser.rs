//! AndroidManifest.xml Parser
//!
//! Extracts the main activity name, which Ant uses as the project name.

use std::path::{Path, PathBuf};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

/// Parser errors
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Could not read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),
    #[error("Could not find activity name in {0}")]
    MissingActivityName(String),
}

/// Manifest parser
pub struct ManifestParser;

impl ManifestParser {
    /// Activity name from the manifest in `project_dir`
    pub async fn project_name(project_dir: &Path) -> Result<String, ParseError> {
        let path = project_dir.join(crate::MANIFEST_FILE);
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ParseError::Read {
                path: path.clone(),
                source,
            })?;

        match Self::activity_name(&content)? {
            Some(name) => {
                debug!("Project name from {:?}: {}", path, name);
                Ok(name)
            }
            None => Err(ParseError::MissingActivityName(path.display().to_string())),
        }
    }

    /// First `android:name` at or below the first `<activity>` element
    pub fn activity_name(xml: &str) -> Result<Option<String>, ParseError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut buf = Vec::new();
        let mut in_activity = false;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    if e.name().as_ref().eq_ignore_ascii_case(b"activity") {
                        in_activity = true;
                    }
                    if in_activity {
                        if let Some(name) = android_name(e)? {
                            return Ok(Some(name));
                        }
                    }
                }
                Event::Eof => return Ok(None),
                _ => {}
            }
            buf.clear();
        }
    }
}

fn android_name(element: &BytesStart<'_>) -> Result<Option<String>, ParseError> {
    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref().eq_ignore_ascii_case(b"android:name") {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}
