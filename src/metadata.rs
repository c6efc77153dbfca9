use crate::naming;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Structural metadata recorded for each fetched page.
///
/// Counts reflect exactly the anchor and image elements present in the parsed
/// document at extraction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Value of the response `Date` header (or capture time when absent)
    pub fetch_date: String,

    /// Number of anchor elements in the document
    pub links_count: usize,

    /// Number of image elements in the document
    pub images_count: usize,
}

/// Errors that can occur while persisting a metadata sidecar
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write metadata {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to serialize metadata: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Reads and writes the metadata sidecar stored next to each saved page.
pub struct MetadataStore {
    dir: PathBuf,
}

impl MetadataStore {
    /// Create a store rooted at the given output directory
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn sidecar_path(&self, url: &str) -> PathBuf {
        self.dir.join(naming::metadata_file_name(url))
    }

    /// Return the metadata recorded by the previous fetch of this URL.
    ///
    /// A missing sidecar is the normal first-run case. An unreadable or
    /// unparseable sidecar is logged and treated the same way: no prior
    /// metadata.
    pub fn read_last(&self, url: &str) -> Option<Metadata> {
        let path = self.sidecar_path(url);
        let contents = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                ::log::warn!("Ignoring unreadable metadata {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Overwrite the sidecar for this URL with the given metadata
    pub fn write(&self, url: &str, metadata: &Metadata) -> Result<(), StoreError> {
        let path = self.sidecar_path(url);
        let contents = serde_json::to_string_pretty(metadata)?;
        fs::write(&path, contents).map_err(|source| StoreError::Write {
            path: path.display().to_string(),
            source,
        })
    }
}
