//! JSON export of a design document.
//!
//! The export is a self-describing snapshot: canvas background plus every
//! layer in paint order, hidden layers included. The same format loads back
//! with [`import_json`].

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::doc::{DesignDoc, Layer};

/// File name used when saving an export into a directory.
pub const EXPORT_FILE_NAME: &str = "design-export.json";
pub const CANVAS_BACKGROUND: &str = "#F5F5F5";
pub const EXPORT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum DesignError {
    #[error("design JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported design export version {0}")]
    UnsupportedVersion(u32),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// On-disk shape of an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignExport {
    pub version: u32,
    pub background: String,
    /// Layers in paint order, bottom first.
    pub objects: Vec<Layer>,
}

impl DesignExport {
    #[must_use]
    pub fn from_doc(doc: &DesignDoc) -> Self {
        Self { version: EXPORT_VERSION, background: CANVAS_BACKGROUND.to_owned(), objects: doc.layers().to_vec() }
    }
}

/// Pretty-printed export of `doc`.
///
/// # Errors
///
/// Returns [`DesignError::Json`] if serialization fails.
pub fn export_json(doc: &DesignDoc) -> Result<String, DesignError> {
    Ok(serde_json::to_string_pretty(&DesignExport::from_doc(doc))?)
}

/// Load an export produced by [`export_json`].
///
/// # Errors
///
/// Returns [`DesignError::Json`] for malformed input and
/// [`DesignError::UnsupportedVersion`] for exports from a newer format.
pub fn import_json(json: &str) -> Result<DesignDoc, DesignError> {
    let export: DesignExport = serde_json::from_str(json)?;
    if export.version > EXPORT_VERSION {
        return Err(DesignError::UnsupportedVersion(export.version));
    }
    Ok(DesignDoc::from_layers(export.objects))
}

/// Write the export to `target`. A directory receives [`EXPORT_FILE_NAME`].
/// Returns the path written.
///
/// # Errors
///
/// Returns [`DesignError::Write`] if the file cannot be written.
pub async fn write_export(doc: &DesignDoc, target: &Path) -> Result<PathBuf, DesignError> {
    let path = if tokio::fs::metadata(target).await.is_ok_and(|meta| meta.is_dir()) {
        target.join(EXPORT_FILE_NAME)
    } else {
        target.to_path_buf()
    };
    let json = export_json(doc)?;
    tokio::fs::write(&path, json)
        .await
        .map_err(|source| DesignError::Write { path: path.clone(), source })?;
    tracing::info!(path = %path.display(), layers = doc.len(), "design exported");
    Ok(path)
}
