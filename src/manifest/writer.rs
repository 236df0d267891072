//! Manifest file writing
//!
//! Files are rewritten whole: pretty-printed with 4-space indentation and a
//! trailing newline. A failed write is fatal and never retried.

use crate::error::ManifestError;
use crate::manifest::PackageManifest;
use std::path::Path;

/// Serialize and write a manifest to disk
pub async fn write_manifest(path: &Path, manifest: &PackageManifest) -> Result<(), ManifestError> {
    let content = manifest.to_json_string().map_err(|e| {
        ManifestError::write_error(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;
    tokio::fs::write(path, content)
        .await
        .map_err(|e| ManifestError::write_error(path, e))
}
