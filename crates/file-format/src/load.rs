use std::path::Path;

use tracing::instrument;

use crate::errors::LoadError;
use crate::export::{FORMAT_ID, FORMAT_VERSION};
use crate::metadata::Manifest;

/// Deserialize a manifest from a JSON string.
///
/// Validates the format identifier and version.
pub fn parse_manifest(json: &str) -> Result<Manifest, LoadError> {
    let manifest: Manifest =
        serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    if manifest.format != FORMAT_ID {
        return Err(LoadError::UnknownFormat(manifest.format));
    }

    if manifest.version > FORMAT_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: manifest.version,
            supported_version: FORMAT_VERSION,
        });
    }

    Ok(manifest)
}

/// Read and validate the manifest written by [`crate::export_geometry`].
#[instrument]
pub fn load_manifest(path: &Path) -> Result<Manifest, LoadError> {
    let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(&json)
}
