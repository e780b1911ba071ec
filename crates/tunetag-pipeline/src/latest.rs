//! Lookup of the most recently generated notation file

use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;
use tunetag_core::{Error, Result};

/// Extension of generated notation files
pub const NOTATION_EXTENSION: &str = "abc";

const NO_OUTPUT: &str = "No output file generated";

/// JSON body reporting a generated tune, or why there is none
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abc_notation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationResponse {
    pub fn generated(abc_notation: impl Into<String>) -> Self {
        Self {
            success: true,
            abc_notation: Some(abc_notation.into()),
            message: Some("Etude generated successfully".to_string()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            abc_notation: None,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Newest file in `dir` with the given extension.
///
/// Files are ordered by creation time where the platform records it and by
/// modification time otherwise.
pub fn latest_notation(dir: &Path, extension: &str) -> Result<Option<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::source_unreadable(dir, e))?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::source_unreadable(dir, e))?;
        let path = entry.path();
        if path.extension() != Some(OsStr::new(extension)) {
            continue;
        }

        let metadata = entry
            .metadata()
            .map_err(|e| Error::source_unreadable(&path, e))?;
        if !metadata.is_file() {
            continue;
        }

        let stamp = metadata
            .created()
            .or_else(|_| metadata.modified())
            .map_err(|e| Error::source_unreadable(&path, e))?;
        candidates.push((path, stamp));
    }

    debug!("Found {} notation files in {}", candidates.len(), dir.display());
    Ok(pick_latest(candidates))
}

/// Path with the newest timestamp; the later entry wins a tie
pub fn pick_latest(candidates: impl IntoIterator<Item = (PathBuf, SystemTime)>) -> Option<PathBuf> {
    candidates
        .into_iter()
        .max_by_key(|(_, stamp)| *stamp)
        .map(|(path, _)| path)
}

/// Response for the newest `.abc` file in `dir`
pub fn read_latest(dir: &Path) -> Result<GenerationResponse> {
    match latest_notation(dir, NOTATION_EXTENSION)? {
        Some(path) => {
            let notation =
                fs::read_to_string(&path).map_err(|e| Error::source_unreadable(&path, e))?;
            Ok(GenerationResponse::generated(notation))
        }
        None => Ok(GenerationResponse::failed(NO_OUTPUT)),
    }
}
