// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Writing finished data specifications to disk.
//!
//! Files are written to a temporary file beside their destination and then
//! renamed into place, so a reader never sees a half-written artifact.

use crate::{ArtifactPaths, DataSpecResult};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

fn staged_file(destination: &Path, contents: &[u8]) -> DataSpecResult<NamedTempFile> {
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // create-if-absent; concurrent generations may race on the same directory
    std::fs::create_dir_all(dir)?;

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(contents)?;
    staged.flush()?;
    Ok(staged)
}

/// Persist a finalized blob and, when both are present, its text mirror
pub fn persist_artifacts(
    paths: &ArtifactPaths,
    bytes: &[u8],
    text_report: Option<&str>,
) -> DataSpecResult<()> {
    let staged_text = match (&paths.text, text_report) {
        (Some(text_path), Some(report)) => Some((text_path, staged_file(text_path, report.as_bytes())?)),
        _ => None,
    };
    let staged_binary = staged_file(&paths.binary, bytes)?;

    // binary first: a text mirror must never exist without its blob
    staged_binary.persist(&paths.binary).map_err(|e| e.error)?;
    if let Some((text_path, staged)) = staged_text {
        if let Err(e) = staged.persist(text_path) {
            warn!(
                target: "gridcore-dsg",
                "Text mirror for {} not written, removing binary: {}",
                paths.binary.display(),
                e.error
            );
            let _ = std::fs::remove_file(&paths.binary);
            return Err(e.error.into());
        }
    }

    debug!(target: "gridcore-dsg", "Persisted {} bytes to {}", bytes.len(), paths.binary.display());
    Ok(())
}
