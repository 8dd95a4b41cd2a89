// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Deterministic on-host artifact locations.
//!
//! Everything here is a pure function of its arguments; directories are only
//! created when an artifact is persisted.

use gridcore_config::TEMP_FOLDER_SENTINEL;
use std::path::{Path, PathBuf};

/// Subdirectory of the run root holding text mirrors
pub const TEXT_SPEC_DIR_NAME: &str = "data_spec_text_files";

const USER0_BASE_ADDRESS: u32 = 0xe500_7000;
const USER0_STRIDE_PER_CORE: u32 = 128;
const USER0_OFFSET: u32 = 112;

/// Resolve the configured run root; the `TEMP` sentinel maps to the OS temp dir
pub fn resolve_run_root(run_root: &str) -> PathBuf {
    if run_root == TEMP_FOLDER_SENTINEL {
        std::env::temp_dir()
    } else {
        PathBuf::from(run_root)
    }
}

/// Where one core's artifacts go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub binary: PathBuf,
    pub text: Option<PathBuf>,
}

impl ArtifactPaths {
    /// Directory that must exist before the text mirror is written
    pub fn text_dir(&self) -> Option<&Path> {
        self.text.as_deref().and_then(Path::parent)
    }
}

/// Binary artifact path and, optionally, the text mirror path
///
/// # Example
/// ```
/// use gridcore_dsg::artifact_path;
/// use std::path::Path;
///
/// let paths = artifact_path("192.168.240.1", 0, 1, 3, "/runs/42", true);
/// assert_eq!(paths.binary, Path::new("/runs/42/192.168.240.1_dataSpec_0_1_3.dat"));
/// assert_eq!(
///     paths.text.unwrap(),
///     Path::new("/runs/42/data_spec_text_files/192.168.240.1_dataSpec_0_1_3.txt")
/// );
/// ```
pub fn artifact_path(
    hostname: &str,
    chip_x: u32,
    chip_y: u32,
    core_id: u32,
    run_root: &str,
    want_text_mirror: bool,
) -> ArtifactPaths {
    let root = resolve_run_root(run_root);
    let stem = format!("{}_dataSpec_{}_{}_{}", hostname, chip_x, chip_y, core_id);

    ArtifactPaths {
        binary: root.join(format!("{}.dat", stem)),
        text: want_text_mirror.then(|| root.join(TEXT_SPEC_DIR_NAME).join(format!("{}.txt", stem))),
    }
}

/// Path of the application data image loaded once the data specification has run
pub fn application_data_path(
    hostname: &str,
    chip_x: u32,
    chip_y: u32,
    core_id: u32,
    run_root: &str,
) -> PathBuf {
    resolve_run_root(run_root).join(format!(
        "{}_appData_{}_{}_{}.dat",
        hostname, chip_x, chip_y, core_id
    ))
}

/// Address of the per-core user register that receives the data pointer
///
/// Chips carry at most a few dozen cores, so the id is a byte.
pub const fn mem_write_base_address(core_id: u8) -> u32 {
    USER0_BASE_ADDRESS + USER0_STRIDE_PER_CORE * core_id as u32 + USER0_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_sentinel_resolves_to_temp_dir() {
        let paths = artifact_path("spinn-4", 2, 3, 17, "TEMP", false);
        assert_eq!(
            paths.binary,
            std::env::temp_dir().join("spinn-4_dataSpec_2_3_17.dat")
        );
        assert!(paths.text.is_none());
        assert!(paths.text_dir().is_none());
    }

    #[test]
    fn test_other_roots_used_verbatim() {
        assert_eq!(resolve_run_root("reports/run_1"), PathBuf::from("reports/run_1"));
        // only the exact sentinel is special
        assert_eq!(resolve_run_root("temp"), PathBuf::from("temp"));
    }

    #[test]
    fn test_text_dir_is_nested_under_run_root() {
        let paths = artifact_path("host", 0, 0, 1, "/data", true);
        assert_eq!(paths.text_dir(), Some(Path::new("/data/data_spec_text_files")));
    }

    #[test]
    fn test_application_data_path() {
        assert_eq!(
            application_data_path("host", 1, 0, 5, "/data"),
            PathBuf::from("/data/host_appData_1_0_5.dat")
        );
    }

    #[test]
    fn test_mem_write_base_address() {
        assert_eq!(mem_write_base_address(0), 0xe500_7070);
        assert_eq!(mem_write_base_address(1), 0xe500_70f0);
        assert_eq!(mem_write_base_address(u8::MAX), 0xe500_7000 + 128 * 255 + 112);
    }
}
