// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-crate debug switches from the command line and `GRIDCORE_DEBUG`.
//!
//! `--debug-gridcore-dsg` raises one crate to `debug`; `--debug-all` raises
//! every crate in [`KNOWN_CRATES`]. The environment variable takes a comma
//! separated list of crate names or `all`.

use std::collections::BTreeSet;

use crate::KNOWN_CRATES;

/// Environment variable read by [`parse_debug_flags`]
pub const DEBUG_ENV_VAR: &str = "GRIDCORE_DEBUG";

const FLAG_PREFIX: &str = "--debug-";

/// Crates whose logging is raised to `debug`
///
/// # Example
/// ```rust
/// use gridcore_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(["--debug-gridcore-dsg"]);
/// assert!(flags.is_enabled("gridcore-dsg"));
/// assert_eq!(flags.to_filter_string("info"), "gridcore-dsg=debug,info");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrateDebugFlags {
    crates: BTreeSet<String>,
}

impl CrateDebugFlags {
    /// Collect `--debug-*` arguments; anything else is ignored
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = Self::default();
        for arg in args {
            if let Some(name) = arg.as_ref().strip_prefix(FLAG_PREFIX) {
                flags.enable(name);
            }
        }
        flags
    }

    /// Parse a `GRIDCORE_DEBUG` value
    pub fn from_env_value(value: &str) -> Self {
        let mut flags = Self::default();
        value
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .for_each(|name| flags.enable(name));
        flags
    }

    /// Enable one crate, or every known crate for `all`
    pub fn enable(&mut self, name: &str) {
        if name == "all" {
            self.crates.extend(KNOWN_CRATES.iter().map(|c| c.to_string()));
        } else {
            self.crates.insert(name.to_string());
        }
    }

    pub fn merge(&mut self, other: CrateDebugFlags) {
        self.crates.extend(other.crates);
    }

    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.crates.contains(crate_name)
    }

    pub fn is_empty(&self) -> bool {
        self.crates.is_empty()
    }

    /// Enabled names that are not gridcore crates, usually typos
    pub fn unknown(&self) -> Vec<&str> {
        self.crates
            .iter()
            .map(String::as_str)
            .filter(|name| !KNOWN_CRATES.contains(name))
            .collect()
    }

    /// `EnvFilter` directives: one `<crate>=debug` per enabled crate, then the base level
    pub fn to_filter_string(&self, base_level: &str) -> String {
        self.crates
            .iter()
            .map(|name| format!("{}=debug", name))
            .chain(std::iter::once(base_level.to_lowercase()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// True for arguments this module consumes
pub fn is_debug_flag(arg: &str) -> bool {
    arg.starts_with(FLAG_PREFIX)
}

/// Debug flags from `args` merged with `GRIDCORE_DEBUG`
pub fn parse_debug_flags<I, S>(args: I) -> CrateDebugFlags
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut flags = CrateDebugFlags::from_args(args);
    if let Ok(value) = std::env::var(DEBUG_ENV_VAR) {
        flags.merge(CrateDebugFlags::from_env_value(&value));
    }
    flags
}

/// Usage text for the debug switches
pub fn debug_flags_help() -> String {
    format!(
        "Debug flags:\n  \
         --debug-all            debug logging for every crate\n  \
         --debug-<crate>        debug logging for one crate\n\n\
         Crates: {}\n\n\
         {}=<crate>[,<crate>] or {}=all works the same way.\n",
        KNOWN_CRATES.join(", "),
        DEBUG_ENV_VAR,
        DEBUG_ENV_VAR
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_other_than_debug_flags_ignored() {
        let flags = CrateDebugFlags::from_args(["conway_dsg", "--width=9", "--debug-gridcore-graph"]);
        assert!(flags.is_enabled("gridcore-graph"));
        assert!(!flags.is_enabled("gridcore-dsg"));
        assert!(!is_debug_flag("--width=9"));
    }

    #[test]
    fn test_all_enables_known_crates() {
        let flags = CrateDebugFlags::from_args(["--debug-all"]);
        assert!(KNOWN_CRATES.iter().all(|c| flags.is_enabled(c)));
        assert!(flags.unknown().is_empty());
    }

    #[test]
    fn test_env_value_and_merge() {
        let mut flags = CrateDebugFlags::from_args(["--debug-gridcore-frontend"]);
        flags.merge(CrateDebugFlags::from_env_value(" gridcore-dsg, ,gridcore-dgs"));

        assert!(flags.is_enabled("gridcore-dsg"));
        assert!(flags.is_enabled("gridcore-frontend"));
        assert_eq!(flags.unknown(), vec!["gridcore-dgs"]);
    }

    #[test]
    fn test_filter_string_is_sorted() {
        let flags = CrateDebugFlags::from_args(["--debug-gridcore-graph", "--debug-gridcore-dsg"]);
        assert_eq!(
            flags.to_filter_string("WARN"),
            "gridcore-dsg=debug,gridcore-graph=debug,warn"
        );
        assert_eq!(CrateDebugFlags::default().to_filter_string("info"), "info");
        assert!(CrateDebugFlags::default().is_empty());
    }

    #[test]
    fn test_help_lists_crates() {
        let help = debug_flags_help();
        assert!(help.contains("gridcore-frontend"));
        assert!(help.contains(DEBUG_ENV_VAR));
    }
}
