// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! File and symbol naming conventions.

use std::path::Path;

use plugrack_core::DESCRIPTOR_SYMBOL_SUFFIX;
use plugrack_core::abi::LIBRARY_PREFIX;

/// Shared-library file name pattern of a platform: `<prefix>*<suffix>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryNaming {
    prefix: &'static str,
    suffix: &'static str,
}

impl LibraryNaming {
    pub const UNIX: Self = Self::new(LIBRARY_PREFIX, ".so");
    pub const MACOS: Self = Self::new(LIBRARY_PREFIX, ".dylib");
    pub const WINDOWS: Self = Self::new("", ".dll");

    pub const fn new(prefix: &'static str, suffix: &'static str) -> Self {
        Self { prefix, suffix }
    }

    /// Convention of the platform this binary was built for.
    pub const fn host() -> Self {
        if cfg!(windows) {
            Self::WINDOWS
        } else if cfg!(target_os = "macos") {
            Self::MACOS
        } else {
            Self::UNIX
        }
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub fn suffix(&self) -> &'static str {
        self.suffix
    }

    /// File name of the module whose common name is `common`.
    pub fn file_name(&self, common: &str) -> String {
        format!("{}{common}{}", self.prefix, self.suffix)
    }

    /// Whether `file_name` looks like a plugin module on this platform.
    pub fn matches(&self, file_name: &str) -> bool {
        file_name.len() > self.prefix.len() + self.suffix.len()
            && file_name.starts_with(self.prefix)
            && file_name.ends_with(self.suffix)
    }

    /// Glob-style rendering, e.g. `lib*.so`.
    pub fn pattern(&self) -> String {
        format!("{}*{}", self.prefix, self.suffix)
    }
}

impl Default for LibraryNaming {
    fn default() -> Self {
        Self::host()
    }
}

/// File name up to its first `.`: `libkicker.so.1` gives `libkicker`.
pub fn base_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    file_name.split('.').next().unwrap_or_default().to_string()
}

/// Descriptor symbol a module with `base_name` must export.
///
/// The base name is cut at its first `_`, a leading `lib` is dropped and
/// `_plugin_descriptor` appended: `libzyn_core` gives `zyn_plugin_descriptor`.
pub fn descriptor_symbol(base_name: &str) -> String {
    let common = base_name.split_once('_').map_or(base_name, |(head, _)| head);
    let common = common.strip_prefix(LIBRARY_PREFIX).unwrap_or(common);
    format!("{common}{DESCRIPTOR_SYMBOL_SUFFIX}")
}
