// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temporary plugin search directories.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use plugrack_plugin::{LibraryNaming, ModuleLoader, PluginFactory};
use tempfile::TempDir;

/// A temporary directory populated with empty module files.
///
/// The directory is removed on drop.
pub struct TempPluginDir {
    dir: TempDir,
}

impl TempPluginDir {
    /// Create an empty plugin directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp plugin dir"),
        }
    }

    /// Create a directory holding an empty file for each name.
    pub fn with_files(names: &[&str]) -> Self {
        let dir = Self::new();
        for name in names {
            dir.touch(name);
        }
        dir
    }

    /// Create an empty file `name`, returning its path.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn touch(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, b"").expect("failed to create module file");
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Factory scanning this directory with `loader`, matching `lib*.so`
    /// on every platform.
    pub fn factory(&self, loader: Arc<dyn ModuleLoader>) -> PluginFactory {
        PluginFactory::new(loader, vec![self.path().to_path_buf()])
            .with_naming(LibraryNaming::UNIX)
    }
}

impl Default for TempPluginDir {
    fn default() -> Self {
        Self::new()
    }
}
