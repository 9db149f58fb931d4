// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Opening plugin modules and resolving their exported symbols.
//!
//! [`ModuleLoader`] is the seam between discovery and the platform dynamic
//! linker. [`DylibLoader`] is the `libloading` implementation; tests use an
//! in-memory loader instead.

use std::collections::HashMap;
use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use libloading::Library;
use plugrack_core::{Descriptor, ENTRY_POINT_SYMBOL, InstantiationHook};
use tracing::debug;

/// An opened plugin module.
pub trait Module: Send + Sync {
    /// Absolute path the module was opened from.
    fn path(&self) -> &Path;

    /// The module's instantiation hook, if it exports one.
    fn instantiation_hook(&self) -> Option<InstantiationHook>;

    /// Resolve a descriptor static by symbol name.
    ///
    /// The returned reference stays valid for as long as this module is
    /// resident, which a counted handle to it guarantees.
    fn descriptor(&self, symbol: &str) -> Option<&'static Descriptor>;
}

/// Opens modules by path.
///
/// Opening the same path twice returns the same resident module.
pub trait ModuleLoader: Send + Sync {
    /// Open `path`, or return the platform loader's error message.
    fn open(&self, path: &Path) -> Result<Arc<dyn Module>, String>;
}

/// Dynamic-library loader backed by `libloading`.
///
/// Every opened library stays in an arena keyed by path and is never
/// closed while the loader or any handle it returned is alive.
#[derive(Default)]
pub struct DylibLoader {
    resident: Mutex<HashMap<PathBuf, Arc<DylibModule>>>,
}

impl DylibLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of libraries currently held in the arena.
    pub fn resident_count(&self) -> usize {
        self.resident.lock().map(|r| r.len()).unwrap_or(0)
    }
}

impl ModuleLoader for DylibLoader {
    fn open(&self, path: &Path) -> Result<Arc<dyn Module>, String> {
        let mut resident = self
            .resident
            .lock()
            .map_err(|e| format!("module arena poisoned: {e}"))?;

        if let Some(module) = resident.get(path) {
            return Ok(module.clone());
        }

        // SAFETY: opening a library runs its initialisers. Plugin
        // directories are trusted to contain plugrack modules.
        let library = unsafe { open_library(path) }.map_err(|e| e.to_string())?;
        debug!(path = %path.display(), "opened module");

        let module = Arc::new(DylibModule {
            path: path.to_path_buf(),
            library,
        });
        resident.insert(path.to_path_buf(), module.clone());
        Ok(module)
    }
}

/// Open with every symbol resolved up front and exported to modules
/// opened later.
#[cfg(unix)]
unsafe fn open_library(path: &Path) -> Result<Library, libloading::Error> {
    use libloading::os::unix::{Library as UnixLibrary, RTLD_GLOBAL, RTLD_NOW};
    unsafe { UnixLibrary::open(Some(path), RTLD_NOW | RTLD_GLOBAL) }.map(Library::from)
}

#[cfg(not(unix))]
unsafe fn open_library(path: &Path) -> Result<Library, libloading::Error> {
    unsafe { Library::new(path) }
}

struct DylibModule {
    path: PathBuf,
    library: Library,
}

impl Module for DylibModule {
    fn path(&self) -> &Path {
        &self.path
    }

    fn instantiation_hook(&self) -> Option<InstantiationHook> {
        let symbol = CString::new(ENTRY_POINT_SYMBOL).ok()?;
        // SAFETY: modules exporting the entry point are built against
        // plugrack-core, which fixes its signature.
        unsafe {
            self.library
                .get::<InstantiationHook>(symbol.as_bytes_with_nul())
                .ok()
                .map(|hook| *hook)
        }
    }

    fn descriptor(&self, symbol: &str) -> Option<&'static Descriptor> {
        let symbol = CString::new(symbol).ok()?;
        // SAFETY: the symbol is a `Descriptor` static of a module built
        // against plugrack-core. The library is never closed while this
        // module is referenced, so the static outlives every `DescriptorRef`.
        unsafe {
            let address = self
                .library
                .get::<*const Descriptor>(symbol.as_bytes_with_nul())
                .ok()?;
            (*address).as_ref()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_failure_reports_loader_message() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libbroken.so");
        std::fs::write(&path, b"not a shared object").unwrap();

        let loader = DylibLoader::new();
        let err = match loader.open(&path) {
            Ok(_) => panic!("garbage must not open"),
            Err(err) => err,
        };
        assert!(!err.is_empty());
        assert_eq!(loader.resident_count(), 0);
    }

    #[test]
    fn missing_file_is_an_error() {
        let loader = DylibLoader::new();
        assert!(loader.open(Path::new("/nonexistent/libnothing.so")).is_err());
    }
}
