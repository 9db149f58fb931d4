// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory module loader.
//!
//! Modules are declared per file name. A module may require other files to
//! be resident before its descriptor resolves, which models a wrapper whose
//! symbols live in a separately loaded support library.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use plugrack_core::{Descriptor, InstantiationHook};
use plugrack_plugin::{Module, ModuleLoader};

/// What a mock module file exports.
#[derive(Clone, Default)]
pub struct MockModuleSpec {
    hook: Option<InstantiationHook>,
    descriptors: HashMap<String, &'static Descriptor>,
    requires: Vec<String>,
    open_error: Option<String>,
    hook_resolves_once: bool,
}

impl MockModuleSpec {
    /// A plugin module exporting `hook` and `descriptor` under `symbol`.
    pub fn plugin(symbol: &str, descriptor: &'static Descriptor, hook: InstantiationHook) -> Self {
        Self {
            hook: Some(hook),
            ..Default::default()
        }
        .exporting(symbol, descriptor)
    }

    /// A module with no entry point, e.g. a support library.
    pub fn support() -> Self {
        Self::default()
    }

    /// A file the loader refuses to open with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            open_error: Some(message.to_string()),
            ..Default::default()
        }
    }

    /// Also export `descriptor` under `symbol`.
    pub fn exporting(mut self, symbol: &str, descriptor: &'static Descriptor) -> Self {
        self.descriptors.insert(symbol.to_string(), descriptor);
        self
    }

    /// Resolve the entry point for the first lookup only, so the module
    /// passes discovery but cannot be instantiated.
    pub fn hook_resolves_once(mut self) -> Self {
        self.hook_resolves_once = true;
        self
    }

    /// Resolve descriptors only once `file_name` has been opened.
    pub fn requires(mut self, file_name: &str) -> Self {
        self.requires.push(file_name.to_string());
        self
    }
}

/// Loader serving [`MockModuleSpec`]s by file name.
///
/// Like the real loader it keeps every opened module resident and returns
/// the same handle for repeated opens of one path.
#[derive(Default)]
pub struct MockModuleLoader {
    specs: HashMap<String, MockModuleSpec>,
    resident: Arc<Mutex<HashMap<PathBuf, Arc<MockModule>>>>,
    open_calls: Mutex<Vec<PathBuf>>,
}

impl MockModuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `spec` for any path whose file name is `file_name`.
    pub fn with_module(mut self, file_name: &str, spec: MockModuleSpec) -> Self {
        self.specs.insert(file_name.to_string(), spec);
        self
    }

    /// Every path passed to `open`, in call order.
    pub fn open_calls(&self) -> Vec<PathBuf> {
        self.open_calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// File names of resident modules, sorted.
    pub fn resident_files(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .resident
            .lock()
            .map(|r| r.keys().map(|p| file_name(p)).collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

impl ModuleLoader for MockModuleLoader {
    fn open(&self, path: &Path) -> Result<Arc<dyn Module>, String> {
        if let Ok(mut calls) = self.open_calls.lock() {
            calls.push(path.to_path_buf());
        }

        let name = file_name(path);
        let spec = self
            .specs
            .get(&name)
            .ok_or_else(|| format!("{name}: cannot open shared object file"))?;
        if let Some(message) = &spec.open_error {
            return Err(message.clone());
        }

        let mut resident = self.resident.lock().map_err(|e| e.to_string())?;
        if let Some(module) = resident.get(path) {
            return Ok(module.clone());
        }
        let module = Arc::new(MockModule {
            path: path.to_path_buf(),
            spec: spec.clone(),
            resident: Arc::clone(&self.resident),
            hook_lookups: AtomicUsize::new(0),
        });
        resident.insert(path.to_path_buf(), module.clone());
        Ok(module)
    }
}

struct MockModule {
    path: PathBuf,
    spec: MockModuleSpec,
    resident: Arc<Mutex<HashMap<PathBuf, Arc<MockModule>>>>,
    hook_lookups: AtomicUsize,
}

impl MockModule {
    fn dependencies_resident(&self) -> bool {
        let Ok(resident) = self.resident.lock() else {
            return false;
        };
        self.spec
            .requires
            .iter()
            .all(|needed| resident.keys().any(|p| file_name(p) == *needed))
    }
}

impl Module for MockModule {
    fn path(&self) -> &Path {
        &self.path
    }

    fn instantiation_hook(&self) -> Option<InstantiationHook> {
        let lookups = self.hook_lookups.fetch_add(1, Ordering::SeqCst);
        if self.spec.hook_resolves_once && lookups > 0 {
            return None;
        }
        self.spec.hook
    }

    fn descriptor(&self, symbol: &str) -> Option<&'static Descriptor> {
        if !self.dependencies_resident() {
            return None;
        }
        self.spec.descriptors.get(symbol).copied()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
