// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin discovery.
//!
//! [`PluginFactory`] scans its search paths for module files, opens them,
//! resolves the exported symbols and publishes the result as an immutable
//! [`Registry`] snapshot. Readers holding an older snapshot keep seeing it
//! until they load again; a discovery in progress is never observable.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwapOption;
use indexmap::IndexSet;
use plugrack_config::PluginsConfig;
use plugrack_core::PlugrackError;
use tracing::{debug, info, warn};

use crate::loader::{DylibLoader, ModuleLoader};
use crate::naming::{LibraryNaming, base_name, descriptor_symbol};
use crate::registry::{ModuleInfo, Registry};
use crate::search::SearchPathInputs;

/// Discovers plugin modules and owns the current [`Registry`].
pub struct PluginFactory {
    loader: Arc<dyn ModuleLoader>,
    naming: LibraryNaming,
    search_paths: Vec<PathBuf>,
    registry: ArcSwapOption<Registry>,
    discovery: Mutex<()>,
}

impl PluginFactory {
    /// Factory scanning `search_paths` with `loader`. Nothing is scanned
    /// until the registry is first requested.
    pub fn new(loader: Arc<dyn ModuleLoader>, search_paths: Vec<PathBuf>) -> Self {
        Self {
            loader,
            naming: LibraryNaming::host(),
            search_paths,
            registry: ArcSwapOption::empty(),
            discovery: Mutex::new(()),
        }
    }

    /// Factory using the platform dynamic loader and the search paths
    /// resolved from `config`.
    pub fn from_config(config: &PluginsConfig) -> Self {
        let search_paths = SearchPathInputs::from_config(config).resolve();
        Self::new(Arc::new(DylibLoader::new()), search_paths)
    }

    /// Match module files with `naming` instead of the host convention.
    pub fn with_naming(mut self, naming: LibraryNaming) -> Self {
        self.naming = naming;
        self
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    pub fn naming(&self) -> LibraryNaming {
        self.naming
    }

    /// Whether a registry has been published yet.
    pub fn is_discovered(&self) -> bool {
        self.registry.load().is_some()
    }

    /// The current registry, discovering plugins on first access.
    pub fn registry(&self) -> Arc<Registry> {
        if let Some(registry) = self.registry.load_full() {
            return registry;
        }
        let _guard = self.discovery.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(registry) = self.registry.load_full() {
            return registry;
        }
        self.publish(self.scan())
    }

    /// Rescan every search path and replace the registry.
    ///
    /// Modules opened by earlier runs stay resident.
    pub fn discover_plugins(&self) -> Arc<Registry> {
        let _guard = self.discovery.lock().unwrap_or_else(PoisonError::into_inner);
        self.publish(self.scan())
    }

    fn publish(&self, registry: Registry) -> Arc<Registry> {
        info!(
            modules = registry.len(),
            routes = registry.extension_routes().count(),
            errors = registry.load_errors().len(),
            "published plugin registry"
        );
        let registry = Arc::new(registry);
        self.registry.store(Some(registry.clone()));
        registry
    }

    /// Module files in search-path order, sorted by name within each
    /// directory. A file reachable through several search paths keeps the
    /// position of its first occurrence.
    pub fn candidate_files(&self) -> Vec<PathBuf> {
        let mut files = IndexSet::new();
        for dir in &self.search_paths {
            debug!(path = %dir.display(), pattern = %self.naming.pattern(), "checking search path");
            let entries = match std::fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(e) => {
                    debug!(path = %dir.display(), error = %e, "cannot list search path");
                    continue;
                }
            };
            let mut in_dir: Vec<PathBuf> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| {
                    path.file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| self.naming.matches(name))
                        && path.is_file()
                })
                .collect();
            in_dir.sort();
            for path in in_dir {
                files.insert(std::path::absolute(&path).unwrap_or(path));
            }
        }
        files.into_iter().collect()
    }

    fn scan(&self) -> Registry {
        let files = self.candidate_files();

        // Open everything once first, so a module whose symbols depend on
        // another module resolves no matter which file is listed first.
        for file in &files {
            debug!(path = %file.display(), "loading module");
            if let Err(e) = self.loader.open(file) {
                debug!(path = %file.display(), error = %e, "first open failed, retrying on inspection");
            }
        }

        let mut registry = Registry::new();
        for file in &files {
            self.inspect(file, &mut registry);
        }
        registry
    }

    fn inspect(&self, file: &Path, registry: &mut Registry) {
        let base = base_name(file);
        let module = match self.loader.open(file) {
            Ok(module) => module,
            Err(message) => {
                let err = PlugrackError::ModuleOpen {
                    path: file.display().to_string(),
                    message: message.clone(),
                };
                warn!(error = %err, "skipping module");
                registry.record_error(base, message);
                return;
            }
        };

        if module.instantiation_hook().is_none() {
            debug!(path = %file.display(), "module exports no entry point");
            return;
        }

        let symbol = descriptor_symbol(&base);
        let Some(descriptor) = module.descriptor(&symbol) else {
            let err = PlugrackError::MalformedModule {
                path: file.display().to_string(),
                symbol,
            };
            warn!(error = %err, "skipping malformed plugin module");
            return;
        };

        debug!(path = %file.display(), plugin = descriptor.name, "discovered plugin");
        registry.add_module(ModuleInfo::new(module, descriptor));
    }
}

impl std::fmt::Debug for PluginFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginFactory")
            .field("naming", &self.naming)
            .field("search_paths", &self.search_paths)
            .field("discovered", &self.is_discovered())
            .finish()
    }
}
