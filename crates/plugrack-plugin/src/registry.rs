// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The result of one discovery run.
//!
//! A [`Registry`] is immutable once published: [`PluginFactory`] builds a
//! fresh one per discovery and swaps it in whole.
//!
//! [`PluginFactory`]: crate::PluginFactory

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use plugrack_core::abi::LIBRARY_PREFIX;
use plugrack_core::{DescriptorRef, Key, ModuleKeepAlive, PluginCategory};

use crate::loader::Module;

/// Message returned by [`Registry::error_string`] when nothing was recorded.
pub const PLUGIN_NOT_FOUND: &str = "Plugin not found.";

/// One successfully discovered plugin module.
#[derive(Clone)]
pub struct ModuleInfo {
    path: PathBuf,
    module: Arc<dyn Module>,
    descriptor: DescriptorRef,
}

impl ModuleInfo {
    /// Pair a resident module with the descriptor it exports. The
    /// descriptor reference keeps `module` resident.
    pub fn new(module: Arc<dyn Module>, descriptor: &'static plugrack_core::Descriptor) -> Self {
        let keep_alive: ModuleKeepAlive = Arc::new(module.clone());
        Self {
            path: module.path().to_path_buf(),
            descriptor: DescriptorRef::with_module(descriptor, keep_alive),
            module,
        }
    }

    /// Descriptor name of the plugin.
    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn module(&self) -> &Arc<dyn Module> {
        &self.module
    }

    pub fn descriptor(&self) -> &DescriptorRef {
        &self.descriptor
    }
}

impl fmt::Debug for ModuleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleInfo")
            .field("name", &self.name())
            .field("path", &self.path)
            .finish()
    }
}

/// Where files with one extension are routed.
#[derive(Debug, Clone)]
pub struct Route {
    pub info: ModuleInfo,
    /// Sub-plugin key, or an unattached default key for the whole plugin.
    pub key: Key,
}

/// Answer to an extension lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginNameAndKey {
    /// Plugin name; empty when nothing handles the extension.
    pub name: String,
    pub key: Key,
    /// True when no plugin handles the extension.
    pub is_null: bool,
}

/// Descriptors, module infos, extension routes and load errors of one
/// discovery run.
#[derive(Debug, Default)]
pub struct Registry {
    descriptors_by_category: BTreeMap<PluginCategory, Vec<DescriptorRef>>,
    module_infos: Vec<ModuleInfo>,
    extension_routes: IndexMap<String, Route>,
    load_errors: BTreeMap<String, String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a discovered module: catalogue its descriptor and register
    /// its extension routes.
    ///
    /// Whole-plugin extensions are routed with a default key first; each
    /// sub-plugin's additional extensions are routed afterwards with that
    /// sub-plugin's key, so the more specific route wins.
    pub fn add_module(&mut self, info: ModuleInfo) {
        let descriptor = info.descriptor().clone();

        for ext in descriptor.supported_extensions() {
            self.route(ext, &info, Key::default());
        }

        for key in descriptor.sub_plugin_keys() {
            let Some(extensions) = key.additional_file_extensions() else {
                continue;
            };
            for ext in extensions.split(',').filter(|ext| !ext.is_empty()) {
                self.route(ext, &info, key.clone());
            }
        }

        self.descriptors_by_category
            .entry(descriptor.category)
            .or_default()
            .push(descriptor);
        self.module_infos.push(info);
    }

    fn route(&mut self, ext: &str, info: &ModuleInfo, key: Key) {
        self.extension_routes.insert(
            ext.to_string(),
            Route {
                info: info.clone(),
                key,
            },
        );
    }

    /// Record the loader error for a module base name. A later error for
    /// the same name replaces the earlier one.
    pub fn record_error(&mut self, base_name: impl Into<String>, message: impl Into<String>) {
        self.load_errors.insert(base_name.into(), message.into());
    }

    /// Every accepted descriptor, grouped by category.
    pub fn descriptors(&self) -> Vec<DescriptorRef> {
        self.descriptors_by_category.values().flatten().cloned().collect()
    }

    pub fn descriptors_of(&self, category: PluginCategory) -> Vec<DescriptorRef> {
        self.descriptors_by_category
            .get(&category)
            .cloned()
            .unwrap_or_default()
    }

    /// Accepted modules in discovery order.
    pub fn module_infos(&self) -> &[ModuleInfo] {
        &self.module_infos
    }

    /// Module whose descriptor is named `name`.
    pub fn plugin_info(&self, name: &str) -> Option<&ModuleInfo> {
        self.module_infos.iter().find(|info| info.name() == name)
    }

    /// Last load error recorded for `name`, else [`PLUGIN_NOT_FOUND`].
    ///
    /// Errors are keyed by file base name; a plugin name without the
    /// platform library prefix also matches.
    pub fn error_string(&self, name: &str) -> &str {
        self.load_errors
            .get(name)
            .or_else(|| self.load_errors.get(&format!("{LIBRARY_PREFIX}{name}")))
            .map_or(PLUGIN_NOT_FOUND, String::as_str)
    }

    pub fn load_errors(&self) -> &BTreeMap<String, String> {
        &self.load_errors
    }

    /// Route registered for `ext`.
    pub fn route_for(&self, ext: &str) -> Option<&Route> {
        self.extension_routes.get(ext)
    }

    /// All routes, in order of first registration.
    pub fn extension_routes(&self) -> impl Iterator<Item = (&str, &Route)> {
        self.extension_routes
            .iter()
            .map(|(ext, route)| (ext.as_str(), route))
    }

    /// Plugin name and key handling `ext`, never failing.
    pub fn plugin_supporting_extension(&self, ext: &str) -> PluginNameAndKey {
        match self.route_for(ext) {
            Some(route) => PluginNameAndKey {
                name: route.info.name().to_string(),
                key: route.key.clone(),
                is_null: false,
            },
            None => PluginNameAndKey {
                is_null: true,
                ..Default::default()
            },
        }
    }

    pub fn len(&self) -> usize {
        self.module_infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.module_infos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugrack_core::{Descriptor, InstantiationHook};

    struct StubModule(PathBuf);

    impl Module for StubModule {
        fn path(&self) -> &Path {
            &self.0
        }

        fn instantiation_hook(&self) -> Option<InstantiationHook> {
            None
        }

        fn descriptor(&self, _symbol: &str) -> Option<&'static Descriptor> {
            None
        }
    }

    static TRACKER: Descriptor = Descriptor {
        name: "tracker",
        display_name: "Tracker Import",
        description: "",
        author: "",
        version: 0x0100,
        category: PluginCategory::ImportFilter,
        logo: None,
        supported_file_types: Some("mod,xm"),
        sub_plugin_features: None,
    };

    fn info() -> ModuleInfo {
        ModuleInfo::new(Arc::new(StubModule("/p/libtracker.so".into())), &TRACKER)
    }

    #[test]
    fn whole_plugin_routes_use_default_key() {
        let mut registry = Registry::new();
        registry.add_module(info());

        let found = registry.plugin_supporting_extension("xm");
        assert!(!found.is_null);
        assert_eq!(found.name, "tracker");
        assert!(!found.key.is_valid());
        assert!(registry.route_for("mod").is_some_and(|route| route.info.name() == "tracker"));
        assert!(registry.route_for("wav").is_none());
        assert_eq!(registry.descriptors_of(PluginCategory::ImportFilter).len(), 1);
        assert!(registry.descriptors_of(PluginCategory::Effect).is_empty());
    }

    #[test]
    fn unknown_extension_is_null_not_error() {
        let registry = Registry::new();
        let found = registry.plugin_supporting_extension("zip");
        assert!(found.is_null);
        assert!(found.name.is_empty());
        assert!(!found.key.is_valid());
    }

    #[test]
    fn error_string_defaults_and_matches_base_name() {
        let mut registry = Registry::new();
        registry.record_error("libkicker", "undefined symbol: foo");
        assert_eq!(registry.error_string("kicker"), "undefined symbol: foo");
        assert_eq!(registry.error_string("libkicker"), "undefined symbol: foo");
        assert_eq!(registry.error_string("other"), PLUGIN_NOT_FOUND);
    }

    #[test]
    fn module_info_keeps_module_alive() {
        let info = info();
        assert_eq!(info.name(), "tracker");
        assert_eq!(info.path(), Path::new("/p/libtracker.so"));
        assert!(info.descriptor().module().is_some());
        assert_eq!(Arc::strong_count(info.module()), 2);
    }
}
