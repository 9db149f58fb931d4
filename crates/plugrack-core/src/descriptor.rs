// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin descriptors and counted references to them.
//!
//! Every plugin module exports exactly one [`Descriptor`] as a static. The
//! host never copies it: it holds a [`DescriptorRef`], which pairs the
//! `'static` reference with a counted handle to the module the static lives
//! in. As long as any `DescriptorRef` (and therefore any [`Key`] or live
//! instance) exists, the module cannot be unloaded.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use crate::features::SubPluginFeatures;
use crate::key::Key;
use crate::types::{Logo, PluginCategory};

/// Counted handle keeping a loaded module resident.
pub type ModuleKeepAlive = Arc<dyn Any + Send + Sync>;

/// Immutable metadata record exported by a plugin module.
///
/// A descriptor with `sub_plugin_features` describes a family of
/// selectable sub-plugins rather than one concrete plugin.
pub struct Descriptor {
    /// Short machine identifier, unique within a registry.
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub author: &'static str,
    /// Host-defined encoding, `major * 256 + minor`.
    pub version: u32,
    pub category: PluginCategory,
    pub logo: Option<Logo>,
    /// Comma-separated list of file extensions handled by the whole plugin.
    pub supported_file_types: Option<&'static str>,
    pub sub_plugin_features: Option<&'static dyn SubPluginFeatures>,
}

impl Descriptor {
    /// Iterate the extensions listed in `supported_file_types`, skipping
    /// empty segments.
    pub fn supported_extensions(&self) -> impl Iterator<Item = &'static str> {
        self.supported_file_types
            .unwrap_or("")
            .split(',')
            .filter(|ext| !ext.is_empty())
    }

    /// Whether the whole plugin declares support for `extension`.
    pub fn supports_file_type(&self, extension: &str) -> bool {
        self.supported_extensions().any(|ext| ext == extension)
    }

    /// Whether this descriptor stands for a family of sub-plugins.
    pub fn has_sub_plugins(&self) -> bool {
        self.sub_plugin_features.is_some()
    }

    /// Render the version as `major.minor`.
    pub fn version_string(&self) -> String {
        format!("{}.{}", self.version >> 8, self.version & 0xff)
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("name", &self.name)
            .field("display_name", &self.display_name)
            .field("version", &self.version_string())
            .field("category", &self.category)
            .field("supported_file_types", &self.supported_file_types)
            .field("sub_plugin_features", &self.sub_plugin_features.is_some())
            .finish()
    }
}

/// Counted reference to a [`Descriptor`].
///
/// Identity is the address of the descriptor: two references are equal iff
/// they point at the same static, regardless of which handle keeps the
/// module alive.
#[derive(Clone)]
pub struct DescriptorRef {
    descriptor: &'static Descriptor,
    module: Option<ModuleKeepAlive>,
}

impl DescriptorRef {
    /// Reference a descriptor compiled into the host itself.
    pub fn from_static(descriptor: &'static Descriptor) -> Self {
        Self {
            descriptor,
            module: None,
        }
    }

    /// Reference a descriptor living inside a loaded module. `module` must
    /// be the handle that keeps that module mapped.
    pub fn with_module(descriptor: &'static Descriptor, module: ModuleKeepAlive) -> Self {
        Self {
            descriptor,
            module: Some(module),
        }
    }

    pub fn descriptor(&self) -> &Descriptor {
        self.descriptor
    }

    /// The keep-alive handle, if the descriptor lives in a loaded module.
    pub fn module(&self) -> Option<&ModuleKeepAlive> {
        self.module.as_ref()
    }

    pub fn ptr_eq(&self, other: &DescriptorRef) -> bool {
        std::ptr::eq(self.descriptor, other.descriptor)
    }

    /// Enumerate every addressable sub-plugin of this family. Empty for a
    /// descriptor without sub-plugin features.
    pub fn sub_plugin_keys(&self) -> Vec<Key> {
        match self.descriptor.sub_plugin_features {
            Some(features) => features.list_sub_plugin_keys(self),
            None => Vec::new(),
        }
    }

    /// A key denoting the whole plugin.
    pub fn whole_plugin_key(&self) -> Key {
        Key::new(self.clone(), self.descriptor.display_name, Default::default())
    }
}

impl Deref for DescriptorRef {
    type Target = Descriptor;

    fn deref(&self) -> &Descriptor {
        self.descriptor
    }
}

impl PartialEq for DescriptorRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for DescriptorRef {}

impl Hash for DescriptorRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.descriptor, state);
    }
}

impl fmt::Debug for DescriptorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescriptorRef")
            .field("name", &self.descriptor.name)
            .field("resident_module", &self.module.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SAMPLER: Descriptor = Descriptor {
        name: "sampler",
        display_name: "Sampler",
        description: "Plays back audio files",
        author: "Plugrack Contributors",
        version: 0x0102,
        category: PluginCategory::Instrument,
        logo: None,
        supported_file_types: Some("wav,ogg,,flac"),
        sub_plugin_features: None,
    };

    static OTHER: Descriptor = Descriptor {
        name: "other",
        display_name: "Other",
        description: "",
        author: "",
        version: 0x0100,
        category: PluginCategory::Tool,
        logo: None,
        supported_file_types: None,
        sub_plugin_features: None,
    };

    #[test]
    fn supported_extensions_skip_empty_segments() {
        let exts: Vec<_> = SAMPLER.supported_extensions().collect();
        assert_eq!(exts, vec!["wav", "ogg", "flac"]);
        assert!(SAMPLER.supports_file_type("ogg"));
        assert!(!SAMPLER.supports_file_type(""));
        assert!(!OTHER.supports_file_type("wav"));
    }

    #[test]
    fn version_string_splits_major_minor() {
        assert_eq!(SAMPLER.version_string(), "1.2");
        assert_eq!(OTHER.version_string(), "1.0");
    }

    #[test]
    fn descriptor_refs_compare_by_identity() {
        let keepalive: ModuleKeepAlive = Arc::new(());
        let a = DescriptorRef::from_static(&SAMPLER);
        let b = DescriptorRef::with_module(&SAMPLER, keepalive);
        let c = DescriptorRef::from_static(&OTHER);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(b.module().is_some());
        assert_eq!(b.name, "sampler");
    }

    #[test]
    fn plain_descriptor_has_no_sub_plugin_keys() {
        let sampler = DescriptorRef::from_static(&SAMPLER);
        assert!(sampler.sub_plugin_keys().is_empty());
        let whole = sampler.whole_plugin_key();
        assert!(whole.is_valid());
        assert!(whole.attributes().is_empty());
    }
}
