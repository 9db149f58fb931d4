// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stand-in instance for plugins that could not be instantiated.

use std::any::Any;

use plugrack_core::{Descriptor, DescriptorRef, Key, Plugin, PluginCategory};

/// Descriptor of the placeholder plugin.
pub static PLACEHOLDER_DESCRIPTOR: Descriptor = Descriptor {
    name: "dummy",
    display_name: "dummy",
    description: "no description",
    author: "",
    version: 0x0100,
    category: PluginCategory::Undefined,
    logo: None,
    supported_file_types: None,
    sub_plugin_features: None,
};

/// Inert plugin standing in for one that failed to load, so owning
/// layers never hold a missing instance.
#[derive(Debug)]
pub struct PlaceholderPlugin {
    descriptor: DescriptorRef,
    key: Key,
    requested: String,
}

impl PlaceholderPlugin {
    /// Placeholder for the plugin that was requested as `requested`.
    pub fn new(requested: impl Into<String>) -> Self {
        let descriptor = DescriptorRef::from_static(&PLACEHOLDER_DESCRIPTOR);
        Self {
            key: descriptor.whole_plugin_key(),
            descriptor,
            requested: requested.into(),
        }
    }

    /// Name of the plugin this placeholder replaces.
    pub fn requested_name(&self) -> &str {
        &self.requested
    }
}

impl Plugin for PlaceholderPlugin {
    fn descriptor(&self) -> &DescriptorRef {
        &self.descriptor
    }

    fn key(&self) -> &Key {
        &self.key
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_undefined_and_remembers_request() {
        let placeholder = PlaceholderPlugin::new("kicker");
        assert_eq!(placeholder.category(), PluginCategory::Undefined);
        assert_eq!(placeholder.display_name(), "dummy");
        assert_eq!(placeholder.requested_name(), "kicker");
        assert!(placeholder.logo().is_none());
        assert_eq!(PLACEHOLDER_DESCRIPTOR.version_string(), "1.0");
    }
}
