// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sub-plugin families and per-key metadata resolution.
//!
//! A module exposing many selectable variants (one binary, dozens of
//! effects) attaches a [`SubPluginFeatures`] implementation to its
//! descriptor. The trait only covers what is family-specific: enumerating
//! keys and answering per-key lookups. Falling back to the descriptor's own
//! fields is done once, in [`resolve_metadata`].

use crate::descriptor::DescriptorRef;
use crate::key::Key;
use crate::types::{Logo, PluginCategory};

/// Family-specific behaviour of a descriptor with sub-plugins.
///
/// Any lookup may return `None` (or an empty string); the descriptor's own
/// value is used instead.
pub trait SubPluginFeatures: Send + Sync {
    /// Capability category of every member of the family.
    fn category(&self) -> PluginCategory;

    /// Enumerate every addressable sub-plugin. Returned keys should
    /// reference `descriptor`.
    fn list_sub_plugin_keys(&self, descriptor: &DescriptorRef) -> Vec<Key> {
        let _ = descriptor;
        Vec::new()
    }

    fn display_name(&self, key: &Key) -> Option<String> {
        Some(key.name().to_owned())
    }

    fn description(&self, key: &Key) -> Option<String> {
        let _ = key;
        None
    }

    fn logo(&self, key: &Key) -> Option<Logo> {
        let _ = key;
        None
    }

    /// Comma-separated extensions this member handles in addition to the
    /// descriptor-level list.
    fn additional_file_extensions(&self, key: &Key) -> Option<String> {
        let _ = key;
        None
    }
}

/// What a valid key refers to.
#[derive(Clone, Copy)]
pub enum PluginIdentity<'a> {
    /// A plugin without sub-plugin features.
    WholePlugin(&'a DescriptorRef),
    /// One member of a family, selected by the key's attributes.
    SubVariant {
        descriptor: &'a DescriptorRef,
        features: &'static dyn SubPluginFeatures,
        key: &'a Key,
    },
}

/// Display metadata resolved for a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMetadata {
    pub display_name: String,
    pub description: String,
    pub logo: Option<Logo>,
    pub additional_file_extensions: Option<String>,
}

/// Resolve metadata, preferring the family's answer and falling back to the
/// descriptor whenever the family answers `None` or an empty string.
pub fn resolve_metadata(identity: PluginIdentity<'_>) -> KeyMetadata {
    match identity {
        PluginIdentity::WholePlugin(descriptor) => KeyMetadata {
            display_name: descriptor.display_name.to_owned(),
            description: descriptor.description.to_owned(),
            logo: descriptor.logo,
            additional_file_extensions: None,
        },
        PluginIdentity::SubVariant {
            descriptor,
            features,
            key,
        } => KeyMetadata {
            display_name: non_empty(features.display_name(key))
                .unwrap_or_else(|| descriptor.display_name.to_owned()),
            description: non_empty(features.description(key))
                .unwrap_or_else(|| descriptor.description.to_owned()),
            logo: features.logo(key).or(descriptor.logo),
            additional_file_extensions: non_empty(features.additional_file_extensions(key)),
        },
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
