// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin keys: the unit of lookup and persistence.
//!
//! A [`Key`] names either a whole plugin or one member of a sub-plugin
//! family. Identity is the referenced descriptor plus the attribute map; the
//! free-text `name` is only a display fallback.
//!
//! Keys persist as a [`KeyElement`]: a `key` string plus an ordered list of
//! `attribute` children carrying `name`/`value` pairs. The descriptor is never
//! persisted, so a parsed key is unattached until the caller re-attaches the
//! owning descriptor with [`Key::attach`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::descriptor::DescriptorRef;
use crate::error::PlugrackError;
use crate::features::{KeyMetadata, PluginIdentity, resolve_metadata};
use crate::types::Logo;

/// Attribute name to value, iterated in insertion order.
pub type AttributeMap = IndexMap<String, String>;

/// Identity value naming a whole plugin or one sub-plugin.
#[derive(Debug, Clone, Default)]
pub struct Key {
    descriptor: Option<DescriptorRef>,
    name: String,
    attributes: AttributeMap,
}

impl Key {
    /// Build a key for programmatic use.
    pub fn new(descriptor: DescriptorRef, name: impl Into<String>, attributes: AttributeMap) -> Self {
        Self {
            descriptor: Some(descriptor),
            name: name.into(),
            attributes,
        }
    }

    /// Build a key with no descriptor attached yet.
    pub fn unattached(name: impl Into<String>, attributes: AttributeMap) -> Self {
        Self {
            descriptor: None,
            name: name.into(),
            attributes,
        }
    }

    /// A key is valid iff a descriptor is attached.
    pub fn is_valid(&self) -> bool {
        self.descriptor.is_some()
    }

    pub fn descriptor(&self) -> Option<&DescriptorRef> {
        self.descriptor.as_ref()
    }

    /// Attach (or replace) the descriptor this key belongs to.
    pub fn attach(&mut self, descriptor: DescriptorRef) {
        self.descriptor = Some(descriptor);
    }

    /// Copy of this key pointing at `descriptor`.
    pub fn with_descriptor(&self, descriptor: DescriptorRef) -> Self {
        let mut key = self.clone();
        key.attach(descriptor);
        key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Add an attribute, keeping its position if the name already exists.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Classify this key. `None` for an unattached key.
    pub fn identity(&self) -> Option<PluginIdentity<'_>> {
        let descriptor = self.descriptor.as_ref()?;
        Some(match descriptor.sub_plugin_features {
            Some(features) => PluginIdentity::SubVariant {
                descriptor,
                features,
                key: self,
            },
            None => PluginIdentity::WholePlugin(descriptor),
        })
    }

    /// Resolved metadata, or `None` for an unattached key.
    pub fn metadata(&self) -> Option<KeyMetadata> {
        self.identity().map(resolve_metadata)
    }

    pub fn display_name(&self) -> Option<String> {
        self.metadata().map(|m| m.display_name)
    }

    pub fn description(&self) -> Option<String> {
        self.metadata().map(|m| m.description)
    }

    pub fn logo(&self) -> Option<Logo> {
        self.metadata().and_then(|m| m.logo)
    }

    /// Extensions this sub-plugin handles beyond the descriptor-level list.
    pub fn additional_file_extensions(&self) -> Option<String> {
        self.metadata().and_then(|m| m.additional_file_extensions)
    }

    /// Persisted form of this key.
    pub fn to_element(&self) -> KeyElement {
        KeyElement {
            key: self.name.clone(),
            attributes: self
                .attributes
                .iter()
                .map(|(name, value)| AttributeElement {
                    name: name.clone(),
                    value: value.clone(),
                })
                .collect(),
        }
    }

    /// Parse a persisted key. The result is unattached; a repeated
    /// attribute name keeps its first position and its last value.
    pub fn from_element(element: &KeyElement) -> Self {
        let attributes = element
            .attributes
            .iter()
            .map(|a| (a.name.clone(), a.value.clone()))
            .collect();
        Self::unattached(element.key.clone(), attributes)
    }

    pub fn to_json(&self) -> Result<String, PlugrackError> {
        Ok(serde_json::to_string(&self.to_element())?)
    }

    pub fn from_json(document: &str) -> Result<Self, PlugrackError> {
        let element: KeyElement = serde_json::from_str(document)?;
        Ok(Self::from_element(&element))
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        let same_descriptor = match (&self.descriptor, &other.descriptor) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            (None, None) => true,
            _ => false,
        };
        same_descriptor && self.attributes == other.attributes
    }
}

impl Eq for Key {}

/// Persisted form of a [`Key`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyElement {
    /// Human-readable key name.
    #[serde(default)]
    pub key: String,
    #[serde(default, rename = "attribute")]
    pub attributes: Vec<AttributeElement>,
}

/// One `attribute` child of a [`KeyElement`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeElement {
    pub name: String,
    pub value: String,
}
