// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the plugrack plugin host.
//!
//! This crate holds everything a plugin module and the host must agree on:
//! descriptors, keys, sub-plugin families, the base capability trait, the
//! exported-symbol contract and the shared error type. Plugin modules link
//! against this crate only.

pub mod abi;
pub mod descriptor;
pub mod error;
pub mod features;
pub mod key;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use abi::{DESCRIPTOR_SYMBOL_SUFFIX, ENTRY_POINT_SYMBOL, InstantiationHook};
pub use descriptor::{Descriptor, DescriptorRef, ModuleKeepAlive};
pub use error::PlugrackError;
pub use features::{KeyMetadata, PluginIdentity, SubPluginFeatures, resolve_metadata};
pub use key::{AttributeElement, AttributeMap, Key, KeyElement};
pub use traits::Plugin;
pub use types::{Logo, PluginCategory};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugrack_error_has_all_variants() {
        let _config = PlugrackError::Config("test".into());
        let _open = PlugrackError::ModuleOpen {
            path: "/tmp/libx.so".into(),
            message: "missing".into(),
        };
        let _malformed = PlugrackError::MalformedModule {
            path: "/tmp/libx.so".into(),
            symbol: "x_plugin_descriptor".into(),
        };
        let _not_found = PlugrackError::PluginNotFound {
            name: "x".into(),
            reason: "Plugin not found.".into(),
        };
        let _entry = PlugrackError::MissingEntryPoint { name: "x".into() };
        let _refused = PlugrackError::ConstructionRefused { name: "x".into() };
        let _mismatch = PlugrackError::CategoryMismatch {
            name: "x".into(),
            expected: PluginCategory::Effect,
            actual: PluginCategory::Instrument,
        };
        let _key = PlugrackError::InvalidKey("test".into());
        let _serde = PlugrackError::Serialization("test".into());
        let _internal = PlugrackError::Internal("test".into());
    }

    #[test]
    fn category_mismatch_message_names_both_categories() {
        let err = PlugrackError::CategoryMismatch {
            name: "kicker".into(),
            expected: PluginCategory::Effect,
            actual: PluginCategory::Instrument,
        };
        let msg = err.to_string();
        assert!(msg.contains("Instrument"));
        assert!(msg.contains("Effect"));
        assert!(msg.contains("kicker"));
    }

    #[test]
    fn symbol_contract_constants() {
        assert_eq!(ENTRY_POINT_SYMBOL, "plugrack_plugin_main");
        assert!(DESCRIPTOR_SYMBOL_SUFFIX.starts_with('_'));
    }
}
