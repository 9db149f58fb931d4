// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixture descriptors, a sub-plugin family and instantiation hooks.
//!
//! File names and descriptor symbols follow the real naming rule, so the
//! factory finds `kicker_plugin_descriptor` in `libkicker.so`.

use std::any::Any;
use std::ffi::c_void;

use plugrack_core::abi::key_from_data;
use plugrack_core::{
    AttributeMap, Descriptor, DescriptorRef, Key, Logo, Plugin, PluginCategory,
    SubPluginFeatures,
};

use crate::mock_loader::{MockModuleLoader, MockModuleSpec};

/// Whole plugin handling `kick` and `kck` files.
pub static KICKER: Descriptor = Descriptor {
    name: "kicker",
    display_name: "Kicker",
    description: "Versatile drum synthesizer",
    author: "Plugrack Contributors",
    version: 0x0100,
    category: PluginCategory::Instrument,
    logo: Some(Logo("kicker.png")),
    supported_file_types: Some("kick,kck"),
    sub_plugin_features: None,
};

/// Family of reverbs. The whole plugin claims `abc`; the `Plate` member
/// claims `abc` too and `Spring` adds `spr`.
pub static VERBS: Descriptor = Descriptor {
    name: "verbs",
    display_name: "Reverb Pack",
    description: "A family of reverbs",
    author: "Plugrack Contributors",
    version: 0x0201,
    category: PluginCategory::Effect,
    logo: Some(Logo("verbs.png")),
    supported_file_types: Some("abc"),
    sub_plugin_features: Some(&VERB_FAMILY),
};

/// Family whose members have blank display names.
pub static BLANKS: Descriptor = Descriptor {
    name: "blanks",
    display_name: "Blank Pack",
    description: "Members without names",
    author: "",
    version: 0x0100,
    category: PluginCategory::Effect,
    logo: None,
    supported_file_types: None,
    sub_plugin_features: Some(&BLANK_FAMILY),
};

/// Two import filters claiming the same extension.
pub static TRACKER_A: Descriptor = Descriptor {
    name: "trackera",
    display_name: "Tracker A",
    description: "",
    author: "",
    version: 0x0100,
    category: PluginCategory::ImportFilter,
    logo: None,
    supported_file_types: Some("xyz"),
    sub_plugin_features: None,
};

pub static TRACKER_B: Descriptor = Descriptor {
    name: "trackerb",
    display_name: "Tracker B",
    description: "",
    author: "",
    version: 0x0100,
    category: PluginCategory::ImportFilter,
    logo: None,
    supported_file_types: Some("xyz"),
    sub_plugin_features: None,
};

/// Wrapper whose descriptor resolves only with its support module resident.
pub static WRAPPER: Descriptor = Descriptor {
    name: "wrapper",
    display_name: "Wrapper",
    description: "Needs its core library",
    author: "",
    version: 0x0100,
    category: PluginCategory::Instrument,
    logo: None,
    supported_file_types: None,
    sub_plugin_features: None,
};

/// Members of [`VERBS`].
pub const VERB_MEMBERS: [&str; 3] = ["Plate", "Hall", "Spring"];

/// Attribute naming the selected family member.
pub const MEMBER_ATTRIBUTE: &str = "plugin";

pub struct VerbFamily;

pub static VERB_FAMILY: VerbFamily = VerbFamily;

impl SubPluginFeatures for VerbFamily {
    fn category(&self) -> PluginCategory {
        PluginCategory::Effect
    }

    fn list_sub_plugin_keys(&self, descriptor: &DescriptorRef) -> Vec<Key> {
        VERB_MEMBERS
            .iter()
            .map(|member| member_key(descriptor, member))
            .collect()
    }

    fn description(&self, key: &Key) -> Option<String> {
        key.attribute(MEMBER_ATTRIBUTE)
            .map(|member| format!("{member} reverb"))
    }

    fn additional_file_extensions(&self, key: &Key) -> Option<String> {
        match key.attribute(MEMBER_ATTRIBUTE)? {
            "Plate" => Some("abc".to_string()),
            "Spring" => Some("spr".to_string()),
            _ => None,
        }
    }
}

pub struct BlankFamily;

pub static BLANK_FAMILY: BlankFamily = BlankFamily;

impl SubPluginFeatures for BlankFamily {
    fn category(&self) -> PluginCategory {
        PluginCategory::Effect
    }

    fn list_sub_plugin_keys(&self, descriptor: &DescriptorRef) -> Vec<Key> {
        vec![member_key(descriptor, "Nameless")]
    }

    fn display_name(&self, _key: &Key) -> Option<String> {
        Some(String::new())
    }
}

/// Key selecting `member` of a family.
pub fn member_key(descriptor: &DescriptorRef, member: &str) -> Key {
    let mut attributes = AttributeMap::new();
    attributes.insert(MEMBER_ATTRIBUTE.to_string(), member.to_string());
    Key::new(descriptor.clone(), member, attributes)
}

/// Instance produced by the fixture hooks.
#[derive(Debug)]
pub struct FixturePlugin {
    descriptor: DescriptorRef,
    key: Key,
    /// Address of the owner pointer the hook received.
    pub owner: usize,
}

impl Plugin for FixturePlugin {
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

fn build(descriptor: &'static Descriptor, owner: *mut c_void, key: Option<&Key>) -> Box<dyn Plugin> {
    let descriptor = DescriptorRef::from_static(descriptor);
    let key = key
        .cloned()
        .unwrap_or_else(|| descriptor.whole_plugin_key());
    Box::new(FixturePlugin {
        descriptor,
        key,
        owner: owner as usize,
    })
}

/// Hook of [`KICKER`]. `data` is ignored.
///
/// # Safety
///
/// Any pointers are accepted.
pub unsafe fn kicker_main(owner: *mut c_void, _data: *mut c_void) -> Option<Box<dyn Plugin>> {
    Some(build(&KICKER, owner, None))
}

/// Hook of [`VERBS`]. Constructs only when `data` is a key naming a member.
///
/// # Safety
///
/// `data` must be null or point to a live `Key`.
pub unsafe fn verbs_main(owner: *mut c_void, data: *mut c_void) -> Option<Box<dyn Plugin>> {
    let key = unsafe { key_from_data(data) }?;
    let member = key.attribute(MEMBER_ATTRIBUTE)?;
    if !VERB_MEMBERS.contains(&member) {
        return None;
    }
    Some(build(&VERBS, owner, Some(key)))
}

/// Hook of [`BLANKS`].
///
/// # Safety
///
/// `data` must be null or point to a live `Key`.
pub unsafe fn blanks_main(owner: *mut c_void, data: *mut c_void) -> Option<Box<dyn Plugin>> {
    let key = unsafe { key_from_data(data) };
    Some(build(&BLANKS, owner, key))
}

/// Hook shared by the tracker and wrapper fixtures.
///
/// # Safety
///
/// Any pointers are accepted.
pub unsafe fn tracker_main(owner: *mut c_void, _data: *mut c_void) -> Option<Box<dyn Plugin>> {
    Some(build(&TRACKER_A, owner, None))
}

/// Hook that always refuses to construct.
///
/// # Safety
///
/// Any pointers are accepted.
pub unsafe fn refusing_main(_owner: *mut c_void, _data: *mut c_void) -> Option<Box<dyn Plugin>> {
    None
}

/// Loader serving `libkicker.so`, `libverbs.so` and `libblanks.so`.
pub fn standard_loader() -> MockModuleLoader {
    MockModuleLoader::new()
        .with_module(
            "libkicker.so",
            MockModuleSpec::plugin("kicker_plugin_descriptor", &KICKER, kicker_main),
        )
        .with_module(
            "libverbs.so",
            MockModuleSpec::plugin("verbs_plugin_descriptor", &VERBS, verbs_main),
        )
        .with_module(
            "libblanks.so",
            MockModuleSpec::plugin("blanks_plugin_descriptor", &BLANKS, blanks_main),
        )
}

/// Module files served by [`standard_loader`].
pub const STANDARD_FILES: [&str; 3] = ["libkicker.so", "libverbs.so", "libblanks.so"];
