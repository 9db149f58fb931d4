// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Example plugin module: a family of gain stages.
//!
//! Built as `librackdemo.so`, so it exports `rackdemo_plugin_descriptor`
//! alongside the `plugrack_plugin_main` entry point. Each stage is a
//! sub-plugin selected by the `stage` key attribute; the `boost` stage also
//! claims `.boost` files.

use std::any::Any;
use std::ffi::c_void;

use plugrack_core::abi::key_from_data;
use plugrack_core::{
    AttributeMap, Descriptor, DescriptorRef, Key, Logo, Plugin, PluginCategory,
    SubPluginFeatures, declare_plugin_entry,
};
use tracing::debug;

/// Key attribute naming the selected stage.
pub const STAGE_ATTRIBUTE: &str = "stage";

/// Stage name, display name and gain in decibels.
const STAGES: [(&str, &str, f32); 3] = [
    ("unity", "Unity Gain", 0.0),
    ("boost", "Boost +6 dB", 6.0),
    ("cut", "Cut -6 dB", -6.0),
];

#[unsafe(no_mangle)]
#[allow(non_upper_case_globals)]
pub static rackdemo_plugin_descriptor: Descriptor = Descriptor {
    name: "rackdemo",
    display_name: "Gain Stages",
    description: "Fixed gain stages for testing signal chains",
    author: "Plugrack Contributors",
    version: 0x0100,
    category: PluginCategory::Effect,
    logo: Some(Logo("rackdemo.png")),
    supported_file_types: Some("rdp"),
    sub_plugin_features: Some(&STAGE_FAMILY),
};

struct StageFamily;

static STAGE_FAMILY: StageFamily = StageFamily;

fn stage(key: &Key) -> Option<(&'static str, &'static str, f32)> {
    let wanted = key.attribute(STAGE_ATTRIBUTE)?;
    STAGES.iter().copied().find(|(name, _, _)| *name == wanted)
}

impl SubPluginFeatures for StageFamily {
    fn category(&self) -> PluginCategory {
        PluginCategory::Effect
    }

    fn list_sub_plugin_keys(&self, descriptor: &DescriptorRef) -> Vec<Key> {
        STAGES
            .iter()
            .map(|(name, _, _)| {
                let mut attributes = AttributeMap::new();
                attributes.insert(STAGE_ATTRIBUTE.to_string(), name.to_string());
                Key::new(descriptor.clone(), *name, attributes)
            })
            .collect()
    }

    fn display_name(&self, key: &Key) -> Option<String> {
        stage(key).map(|(_, display, _)| display.to_string())
    }

    fn description(&self, key: &Key) -> Option<String> {
        stage(key).map(|(_, _, gain)| format!("Applies {gain:+.1} dB"))
    }

    fn additional_file_extensions(&self, key: &Key) -> Option<String> {
        (stage(key)?.0 == "boost").then(|| "boost".to_string())
    }
}

/// One instantiated gain stage.
#[derive(Debug)]
pub struct GainStage {
    descriptor: DescriptorRef,
    key: Key,
    gain_db: f32,
}

impl GainStage {
    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    /// Linear factor applied to each sample.
    pub fn factor(&self) -> f32 {
        10f32.powf(self.gain_db / 20.0)
    }

    pub fn process(&self, samples: &mut [f32]) {
        let factor = self.factor();
        for sample in samples {
            *sample *= factor;
        }
    }
}

impl Plugin for GainStage {
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

/// Build the stage named by the key in `data`. Without a key the unity
/// stage is built; an unknown stage is refused.
fn create(_owner: *mut c_void, data: *mut c_void) -> Option<Box<dyn Plugin>> {
    // SAFETY: the host passes either null or a key that outlives this call.
    let key = unsafe { key_from_data(data) };

    // Hold the host's reference when given one; it keeps this module mapped.
    let descriptor = key
        .and_then(Key::descriptor)
        .cloned()
        .unwrap_or_else(|| DescriptorRef::from_static(&rackdemo_plugin_descriptor));

    let key = match key {
        Some(key) => key.with_descriptor(descriptor.clone()),
        None => descriptor.sub_plugin_keys().into_iter().next()?,
    };
    let (name, _, gain_db) = stage(&key)?;
    debug!(stage = name, gain_db, "constructing gain stage");

    Some(Box::new(GainStage {
        descriptor,
        key,
        gain_db,
    }))
}

declare_plugin_entry!(create);
