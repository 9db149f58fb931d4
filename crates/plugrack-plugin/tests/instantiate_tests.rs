// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Instantiation by name and by key, failure reporting and placeholders.

use std::ffi::c_void;
use std::ptr;
use std::sync::Arc;

use plugrack_core::{Descriptor, Key, Logo, PluginCategory, PlugrackError};
use plugrack_plugin::{Instantiator, KeySource, PLUGIN_NOT_FOUND, PlaceholderPlugin};
use plugrack_test_utils::fixtures::{
    FixturePlugin, KICKER, MEMBER_ATTRIBUTE, STANDARD_FILES, member_key, refusing_main,
    standard_loader,
};
use plugrack_test_utils::{MockModuleLoader, MockModuleSpec, RecordingNotifier, TempPluginDir};

struct Rig {
    _dir: TempPluginDir,
    notifier: Arc<RecordingNotifier>,
    instantiator: Instantiator,
}

fn rig_with(loader: MockModuleLoader, files: &[&str]) -> Rig {
    let dir = TempPluginDir::with_files(files);
    let factory = Arc::new(dir.factory(Arc::new(loader)));
    let notifier = Arc::new(RecordingNotifier::new());
    let instantiator = Instantiator::new(factory, notifier.clone());
    Rig {
        _dir: dir,
        notifier,
        instantiator,
    }
}

fn rig() -> Rig {
    rig_with(standard_loader(), &STANDARD_FILES)
}

#[test]
fn missing_plugin_notifies_exactly_once() {
    let rig = rig();
    let before = rig.instantiator.factory().registry();

    let result = rig
        .instantiator
        .instantiate("ghost", ptr::null_mut(), ptr::null_mut());

    match result {
        Err(PlugrackError::PluginNotFound { name, reason }) => {
            assert_eq!(name, "ghost");
            assert_eq!(reason, PLUGIN_NOT_FOUND);
        }
        other => panic!("expected PluginNotFound, got {other:?}"),
    }
    let notes = rig.notifier.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "Plugin not found");
    assert!(notes[0].message.contains("\"ghost\""));

    let after = rig.instantiator.factory().registry();
    assert!(Arc::ptr_eq(&before, &after));
}

#[test]
fn not_found_reason_carries_recorded_load_error() {
    let loader = standard_loader().with_module(
        "libzyn.so",
        MockModuleSpec::failing("libzyn.so: wrong ELF class"),
    );
    let rig = rig_with(loader, &["libzyn.so"]);

    let err = rig
        .instantiator
        .instantiate("zyn", ptr::null_mut(), ptr::null_mut())
        .unwrap_err();
    assert!(matches!(
        err,
        PlugrackError::PluginNotFound { ref reason, .. } if reason.contains("wrong ELF class")
    ));
    assert!(rig.notifier.notifications()[0].message.contains("wrong ELF class"));
}

#[test]
fn whole_plugin_instantiation_passes_owner_through() {
    let rig = rig();
    let mut owner = 7u32;
    let owner_ptr = &mut owner as *mut u32 as *mut c_void;

    let loaded = rig
        .instantiator
        .instantiate("kicker", owner_ptr, ptr::null_mut())
        .unwrap();

    assert_eq!(loaded.category(), PluginCategory::Instrument);
    assert_eq!(loaded.display_name(), "Kicker");
    assert_eq!(loaded.logo(), Some(Logo("kicker.png")));
    let fixture = loaded.downcast_ref::<FixturePlugin>().unwrap();
    assert_eq!(fixture.owner, owner_ptr as usize);
    assert!(!loaded.is_placeholder());
    assert_eq!(rig.notifier.count(), 0);
}

#[test]
fn keyed_instantiation_reattaches_parsed_key() {
    let rig = rig();
    let parsed = Key::from_json(r#"{"key":"Hall","attribute":[{"name":"plugin","value":"Hall"}]}"#)
        .unwrap();
    assert!(!parsed.is_valid());

    let loaded = rig
        .instantiator
        .instantiate_with_key("verbs", ptr::null_mut(), KeySource::Explicit(&parsed))
        .unwrap();

    let registry = rig.instantiator.factory().registry();
    let verbs = registry.plugin_info("verbs").unwrap().descriptor();
    let key = loaded.key();
    assert!(key.descriptor().is_some_and(|d| d.ptr_eq(verbs)));
    assert_eq!(key.attribute(MEMBER_ATTRIBUTE), Some("Hall"));
    assert_eq!(loaded.display_name(), "Hall");
    assert_eq!(key.description().as_deref(), Some("Hall reverb"));
    assert_eq!(loaded.logo(), Some(Logo("verbs.png")));
}

#[test]
fn refused_construction_is_an_error_without_notification() {
    let rig = rig();
    let unknown =
        Key::unattached("Cathedral", Default::default()).with_attribute(MEMBER_ATTRIBUTE, "Cathedral");

    let err = rig
        .instantiator
        .instantiate_with_key("verbs", ptr::null_mut(), KeySource::Explicit(&unknown))
        .unwrap_err();
    assert!(matches!(err, PlugrackError::ConstructionRefused { .. }));

    let err = rig
        .instantiator
        .instantiate_with_key("verbs", ptr::null_mut(), KeySource::None)
        .unwrap_err();
    assert!(matches!(err, PlugrackError::ConstructionRefused { .. }));
    assert_eq!(rig.notifier.count(), 0);
}

#[test]
fn selected_key_slot_feeds_instantiation() {
    let rig = rig();
    let registry = rig.instantiator.factory().registry();
    let verbs = registry.plugin_info("verbs").unwrap().descriptor().clone();

    let err = rig
        .instantiator
        .instantiate_with_key("verbs", ptr::null_mut(), KeySource::Selected)
        .unwrap_err();
    assert!(matches!(err, PlugrackError::ConstructionRefused { .. }));

    rig.instantiator.select_key(member_key(&verbs, "Spring"));
    let loaded = rig
        .instantiator
        .instantiate_with_key("verbs", ptr::null_mut(), KeySource::Selected)
        .unwrap();
    assert_eq!(loaded.key().attribute(MEMBER_ATTRIBUTE), Some("Spring"));
    assert!(rig.instantiator.selected_key().is_some());

    rig.instantiator.clear_selected_key();
    assert!(rig.instantiator.selected_key().is_none());
}

#[test]
fn category_mismatch_is_rejected_quietly() {
    let rig = rig();
    let err = rig
        .instantiator
        .instantiate_expecting(PluginCategory::Effect, "kicker", ptr::null_mut(), KeySource::None)
        .unwrap_err();
    match err {
        PlugrackError::CategoryMismatch {
            expected, actual, ..
        } => {
            assert_eq!(expected, PluginCategory::Effect);
            assert_eq!(actual, PluginCategory::Instrument);
        }
        other => panic!("expected CategoryMismatch, got {other:?}"),
    }
    assert_eq!(rig.notifier.count(), 0);

    let ok = rig.instantiator.instantiate_expecting(
        PluginCategory::Instrument,
        "kicker",
        ptr::null_mut(),
        KeySource::None,
    );
    assert!(ok.is_ok());
}

#[test]
fn placeholder_substitutes_for_missing_plugin() {
    let rig = rig();
    let loaded = rig
        .instantiator
        .instantiate_or_placeholder("ghost", ptr::null_mut(), KeySource::None);

    assert!(loaded.is_placeholder());
    assert_eq!(loaded.category(), PluginCategory::Undefined);
    let placeholder = loaded.downcast_ref::<PlaceholderPlugin>().unwrap();
    assert_eq!(placeholder.requested_name(), "ghost");
    assert_eq!(rig.notifier.count(), 1);
}

#[test]
fn vanished_entry_point_reports_load_failure() {
    let loader = standard_loader().with_module(
        "libflaky.so",
        MockModuleSpec::plugin("flaky_plugin_descriptor", &FLAKY, refusing_main)
            .hook_resolves_once(),
    );
    let rig = rig_with(loader, &["libflaky.so"]);

    let err = rig
        .instantiator
        .instantiate("flaky", ptr::null_mut(), ptr::null_mut())
        .unwrap_err();
    assert!(matches!(err, PlugrackError::MissingEntryPoint { ref name } if name == "flaky"));

    let notes = rig.notifier.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "Error while loading plugin");
    assert_eq!(notes[0].message, "Failed to load plugin \"flaky\"!");
}

#[test]
fn blank_sub_plugin_names_fall_back_to_descriptor() {
    let rig = rig();
    let registry = rig.instantiator.factory().registry();
    let blanks = registry.plugin_info("blanks").unwrap().descriptor().clone();
    let key = blanks.sub_plugin_keys().remove(0);

    assert_eq!(key.display_name().as_deref(), Some("Blank Pack"));
    let loaded = rig
        .instantiator
        .instantiate_with_key("blanks", ptr::null_mut(), KeySource::Explicit(&key))
        .unwrap();
    assert_eq!(loaded.display_name(), "Blank Pack");
}

#[test]
fn instance_outlives_dropped_instantiator() {
    let rig = rig();
    let loaded = rig
        .instantiator
        .instantiate("kicker", ptr::null_mut(), ptr::null_mut())
        .unwrap();
    drop(rig);
    assert_eq!(loaded.descriptor().name, KICKER.name);
}

static FLAKY: Descriptor = Descriptor {
    name: "flaky",
    display_name: "Flaky",
    description: "",
    author: "",
    version: 0x0100,
    category: PluginCategory::Tool,
    logo: None,
    supported_file_types: None,
    sub_plugin_features: None,
};
