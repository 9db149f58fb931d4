// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `plugrack load`: instantiate one plugin and report what came back.

use std::io::IsTerminal;
use std::ptr;
use std::sync::Arc;

use plugrack_core::{Key, PluginCategory, PlugrackError};
use plugrack_plugin::{Instantiator, KeySource, LoadedPlugin, PluginFactory};

/// Instantiate `name`, optionally keyed by a persisted key document.
pub fn load_once(
    instantiator: &Instantiator,
    name: &str,
    key_json: Option<&str>,
    expect: Option<PluginCategory>,
) -> Result<LoadedPlugin, PlugrackError> {
    let key = key_json.map(Key::from_json).transpose()?;
    let source = match &key {
        Some(key) => KeySource::Explicit(key),
        None => KeySource::None,
    };

    match expect {
        Some(category) => instantiator.instantiate_expecting(category, name, ptr::null_mut(), source),
        None => instantiator.instantiate_with_key(name, ptr::null_mut(), source),
    }
}

pub fn run_load(
    factory: Arc<PluginFactory>,
    name: &str,
    key_json: Option<&str>,
    expect: Option<PluginCategory>,
    plain: bool,
) -> Result<(), PlugrackError> {
    let instantiator = Instantiator::with_tracing(factory);
    let loaded = load_once(&instantiator, name, key_json, expect)?;

    let use_color = !plain && std::io::stdout().is_terminal();
    let label = format!("{} [{}]", loaded.display_name(), loaded.category());
    if use_color {
        use colored::Colorize;
        println!("{} {}", "✓".green(), label);
    } else {
        println!("[OK] {label}");
    }
    if let Some(logo) = loaded.logo() {
        println!("    logo: {}", logo.resource());
    }
    Ok(())
}
