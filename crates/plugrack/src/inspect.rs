// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only commands over the plugin registry: `paths`, `list`, `which`,
//! `keys` and `errors`.
//!
//! Each command builds a serializable report from the registry first and
//! renders it second, so `--json` and text output always agree.

use std::io::IsTerminal;

use plugrack_core::{KeyElement, PluginCategory, PlugrackError};
use plugrack_plugin::{PluginFactory, Registry};
use serde::Serialize;

/// One discovered plugin, as listed by `plugrack list`.
#[derive(Debug, Serialize)]
pub struct PluginSummary {
    pub name: String,
    pub display_name: String,
    pub category: PluginCategory,
    pub version: String,
    pub author: String,
    pub description: String,
    pub extensions: Vec<String>,
    pub sub_plugins: usize,
    pub path: String,
}

/// Answer of `plugrack which`.
#[derive(Debug, Serialize)]
pub struct ExtensionMatch {
    pub extension: String,
    pub plugin: Option<String>,
    /// Sub-plugin key when a family member claims the extension.
    pub key: Option<KeyElement>,
}

/// One sub-plugin, as listed by `plugrack keys`.
#[derive(Debug, Serialize)]
pub struct SubPluginEntry {
    pub display_name: String,
    /// Capability the family declares for its members.
    pub category: PluginCategory,
    pub description: String,
    pub key: KeyElement,
}

/// A module that failed to open.
#[derive(Debug, Serialize)]
pub struct LoadFailure {
    pub module: String,
    pub message: String,
}

pub fn plugin_summaries(registry: &Registry, category: Option<PluginCategory>) -> Vec<PluginSummary> {
    registry
        .module_infos()
        .iter()
        .filter(|info| category.is_none_or(|c| info.descriptor().category == c))
        .map(|info| {
            let descriptor = info.descriptor();
            PluginSummary {
                name: descriptor.name.to_string(),
                display_name: descriptor.display_name.to_string(),
                category: descriptor.category,
                version: descriptor.version_string(),
                author: descriptor.author.to_string(),
                description: descriptor.description.to_string(),
                extensions: descriptor
                    .supported_extensions()
                    .map(str::to_string)
                    .collect(),
                sub_plugins: descriptor.sub_plugin_keys().len(),
                path: info.path().display().to_string(),
            }
        })
        .collect()
}

pub fn extension_match(registry: &Registry, extension: &str) -> ExtensionMatch {
    let found = registry.plugin_supporting_extension(extension);
    ExtensionMatch {
        extension: extension.to_string(),
        plugin: (!found.is_null).then(|| found.name.clone()),
        key: found.key.is_valid().then(|| found.key.to_element()),
    }
}

pub fn sub_plugin_entries(registry: &Registry, name: &str) -> Result<Vec<SubPluginEntry>, PlugrackError> {
    let info = registry
        .plugin_info(name)
        .ok_or_else(|| PlugrackError::PluginNotFound {
            name: name.to_string(),
            reason: registry.error_string(name).to_string(),
        })?;
    let descriptor = info.descriptor();
    let category = descriptor
        .sub_plugin_features
        .map_or(descriptor.category, |features| features.category());
    Ok(descriptor
        .sub_plugin_keys()
        .into_iter()
        .map(|key| SubPluginEntry {
            display_name: key.display_name().unwrap_or_default(),
            category,
            description: key.description().unwrap_or_default(),
            key: key.to_element(),
        })
        .collect())
}

pub fn load_failures(registry: &Registry) -> Vec<LoadFailure> {
    registry
        .load_errors()
        .iter()
        .map(|(module, message)| LoadFailure {
            module: module.clone(),
            message: message.clone(),
        })
        .collect()
}

pub fn print_paths(factory: &PluginFactory) {
    for path in factory.search_paths() {
        println!("{}", path.display());
    }
}

pub fn run_list(
    factory: &PluginFactory,
    category: Option<PluginCategory>,
    json: bool,
    plain: bool,
) -> Result<(), PlugrackError> {
    let summaries = plugin_summaries(&factory.registry(), category);
    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    let use_color = !plain && std::io::stdout().is_terminal();
    if summaries.is_empty() {
        println!("no plugins found (see `plugrack paths`)");
        return Ok(());
    }
    for summary in &summaries {
        println!("{}", format_summary(summary, use_color));
    }
    Ok(())
}

pub fn run_which(factory: &PluginFactory, extension: &str, json: bool) -> Result<(), PlugrackError> {
    let found = extension_match(&factory.registry(), extension);
    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }
    match (&found.plugin, &found.key) {
        (Some(plugin), Some(key)) => println!("{extension}: {plugin} ({})", key.key),
        (Some(plugin), None) => println!("{extension}: {plugin}"),
        (None, _) => println!("{extension}: no plugin"),
    }
    Ok(())
}

pub fn run_keys(factory: &PluginFactory, name: &str, json: bool) -> Result<(), PlugrackError> {
    let entries = sub_plugin_entries(&factory.registry(), name)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("{name} has no sub-plugins");
    }
    for entry in &entries {
        let label = format!("{} [{}]", entry.display_name, entry.category);
        if entry.description.is_empty() {
            println!("{label}");
        } else {
            println!("{label:<36} {}", entry.description);
        }
    }
    Ok(())
}

pub fn run_errors(factory: &PluginFactory, json: bool, plain: bool) -> Result<(), PlugrackError> {
    let failures = load_failures(&factory.registry());
    if json {
        println!("{}", serde_json::to_string_pretty(&failures)?);
        return Ok(());
    }

    let use_color = !plain && std::io::stdout().is_terminal();
    for failure in &failures {
        if use_color {
            use colored::Colorize;
            println!("{} {}: {}", "✗".red(), failure.module.bold(), failure.message);
        } else {
            println!("[FAIL] {}: {}", failure.module, failure.message);
        }
    }
    Ok(())
}

fn format_summary(summary: &PluginSummary, use_color: bool) -> String {
    let mut line = if use_color {
        use colored::Colorize;
        format!(
            "{} {} [{}] v{}",
            summary.name.bold(),
            summary.display_name.dimmed(),
            summary.category.to_string().cyan(),
            summary.version
        )
    } else {
        format!(
            "{} {} [{}] v{}",
            summary.name, summary.display_name, summary.category, summary.version
        )
    };
    if !summary.extensions.is_empty() {
        line.push_str(&format!(" .{}", summary.extensions.join(" .")));
    }
    if summary.sub_plugins > 0 {
        line.push_str(&format!(" ({} sub-plugins)", summary.sub_plugins));
    }
    line
}
