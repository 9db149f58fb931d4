// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks run after deserialization.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::loader::ENV_SECTIONS;
use crate::model::PlugrackConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Every problem is collected; this does not stop at the first one.
pub fn validate_config(config: &PlugrackConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut invalid = |message: String| errors.push(ConfigError::Validation { message });

    let level = config.log.level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        invalid(format!(
            "log.level `{}` is not one of {}",
            config.log.level,
            LOG_LEVELS.join(", ")
        ));
    }

    let plugins = &config.plugins;
    if plugins.portable_dir.trim().is_empty() {
        invalid("plugins.portable_dir must not be empty".to_string());
    }
    if plugins.env_var.trim().is_empty() {
        invalid("plugins.env_var must not be empty".to_string());
    }
    let env_var = plugins.env_var.to_ascii_uppercase();
    if let Some(section) = ENV_SECTIONS
        .iter()
        .find(|section| env_var.starts_with(&format!("PLUGRACK_{}_", section.to_ascii_uppercase())))
    {
        invalid(format!(
            "plugins.env_var `{}` collides with the `{section}` configuration overrides",
            plugins.env_var
        ));
    }

    let mut seen = HashSet::new();
    for (i, dir) in plugins.extra_dirs.iter().enumerate() {
        if dir.as_os_str().is_empty() {
            invalid(format!("plugins.extra_dirs[{i}] must not be empty"));
        } else if !seen.insert(dir) {
            invalid(format!(
                "plugins.extra_dirs lists `{}` more than once",
                dir.display()
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
