// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Merge order, later wins: compiled defaults, `/etc/plugrack/plugrack.toml`,
//! `$XDG_CONFIG/plugrack/plugrack.toml`, `./plugrack.toml`, then `PLUGRACK_*`
//! environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::Uncased,
};

use crate::model::PlugrackConfig;

/// File name looked up in every configuration directory.
pub const CONFIG_FILE_NAME: &str = "plugrack.toml";

/// Configuration sections reachable from the environment.
///
/// Only `PLUGRACK_<SECTION>_*` variables are configuration keys. Any other
/// `PLUGRACK_*` variable, such as the `PLUGRACK_PLUGIN_DIR` search-path
/// variable, is left to its own reader.
pub const ENV_SECTIONS: &[&str] = &["log", "plugins"];

/// Configuration files in merge order, lowest precedence first.
pub fn config_file_locations() -> Vec<PathBuf> {
    let mut files = vec![PathBuf::from("/etc/plugrack").join(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        files.push(dir.join("plugrack").join(CONFIG_FILE_NAME));
    }
    files.push(PathBuf::from(CONFIG_FILE_NAME));
    files
}

/// Build the full figment without extracting it.
pub fn build_figment() -> Figment {
    let figment = config_file_locations()
        .into_iter()
        .fold(defaults(), |figment, file| figment.merge(Toml::file(file)));
    figment.merge(env_provider())
}

/// Load configuration from the standard hierarchy with env overrides.
pub fn load_config() -> Result<PlugrackConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only. Used by tests and tooling.
pub fn load_config_from_str(toml_content: &str) -> Result<PlugrackConfig, figment::Error> {
    defaults().merge(Toml::string(toml_content)).extract()
}

/// Load one explicit file plus env overrides, skipping the hierarchy.
pub fn load_config_from_path(path: &Path) -> Result<PlugrackConfig, figment::Error> {
    defaults()
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

fn defaults() -> Figment {
    Figment::new().merge(Serialized::defaults(PlugrackConfig::default()))
}

/// Environment provider with explicit section mapping.
///
/// `Env::split("_")` would turn `PLUGRACK_PLUGINS_EXTRA_DIRS` into
/// `plugins.extra.dirs`; only the section prefix is converted here.
/// Figment hands the key over with its original case.
fn env_provider() -> Env {
    Env::prefixed("PLUGRACK_").filter_map(|key| {
        let key = key.as_str().to_ascii_lowercase();
        ENV_SECTIONS.iter().find_map(|section| {
            key.strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|field| Uncased::from(format!("{section}.{field}")))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_file_has_highest_file_precedence() {
        let files = config_file_locations();
        assert_eq!(files.first(), Some(&PathBuf::from("/etc/plugrack/plugrack.toml")));
        assert_eq!(files.last(), Some(&PathBuf::from(CONFIG_FILE_NAME)));
    }

    #[test]
    fn env_overrides_file_and_skips_search_path_variable() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE_NAME, "[log]\nlevel = \"warn\"\n")?;
            jail.set_env("PLUGRACK_LOG_LEVEL", "debug");
            jail.set_env("PLUGRACK_PLUGINS_PORTABLE_DIR", "mods");
            jail.set_env("PLUGRACK_PLUGIN_DIR", "/tmp/elsewhere");

            let config = load_config()?;
            assert_eq!(config.log.level, "debug");
            assert_eq!(config.plugins.portable_dir, "mods");
            Ok(())
        });
    }

    #[test]
    fn custom_search_path_variable_is_not_a_config_key() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE_NAME, "[plugins]\nenv_var = \"PLUGRACK_EXTRA_RACK\"\n")?;
            jail.set_env("PLUGRACK_EXTRA_RACK", "/opt/rack");
            jail.set_env("PLUGRACK_BUILD_PLUGIN_DIR", "build/plugins");

            let config = load_config()?;
            assert_eq!(config.plugins.env_var, "PLUGRACK_EXTRA_RACK");
            Ok(())
        });
    }

    #[test]
    fn misspelled_field_in_known_section_is_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PLUGRACK_LOG_LEVLE", "debug");
            assert!(load_config().is_err());
            Ok(())
        });
    }
}
