// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the plugrack host.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently ignored.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level plugrack configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PlugrackConfig {
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Plugin search path settings.
    #[serde(default)]
    pub plugins: PluginsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Where plugin modules are looked up.
///
/// Relative directories are resolved against the directory holding the
/// running executable. Every directory that exists is searched; none of
/// them excludes another.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginsConfig {
    /// Directory of an installed Unix layout, e.g. `/usr/bin/plugrack`
    /// with modules in `/usr/lib/plugrack`. Ignored on Windows.
    #[serde(default = "default_installed_dir")]
    pub installed_dir: String,

    /// Directory of a portable layout, next to the executable.
    #[serde(default = "default_portable_dir")]
    pub portable_dir: String,

    /// User working directory; its `plugins` subfolder is searched.
    /// Defaults to the platform data directory.
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Additional directories, searched after the standard ones in order.
    #[serde(default)]
    pub extra_dirs: Vec<PathBuf>,

    /// Environment variable naming one more plugin directory.
    #[serde(default = "default_env_var")]
    pub env_var: String,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            installed_dir: default_installed_dir(),
            portable_dir: default_portable_dir(),
            working_dir: None,
            extra_dirs: Vec::new(),
            env_var: default_env_var(),
        }
    }
}

impl PluginsConfig {
    /// The configured working directory, or `<data dir>/plugrack`.
    pub fn effective_working_dir(&self) -> Option<PathBuf> {
        self.working_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("plugrack")))
    }
}

fn default_installed_dir() -> String {
    "../lib/plugrack".to_string()
}

fn default_portable_dir() -> String {
    "plugins".to_string()
}

fn default_env_var() -> String {
    "PLUGRACK_PLUGIN_DIR".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_both_layouts() {
        let config = PlugrackConfig::default();
        assert_eq!(config.log.level, "info");
        assert_eq!(config.plugins.installed_dir, "../lib/plugrack");
        assert_eq!(config.plugins.portable_dir, "plugins");
        assert_eq!(config.plugins.env_var, "PLUGRACK_PLUGIN_DIR");
        assert!(config.plugins.extra_dirs.is_empty());
    }

    #[test]
    fn explicit_working_dir_wins() {
        let plugins = PluginsConfig {
            working_dir: Some(PathBuf::from("/srv/rack")),
            ..Default::default()
        };
        assert_eq!(
            plugins.effective_working_dir(),
            Some(PathBuf::from("/srv/rack"))
        );
    }

    #[test]
    fn plugins_section_denies_unknown_fields() {
        let toml_str = r#"
[plugins]
portable_dir = "plugins"
instaled_dir = "../lib"
"#;
        assert!(toml::from_str::<PlugrackConfig>(toml_str).is_err());
    }

    #[test]
    fn extra_dirs_deserialize_in_order() {
        let toml_str = r#"
[plugins]
extra_dirs = ["/opt/b", "/opt/a"]
"#;
        let config: PlugrackConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.plugins.extra_dirs,
            vec![PathBuf::from("/opt/b"), PathBuf::from("/opt/a")]
        );
    }
}
