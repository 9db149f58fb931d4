// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the plugrack plugin host.
//!
//! TOML files are merged with Figment (system, user, local, then
//! `PLUGRACK_*` environment variables), rejected on unknown keys, validated,
//! and reported through miette diagnostics.
//!
//! ```no_run
//! use plugrack_config::{load_and_validate, render_errors};
//!
//! match load_and_validate() {
//!     Ok(config) => println!("portable dir: {}", config.plugins.portable_dir),
//!     Err(errors) => render_errors(&errors),
//! }
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{LogConfig, PluginsConfig, PlugrackConfig};

/// Load the layered configuration and validate it.
pub fn load_and_validate() -> Result<PlugrackConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<PlugrackConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

fn finish(
    loaded: Result<PlugrackConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<PlugrackConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Contents of every configuration file that exists, for span lookup.
fn collect_toml_sources() -> Vec<(String, String)> {
    loader::config_file_locations()
        .into_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(&path).ok()?;
            let absolute = std::path::absolute(&path).unwrap_or(path);
            Some((absolute.display().to_string(), content))
        })
        .collect()
}
