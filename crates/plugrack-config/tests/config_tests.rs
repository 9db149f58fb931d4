// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the plugrack configuration system.

use std::path::PathBuf;

use plugrack_config::diagnostic::ConfigError;
use plugrack_config::{load_and_validate_str, load_config_from_path, load_config_from_str};
use serial_test::serial;

#[test]
fn full_config_deserializes() {
    let toml = r#"
[log]
level = "debug"

[plugins]
installed_dir = "../lib/rack"
portable_dir = "mods"
working_dir = "/home/user/rack"
extra_dirs = ["/opt/rack/plugins"]
env_var = "RACK_PLUGINS"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.log.level, "debug");
    assert_eq!(config.plugins.installed_dir, "../lib/rack");
    assert_eq!(config.plugins.portable_dir, "mods");
    assert_eq!(
        config.plugins.working_dir,
        Some(PathBuf::from("/home/user/rack"))
    );
    assert_eq!(
        config.plugins.extra_dirs,
        vec![PathBuf::from("/opt/rack/plugins")]
    );
    assert_eq!(config.plugins.env_var, "RACK_PLUGINS");
}

#[test]
fn empty_config_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.log.level, "info");
    assert_eq!(config.plugins.portable_dir, "plugins");
    assert!(config.plugins.working_dir.is_none());
}

#[test]
fn unknown_section_is_rejected() {
    let err = load_config_from_str("[plugin]\nportable_dir = \"x\"\n")
        .expect_err("should reject unknown section");
    let msg = err.to_string();
    assert!(
        msg.contains("unknown field") || msg.contains("plugin"),
        "unexpected error: {msg}"
    );
}

#[test]
fn validation_errors_surface_through_load_and_validate() {
    let errors = load_and_validate_str("[log]\nlevel = \"chatty\"\n").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(matches!(&errors[0], ConfigError::Validation { message } if message.contains("chatty")));
}

#[test]
fn wrong_type_is_reported_with_key_path() {
    let errors = load_and_validate_str("[plugins]\nextra_dirs = 3\n").unwrap_err();
    assert!(errors.iter().any(|e| match e {
        ConfigError::InvalidType { key, .. } => key.contains("extra_dirs"),
        _ => false,
    }));
}

#[test]
fn inline_source_typo_gets_suggestion() {
    let errors = load_and_validate_str("[log]\nlevle = \"info\"\n").unwrap_err();
    let rendered = errors[0].to_string();
    assert!(rendered.contains("levle"));
    assert!(matches!(
        &errors[0],
        ConfigError::UnknownKey { suggestion: Some(s), .. } if s == "level"
    ));
}

#[test]
#[serial]
fn explicit_file_is_merged_with_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rack.toml");
    std::fs::write(&path, "[plugins]\nportable_dir = \"from-file\"\nenv_var = \"X\"\n").unwrap();

    figment::Jail::expect_with(|jail| {
        jail.set_env("PLUGRACK_PLUGINS_ENV_VAR", "RACK_DIR");
        let config = load_config_from_path(&path)?;
        assert_eq!(config.plugins.portable_dir, "from-file");
        assert_eq!(config.plugins.env_var, "RACK_DIR");
        Ok(())
    });
}
