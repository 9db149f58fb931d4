// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin search path resolution.
//!
//! Candidates in order: installed layout, portable layout, build-time
//! directory, environment directory, working directory `plugins`, then
//! configured extras. Only directories that exist are kept, and all of
//! them are searched.

use std::path::{Path, PathBuf};

use plugrack_config::PluginsConfig;
use tracing::debug;

/// Plugin directory baked in at compile time, relative to the executable
/// unless absolute.
pub const BUILD_PLUGIN_DIR: Option<&str> = option_env!("PLUGRACK_BUILD_PLUGIN_DIR");

/// Raw inputs of search path resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPathInputs {
    /// Directory holding the running executable.
    pub executable_dir: Option<PathBuf>,
    /// Installed layout directory, relative to `executable_dir`.
    pub installed_dir: Option<PathBuf>,
    /// Portable layout directory, relative to `executable_dir`.
    pub portable_dir: Option<PathBuf>,
    /// Build-time directory, relative to `executable_dir`.
    pub build_dir: Option<PathBuf>,
    /// Directory named by the plugin environment variable.
    pub env_dir: Option<PathBuf>,
    /// User working directory; its `plugins` subfolder is a candidate.
    pub working_dir: Option<PathBuf>,
    pub extra_dirs: Vec<PathBuf>,
}

impl SearchPathInputs {
    /// Gather inputs from configuration, the process environment and the
    /// location of the current executable.
    pub fn from_config(config: &PluginsConfig) -> Self {
        let executable_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        let installed_dir = if cfg!(windows) {
            None
        } else {
            non_empty(&config.installed_dir)
        };

        Self {
            executable_dir,
            installed_dir,
            portable_dir: non_empty(&config.portable_dir),
            build_dir: BUILD_PLUGIN_DIR.and_then(non_empty),
            env_dir: std::env::var_os(&config.env_var)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from),
            working_dir: config.effective_working_dir(),
            extra_dirs: config.extra_dirs.clone(),
        }
    }

    /// Candidate directories in search order, before existence checks.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let relative_to_exe = |dir: &Option<PathBuf>| -> Option<PathBuf> {
            let dir = dir.as_ref()?;
            if dir.is_absolute() {
                return Some(dir.clone());
            }
            self.executable_dir.as_ref().map(|exe| exe.join(dir))
        };

        [
            relative_to_exe(&self.installed_dir),
            relative_to_exe(&self.portable_dir),
            relative_to_exe(&self.build_dir),
            self.env_dir.clone(),
            self.working_dir.as_ref().map(|dir| dir.join("plugins")),
        ]
        .into_iter()
        .flatten()
        .chain(self.extra_dirs.iter().cloned())
        .collect()
    }

    /// Existing candidate directories, made absolute, first occurrence kept.
    pub fn resolve(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = Vec::new();
        for candidate in self.candidates() {
            if !candidate.is_dir() {
                debug!(path = %candidate.display(), "skipping missing plugin directory");
                continue;
            }
            let absolute = std::fs::canonicalize(&candidate).unwrap_or(candidate);
            if !paths.contains(&absolute) {
                debug!(path = %absolute.display(), "adding plugin search path");
                paths.push(absolute);
            }
        }
        paths
    }
}

fn non_empty(value: &str) -> Option<PathBuf> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn layout() -> (tempfile::TempDir, SearchPathInputs) {
        let root = tempfile::tempdir().unwrap();
        let bin = root.path().join("bin");
        for dir in ["bin", "lib/plugrack", "bin/plugins", "env", "work/plugins", "extra"] {
            std::fs::create_dir_all(root.path().join(dir)).unwrap();
        }
        let inputs = SearchPathInputs {
            executable_dir: Some(bin),
            installed_dir: Some("../lib/plugrack".into()),
            portable_dir: Some("plugins".into()),
            build_dir: None,
            env_dir: Some(root.path().join("env")),
            working_dir: Some(root.path().join("work")),
            extra_dirs: vec![root.path().join("extra")],
        };
        (root, inputs)
    }

    #[test]
    fn all_existing_layouts_are_kept_in_order() {
        let (root, inputs) = layout();
        let resolved = inputs.resolve();
        let canonical = |p: &str| std::fs::canonicalize(root.path().join(p)).unwrap();
        assert_eq!(
            resolved,
            vec![
                canonical("lib/plugrack"),
                canonical("bin/plugins"),
                canonical("env"),
                canonical("work/plugins"),
                canonical("extra"),
            ]
        );
    }

    #[test]
    fn missing_directories_are_dropped() {
        let (root, mut inputs) = layout();
        inputs.build_dir = Some("nowhere".into());
        inputs.env_dir = Some(root.path().join("absent"));
        let resolved = inputs.resolve();
        assert_eq!(resolved.len(), 4);
        assert!(resolved.iter().all(|p| p.is_dir()));
    }

    #[test]
    fn duplicates_collapse_to_first_occurrence() {
        let (root, mut inputs) = layout();
        inputs.extra_dirs = vec![root.path().join("bin/../bin/plugins")];
        let resolved = inputs.resolve();
        assert_eq!(resolved.len(), 4);
        assert_eq!(resolved[1], std::fs::canonicalize(root.path().join("bin/plugins")).unwrap());
    }

    #[test]
    fn relative_dirs_need_an_executable_dir() {
        let inputs = SearchPathInputs {
            portable_dir: Some("plugins".into()),
            build_dir: Some("/abs/build".into()),
            ..Default::default()
        };
        assert_eq!(inputs.candidates(), vec![PathBuf::from("/abs/build")]);
    }

    #[test]
    #[serial]
    fn from_config_reads_the_configured_variable() {
        let config = PluginsConfig {
            env_var: "PLUGRACK_TEST_SEARCH_DIR".into(),
            working_dir: Some("/srv/rack".into()),
            ..Default::default()
        };
        // SAFETY: serialized with every other test touching the environment.
        unsafe { std::env::remove_var("PLUGRACK_TEST_SEARCH_DIR") };
        assert!(SearchPathInputs::from_config(&config).env_dir.is_none());

        unsafe { std::env::set_var("PLUGRACK_TEST_SEARCH_DIR", "/opt/rack-plugins") };
        let inputs = SearchPathInputs::from_config(&config);
        unsafe { std::env::remove_var("PLUGRACK_TEST_SEARCH_DIR") };

        assert_eq!(inputs.env_dir, Some(PathBuf::from("/opt/rack-plugins")));
        assert_eq!(inputs.portable_dir, Some(PathBuf::from("plugins")));
        assert_eq!(inputs.working_dir, Some(PathBuf::from("/srv/rack")));
    }
}
