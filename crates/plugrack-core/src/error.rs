// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for plugin discovery, key persistence and instantiation.

use thiserror::Error;

use crate::types::PluginCategory;

/// The primary error type used across the plugrack crates.
///
/// Nothing in discovery or instantiation is fatal to the host: every variant
/// describes a recoverable "requested plugin unavailable" situation or a
/// persistence problem the caller can report.
#[derive(Debug, Error)]
pub enum PlugrackError {
    /// Configuration errors (invalid TOML, unusable search path settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// The platform loader refused to open a module file.
    #[error("failed to open module {path}: {message}")]
    ModuleOpen { path: String, message: String },

    /// The module exports the entry point but not the expected descriptor symbol.
    #[error("module {path} does not export a plugin descriptor named `{symbol}`")]
    MalformedModule { path: String, symbol: String },

    /// No discovered module carries a descriptor with this name.
    #[error("plugin `{name}` was not found or could not be loaded: {reason}")]
    PluginNotFound { name: String, reason: String },

    /// The module no longer resolves its instantiation hook.
    #[error("plugin `{name}` does not export an instantiation hook")]
    MissingEntryPoint { name: String },

    /// The instantiation hook ran but returned no instance.
    #[error("plugin `{name}` refused to construct an instance")]
    ConstructionRefused { name: String },

    /// The instance is not of the capability the call site asked for.
    #[error("plugin `{name}` is a {actual} plugin, expected {expected}")]
    CategoryMismatch {
        name: String,
        expected: PluginCategory,
        actual: PluginCategory,
    },

    /// A key could not be used (for example, no descriptor attached).
    #[error("invalid plugin key: {0}")]
    InvalidKey(String),

    /// Key document (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for PlugrackError {
    fn from(err: serde_json::Error) -> Self {
        PlugrackError::Serialization(err.to_string())
    }
}
