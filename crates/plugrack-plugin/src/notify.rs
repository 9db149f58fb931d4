// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host notification channel for instantiation failures.

use tracing::error;

/// Fire-and-forget sink for user-facing failure messages.
///
/// Implementations must return promptly; instantiation calls this on the
/// caller's thread.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str);
}

/// Default notifier: emits each message as an `error` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, title: &str, message: &str) {
        error!(title, "{message}");
    }
}

/// Title and body reported when a plugin name is not in the registry.
pub(crate) fn plugin_not_found(name: &str, reason: &str) -> (&'static str, String) {
    (
        "Plugin not found",
        format!("The plugin \"{name}\" wasn't found or could not be loaded!\nReason: \"{reason}\""),
    )
}

/// Title and body reported when a registered plugin lost its entry point.
pub(crate) fn missing_entry_point(name: &str) -> (&'static str, String) {
    (
        "Error while loading plugin",
        format!("Failed to load plugin \"{name}\"!"),
    )
}
