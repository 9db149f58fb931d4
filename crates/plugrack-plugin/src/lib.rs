// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host side of the plugrack plugin system.
//!
//! Discovery scans search directories for shared libraries, opens them
//! through a [`ModuleLoader`], resolves the exported descriptor and entry
//! point, and publishes a [`Registry`]. The [`Instantiator`] turns a
//! plugin name (and optionally a [`Key`](plugrack_core::Key)) into a live
//! instance.

pub mod factory;
pub mod instantiate;
pub mod loader;
pub mod naming;
pub mod notify;
pub mod placeholder;
pub mod registry;
pub mod search;

pub use factory::PluginFactory;
pub use instantiate::{Instantiator, KeySource, LoadedPlugin};
pub use loader::{DylibLoader, Module, ModuleLoader};
pub use naming::{LibraryNaming, base_name, descriptor_symbol};
pub use notify::{Notifier, TracingNotifier};
pub use placeholder::{PLACEHOLDER_DESCRIPTOR, PlaceholderPlugin};
pub use registry::{ModuleInfo, PLUGIN_NOT_FOUND, PluginNameAndKey, Registry, Route};
pub use search::SearchPathInputs;
