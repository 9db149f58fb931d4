// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for plugrack integration tests.
//!
//! Discovery and instantiation can be exercised without compiling real
//! shared libraries: module files on disk are empty placeholders and the
//! [`MockModuleLoader`] answers for them.
//!
//! # Components
//!
//! - [`MockModuleLoader`] - in-memory loader with per-file exports and
//!   inter-module dependencies
//! - [`fixtures`] - static descriptors, a sub-plugin family and hooks
//! - [`RecordingNotifier`] - captures failure notifications
//! - [`TempPluginDir`] - temporary search directory with module files

pub mod fixtures;
pub mod mock_loader;
pub mod plugin_dir;
pub mod recording;

pub use mock_loader::{MockModuleLoader, MockModuleSpec};
pub use plugin_dir::TempPluginDir;
pub use recording::{Notification, RecordingNotifier};
