// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits implemented by plugin instances.

pub mod plugin;

pub use plugin::Plugin;
