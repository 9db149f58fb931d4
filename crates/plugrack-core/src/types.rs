// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used by descriptors, keys and the plugin registry.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Capability category a plugin module declares in its descriptor.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[repr(u8)]
pub enum PluginCategory {
    /// Sound source played from an instrument track.
    Instrument = 0,
    /// Audio effect inserted into an effect chain.
    Effect = 1,
    /// Reads a foreign file format into the host.
    ImportFilter = 2,
    /// Writes host content to a foreign file format.
    ExportFilter = 3,
    /// Auxiliary tool (level meter etc).
    Tool = 4,
    /// Support code shared by several other plugins.
    Library = 5,
    Other = 6,
    Undefined = 255,
}

/// Reference to an image resource. Opaque to the plugin core; the
/// presentation layer decides how to resolve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Logo(pub &'static str);

impl Logo {
    /// Resource name of the image.
    pub fn resource(&self) -> &'static str {
        self.0
    }
}
