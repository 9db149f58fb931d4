// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base capability trait that every plugin instance implements.

use std::any::Any;

use crate::descriptor::DescriptorRef;
use crate::key::Key;
use crate::types::{Logo, PluginCategory};

/// A live plugin instance as handed to the rest of the host.
///
/// The host only relies on identity here; signal processing and
/// presentation are defined by richer traits owned by the host layers.
pub trait Plugin: Send + 'static {
    /// Descriptor of the module (or family) this instance belongs to.
    fn descriptor(&self) -> &DescriptorRef;

    /// Key the instance was constructed with. For a family member this
    /// carries the attributes selecting the sub-plugin.
    fn key(&self) -> &Key;

    fn category(&self) -> PluginCategory {
        self.descriptor().category
    }

    /// Logo of the selected sub-plugin, else of the descriptor.
    fn logo(&self) -> Option<Logo> {
        let descriptor = self.descriptor();
        if descriptor.has_sub_plugins() && self.key().is_valid() {
            self.key().logo()
        } else {
            descriptor.logo
        }
    }

    fn display_name(&self) -> String {
        let descriptor = self.descriptor();
        if descriptor.has_sub_plugins() {
            if let Some(name) = self.key().display_name() {
                return name;
            }
        }
        descriptor.display_name.to_owned()
    }

    /// Downcast support for host layers that know the concrete type.
    fn as_any(&self) -> &dyn Any;
}
