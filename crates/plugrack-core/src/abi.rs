// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Exported-symbol contract between the host and plugin modules.
//!
//! A module is recognised as a plugin when it exports:
//!
//! - [`ENTRY_POINT_SYMBOL`], an [`InstantiationHook`];
//! - a [`Descriptor`](crate::Descriptor) static named after the module file:
//!   the base name truncated at the first `_`, without a leading `lib`,
//!   followed by [`DESCRIPTOR_SYMBOL_SUFFIX`]. `libkicker.so` exports
//!   `kicker_plugin_descriptor`.
//!
//! Both symbols use the Rust ABI: host and plugins must be built with the
//! same toolchain and the same `plugrack-core`.
//!
//! ```ignore
//! use std::ffi::c_void;
//! use plugrack_core::{Plugin, Descriptor, PluginCategory, declare_plugin_entry};
//!
//! #[unsafe(no_mangle)]
//! #[allow(non_upper_case_globals)]
//! pub static kicker_plugin_descriptor: Descriptor = Descriptor { /* ... */ };
//!
//! fn create(owner: *mut c_void, data: *mut c_void) -> Option<Box<dyn Plugin>> {
//!     /* ... */
//! }
//!
//! declare_plugin_entry!(create);
//! ```

use std::ffi::c_void;

use crate::key::Key;
use crate::traits::Plugin;

/// Name of the instantiation hook every plugin module exports.
pub const ENTRY_POINT_SYMBOL: &str = "plugrack_plugin_main";

/// Suffix appended to the module's common name to form the descriptor symbol.
pub const DESCRIPTOR_SYMBOL_SUFFIX: &str = "_plugin_descriptor";

/// Library prefix stripped from module names before deriving symbols.
pub const LIBRARY_PREFIX: &str = "lib";

/// Signature of the instantiation hook.
///
/// `owner` is an opaque pointer to the host object that will own the
/// instance; `data` is either caller-defined auxiliary data or, for keyed
/// instantiation, a pointer to a [`Key`]. Returning `None` refuses
/// construction.
pub type InstantiationHook =
    unsafe fn(owner: *mut c_void, data: *mut c_void) -> Option<Box<dyn Plugin>>;

/// Reinterpret the hook's `data` argument as a key.
///
/// # Safety
///
/// `data` must be null or point to a `Key` that outlives `'a`. The host
/// guarantees this for keyed instantiation.
pub unsafe fn key_from_data<'a>(data: *mut c_void) -> Option<&'a Key> {
    unsafe { (data as *const Key).as_ref() }
}

/// Export `$constructor` as the module's instantiation hook.
///
/// `$constructor` must be a `fn(*mut c_void, *mut c_void) -> Option<Box<dyn Plugin>>`.
#[macro_export]
macro_rules! declare_plugin_entry {
    ($constructor:path) => {
        /// Instantiation hook resolved by the plugrack host.
        ///
        /// # Safety
        ///
        /// Called by the host with pointers valid for the duration of the call.
        #[unsafe(no_mangle)]
        pub unsafe fn plugrack_plugin_main(
            owner: *mut ::std::ffi::c_void,
            data: *mut ::std::ffi::c_void,
        ) -> ::std::option::Option<::std::boxed::Box<dyn $crate::Plugin>> {
            $constructor(owner, data)
        }

        const _: $crate::abi::InstantiationHook = plugrack_plugin_main;
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_data_is_no_key() {
        let key = unsafe { key_from_data(std::ptr::null_mut()) };
        assert!(key.is_none());
    }

    #[test]
    fn data_pointer_round_trips_a_key() {
        let key = Key::unattached("Plate", Default::default()).with_attribute("a", "1");
        let data = &key as *const Key as *mut c_void;
        let seen = unsafe { key_from_data(data) }.unwrap();
        assert_eq!(seen.name(), "Plate");
        assert_eq!(seen.attribute("a"), Some("1"));
    }
}
