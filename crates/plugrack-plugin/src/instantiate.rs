// SPDX-FileCopyrightText: 2026 Plugrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turning a plugin name, and optionally a key, into a live instance.

use std::any::Any;
use std::ffi::c_void;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, PoisonError};

use plugrack_core::{Key, ModuleKeepAlive, Plugin, PluginCategory, PlugrackError};
use tracing::{debug, warn};

use crate::factory::PluginFactory;
use crate::notify::{self, Notifier, TracingNotifier};
use crate::placeholder::PlaceholderPlugin;

/// Where the key for keyed instantiation comes from.
#[derive(Debug, Clone, Copy, Default)]
pub enum KeySource<'a> {
    /// No key; the hook receives a null data pointer.
    #[default]
    None,
    /// Use this key.
    Explicit(&'a Key),
    /// Use the key stored with [`Instantiator::select_key`], for call sites
    /// that cannot pass one by value (drag and drop).
    Selected,
}

/// A live plugin instance together with the module its code lives in.
///
/// The instance is dropped before the module handle is released.
pub struct LoadedPlugin {
    instance: Box<dyn Plugin>,
    _module: Option<ModuleKeepAlive>,
}

impl LoadedPlugin {
    pub fn new(instance: Box<dyn Plugin>, module: Option<ModuleKeepAlive>) -> Self {
        Self {
            instance,
            _module: module,
        }
    }

    /// Concrete type of the instance, if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.instance.as_any().downcast_ref::<T>()
    }

    /// Whether this is a stand-in for a plugin that failed to load.
    pub fn is_placeholder(&self) -> bool {
        self.downcast_ref::<PlaceholderPlugin>().is_some()
    }
}

impl Deref for LoadedPlugin {
    type Target = dyn Plugin;

    fn deref(&self) -> &Self::Target {
        self.instance.as_ref()
    }
}

impl DerefMut for LoadedPlugin {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.instance.as_mut()
    }
}

impl fmt::Debug for LoadedPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedPlugin")
            .field("plugin", &self.instance.descriptor().name)
            .field("key", self.instance.key())
            .finish()
    }
}

/// Creates plugin instances from the factory's registry.
///
/// Lookup failures are reported once through the [`Notifier`] and returned
/// as errors; nothing here panics on a missing or misbehaving plugin.
pub struct Instantiator {
    factory: Arc<PluginFactory>,
    notifier: Arc<dyn Notifier>,
    selected_key: Mutex<Option<Key>>,
}

impl Instantiator {
    pub fn new(factory: Arc<PluginFactory>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            factory,
            notifier,
            selected_key: Mutex::new(None),
        }
    }

    /// Instantiator reporting failures through `tracing`.
    pub fn with_tracing(factory: Arc<PluginFactory>) -> Self {
        Self::new(factory, Arc::new(TracingNotifier))
    }

    pub fn factory(&self) -> &Arc<PluginFactory> {
        &self.factory
    }

    /// Store the key used by [`KeySource::Selected`].
    pub fn select_key(&self, key: Key) {
        *self.slot() = Some(key);
    }

    pub fn selected_key(&self) -> Option<Key> {
        self.slot().clone()
    }

    pub fn clear_selected_key(&self) {
        *self.slot() = None;
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Key>> {
        self.selected_key
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Instantiate `name`, handing `owner` and `data` to its hook unchanged.
    pub fn instantiate(
        &self,
        name: &str,
        owner: *mut c_void,
        data: *mut c_void,
    ) -> Result<LoadedPlugin, PlugrackError> {
        let registry = self.factory.registry();

        let Some(info) = registry.plugin_info(name) else {
            let reason = registry.error_string(name);
            let (title, message) = notify::plugin_not_found(name, reason);
            self.notifier.notify(title, &message);
            return Err(PlugrackError::PluginNotFound {
                name: name.to_string(),
                reason: reason.to_string(),
            });
        };

        let Some(hook) = info.module().instantiation_hook() else {
            let (title, message) = notify::missing_entry_point(name);
            self.notifier.notify(title, &message);
            return Err(PlugrackError::MissingEntryPoint {
                name: name.to_string(),
            });
        };

        // SAFETY: the hook was exported by a module built against
        // plugrack-core; the module stays resident through `info`.
        let instance = unsafe { hook(owner, data) };
        match instance {
            Some(instance) => {
                debug!(plugin = name, "instantiated plugin");
                Ok(LoadedPlugin::new(
                    instance,
                    info.descriptor().module().cloned(),
                ))
            }
            None => {
                warn!(plugin = name, "plugin refused to construct an instance");
                Err(PlugrackError::ConstructionRefused {
                    name: name.to_string(),
                })
            }
        }
    }

    /// Instantiate `name` with a key selecting the sub-plugin to build.
    ///
    /// The hook receives a copy of the key re-attached to the descriptor of
    /// the module actually found under `name`, so a key parsed from a saved
    /// document works without manual re-attachment.
    pub fn instantiate_with_key(
        &self,
        name: &str,
        owner: *mut c_void,
        source: KeySource<'_>,
    ) -> Result<LoadedPlugin, PlugrackError> {
        let key = match source {
            KeySource::None => None,
            KeySource::Explicit(key) => Some(key.clone()),
            KeySource::Selected => self.selected_key(),
        };

        let Some(mut key) = key else {
            return self.instantiate(name, owner, std::ptr::null_mut());
        };

        let registry = self.factory.registry();
        match registry.plugin_info(name) {
            Some(info) => key.attach(info.descriptor().clone()),
            None => key = Key::unattached(key.name(), key.attributes().clone()),
        }
        let data = &mut key as *mut Key as *mut c_void;
        self.instantiate(name, owner, data)
    }

    /// Like [`instantiate_with_key`](Self::instantiate_with_key), but
    /// rejects an instance whose category is not `expected`.
    pub fn instantiate_expecting(
        &self,
        expected: PluginCategory,
        name: &str,
        owner: *mut c_void,
        source: KeySource<'_>,
    ) -> Result<LoadedPlugin, PlugrackError> {
        let loaded = self.instantiate_with_key(name, owner, source)?;
        let actual = loaded.category();
        if actual != expected {
            debug!(plugin = name, %expected, %actual, "discarding instance of wrong category");
            return Err(PlugrackError::CategoryMismatch {
                name: name.to_string(),
                expected,
                actual,
            });
        }
        Ok(loaded)
    }

    /// Instantiate `name`, substituting a [`PlaceholderPlugin`] on failure.
    pub fn instantiate_or_placeholder(
        &self,
        name: &str,
        owner: *mut c_void,
        source: KeySource<'_>,
    ) -> LoadedPlugin {
        self.instantiate_with_key(name, owner, source)
            .unwrap_or_else(|_| LoadedPlugin::new(Box::new(PlaceholderPlugin::new(name)), None))
    }
}

impl fmt::Debug for Instantiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instantiator")
            .field("factory", &self.factory)
            .field("has_selected_key", &self.slot().is_some())
            .finish()
    }
}
