//! Core contracts of the plugin system: the capability surface a plugin
//! instance exposes, the loader contract that produces instances, and the
//! ABI a dynamically loadable loader module must follow.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::plugin_system::error::LoaderError;

/// Upper bound on a declared plugin name, in bytes.
pub const MAX_PLUGIN_NAME_LEN: usize = 64;

/// Errors raised by a plugin's own lifecycle hooks.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("plugin start failed: {0}")]
    Start(String),

    #[error("plugin stop failed: {0}")]
    Stop(String),
}

/// Capability surface of a plugin instance.
///
/// The registry only knows the declared name and the lifecycle hooks; the
/// rest of the surface is opaque to the bootstrap layer. Consumers that hold
/// an instance downcast through [`ServicePlugin::as_any`] to reach the
/// concrete implementation.
pub trait ServicePlugin: Send + Sync {
    /// The name this instance registers and is looked up under.
    fn name(&self) -> &str;

    /// Called when the manager starts, in registration order.
    fn start(&self) -> Result<(), PluginError> {
        Ok(())
    }

    /// Called when the manager stops, in reverse registration order.
    fn stop(&self) -> Result<(), PluginError> {
        Ok(())
    }

    /// Access to the concrete capability surface.
    fn as_any(&self) -> &dyn Any;
}

/// A named plugin instance as held by the service registry.
///
/// Cloning is cheap (the handle is shared), which is how configured
/// instances are published to readers after bootstrap.
#[derive(Clone)]
pub struct PluginInstance {
    name: String,
    handle: Arc<dyn ServicePlugin>,
}

impl PluginInstance {
    /// Wrap a constructed plugin, taking its declared name.
    ///
    /// The name must be non-empty and at most [`MAX_PLUGIN_NAME_LEN`] bytes.
    pub fn new(loader: &str, handle: Arc<dyn ServicePlugin>) -> Result<Self, LoaderError> {
        let name = handle.name().to_string();
        if name.is_empty() || name.len() > MAX_PLUGIN_NAME_LEN {
            return Err(LoaderError::InstanceConstructionFailed {
                loader: loader.to_string(),
                plugin: name,
                reason: format!(
                    "declared plugin name must be between 1 and {} bytes",
                    MAX_PLUGIN_NAME_LEN
                ),
            });
        }
        Ok(Self { name, handle })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> &Arc<dyn ServicePlugin> {
        &self.handle
    }
}

impl fmt::Debug for PluginInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginInstance")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A loader constructs plugin instances by name.
///
/// This is the single capability the rest of the system consumes, whether
/// the loader came from the compiled-in table or from a module loaded at
/// runtime.
pub trait ServiceLoader: Send + Sync {
    /// Loader name, for diagnostics.
    fn name(&self) -> &str;

    /// Construct the plugin instance registered under `plugin_name`.
    fn construct_instance(&self, plugin_name: &str) -> Result<PluginInstance, LoaderError>;
}

/// Symbol every dynamically loadable loader module must export.
///
/// The suffix is the contract version; a module built against a different
/// contract simply fails symbol resolution instead of misbehaving at call
/// time.
pub const LOADER_ENTRY_SYMBOL: &str = "sentra_loader_get_instance_v1";

/// Heap payload the entry point hands across the module boundary.
///
/// The module allocates it with `Box::into_raw`; the host takes ownership
/// back with `Box::from_raw` after a null check.
pub struct LoaderRegistration {
    pub loader: Box<dyn ServiceLoader>,
}

/// Signature of the exported entry point named by [`LOADER_ENTRY_SYMBOL`].
pub type LoaderEntryFn = unsafe extern "C" fn() -> *mut LoaderRegistration;
