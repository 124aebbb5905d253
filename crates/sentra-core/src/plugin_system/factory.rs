//! Plugin factory: builds a named plugin instance through a resolved
//! loader.

use crate::plugin_system::error::LoaderError;
use crate::plugin_system::loader::{LoaderBinding, LoaderResolver};
use crate::plugin_system::traits::PluginInstance;

/// Resolve the loader named by `binding` and ask it to construct
/// `plugin_name`.
///
/// Touches nothing but the resolver's module cache; registration is the
/// caller's business.
pub fn create_plugin_instance(
    resolver: &mut LoaderResolver,
    plugin_name: &str,
    binding: &LoaderBinding,
) -> Result<PluginInstance, LoaderError> {
    let loader = resolver.resolve(binding)?;
    loader.construct_instance(plugin_name)
}
