//! The compiled-in default loader and the plugins it ships.

use std::any::Any;
use std::sync::Arc;

use crate::plugin_system::error::LoaderError;
use crate::plugin_system::traits::{PluginInstance, ServiceLoader, ServicePlugin};

/// Constructor of a compiled-in plugin.
pub type PluginConstructor = fn() -> Arc<dyn ServicePlugin>;

/// Password-authentication service shipped with the toolkit.
pub struct PasswordAuth;

impl ServicePlugin for PasswordAuth {
    fn name(&self) -> &str {
        "pwd"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn password_auth() -> Arc<dyn ServicePlugin> {
    Arc::new(PasswordAuth)
}

/// Plugins compiled into the default loader.
static DEFAULT_PLUGINS: &[(&str, PluginConstructor)] = &[("pwd", password_auth)];

/// The compiled-in loader, registered in the builtin table as `"default"`.
///
/// It owns a closed table of plugin constructors; names outside the table
/// fail construction rather than producing an empty handle.
pub struct DefaultLoader {
    plugins: &'static [(&'static str, PluginConstructor)],
}

impl DefaultLoader {
    pub fn new() -> Self {
        Self {
            plugins: DEFAULT_PLUGINS,
        }
    }

    /// Loader over a caller-supplied constructor table, for embedders that
    /// link their own plugin set.
    pub fn with_table(plugins: &'static [(&'static str, PluginConstructor)]) -> Self {
        Self { plugins }
    }

    /// Factory registered in
    /// [`BUILTIN_LOADERS`](crate::plugin_system::loader::BUILTIN_LOADERS).
    pub fn get_instance() -> Box<dyn ServiceLoader> {
        Box::new(Self::new())
    }
}

impl ServiceLoader for DefaultLoader {
    fn name(&self) -> &str {
        "default"
    }

    fn construct_instance(&self, plugin_name: &str) -> Result<PluginInstance, LoaderError> {
        let constructor = self
            .plugins
            .iter()
            .find(|(name, _)| *name == plugin_name)
            .map(|(_, constructor)| constructor)
            .ok_or_else(|| LoaderError::InstanceConstructionFailed {
                loader: self.name().to_string(),
                plugin: plugin_name.to_string(),
                reason: "not in the compiled-in plugin table".to_string(),
            })?;
        PluginInstance::new(self.name(), constructor())
    }
}

impl Default for DefaultLoader {
    fn default() -> Self {
        Self::new()
    }
}
