//! The uniform plugin record both configuration backends produce.

use std::path::PathBuf;

use log::debug;
use semver::Version;

use crate::plugin_system::error::{ConfigError, PluginSystemError};
use crate::plugin_system::loader::{LoaderBinding, LoaderType};

/// One configured plugin, normalized from either backend.
#[derive(Debug, Clone)]
pub struct PluginDescriptor {
    /// Service (API) name the instance registers under.
    pub service_name: String,
    /// Plugin type; `"service"` participates in the single-instance policy.
    pub plugin_type: String,
    /// Name the loader constructs the instance by.
    pub plugin_name: String,
    /// Declared version; validated when present, not consumed downstream.
    pub plugin_version: Option<Version>,
    pub loader_name: String,
    /// Raw configured loader type; absent means builtin.
    pub loader_type: Option<String>,
    /// Required only when the loader type is `"dynamic"`.
    pub loader_path: Option<PathBuf>,
    /// Captured `properties` subtree, handed to the plugin later; the
    /// bootstrap pipeline itself does not read it.
    pub properties: Option<serde_json::Value>,
}

impl PluginDescriptor {
    /// Validate the loader fields into a [`LoaderBinding`].
    pub fn loader_binding(&self) -> Result<LoaderBinding, PluginSystemError> {
        let loader_type = match self.loader_type.as_deref() {
            None => {
                debug!(
                    "no loader_type for plugin '{}'; defaulting to builtin",
                    self.plugin_name
                );
                LoaderType::Builtin
            }
            Some(raw) => LoaderType::from_str(raw)?,
        };
        match loader_type {
            LoaderType::Builtin => Ok(LoaderBinding::Builtin {
                name: self.loader_name.clone(),
            }),
            LoaderType::Dynamic => {
                let path = self.loader_path.clone().ok_or_else(|| ConfigError::FieldMissing {
                    entry: self.plugin_name.clone(),
                    field: "loader_path",
                })?;
                Ok(LoaderBinding::Dynamic {
                    name: self.loader_name.clone(),
                    path,
                })
            }
        }
    }
}
