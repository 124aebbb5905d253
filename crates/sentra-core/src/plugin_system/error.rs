//! Typed errors for the plugin bootstrap pipeline.
//!
//! Each concern has its own enum — [`LoaderError`] for loader resolution and
//! instance construction, [`ConfigError`] for configuration sources,
//! [`RegistryError`] for registration policy, [`LookupError`] for service
//! lookups — with [`PluginSystemError`] as the umbrella the bootstrap report
//! carries.

use std::path::PathBuf;

/// Errors from resolving loaders and constructing plugin instances.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("no builtin loader named '{0}' in the compiled-in table")]
    LoaderNotFound(String),

    #[error("unknown loader_type '{0}' (expected \"builtin\" or \"dynamic\")")]
    UnknownLoaderType(String),

    #[error("failed to load loader module '{}': {reason}", .path.display())]
    DynamicLoadFailed { path: PathBuf, reason: String },

    #[error("loader module '{}' does not export `{symbol}`", .path.display())]
    EntryPointMissing {
        path: PathBuf,
        symbol: &'static str,
    },

    #[error("loader '{loader}' could not construct plugin '{plugin}': {reason}")]
    InstanceConstructionFailed {
        loader: String,
        plugin: String,
        reason: String,
    },
}

/// Errors from reading and validating a plugin configuration source.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read plugin configuration '{}': {source}", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "yaml-config")]
    #[error("failed to parse '{}': {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[cfg(feature = "toml-config")]
    #[error("failed to parse '{}': {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("plugin entry '{entry}' is missing required field `{field}`")]
    FieldMissing { entry: String, field: &'static str },

    #[error("plugin entry '{entry}' has invalid `{field}`: {message}")]
    FieldInvalid {
        entry: String,
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    /// The configuration entry a per-entry failure belongs to, when known.
    pub fn entry_label(&self) -> Option<&str> {
        match self {
            ConfigError::FieldMissing { entry, .. } | ConfigError::FieldInvalid { entry, .. } => {
                Some(entry)
            }
            _ => None,
        }
    }
}

/// Errors from registering an instance in the service registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("service '{service}' already has a registered plugin; one instance per service is enforced")]
    AlreadyRegistered { service: String },
}

/// Errors from resolving a registered service at call time.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("service '{0}' is not registered")]
    ServiceNotFound(String),

    #[error("service '{service}' has no plugin named '{plugin}'")]
    PluginNotFoundInService { service: String, plugin: String },
}

/// Any error the plugin subsystem can produce.
#[derive(Debug, thiserror::Error)]
pub enum PluginSystemError {
    #[error(transparent)]
    Loader(#[from] LoaderError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}
