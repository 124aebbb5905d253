//! Core library of the Sentra authentication toolkit.
//!
//! This crate is the plugin bootstrap and service-registry layer: it reads
//! a plugin configuration source, constructs the named plugin instances
//! through builtin or dynamically loaded loaders, and indexes them by
//! service name so the rest of the toolkit can resolve a service/plugin
//! pair to a concrete implementation at call time.

pub mod config;
pub mod plugin_system;

pub use config::ConfigBackend;
pub use plugin_system::error::{
    ConfigError, LoaderError, LookupError, PluginSystemError, RegistryError,
};
pub use plugin_system::{
    PluginInstance, PluginManager, ServiceLoader, ServicePlugin, ServiceRegistry,
};
