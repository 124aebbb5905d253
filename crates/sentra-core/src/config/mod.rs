//! Configuration backends feeding the bootstrap pipeline.
//!
//! Exactly one backend drives a given manager; the strategy is chosen at
//! manager construction. Both backends walk a different on-disk shape but
//! normalize to the same [`PluginDescriptor`] record, and both report
//! per-entry validation failures without aborting the scan.

use std::path::Path;

use crate::plugin_system::descriptor::PluginDescriptor;
use crate::plugin_system::error::ConfigError;

#[cfg(feature = "toml-config")]
pub mod profile;
#[cfg(feature = "yaml-config")]
pub mod yaml;

#[cfg(feature = "toml-config")]
pub use profile::ProfileConfigBackend;
#[cfg(feature = "yaml-config")]
pub use yaml::YamlConfigBackend;

/// Per-entry scan outcome: a descriptor, or why that entry is unusable.
pub type DescriptorResult = Result<PluginDescriptor, ConfigError>;

/// A configuration source walker.
pub trait ConfigBackend: Send + Sync {
    /// Backend name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Extract plugin descriptors from `source`, in document order.
    ///
    /// The outer error is reserved for an unreadable or unparseable
    /// source; entries that fail validation come back as inner errors so
    /// the caller can continue past them.
    fn load(&self, source: &Path) -> Result<Vec<DescriptorResult>, ConfigError>;
}

pub(crate) fn read_source(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests;
