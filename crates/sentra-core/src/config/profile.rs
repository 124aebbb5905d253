//! Hierarchical-profile backend: a profile-style key/value hierarchy with
//! a `plugin_list` of nicknames under the `plugins` section.

use std::path::{Path, PathBuf};

use log::debug;
use semver::Version;
use serde::Deserialize;

use crate::config::{ConfigBackend, DescriptorResult, read_source};
use crate::plugin_system::descriptor::PluginDescriptor;
use crate::plugin_system::error::ConfigError;

/// Raw keys of one `[plugins.<nickname>]` section.
#[derive(Debug, Deserialize)]
struct RawProfileEntry {
    plugin_api: Option<String>,
    plugin_name: Option<String>,
    plugin_type: Option<String>,
    plugin_version: Option<String>,
    plugin_loader_name: Option<String>,
    plugin_loader_type: Option<String>,
    plugin_loader_path: Option<String>,
}

#[derive(Debug, Default)]
pub struct ProfileConfigBackend;

impl ProfileConfigBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ConfigBackend for ProfileConfigBackend {
    fn name(&self) -> &'static str {
        "profile"
    }

    fn load(&self, source: &Path) -> Result<Vec<DescriptorResult>, ConfigError> {
        let text = read_source(source)?;
        let document: toml::Value =
            toml::from_str(&text).map_err(|parse_error| ConfigError::Toml {
                path: source.to_path_buf(),
                source: parse_error,
            })?;

        // A missing plugins section or nickname list means "no plugins
        // configured", not an error.
        let Some(plugins) = document.get("plugins").and_then(toml::Value::as_table) else {
            debug!("{}: no [plugins] section; nothing to configure", source.display());
            return Ok(Vec::new());
        };
        let Some(list) = plugins.get("plugin_list").and_then(toml::Value::as_array) else {
            debug!("{}: no plugin_list; nothing to configure", source.display());
            return Ok(Vec::new());
        };

        let mut entries = Vec::new();
        for nickname in list {
            let Some(nickname) = nickname.as_str() else {
                entries.push(Err(ConfigError::FieldInvalid {
                    entry: "plugin_list".to_string(),
                    field: "plugin_list",
                    message: "nicknames must be strings".to_string(),
                }));
                continue;
            };
            entries.push(parse_entry(plugins, nickname));
        }
        Ok(entries)
    }
}

fn parse_entry(plugins: &toml::value::Table, nickname: &str) -> DescriptorResult {
    debug!("reading plugin nickname '{}'", nickname);
    let Some(section) = plugins.get(nickname) else {
        return Err(missing(nickname, "plugins.<nickname>"));
    };
    let raw: RawProfileEntry =
        section
            .clone()
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::FieldInvalid {
                entry: nickname.to_string(),
                field: "plugins.<nickname>",
                message: e.to_string(),
            })?;

    let service_name = raw.plugin_api.ok_or_else(|| missing(nickname, "plugin_api"))?;
    let plugin_name = raw.plugin_name.ok_or_else(|| missing(nickname, "plugin_name"))?;
    let plugin_type = raw.plugin_type.ok_or_else(|| missing(nickname, "plugin_type"))?;
    let loader_name = raw
        .plugin_loader_name
        .ok_or_else(|| missing(nickname, "plugin_loader_name"))?;
    let plugin_version = raw
        .plugin_version
        .map(|v| {
            Version::parse(&v).map_err(|e| ConfigError::FieldInvalid {
                entry: nickname.to_string(),
                field: "plugin_version",
                message: e.to_string(),
            })
        })
        .transpose()?;

    Ok(PluginDescriptor {
        service_name,
        plugin_type,
        plugin_name,
        plugin_version,
        loader_name,
        loader_type: raw.plugin_loader_type,
        loader_path: raw.plugin_loader_path.map(PathBuf::from),
        properties: None,
    })
}

fn missing(entry: &str, field: &'static str) -> ConfigError {
    ConfigError::FieldMissing {
        entry: entry.to_string(),
        field,
    }
}
