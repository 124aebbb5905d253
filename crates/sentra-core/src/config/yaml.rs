//! Structured-document backend: plugin entries are `!Plugin`-tagged
//! mappings inside sequences of a YAML document.

use std::path::{Path, PathBuf};

use log::debug;
use serde_yaml::value::TaggedValue;
use serde_yaml::{Mapping, Value};

use crate::config::{ConfigBackend, DescriptorResult, read_source};
use crate::plugin_system::descriptor::PluginDescriptor;
use crate::plugin_system::error::ConfigError;

/// Tag marking a plugin entry node.
const PLUGIN_TAG: &str = "Plugin";

#[derive(Debug, Default)]
pub struct YamlConfigBackend;

impl YamlConfigBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ConfigBackend for YamlConfigBackend {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn load(&self, source: &Path) -> Result<Vec<DescriptorResult>, ConfigError> {
        let text = read_source(source)?;
        let document: Value =
            serde_yaml::from_str(&text).map_err(|parse_error| ConfigError::Yaml {
                path: source.to_path_buf(),
                source: parse_error,
            })?;
        let mut entries = Vec::new();
        collect_plugin_nodes(&document, &mut entries);
        Ok(entries)
    }
}

/// Depth-first walk over sequences and mapping values; any `!Plugin`-tagged
/// node reached as a sequence item is a plugin entry.
fn collect_plugin_nodes(node: &Value, out: &mut Vec<DescriptorResult>) {
    match node {
        Value::Sequence(items) => {
            for item in items {
                if let Value::Tagged(tagged) = item {
                    if is_plugin_tag(tagged) {
                        out.push(parse_plugin_node(tagged));
                        continue;
                    }
                }
                collect_plugin_nodes(item, out);
            }
        }
        Value::Mapping(mapping) => {
            for (_, value) in mapping {
                collect_plugin_nodes(value, out);
            }
        }
        Value::Tagged(tagged) => collect_plugin_nodes(&tagged.value, out),
        _ => {}
    }
}

fn is_plugin_tag(tagged: &TaggedValue) -> bool {
    tagged.tag.to_string().trim_start_matches('!') == PLUGIN_TAG
}

fn parse_plugin_node(tagged: &TaggedValue) -> DescriptorResult {
    let Some(mapping) = tagged.value.as_mapping() else {
        return Err(ConfigError::FieldInvalid {
            entry: "<plugin>".to_string(),
            field: "entry",
            message: "plugin node is not a mapping".to_string(),
        });
    };

    let api = str_field(mapping, "api");
    let plugin_type = str_field(mapping, "type");
    let constructor = mapping
        .get(&Value::String("constructor".to_string()))
        .and_then(Value::as_mapping);
    let loader_name = constructor.and_then(|c| str_field(c, "loader_name"));
    let loader_type = constructor.and_then(|c| str_field(c, "loader_type"));
    let loader_path = constructor.and_then(|c| str_field(c, "loader_path"));
    let plugin_name = constructor.and_then(|c| str_field(c, "plugin_name"));
    let properties = mapping.get(&Value::String("properties".to_string()));

    // Best-effort label for reporting entries that fail validation.
    let label = plugin_name
        .clone()
        .or_else(|| api.clone())
        .unwrap_or_else(|| "<plugin>".to_string());

    let service_name = api.ok_or_else(|| missing(&label, "api"))?;
    let plugin_type = plugin_type.ok_or_else(|| missing(&label, "type"))?;
    let plugin_name = plugin_name.ok_or_else(|| missing(&label, "constructor.plugin_name"))?;
    let loader_name = loader_name.ok_or_else(|| missing(&label, "constructor.loader_name"))?;

    let properties = match properties {
        Some(subtree) => {
            debug!("captured properties subtree for plugin '{}'", plugin_name);
            Some(
                serde_json::to_value(subtree).map_err(|e| ConfigError::FieldInvalid {
                    entry: label.clone(),
                    field: "properties",
                    message: e.to_string(),
                })?,
            )
        }
        None => None,
    };

    Ok(PluginDescriptor {
        service_name,
        plugin_type,
        plugin_name,
        plugin_version: None,
        loader_name,
        loader_type,
        loader_path: loader_path.map(PathBuf::from),
        properties,
    })
}

fn str_field(mapping: &Mapping, key: &str) -> Option<String> {
    mapping
        .get(&Value::String(key.to_string()))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn missing(entry: &str, field: &'static str) -> ConfigError {
    ConfigError::FieldMissing {
        entry: entry.to_string(),
        field,
    }
}
