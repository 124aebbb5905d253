use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use crate::config::{ConfigBackend, YamlConfigBackend};
use crate::plugin_system::PluginManager;
use crate::plugin_system::error::ConfigError;

fn write_config(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

const DOC: &str = r#"
plugins:
  - !Plugin
    api: auth
    type: service
    constructor:
      loader_name: default
      loader_type: builtin
      plugin_name: pwd
    properties:
      min_length: 8
  - !Plugin
    api: kdb
    type: service
    constructor:
      loader_name: ldap_loader
      loader_type: dynamic
      loader_path: /usr/lib/sentra/ldap.so
      plugin_name: kdb_ldap
"#;

#[test]
fn walks_tagged_plugin_nodes_in_document_order() {
    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), "plugins.yaml", DOC);

    let entries = YamlConfigBackend::new().load(&path).unwrap();
    assert_eq!(entries.len(), 2);

    let first = entries[0].as_ref().unwrap();
    assert_eq!(first.service_name, "auth");
    assert_eq!(first.plugin_type, "service");
    assert_eq!(first.plugin_name, "pwd");
    assert_eq!(first.loader_name, "default");
    assert_eq!(first.loader_type.as_deref(), Some("builtin"));
    assert!(first.loader_path.is_none());
    let properties = first.properties.as_ref().unwrap();
    assert_eq!(properties["min_length"], 8);

    let second = entries[1].as_ref().unwrap();
    assert_eq!(second.service_name, "kdb");
    assert_eq!(second.plugin_name, "kdb_ldap");
    assert_eq!(
        second.loader_path,
        Some(PathBuf::from("/usr/lib/sentra/ldap.so"))
    );
    assert!(second.properties.is_none());
}

#[test]
fn missing_constructor_fields_are_per_entry_failures() {
    const BROKEN: &str = r#"
plugins:
  - !Plugin
    api: auth
    type: service
    constructor:
      loader_name: default
"#;
    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), "plugins.yaml", BROKEN);

    let entries = YamlConfigBackend::new().load(&path).unwrap();
    assert_eq!(entries.len(), 1);
    let err = entries[0].as_ref().map(|_| ()).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::FieldMissing {
            field: "constructor.plugin_name",
            ..
        }
    ));
}

#[test]
fn untagged_nodes_are_not_plugin_entries() {
    const MIXED: &str = r#"
plugins:
  - comment: not a plugin
  - !Plugin
    api: auth
    type: service
    constructor:
      loader_name: default
      plugin_name: pwd
"#;
    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), "plugins.yaml", MIXED);

    let entries = YamlConfigBackend::new().load(&path).unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].is_ok());
}

#[test]
fn unreadable_source_is_reported() {
    let err = YamlConfigBackend::new()
        .load(Path::new("/nonexistent/plugins.yaml"))
        .map(|_| ())
        .unwrap_err();
    assert!(matches!(err, ConfigError::SourceUnreadable { .. }));
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), "plugins.yaml", "plugins: [unterminated");

    let err = YamlConfigBackend::new().load(&path).map(|_| ()).unwrap_err();
    assert!(matches!(err, ConfigError::Yaml { .. }));
}

#[test]
fn end_to_end_bootstrap_from_a_structured_document() {
    const SINGLE: &str = r#"
plugins:
  - !Plugin
    api: auth
    type: service
    constructor:
      loader_name: default
      loader_type: builtin
      plugin_name: pwd
"#;
    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), "plugins.yaml", SINGLE);

    let mut manager = PluginManager::new(Box::new(YamlConfigBackend::new()));
    let report = manager.configure(&path).unwrap();
    assert_eq!(report.registered, 1);
    assert!(report.failures.is_empty());

    let registry = manager.registry();
    assert_eq!(registry.len(), 1);
    let entry = registry.entry("auth").unwrap();
    assert_eq!(entry.instances().len(), 1);

    let instance = manager.get_service("auth", "pwd").unwrap();
    assert_eq!(instance.name(), "pwd");
}
