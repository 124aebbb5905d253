use std::path::PathBuf;

use super::super::descriptor::PluginDescriptor;
use super::super::error::{ConfigError, LoaderError, PluginSystemError};
use super::super::loader::LoaderBinding;

fn descriptor() -> PluginDescriptor {
    PluginDescriptor {
        service_name: "auth".to_string(),
        plugin_type: "service".to_string(),
        plugin_name: "pwd".to_string(),
        plugin_version: None,
        loader_name: "default".to_string(),
        loader_type: None,
        loader_path: None,
        properties: None,
    }
}

#[test]
fn absent_loader_type_defaults_to_builtin() {
    let binding = descriptor().loader_binding().unwrap();
    assert_eq!(
        binding,
        LoaderBinding::Builtin {
            name: "default".to_string()
        }
    );
}

#[test]
fn explicit_builtin_loader_type_binds_to_the_table() {
    let mut d = descriptor();
    d.loader_type = Some("builtin".to_string());
    assert!(matches!(
        d.loader_binding().unwrap(),
        LoaderBinding::Builtin { .. }
    ));
}

#[test]
fn dynamic_without_a_path_is_a_missing_field() {
    let mut d = descriptor();
    d.loader_type = Some("dynamic".to_string());
    let err = d.loader_binding().map(|_| ()).unwrap_err();
    assert!(matches!(
        err,
        PluginSystemError::Config(ConfigError::FieldMissing {
            field: "loader_path",
            ..
        })
    ));
}

#[test]
fn dynamic_with_a_path_binds_to_the_module() {
    let mut d = descriptor();
    d.loader_name = "ldap_loader".to_string();
    d.loader_type = Some("dynamic".to_string());
    d.loader_path = Some(PathBuf::from("/usr/lib/sentra/ldap.so"));
    assert_eq!(
        d.loader_binding().unwrap(),
        LoaderBinding::Dynamic {
            name: "ldap_loader".to_string(),
            path: PathBuf::from("/usr/lib/sentra/ldap.so"),
        }
    );
}

#[test]
fn unrecognized_loader_type_is_a_hard_error() {
    let mut d = descriptor();
    d.loader_type = Some("shared".to_string());
    let err = d.loader_binding().map(|_| ()).unwrap_err();
    assert!(matches!(
        err,
        PluginSystemError::Loader(LoaderError::UnknownLoaderType(ref raw)) if raw == "shared"
    ));
}
