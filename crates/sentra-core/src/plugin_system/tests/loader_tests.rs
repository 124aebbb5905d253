use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;

use super::super::default_loader::DefaultLoader;
use super::super::error::LoaderError;
use super::super::factory::create_plugin_instance;
use super::super::loader::{LoaderBinding, LoaderResolver, LoaderType};
use super::super::traits::{MAX_PLUGIN_NAME_LEN, PluginInstance, ServiceLoader, ServicePlugin};

#[test]
fn unknown_builtin_loader_is_loader_not_found() {
    let mut resolver = LoaderResolver::new();
    let binding = LoaderBinding::Builtin {
        name: "no_such_loader".to_string(),
    };
    let err = resolver.resolve(&binding).map(|_| ()).unwrap_err();
    assert!(matches!(
        err,
        LoaderError::LoaderNotFound(ref name) if name == "no_such_loader"
    ));
}

#[test]
fn builtin_loader_names_match_exactly() {
    // "def" must not prefix-match the "default" table row.
    let mut resolver = LoaderResolver::new();
    let binding = LoaderBinding::Builtin {
        name: "def".to_string(),
    };
    let err = resolver.resolve(&binding).map(|_| ()).unwrap_err();
    assert!(matches!(err, LoaderError::LoaderNotFound(_)));
}

#[test]
fn default_builtin_loader_resolves() {
    let mut resolver = LoaderResolver::new();
    let binding = LoaderBinding::Builtin {
        name: "default".to_string(),
    };
    let loader = resolver.resolve(&binding).unwrap();
    assert_eq!(loader.name(), "default");
}

#[test]
fn dynamic_load_from_unreachable_path_is_a_typed_failure() {
    let mut resolver = LoaderResolver::new();
    let binding = LoaderBinding::Dynamic {
        name: "ext".to_string(),
        path: PathBuf::from("/nonexistent/libsentra_ext.so"),
    };
    let err = resolver.resolve(&binding).map(|_| ()).unwrap_err();
    assert!(matches!(err, LoaderError::DynamicLoadFailed { .. }));
}

#[test]
fn loader_type_parsing_is_exact() {
    assert!(matches!(LoaderType::from_str("builtin"), Ok(LoaderType::Builtin)));
    assert!(matches!(LoaderType::from_str("dynamic"), Ok(LoaderType::Dynamic)));
    assert!(matches!(
        LoaderType::from_str("build"),
        Err(LoaderError::UnknownLoaderType(_))
    ));
    assert!(matches!(
        LoaderType::from_str(""),
        Err(LoaderError::UnknownLoaderType(_))
    ));
}

#[test]
fn default_loader_constructs_its_compiled_in_plugins() {
    let loader = DefaultLoader::new();
    let instance = loader.construct_instance("pwd").unwrap();
    assert_eq!(instance.name(), "pwd");
}

#[test]
fn default_loader_rejects_unknown_plugin_names() {
    let loader = DefaultLoader::new();
    // "pw" is a prefix of "pwd" and must not match.
    let err = loader.construct_instance("pw").map(|_| ()).unwrap_err();
    assert!(matches!(
        err,
        LoaderError::InstanceConstructionFailed { ref plugin, .. } if plugin == "pw"
    ));
}

struct NamedPlugin {
    name: String,
}

impl ServicePlugin for NamedPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[test]
fn instance_names_are_bounded_and_non_empty() {
    let empty = Arc::new(NamedPlugin {
        name: String::new(),
    });
    assert!(PluginInstance::new("test", empty).is_err());

    let over_long = Arc::new(NamedPlugin {
        name: "x".repeat(MAX_PLUGIN_NAME_LEN + 1),
    });
    assert!(PluginInstance::new("test", over_long).is_err());

    let at_limit = Arc::new(NamedPlugin {
        name: "x".repeat(MAX_PLUGIN_NAME_LEN),
    });
    assert!(PluginInstance::new("test", at_limit).is_ok());
}

#[test]
fn factory_builds_instances_through_the_resolved_loader() {
    let mut resolver = LoaderResolver::new();
    let binding = LoaderBinding::Builtin {
        name: "default".to_string(),
    };
    let instance = create_plugin_instance(&mut resolver, "pwd", &binding).unwrap();
    assert_eq!(instance.name(), "pwd");
}
