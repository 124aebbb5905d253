//! Loader resolution: the compiled-in loader table and runtime-loaded
//! loader modules, behind one [`LoaderResolver`] front end.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use log::debug;

use crate::plugin_system::default_loader::DefaultLoader;
use crate::plugin_system::error::LoaderError;
use crate::plugin_system::traits::{LOADER_ENTRY_SYMBOL, LoaderEntryFn, ServiceLoader};

/// How a loader is obtained: from the compiled-in table or from a shared
/// module opened at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderType {
    Builtin,
    Dynamic,
}

impl LoaderType {
    /// Parse a configured `loader_type` value, exact match only.
    ///
    /// The "absent means builtin" default is applied during descriptor
    /// validation, not here; every other spelling is a hard error.
    pub fn from_str(value: &str) -> Result<Self, LoaderError> {
        match value {
            "builtin" => Ok(LoaderType::Builtin),
            "dynamic" => Ok(LoaderType::Dynamic),
            other => Err(LoaderError::UnknownLoaderType(other.to_string())),
        }
    }
}

/// A validated reference to a loader. The dynamic variant cannot exist
/// without a module path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderBinding {
    Builtin { name: String },
    Dynamic { name: String, path: PathBuf },
}

impl LoaderBinding {
    pub fn loader_name(&self) -> &str {
        match self {
            LoaderBinding::Builtin { name } | LoaderBinding::Dynamic { name, .. } => name,
        }
    }
}

/// One row of the compiled-in loader table.
pub struct LoaderDescriptor {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn ServiceLoader>,
}

/// Loaders linked into this build. Closed set, resolved by exact name.
pub static BUILTIN_LOADERS: &[LoaderDescriptor] = &[LoaderDescriptor {
    name: "default",
    constructor: DefaultLoader::get_instance,
}];

/// Resolves loader bindings to live loader handles.
///
/// Dynamically opened modules are cached by path and stay resident for the
/// life of the process — they are never unloaded, so instances constructed
/// from them remain valid even past the owning manager.
pub struct LoaderResolver {
    table: &'static [LoaderDescriptor],
    loaded: HashMap<PathBuf, &'static Library>,
}

impl LoaderResolver {
    /// Resolver over the crate's [`BUILTIN_LOADERS`] table.
    pub fn new() -> Self {
        Self::with_table(BUILTIN_LOADERS)
    }

    /// Resolver over a caller-supplied compiled-in table. Embedding
    /// applications that link their own loaders use this.
    pub fn with_table(table: &'static [LoaderDescriptor]) -> Self {
        Self {
            table,
            loaded: HashMap::new(),
        }
    }

    pub fn resolve(&mut self, binding: &LoaderBinding) -> Result<Box<dyn ServiceLoader>, LoaderError> {
        match binding {
            LoaderBinding::Builtin { name } => self.resolve_builtin(name),
            LoaderBinding::Dynamic { name, path } => self.resolve_dynamic(name, path),
        }
    }

    fn resolve_builtin(&self, name: &str) -> Result<Box<dyn ServiceLoader>, LoaderError> {
        debug!("resolving builtin loader '{}'", name);
        self.table
            .iter()
            .find(|descriptor| descriptor.name == name)
            .map(|descriptor| (descriptor.constructor)())
            .ok_or_else(|| LoaderError::LoaderNotFound(name.to_string()))
    }

    fn resolve_dynamic(
        &mut self,
        name: &str,
        path: &Path,
    ) -> Result<Box<dyn ServiceLoader>, LoaderError> {
        debug!("resolving dynamic loader '{}' from {}", name, path.display());
        let library = self.library_for(path)?;
        let entry: Symbol<'_, LoaderEntryFn> = unsafe {
            library
                .get(LOADER_ENTRY_SYMBOL.as_bytes())
                .map_err(|_| LoaderError::EntryPointMissing {
                    path: path.to_path_buf(),
                    symbol: LOADER_ENTRY_SYMBOL,
                })?
        };
        let registration = unsafe { entry() };
        if registration.is_null() {
            return Err(LoaderError::DynamicLoadFailed {
                path: path.to_path_buf(),
                reason: format!("`{}` returned a null registration", LOADER_ENTRY_SYMBOL),
            });
        }
        let registration = unsafe { Box::from_raw(registration) };
        Ok(registration.loader)
    }

    fn library_for(&mut self, path: &Path) -> Result<&'static Library, LoaderError> {
        if let Some(library) = self.loaded.get(path).copied() {
            return Ok(library);
        }
        let library =
            unsafe { Library::new(path) }.map_err(|e| LoaderError::DynamicLoadFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        // Loader modules are never unloaded; leaking the handle keeps every
        // symbol and vtable valid for the process lifetime.
        let library: &'static Library = Box::leak(Box::new(library));
        self.loaded.insert(path.to_path_buf(), library);
        Ok(library)
    }
}

impl Default for LoaderResolver {
    fn default() -> Self {
        Self::new()
    }
}
