//! The plugin manager: owns the service registry, drives bootstrap through
//! the configured backend, and answers service lookups.

use std::path::Path;

use log::{info, warn};

use crate::config::ConfigBackend;
use crate::plugin_system::error::{ConfigError, LookupError, PluginSystemError};
use crate::plugin_system::factory::create_plugin_instance;
use crate::plugin_system::loader::LoaderResolver;
use crate::plugin_system::registry::ServiceRegistry;
use crate::plugin_system::traits::PluginInstance;

/// Lifecycle states of a [`PluginManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerState {
    Uninitialized,
    Configured,
    Running,
    Stopped,
}

/// Construction-time knobs.
#[derive(Debug, Clone)]
pub struct ManagerOptions {
    /// Whether one service name may accumulate several `"service"`-typed
    /// plugin instances. On by default, the historical behavior.
    pub allow_multiple_instances_per_service: bool,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            allow_multiple_instances_per_service: true,
        }
    }
}

/// One descriptor that failed to bootstrap.
#[derive(Debug)]
pub struct BootstrapFailure {
    /// Best-effort identification of the failed entry: the plugin name or
    /// configuration nickname where one could be read.
    pub plugin: String,
    pub error: PluginSystemError,
}

/// Outcome of a [`PluginManager::configure`] pass.
#[derive(Debug, Default)]
pub struct BootstrapReport {
    pub registered: usize,
    pub failures: Vec<BootstrapFailure>,
}

impl BootstrapReport {
    fn fail(&mut self, plugin: &str, error: PluginSystemError) {
        warn!("failed to bootstrap plugin '{}': {}", plugin, error);
        self.failures.push(BootstrapFailure {
            plugin: plugin.to_string(),
            error,
        });
    }
}

/// Owns one service registry and the loader resolver feeding it.
///
/// `configure`, `start` and `stop` take `&mut self`, so the mutator phase
/// is exclusive by construction. Once configured, the manager can be put
/// behind an `Arc` and [`PluginManager::get_service`] called from any
/// number of readers; the instances it hands out are shared clones.
pub struct PluginManager {
    registry: ServiceRegistry,
    resolver: LoaderResolver,
    backend: Box<dyn ConfigBackend>,
    state: ManagerState,
}

impl PluginManager {
    /// Manager with default options over the crate's builtin loader table.
    pub fn new(backend: Box<dyn ConfigBackend>) -> Self {
        Self::with_options(backend, ManagerOptions::default())
    }

    pub fn with_options(backend: Box<dyn ConfigBackend>, options: ManagerOptions) -> Self {
        Self::with_resolver(backend, LoaderResolver::new(), options)
    }

    /// Manager over a caller-supplied resolver, for embedders that link
    /// their own compiled-in loader table.
    pub fn with_resolver(
        backend: Box<dyn ConfigBackend>,
        resolver: LoaderResolver,
        options: ManagerOptions,
    ) -> Self {
        Self {
            registry: ServiceRegistry::with_policy(options.allow_multiple_instances_per_service),
            resolver,
            backend,
            state: ManagerState::Uninitialized,
        }
    }

    pub fn state(&self) -> ManagerState {
        self.state
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// Bootstrap the registry from `source`.
    ///
    /// A failure on one descriptor is reported in the returned
    /// [`BootstrapReport`] and the remaining descriptors are still
    /// processed; only an unreadable or unparseable source aborts the pass.
    pub fn configure(&mut self, source: &Path) -> Result<BootstrapReport, ConfigError> {
        info!(
            "configuring plugins from '{}' via {} backend",
            source.display(),
            self.backend.name()
        );
        let entries = self.backend.load(source)?;
        let mut report = BootstrapReport::default();
        for entry in entries {
            let descriptor = match entry {
                Ok(descriptor) => descriptor,
                Err(error) => {
                    let label = error.entry_label().unwrap_or("<config>").to_string();
                    report.fail(&label, error.into());
                    continue;
                }
            };
            let binding = match descriptor.loader_binding() {
                Ok(binding) => binding,
                Err(error) => {
                    report.fail(&descriptor.plugin_name, error);
                    continue;
                }
            };
            let instance =
                match create_plugin_instance(&mut self.resolver, &descriptor.plugin_name, &binding) {
                    Ok(instance) => instance,
                    Err(error) => {
                        report.fail(&descriptor.plugin_name, error.into());
                        continue;
                    }
                };
            match self
                .registry
                .register(&descriptor.service_name, &descriptor.plugin_type, instance)
            {
                Ok(()) => {
                    info!(
                        "registered plugin '{}' for service '{}' (loader '{}', type '{}')",
                        descriptor.plugin_name,
                        descriptor.service_name,
                        descriptor.loader_name,
                        descriptor.plugin_type
                    );
                    report.registered += 1;
                }
                Err(error) => report.fail(&descriptor.plugin_name, error.into()),
            }
        }
        self.state = ManagerState::Configured;
        Ok(report)
    }

    /// Run start hooks on every registered instance, oldest registration
    /// first. Hook failures are logged and do not abort the sweep.
    pub fn start(&mut self) {
        if self.state != ManagerState::Configured {
            warn!("start() called in {:?} state; ignoring", self.state);
            return;
        }
        for instance in self.registry.instances_in_registration_order() {
            if let Err(error) = instance.handle().start() {
                warn!("plugin '{}' failed to start: {}", instance.name(), error);
            }
        }
        self.state = ManagerState::Running;
    }

    /// Run stop hooks in reverse registration order.
    pub fn stop(&mut self) {
        if self.state != ManagerState::Running {
            warn!("stop() called in {:?} state; ignoring", self.state);
            return;
        }
        for instance in self.registry.instances_in_registration_order().rev() {
            if let Err(error) = instance.handle().stop() {
                warn!("plugin '{}' failed to stop: {}", instance.name(), error);
            }
        }
        self.state = ManagerState::Stopped;
    }

    /// Look up the instance registered under `service_name` with
    /// `plugin_name`. Absence is an ordinary typed result, never a panic.
    pub fn get_service(
        &self,
        service_name: &str,
        plugin_name: &str,
    ) -> Result<PluginInstance, LookupError> {
        self.registry
            .lookup(service_name, plugin_name)
            .map(PluginInstance::clone)
    }
}
