//! The service registry: a growable table mapping service (API) name to
//! the plugin instances registered under it.

use log::debug;

use crate::plugin_system::error::{LookupError, RegistryError};
use crate::plugin_system::traits::PluginInstance;

/// Block size the entry table grows by when full. Growth is always a whole
/// block, never tightened to exact need.
pub const REGISTRY_EXTENSION: usize = 32;

/// Plugin type subject to the single-instance-per-service policy.
pub const SERVICE_PLUGIN_TYPE: &str = "service";

/// All instances registered under one service name, in registration order.
pub struct RegistryEntry {
    service_name: String,
    instances: Vec<PluginInstance>,
}

impl RegistryEntry {
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn instances(&self) -> &[PluginInstance] {
        &self.instances
    }
}

/// Service-name → instances table.
///
/// Population happens once during bootstrap; entries are found by linear
/// scan, which is fine at configuration-time sizes. The registry owns every
/// registered instance for the life of its manager — there is no
/// unregister path.
pub struct ServiceRegistry {
    entries: Vec<RegistryEntry>,
    /// (entry index, instance index) per registration, oldest first.
    registration_log: Vec<(usize, usize)>,
    allow_multiple: bool,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::with_policy(true)
    }

    /// `allow_multiple` is the `allow_multiple_instances_per_service`
    /// option: when false, a second `"service"`-typed registration under an
    /// occupied service name is rejected.
    pub fn with_policy(allow_multiple: bool) -> Self {
        Self {
            entries: Vec::new(),
            registration_log: Vec::new(),
            allow_multiple,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Find an entry by exact service name.
    pub fn entry(&self, service_name: &str) -> Option<&RegistryEntry> {
        self.entries
            .iter()
            .find(|entry| entry.service_name == service_name)
    }

    fn find_or_create_entry(&mut self, service_name: &str) -> usize {
        if let Some(index) = self
            .entries
            .iter()
            .position(|entry| entry.service_name == service_name)
        {
            return index;
        }
        if self.entries.len() == self.entries.capacity() {
            self.entries.reserve_exact(REGISTRY_EXTENSION);
        }
        // A failed extension would corrupt the registry's own bookkeeping;
        // that is a defect here, not caller misuse.
        assert!(
            self.entries.capacity() > self.entries.len(),
            "registry growth failed to extend capacity"
        );
        self.entries.push(RegistryEntry {
            service_name: service_name.to_string(),
            instances: Vec::new(),
        });
        self.entries.len() - 1
    }

    /// Append `instance` under `service_name`, creating the entry if
    /// needed.
    pub fn register(
        &mut self,
        service_name: &str,
        plugin_type: &str,
        instance: PluginInstance,
    ) -> Result<(), RegistryError> {
        let index = self.find_or_create_entry(service_name);
        if !self.allow_multiple
            && plugin_type == SERVICE_PLUGIN_TYPE
            && !self.entries[index].instances.is_empty()
        {
            return Err(RegistryError::AlreadyRegistered {
                service: service_name.to_string(),
            });
        }
        debug!(
            "registering plugin '{}' under service '{}'",
            instance.name(),
            service_name
        );
        self.entries[index].instances.push(instance);
        self.registration_log
            .push((index, self.entries[index].instances.len() - 1));
        Ok(())
    }

    /// Resolve `plugin_name` under `service_name`, exact match at both
    /// levels.
    pub fn lookup(
        &self,
        service_name: &str,
        plugin_name: &str,
    ) -> Result<&PluginInstance, LookupError> {
        let entry = self
            .entry(service_name)
            .ok_or_else(|| LookupError::ServiceNotFound(service_name.to_string()))?;
        entry
            .instances
            .iter()
            .find(|instance| instance.name() == plugin_name)
            .ok_or_else(|| LookupError::PluginNotFoundInService {
                service: service_name.to_string(),
                plugin: plugin_name.to_string(),
            })
    }

    /// All instances in global registration order, oldest first.
    pub fn instances_in_registration_order(
        &self,
    ) -> impl DoubleEndedIterator<Item = &PluginInstance> {
        self.registration_log
            .iter()
            .map(|&(entry, instance)| &self.entries[entry].instances[instance])
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
