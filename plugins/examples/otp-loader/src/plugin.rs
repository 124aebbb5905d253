//! Example dynamically loadable loader module.
//!
//! Builds as a `cdylib` and exports the versioned entry point the host
//! resolves by name (`sentra_loader_get_instance_v1`); the returned loader
//! constructs one-time-password plugin instances.

use std::any::Any;
use std::sync::Arc;

use sentra_core::plugin_system::error::LoaderError;
use sentra_core::plugin_system::traits::{
    LoaderRegistration, PluginInstance, ServiceLoader, ServicePlugin,
};

/// Time-based one-time-password service.
struct TotpAuth;

impl ServicePlugin for TotpAuth {
    fn name(&self) -> &str {
        "totp"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct OtpLoader;

impl ServiceLoader for OtpLoader {
    fn name(&self) -> &str {
        "otp_loader"
    }

    fn construct_instance(&self, plugin_name: &str) -> Result<PluginInstance, LoaderError> {
        match plugin_name {
            "totp" => PluginInstance::new(self.name(), Arc::new(TotpAuth)),
            other => Err(LoaderError::InstanceConstructionFailed {
                loader: self.name().to_string(),
                plugin: other.to_string(),
                reason: "this module only provides 'totp'".to_string(),
            }),
        }
    }
}

/// Entry point resolved by the host under
/// [`sentra_core::plugin_system::traits::LOADER_ENTRY_SYMBOL`].
#[no_mangle]
pub extern "C" fn sentra_loader_get_instance_v1() -> *mut LoaderRegistration {
    Box::into_raw(Box::new(LoaderRegistration {
        loader: Box::new(OtpLoader),
    }))
}
