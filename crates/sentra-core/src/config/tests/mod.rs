#[cfg(feature = "yaml-config")]
pub mod yaml_tests;
