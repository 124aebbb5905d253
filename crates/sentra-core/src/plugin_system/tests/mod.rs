pub mod descriptor_tests;
pub mod loader_tests;
