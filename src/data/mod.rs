/// Categorical tables
pub mod dataset;
/// CSV loading
pub mod loader;
