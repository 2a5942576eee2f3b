/// ID3 classifier (the inducer)
pub mod classifier;
/// Chi-squared critical values
pub mod critical;
/// Entropy and information gain
pub mod gain;
/// Missing-value imputation
pub mod imputation;
/// Tree nodes and traversal
pub mod node;
/// Training parameters
pub mod params;
/// Text rendering of trees
pub mod render;
