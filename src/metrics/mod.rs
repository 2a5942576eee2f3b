/// Confusion matrix and accuracy
pub mod confusion;
