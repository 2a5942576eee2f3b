//! Error types.

/// Errors raised while inducing a tree or classifying with one.
#[derive(Debug, thiserror::Error)]
pub enum Id3Error {
    /// Returned when a confidence code is not 0 (95%), 1 (99%) or 2 (unpruned).
    #[error("confidence level must be 0, 1 or 2, got {level}")]
    InvalidConfidenceLevel {
        /// The rejected code.
        level: u8,
    },

    /// Returned when the chi-squared table has no row for the requested degrees of freedom.
    #[error("no chi-squared critical value for {degrees_of_freedom} degrees of freedom")]
    DegreesOfFreedomOutOfRange {
        /// The degrees of freedom that were looked up.
        degrees_of_freedom: usize,
    },

    /// Returned when training is called on a table without records.
    #[error("training dataset has zero records")]
    EmptyDataset,

    /// Returned when training is called on a table whose only attribute is the class.
    #[error("training dataset has no attributes besides the class attribute")]
    NoSplittableAttributes,

    /// Returned when an attribute has no observed value to impute from.
    #[error("attribute '{attribute}' has no observed value to impute a missing value from")]
    UnresolvableMissingValue {
        /// Name of the attribute.
        attribute: String,
    },

    /// Returned when imputation is disabled and a missing value is met.
    #[error("record {row} has no value for attribute '{attribute}' and imputation is disabled")]
    MissingValue {
        /// Name of the attribute.
        attribute: String,
        /// Index of the record in the training table.
        row: usize,
    },

    /// Returned when inference reaches a value with no branch, even after imputation.
    #[error("no branch for value {value} of attribute '{attribute}'")]
    UnknownBranch {
        /// Name of the attribute tested at the node.
        attribute: String,
        /// Value index that had no child.
        value: usize,
    },

    /// Returned when predicting before the tree was built.
    #[error("tree wasn't built yet")]
    NotFitted,

    /// Returned when a record does not match the schema the tree was trained on.
    #[error("record has {found} attribute values, the tree expects {expected}")]
    SchemaMismatch {
        /// Number of feature attributes in the training schema.
        expected: usize,
        /// Number of values in the record.
        found: usize,
    },
}

/// Errors raised while building or loading a categorical table.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// Underlying CSV read or parse failure.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Returned when a table has no columns or no records.
    #[error("table is empty")]
    EmptyTable,

    /// Returned when the matrix, class vector and schema disagree in size.
    #[error("shape mismatch: {records} records with {classes} class values, {columns} columns for {attributes} attributes")]
    ShapeMismatch {
        records: usize,
        classes: usize,
        columns: usize,
        attributes: usize,
    },

    /// Returned when a value index falls outside its attribute's domain.
    #[error("value {value} is outside the domain of attribute '{attribute}' ({domain} labels)")]
    ValueOutOfDomain {
        attribute: String,
        value: usize,
        domain: usize,
    },

    /// Returned when a record has no class value.
    #[error("record {row} has no class value")]
    MissingClass { row: usize },

    /// Returned when a named column cannot be found.
    #[error("no column named '{name}'")]
    UnknownColumn { name: String },

    /// Returned when a class label was not seen in the training schema.
    #[error("class label '{label}' is not part of the training schema")]
    UnknownClassLabel { label: String },

    /// Returned when the train fraction is outside [0, 1].
    #[error("train size should be between 0.0 and 1.0, got {train_size}")]
    InvalidTrainSize { train_size: f64 },

    /// Returned when predictions and labels differ in length.
    #[error("predictions and labels are of different sizes: {labels} labels, {predictions} predictions")]
    LengthMismatch { labels: usize, predictions: usize },

    /// Returned when the holdout stride is zero.
    #[error("holdout stride must be at least 1")]
    InvalidHoldout,
}
