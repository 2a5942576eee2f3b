//! # Rusty-id3
//!
//! `rusty-id3` induces decision trees from tables of categorical records with the
//! ID3 algorithm. Splits are chosen by information gain and, optionally, kept only
//! when a chi-squared test finds them significant. Missing values are replaced by
//! the most frequent value observed for the record's class.
//!
//! ## Getting Started
//!
//! To use `rusty-id3`, add the following to your `Cargo.toml` file:
//!
//! ```toml
//! [dependencies]
//! rusty-id3 = "*"
//! ```
//!
//! ## Example Usage
//!
//! Train an unpruned tree on a small table and classify a new record:
//!
//! ```rust
//! use nalgebra::DVector;
//! use rusty_id3::data::dataset::{Attribute, Dataset, Schema};
//! use rusty_id3::trees::classifier::Id3Classifier;
//! use rusty_id3::trees::render::render_tree;
//!
//! let schema = Schema::new(
//!     vec![Attribute::new("windy", ["no", "yes"])],
//!     Attribute::new("play", ["no", "yes"]),
//! );
//! let rows = vec![vec![Some(0)], vec![Some(0)], vec![Some(1)], vec![Some(1)]];
//! let dataset = Dataset::from_rows(schema, &rows, &[1, 1, 0, 0]).unwrap();
//!
//! let mut classifier = Id3Classifier::with_params(Some(2), None).unwrap();
//! classifier.fit(&dataset).unwrap();
//!
//! let prediction = classifier.classify(&DVector::from_vec(vec![Some(1)])).unwrap();
//! assert_eq!(prediction, 0);
//!
//! println!("{}", render_tree(classifier.tree().unwrap(), dataset.schema()));
//! ```

/// Categorical tables and CSV loading
pub mod data;
/// Error types
pub mod error;
/// Functions for evaluating model performance
pub mod metrics;
/// ID3 decision trees
pub mod trees;

pub use error::{DataError, Id3Error};
