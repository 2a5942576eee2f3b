//! Most-frequent-value substitution for missing attribute values.
use crate::data::dataset::{Dataset, Schema};
use crate::error::Id3Error;
use nalgebra::DMatrix;
use std::collections::HashMap;
use std::sync::Arc;

/// A substitute value and how often it was observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImputedValue {
    pub value: usize,
    pub count: usize,
}

/// Most frequent value per class and attribute, with a cross-class fallback.
#[derive(Clone, Debug)]
pub struct ImputationIndex {
    schema: Arc<Schema>,
    by_class: HashMap<usize, HashMap<usize, ImputedValue>>,
    fallback: HashMap<usize, ImputedValue>,
}

/// Value with the highest count; ties go to the lowest value index.
fn mode(counts: &[usize]) -> Option<ImputedValue> {
    let mut best: Option<ImputedValue> = None;
    for (value, &count) in counts.iter().enumerate() {
        if count > 0 && best.map_or(true, |b| count > b.count) {
            best = Some(ImputedValue { value, count });
        }
    }
    best
}

impl ImputationIndex {
    /// Tallies the observed values of every in-scope attribute of `dataset`.
    pub fn build(dataset: &Dataset) -> Self {
        let schema = dataset.shared_schema();
        let num_classes = schema.num_classes();
        let mut by_class: HashMap<usize, HashMap<usize, ImputedValue>> = HashMap::new();
        let mut fallback: HashMap<usize, ImputedValue> = HashMap::new();

        for &feature in dataset.in_scope() {
            let mut counts = vec![vec![0; schema.feature(feature).num_values()]; num_classes];
            for row in 0..dataset.nrows() {
                if let Some(value) = dataset.value(row, feature) {
                    counts[dataset.class_of(row)][value] += 1;
                }
            }

            for (class, class_counts) in counts.iter().enumerate() {
                let Some(imputed) = mode(class_counts) else {
                    continue;
                };
                by_class.entry(class).or_default().insert(feature, imputed);

                // highest count across classes, earlier class on ties
                let best = fallback.entry(feature).or_insert(imputed);
                if imputed.count > best.count {
                    *best = imputed;
                }
            }
        }

        Self {
            schema,
            by_class,
            fallback,
        }
    }

    /// Most frequent value of `feature` among records of `class`.
    pub fn get(&self, class: usize, feature: usize) -> Option<ImputedValue> {
        self.by_class.get(&class)?.get(&feature).copied()
    }

    /// The class-specific winner with the highest count, over all classes.
    pub fn fallback(&self, feature: usize) -> Option<ImputedValue> {
        self.fallback.get(&feature).copied()
    }

    /// Substitute for a missing value of `feature`.
    ///
    /// Uses the class-specific value when the class is known and has one,
    /// otherwise the cross-class fallback.
    pub fn impute(&self, feature: usize, class: Option<usize>) -> Result<usize, Id3Error> {
        class
            .and_then(|class| self.get(class, feature))
            .or_else(|| self.fallback(feature))
            .map(|imputed| imputed.value)
            .ok_or_else(|| Id3Error::UnresolvableMissingValue {
                attribute: self.schema.feature(feature).name().to_string(),
            })
    }

    /// A copy of `dataset` whose missing in-scope values are substituted.
    pub fn fill(&self, dataset: &Dataset) -> Result<Dataset, Id3Error> {
        let mut x: DMatrix<_> = dataset.x.clone();
        for &feature in dataset.in_scope() {
            for row in 0..dataset.nrows() {
                if dataset.value(row, feature).is_none() {
                    x[(row, feature)] = Some(self.impute(feature, Some(dataset.class_of(row)))?);
                }
            }
        }
        Ok(dataset.with_features(x))
    }
}
