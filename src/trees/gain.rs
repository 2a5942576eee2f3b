//! Entropy and information gain.
use crate::data::dataset::Dataset;
use std::collections::BTreeMap;

/// Shannon entropy (base 2) of a class-count distribution.
///
/// Zero counts contribute nothing; an empty distribution has entropy 0.
pub fn entropy(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    counts
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total as f64;
            -p * p.log2()
        })
        .sum()
}

/// Entropy of the class distribution over the table's records.
pub fn table_entropy(dataset: &Dataset) -> f64 {
    entropy(&dataset.class_counts())
}

/// Class counts per value of one attribute, tallied to compute its information gain.
#[derive(Clone, Debug)]
pub struct GainAccumulator {
    num_classes: usize,
    class_counts: BTreeMap<usize, Vec<usize>>,
    value_counts: BTreeMap<usize, usize>,
    total_count: usize,
}

impl GainAccumulator {
    pub fn new(num_classes: usize) -> Self {
        Self {
            num_classes,
            class_counts: BTreeMap::new(),
            value_counts: BTreeMap::new(),
            total_count: 0,
        }
    }

    /// Records one record having `value` for the attribute and class `class`.
    pub fn add_observation(&mut self, value: usize, class: usize) {
        debug_assert!(class < self.num_classes, "class {class} out of range");
        let num_classes = self.num_classes;
        self.class_counts
            .entry(value)
            .or_insert_with(|| vec![0; num_classes])[class] += 1;
        *self.value_counts.entry(value).or_insert(0) += 1;
        self.total_count += 1;
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn value_count(&self, value: usize) -> usize {
        self.value_counts.get(&value).copied().unwrap_or(0)
    }

    /// Number of distinct values observed.
    pub fn num_values(&self) -> usize {
        self.value_counts.len()
    }

    /// Entropy of the class distribution among records with `value`.
    pub fn value_entropy(&self, value: usize) -> f64 {
        self.class_counts
            .get(&value)
            .map_or(0.0, |counts| entropy(counts))
    }

    /// `baseline_entropy` minus the count-weighted entropy of each observed value.
    pub fn gain(&self, baseline_entropy: f64) -> f64 {
        if self.total_count == 0 {
            return baseline_entropy;
        }
        let remainder: f64 = self
            .value_counts
            .iter()
            .map(|(&value, &count)| {
                (count as f64 / self.total_count as f64) * self.value_entropy(value)
            })
            .sum();
        baseline_entropy - remainder
    }
}
