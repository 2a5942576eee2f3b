//! ID3 Decision Tree Classifier
use super::critical::{CriticalValueTable, CriticalValues};
use super::gain::{table_entropy, GainAccumulator};
use super::imputation::ImputationIndex;
use super::node::TreeNode;
use super::params::{Confidence, Id3Params, MissingValues};
use crate::data::dataset::{Dataset, Schema, Value};
use crate::error::Id3Error;
use crate::metrics::confusion::ClassificationMetrics;
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Records of a node grouped by the value they take for `attribute`.
struct SplitData {
    attribute: usize,
    information_gain: f64,
    partitions: BTreeMap<usize, Vec<usize>>,
}

/// Chi-squared statistic of the class distribution across `partitions`.
///
/// Each partition lists record indices of `dataset`. Expected counts come
/// from the class proportions of the whole dataset; cells with an expected
/// count of zero are skipped.
pub fn chi_squared_statistic(dataset: &Dataset, partitions: &BTreeMap<usize, Vec<usize>>) -> f64 {
    let total = dataset.nrows() as f64;
    let totals = dataset.class_counts();

    partitions
        .values()
        .map(|rows| {
            let mut observed = vec![0; totals.len()];
            for &row in rows {
                observed[dataset.class_of(row)] += 1;
            }
            let size = rows.len() as f64;
            totals
                .iter()
                .zip(&observed)
                .filter_map(|(&class_total, &count)| {
                    let expected = size * (class_total as f64 / total);
                    (expected > 0.0).then(|| (count as f64 - expected).powi(2) / expected)
                })
                .sum::<f64>()
        })
        .sum()
}

/// Induces a tree from `dataset` with the given confidence code (0, 1 or 2).
pub fn train(dataset: &Dataset, confidence: u8) -> Result<Id3Classifier, Id3Error> {
    let mut classifier = Id3Classifier::with_params(Some(confidence), None)?;
    classifier.fit(dataset)?;
    Ok(classifier)
}

/// ID3 Decision Tree Classifier
///
/// Splits on the attribute with the highest information gain, keeps a split
/// only when its chi-squared statistic clears the critical value for the
/// configured confidence, and substitutes missing values with the most
/// frequent value seen for the record's class.
#[derive(Clone, Debug)]
pub struct Id3Classifier<C: CriticalValues = CriticalValueTable> {
    root: Option<TreeNode>,
    imputation: Option<ImputationIndex>,
    schema: Option<Arc<Schema>>,
    params: Id3Params,
    critical_values: C,
}

impl Default for Id3Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CriticalValues> ClassificationMetrics for Id3Classifier<C> {}

impl Id3Classifier {
    /// Creates a classifier with 95% confidence pruning and imputation.
    pub fn new() -> Self {
        Self::with_critical_values(Id3Params::new(), CriticalValueTable)
    }

    /// Creates a classifier with custom parameters.
    ///
    /// # Arguments
    ///
    /// * `confidence` - Confidence code: 0 for 95%, 1 for 99%, 2 to disable pruning.
    /// * `missing_values` - Whether missing training values are imputed or rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Id3Error::InvalidConfidenceLevel`] for codes other than 0, 1 and 2.
    pub fn with_params(
        confidence: Option<u8>,
        missing_values: Option<MissingValues>,
    ) -> Result<Self, Id3Error> {
        let mut classifier = Self::new();
        classifier.set_confidence(confidence.unwrap_or(0))?;
        classifier.set_missing_values(missing_values.unwrap_or_default());
        Ok(classifier)
    }
}

impl<C: CriticalValues> Id3Classifier<C> {
    /// Creates a classifier that reads thresholds from `critical_values`.
    pub fn with_critical_values(params: Id3Params, critical_values: C) -> Self {
        Self {
            root: None,
            imputation: None,
            schema: None,
            params,
            critical_values,
        }
    }

    pub fn set_confidence(&mut self, level: u8) -> Result<(), Id3Error> {
        self.params.set_confidence(level)
    }

    pub fn set_missing_values(&mut self, missing_values: MissingValues) {
        self.params.set_missing_values(missing_values)
    }

    pub fn params(&self) -> &Id3Params {
        &self.params
    }

    /// The induced tree, once [`fit`](Self::fit) succeeded.
    pub fn tree(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    pub fn imputation(&self) -> Option<&ImputationIndex> {
        self.imputation.as_ref()
    }

    /// Schema of the table the tree was trained on.
    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_deref()
    }

    /// Builds the decision tree from a dataset.
    ///
    /// # Errors
    ///
    /// Fails on an empty table, a table without feature attributes, a missing
    /// value that cannot be imputed (or any missing value when imputation is
    /// off), and a chi-squared lookup outside the critical-value table.
    #[instrument(skip_all, fields(records = dataset.nrows()))]
    pub fn fit(&mut self, dataset: &Dataset) -> Result<&TreeNode, Id3Error> {
        if dataset.nrows() == 0 {
            return Err(Id3Error::EmptyDataset);
        }
        if dataset.in_scope().is_empty() {
            return Err(Id3Error::NoSplittableAttributes);
        }

        let index = ImputationIndex::build(dataset);
        let prepared = match self.params.missing_values() {
            MissingValues::Impute => index.fill(dataset)?,
            MissingValues::Reject => {
                Self::check_complete(dataset)?;
                dataset.clone()
            }
        };

        info!(
            attributes = dataset.in_scope().len(),
            classes = dataset.schema().num_classes(),
            confidence = ?self.params.confidence(),
            "building ID3 tree"
        );
        let root = self.build_tree(&prepared)?;
        info!(
            nodes = root.num_nodes(),
            leaves = root.num_leaves(),
            depth = root.depth(),
            "finished building the tree"
        );

        self.schema = Some(dataset.shared_schema());
        self.imputation = Some(index);
        Ok(self.root.insert(root))
    }

    fn check_complete(dataset: &Dataset) -> Result<(), Id3Error> {
        for &feature in dataset.in_scope() {
            if let Some(row) = (0..dataset.nrows()).find(|&row| dataset.value(row, feature).is_none()) {
                return Err(Id3Error::MissingValue {
                    attribute: dataset.schema().feature(feature).name().to_string(),
                    row,
                });
            }
        }
        Ok(())
    }

    fn build_tree(&self, dataset: &Dataset) -> Result<TreeNode, Id3Error> {
        let records = dataset.nrows();
        if let Some(class) = dataset.pure_class() {
            return Ok(TreeNode::leaf(class, records));
        }
        let majority = dataset.majority_class().ok_or(Id3Error::EmptyDataset)?;
        if dataset.in_scope().is_empty() {
            return Ok(TreeNode::leaf(majority, records));
        }

        let Some(split) = self.get_best_split(dataset) else {
            return Ok(TreeNode::leaf(majority, records));
        };
        if !self.is_significant(dataset, &split)? {
            return Ok(TreeNode::leaf(majority, records));
        }

        let attribute = split.attribute;
        let children = split
            .partitions
            .into_par_iter()
            .map(|(value, rows)| -> Result<(usize, TreeNode), Id3Error> {
                let subset = dataset.select(&rows).without_attribute(attribute);
                Ok((value, self.build_tree(&subset)?))
            })
            .collect::<Result<BTreeMap<_, _>, Id3Error>>()?;

        Ok(TreeNode::Internal {
            attribute,
            children,
            records,
        })
    }

    /// Attribute with the strictly highest gain; ties keep the earlier attribute.
    fn get_best_split(&self, dataset: &Dataset) -> Option<SplitData> {
        let baseline = table_entropy(dataset);
        let num_classes = dataset.schema().num_classes();

        let gains = dataset
            .in_scope()
            .par_iter()
            .map(|&feature| {
                let mut accumulator = GainAccumulator::new(num_classes);
                for row in 0..dataset.nrows() {
                    if let Some(value) = dataset.value(row, feature) {
                        accumulator.add_observation(value, dataset.class_of(row));
                    }
                }
                (feature, accumulator.gain(baseline))
            })
            .collect::<Vec<_>>();

        let mut best: Option<(usize, f64)> = None;
        for (feature, gain) in gains {
            if best.map_or(true, |(_, best_gain)| gain > best_gain) {
                best = Some((feature, gain));
            }
        }
        let (attribute, information_gain) = best?;

        let mut partitions: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for row in 0..dataset.nrows() {
            if let Some(value) = dataset.value(row, attribute) {
                partitions.entry(value).or_default().push(row);
            }
        }

        Some(SplitData {
            attribute,
            information_gain,
            partitions,
        })
    }

    fn is_significant(&self, dataset: &Dataset, split: &SplitData) -> Result<bool, Id3Error> {
        let name = dataset.schema().feature(split.attribute).name();
        let confidence = self.params.confidence();
        if confidence == Confidence::Unpruned {
            debug!(
                attribute = name,
                gain = split.information_gain,
                records = dataset.nrows(),
                "splitting without significance test"
            );
            return Ok(true);
        }

        // a single observed branch cannot separate anything
        if split.partitions.len() < 2 {
            return Ok(false);
        }
        let degrees_of_freedom = dataset.schema().feature(split.attribute).num_values() - 1;

        let statistic = chi_squared_statistic(dataset, &split.partitions);
        let critical = self
            .critical_values
            .critical_value(degrees_of_freedom, confidence)?;
        debug!(
            attribute = name,
            gain = split.information_gain,
            records = dataset.nrows(),
            chi_squared = statistic,
            critical,
            "tested split"
        );
        Ok(statistic > critical)
    }

    /// Predicts the class of one record, given in training-schema order.
    ///
    /// Missing values and values without a branch are replaced by the
    /// most frequent value observed across classes.
    pub fn classify(&self, record: &DVector<Value>) -> Result<usize, Id3Error> {
        self.classify_with_class(record, None)
    }

    /// Predicts the class of one record whose true class may be known.
    ///
    /// A known class selects the class-specific substitute for missing values.
    pub fn classify_with_class(
        &self,
        record: &DVector<Value>,
        class: Option<usize>,
    ) -> Result<usize, Id3Error> {
        let root = self.root.as_ref().ok_or(Id3Error::NotFitted)?;
        let schema = self.schema.as_ref().ok_or(Id3Error::NotFitted)?;
        let index = self.imputation.as_ref().ok_or(Id3Error::NotFitted)?;
        if record.len() != schema.num_features() {
            return Err(Id3Error::SchemaMismatch {
                expected: schema.num_features(),
                found: record.len(),
            });
        }

        let mut node = root;
        loop {
            let (attribute, children) = match node {
                TreeNode::Leaf { class, .. } => return Ok(*class),
                TreeNode::Internal {
                    attribute,
                    children,
                    ..
                } => (*attribute, children),
            };

            let value = match schema.feature(attribute).decode(record[attribute]) {
                Some(value) => value,
                None => index.impute(attribute, class)?,
            };
            node = match children.get(&value) {
                Some(child) => child,
                None => index
                    .impute(attribute, class)
                    .ok()
                    .and_then(|substitute| children.get(&substitute))
                    .ok_or_else(|| Id3Error::UnknownBranch {
                        attribute: schema.feature(attribute).name().to_string(),
                        value,
                    })?,
            };
        }
    }

    /// Predicts the class of every row of `features`.
    pub fn predict(&self, features: &DMatrix<Value>) -> Result<DVector<usize>, Id3Error> {
        let predictions = features
            .row_iter()
            .map(|row| self.classify(&row.transpose()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DVector::from_vec(predictions))
    }

    /// Predicts every record of a labelled table, using each record's class for imputation.
    pub fn predict_dataset(&self, dataset: &Dataset) -> Result<DVector<usize>, Id3Error> {
        let predictions = (0..dataset.nrows())
            .map(|row| self.classify_with_class(&dataset.record(row), Some(dataset.class_of(row))))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DVector::from_vec(predictions))
    }

    /// Fraction of records of `dataset` whose predicted class equals their own.
    pub fn evaluate(&self, dataset: &Dataset) -> Result<f64, Id3Error> {
        if dataset.nrows() == 0 {
            return Err(Id3Error::EmptyDataset);
        }
        let predictions = self.predict_dataset(dataset)?;
        let correct = predictions
            .iter()
            .zip(dataset.y.iter())
            .filter(|(predicted, actual)| predicted == actual)
            .count();
        Ok(correct as f64 / dataset.nrows() as f64)
    }
}
