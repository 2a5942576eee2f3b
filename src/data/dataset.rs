//! Categorical tables: attributes, schemas and datasets.
use crate::error::DataError;
use nalgebra::{DMatrix, DVector};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// A categorical cell: an index into the attribute's labels, or `None` when missing.
pub type Value = Option<usize>;

/// Returns true for labels that legacy encodings use to mark a missing value.
pub fn is_missing_label(label: &str) -> bool {
    let label = label.trim();
    label.is_empty()
        || label == "?"
        || label.eq_ignore_ascii_case("null")
        || label.eq_ignore_ascii_case("nan")
}

/// A categorical attribute with an ordered domain of labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    values: Vec<String>,
}

impl Attribute {
    pub fn new<N, I, L>(name: N, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn num_values(&self) -> usize {
        self.values.len()
    }

    pub fn label(&self, value: usize) -> Option<&str> {
        self.values.get(value).map(String::as_str)
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.values.iter().position(|v| v == label)
    }

    /// Maps values whose label is a missing-value sentinel to `None`.
    ///
    /// Indices outside the domain are passed through untouched, they simply
    /// never match a branch.
    pub fn decode(&self, value: Value) -> Value {
        value.filter(|&v| !self.label(v).is_some_and(is_missing_label))
    }

    pub(crate) fn intern(&mut self, label: &str) -> usize {
        match self.index_of(label) {
            Some(index) => index,
            None => {
                self.values.push(label.to_string());
                self.values.len() - 1
            }
        }
    }
}

/// Feature attributes in declaration order plus the class attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    features: Vec<Attribute>,
    class: Attribute,
}

impl Schema {
    pub fn new(features: Vec<Attribute>, class: Attribute) -> Self {
        Self { features, class }
    }

    pub fn features(&self) -> &[Attribute] {
        &self.features
    }

    pub fn feature(&self, index: usize) -> &Attribute {
        &self.features[index]
    }

    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.features.iter().position(|a| a.name() == name)
    }

    pub fn class(&self) -> &Attribute {
        &self.class
    }

    pub fn num_classes(&self) -> usize {
        self.class.num_values()
    }
}

/// A table of categorical records.
///
/// `x` holds one row per record and one column per feature of the schema, `y`
/// the class value of each record. Columns are never dropped; narrowing the
/// attributes under consideration only shrinks `in_scope`.
#[derive(Clone)]
pub struct Dataset {
    pub x: DMatrix<Value>,
    pub y: DVector<usize>,
    schema: Arc<Schema>,
    in_scope: Vec<usize>,
}

impl Debug for Dataset {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Dataset {{\n    x: [\n")?;

        for i in 0..self.x.nrows() {
            write!(f, "        [")?;
            for &j in &self.in_scope {
                let attribute = self.schema.feature(j);
                match self.x[(i, j)].and_then(|v| attribute.label(v)) {
                    Some(label) => write!(f, "{}, ", label)?,
                    None => write!(f, "?, ")?,
                }
            }
            writeln!(f, "],")?;
        }

        write!(f, "    ],\n    y: [")?;
        for i in 0..self.y.len() {
            write!(f, "{}, ", self.schema.class().label(self.y[i]).unwrap_or("?"))?;
        }
        write!(f, "]\n}}")
    }
}

impl Dataset {
    pub fn new(schema: Schema, x: DMatrix<Value>, y: DVector<usize>) -> Result<Self, DataError> {
        Self::with_shared_schema(Arc::new(schema), x, y)
    }

    pub fn with_shared_schema(
        schema: Arc<Schema>,
        x: DMatrix<Value>,
        y: DVector<usize>,
    ) -> Result<Self, DataError> {
        if x.nrows() != y.len() || x.ncols() != schema.num_features() {
            return Err(DataError::ShapeMismatch {
                records: x.nrows(),
                classes: y.len(),
                columns: x.ncols(),
                attributes: schema.num_features(),
            });
        }

        for (j, attribute) in schema.features().iter().enumerate() {
            for value in x.column(j).iter().flatten() {
                if *value >= attribute.num_values() {
                    return Err(DataError::ValueOutOfDomain {
                        attribute: attribute.name().to_string(),
                        value: *value,
                        domain: attribute.num_values(),
                    });
                }
            }
        }
        for &class in y.iter() {
            if class >= schema.num_classes() {
                return Err(DataError::ValueOutOfDomain {
                    attribute: schema.class().name().to_string(),
                    value: class,
                    domain: schema.num_classes(),
                });
            }
        }

        let in_scope = (0..schema.num_features()).collect();
        Ok(Self {
            x,
            y,
            schema,
            in_scope,
        })
    }

    /// Builds a table from row-major records.
    pub fn from_rows(schema: Schema, rows: &[Vec<Value>], classes: &[usize]) -> Result<Self, DataError> {
        let ncols = schema.num_features();
        if let Some(row) = rows.iter().find(|row| row.len() != ncols) {
            return Err(DataError::ShapeMismatch {
                records: rows.len(),
                classes: classes.len(),
                columns: row.len(),
                attributes: ncols,
            });
        }
        let x = DMatrix::from_fn(rows.len(), ncols, |r, c| rows[r][c]);
        let y = DVector::from_vec(classes.to_vec());
        Self::new(schema, x, y)
    }

    pub fn nrows(&self) -> usize {
        self.y.len()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn shared_schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    /// Feature attributes still available for splitting, in declaration order.
    pub fn in_scope(&self) -> &[usize] {
        &self.in_scope
    }

    /// Value of `feature` for record `row`, with sentinel labels read as missing.
    pub fn value(&self, row: usize, feature: usize) -> Value {
        self.schema.feature(feature).decode(self.x[(row, feature)])
    }

    pub fn class_of(&self, row: usize) -> usize {
        self.y[row]
    }

    /// The full feature vector of one record, in schema order.
    pub fn record(&self, row: usize) -> DVector<Value> {
        self.x.row(row).transpose()
    }

    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.schema.num_classes()];
        for &class in self.y.iter() {
            counts[class] += 1;
        }
        counts
    }

    /// Most frequent class value; ties go to the lowest class index.
    pub fn majority_class(&self) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (class, count) in self.class_counts().into_iter().enumerate() {
            if count > 0 && best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((class, count));
            }
        }
        best.map(|(class, _)| class)
    }

    /// The shared class value when every record has the same one.
    pub fn pure_class(&self) -> Option<usize> {
        let first = *self.y.iter().next()?;
        self.y.iter().all(|&c| c == first).then_some(first)
    }

    /// A copy holding only the given records, in the given order.
    pub fn select(&self, rows: &[usize]) -> Self {
        let x = DMatrix::from_fn(rows.len(), self.x.ncols(), |r, c| self.x[(rows[r], c)]);
        let y = DVector::from_fn(rows.len(), |r, _| self.y[rows[r]]);
        Self {
            x,
            y,
            schema: Arc::clone(&self.schema),
            in_scope: self.in_scope.clone(),
        }
    }

    /// The same records with `feature` taken out of scope.
    pub fn without_attribute(mut self, feature: usize) -> Self {
        self.in_scope.retain(|&f| f != feature);
        self
    }

    pub(crate) fn with_features(&self, x: DMatrix<Value>) -> Self {
        Self {
            x,
            y: self.y.clone(),
            schema: Arc::clone(&self.schema),
            in_scope: self.in_scope.clone(),
        }
    }

    /// Moves every `every`-th record (starting with the first) into a validation table.
    ///
    /// Positions are taken from the unsplit table, so with `every = 10` the
    /// records at 0, 10, 20, ... are held out. Removing records one by one
    /// while stepping through the shrinking list would instead pick 0, 11, 22.
    pub fn holdout_every_nth(&self, every: usize) -> Result<(Self, Self), DataError> {
        if every == 0 {
            return Err(DataError::InvalidHoldout);
        }
        let (validation, train): (Vec<usize>, Vec<usize>) =
            (0..self.nrows()).partition(|index| index % every == 0);
        Ok((self.select(&train), self.select(&validation)))
    }

    pub fn train_test_split(
        &self,
        train_size: f64,
        seed: Option<u64>,
    ) -> Result<(Self, Self), DataError> {
        if !(0.0..=1.0).contains(&train_size) {
            return Err(DataError::InvalidTrainSize { train_size });
        }
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut indices = (0..self.nrows()).collect::<Vec<_>>();
        indices.shuffle(&mut rng);
        let train_size = (self.nrows() as f64 * train_size).floor() as usize;

        Ok((
            self.select(&indices[..train_size]),
            self.select(&indices[train_size..]),
        ))
    }
}
