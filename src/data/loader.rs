//! Loading categorical tables from CSV.
//!
//! Every column is read as a categorical attribute. Labels are numbered in
//! order of first appearance. Empty cells, `?`, `NULL` and `NaN` are missing.
use crate::data::dataset::{is_missing_label, Attribute, Dataset, Schema, Value};
use crate::error::DataError;
use csv::{ReaderBuilder, StringRecord, Trim};
use nalgebra::{DMatrix, DVector};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// How a CSV table is read.
#[derive(Clone, Debug)]
pub struct LoadOptions {
    pub has_headers: bool,
    /// Column holding the class value; the last column when unset.
    pub class_column: Option<String>,
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            has_headers: true,
            class_column: None,
            delimiter: b',',
        }
    }
}

struct RawTable {
    headers: Vec<String>,
    records: Vec<StringRecord>,
}

fn read_raw<R: Read>(reader: R, options: &LoadOptions) -> Result<RawTable, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(options.has_headers)
        .delimiter(options.delimiter)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in reader.records() {
        records.push(result?);
    }

    let headers = if options.has_headers {
        reader.headers()?.iter().map(str::to_string).collect()
    } else {
        let width = records.first().map_or(0, StringRecord::len);
        (0..width).map(|i| format!("column_{}", i)).collect::<Vec<_>>()
    };

    if headers.is_empty() || records.is_empty() {
        return Err(DataError::EmptyTable);
    }
    Ok(RawTable { headers, records })
}

fn class_position(headers: &[String], class_column: Option<&str>) -> Result<usize, DataError> {
    match class_column {
        Some(name) => headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataError::UnknownColumn {
                name: name.to_string(),
            }),
        None => Ok(headers.len() - 1),
    }
}

/// Reads a CSV file and infers its schema.
pub fn read_file<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Dataset, DataError> {
    let file = std::fs::File::open(path.as_ref()).map_err(csv::Error::from)?;
    read_from(file, options)
}

/// Reads CSV data and infers its schema.
pub fn read_from<R: Read>(reader: R, options: &LoadOptions) -> Result<Dataset, DataError> {
    let table = read_raw(reader, options)?;
    let class_index = class_position(&table.headers, options.class_column.as_deref())?;

    let feature_columns: Vec<usize> = (0..table.headers.len()).filter(|&c| c != class_index).collect();
    let mut features: Vec<Attribute> = feature_columns
        .iter()
        .map(|&c| Attribute::new(table.headers[c].clone(), Vec::<String>::new()))
        .collect();
    let mut class = Attribute::new(table.headers[class_index].clone(), Vec::<String>::new());

    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(table.records.len());
    let mut classes = Vec::with_capacity(table.records.len());
    for (row, record) in table.records.iter().enumerate() {
        let label = record.get(class_index).unwrap_or("");
        if is_missing_label(label) {
            return Err(DataError::MissingClass { row });
        }
        classes.push(class.intern(label));

        let values = feature_columns
            .iter()
            .zip(features.iter_mut())
            .map(|(&c, attribute)| {
                let cell = record.get(c).unwrap_or("");
                (!is_missing_label(cell)).then(|| attribute.intern(cell))
            })
            .collect();
        rows.push(values);
    }

    debug!(
        records = rows.len(),
        attributes = features.len(),
        class = class.name(),
        "loaded categorical table"
    );
    Dataset::from_rows(Schema::new(features, class), &rows, &classes)
}

/// Reads a CSV file against an existing schema, matching columns by name.
pub fn read_file_with_schema<P: AsRef<Path>>(
    path: P,
    options: &LoadOptions,
    schema: Arc<Schema>,
) -> Result<Dataset, DataError> {
    let file = std::fs::File::open(path.as_ref()).map_err(csv::Error::from)?;
    read_with_schema(file, options, schema)
}

/// Reads CSV data against an existing schema.
///
/// Columns are matched to the schema's attributes by name and labels are
/// mapped to the schema's value indices. A feature label the schema has
/// never seen is read as missing; an unknown class label is an error.
pub fn read_with_schema<R: Read>(
    reader: R,
    options: &LoadOptions,
    schema: Arc<Schema>,
) -> Result<Dataset, DataError> {
    let table = read_raw(reader, options)?;
    let class_name = options
        .class_column
        .clone()
        .unwrap_or_else(|| schema.class().name().to_string());
    let class_index = class_position(&table.headers, Some(class_name.as_str()))?;

    let columns = schema
        .features()
        .iter()
        .map(|attribute| {
            table
                .headers
                .iter()
                .position(|h| h == attribute.name())
                .ok_or_else(|| DataError::UnknownColumn {
                    name: attribute.name().to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut classes = Vec::with_capacity(table.records.len());
    for (row, record) in table.records.iter().enumerate() {
        let label = record.get(class_index).unwrap_or("");
        if is_missing_label(label) {
            return Err(DataError::MissingClass { row });
        }
        let class = schema
            .class()
            .index_of(label)
            .ok_or_else(|| DataError::UnknownClassLabel {
                label: label.to_string(),
            })?;
        classes.push(class);
    }

    let records = &table.records;
    let x = DMatrix::from_fn(records.len(), columns.len(), |r, c| {
        let cell = records[r].get(columns[c]).unwrap_or("");
        if is_missing_label(cell) {
            return None;
        }
        let attribute = schema.feature(c);
        let value = attribute.index_of(cell);
        if value.is_none() {
            warn!(
                attribute = attribute.name(),
                label = cell,
                row = r,
                "label not seen during training, reading it as missing"
            );
        }
        value
    });

    Dataset::with_shared_schema(schema, x, DVector::from_vec(classes))
}
