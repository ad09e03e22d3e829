//! Typed tabular dataset.
//!
//! An ordered list of named columns, all of the same length. Cells are typed
//! once when the dataset is built so the aggregation never re-parses text.

use std::collections::{HashMap, HashSet};
use std::io::Read;

use crate::error::{Error, Result};

/// Markers treated as a missing cell.
const MISSING_MARKERS: [&str; 7] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL"];

/// A single cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

impl Value {
    /// Type a raw cell.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if MISSING_MARKERS.contains(&trimmed) {
            return Self::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(trimmed.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Numeric cells, skipping text and missing ones.
    pub fn numbers(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(Value::as_f64)
    }
}

/// Ordered columns of equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    /// Build a dataset, rejecting columns of unequal length.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.values.len();
            if let Some(bad) = columns.iter().find(|c| c.values.len() != expected) {
                return Err(Error::parse(format!(
                    "column '{}' has {} rows, expected {}",
                    bad.name,
                    bad.values.len(),
                    expected
                )));
            }
        }
        Ok(Self { columns })
    }

    /// Decode comma-delimited text with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| Error::parse(format!("read header: {}", e)))?
            .clone();

        if headers.is_empty() {
            return Err(Error::parse("missing header row"));
        }

        let names = dedupe_names(headers.iter());
        let mut cells: Vec<Vec<Value>> = vec![Vec::new(); names.len()];

        for (i, record) in rdr.records().enumerate() {
            let record = record.map_err(|e| Error::parse(format!("record #{}: {}", i + 1, e)))?;
            for (column, raw) in cells.iter_mut().zip(record.iter()) {
                column.push(Value::parse(raw));
            }
        }

        let columns = names
            .into_iter()
            .zip(cells)
            .map(|(name, values)| Column::new(name, values))
            .collect();

        Self::new(columns)
    }

    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_csv_reader(bytes)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Number of data rows (the header is not a row).
    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Disambiguate repeated header names as `name.1`, `name.2`, ...
fn dedupe_names<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut suffixes: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::new();

    for header in headers {
        let header = header.trim();
        let mut name = header.to_string();
        // A renamed column may collide with a later literal header
        while taken.contains(&name) {
            let suffix = suffixes.entry(header.to_string()).or_insert(0);
            *suffix += 1;
            name = format!("{}.{}", header, suffix);
        }
        taken.insert(name.clone());
        names.push(name);
    }

    names
}
