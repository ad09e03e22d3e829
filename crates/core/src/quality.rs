//! Zero-to-one data-quality aggregation.
//!
//! For every column of a capture, count the cells whose numeric value lies in
//! `[0, 1]`. The result is a one-row table labelled with the key fields of the
//! source object.

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::key::ObjectKeyFields;

pub const RANGE_MIN: f64 = 0.0;
pub const RANGE_MAX: f64 = 1.0;

/// Count values inside `[min, max]`. NaN never counts.
pub fn count_values_in_range<I>(values: I, min: f64, max: f64) -> usize
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| *v >= min && *v <= max)
        .count()
}

/// A cell of the report row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportCell {
    Count(u64),
    Label(String),
}

impl ReportCell {
    fn to_field(&self) -> String {
        match self {
            Self::Count(n) => n.to_string(),
            Self::Label(s) => s.clone(),
        }
    }
}

/// One-row quality report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityReport {
    cells: Vec<(String, ReportCell)>,
}

impl QualityReport {
    /// Aggregate a dataset and attach the key labels.
    pub fn compute(dataset: &Dataset, fields: &ObjectKeyFields) -> Self {
        let mut report = Self {
            cells: dataset
                .columns()
                .iter()
                .map(|column| {
                    let count = count_values_in_range(column.numbers(), RANGE_MIN, RANGE_MAX);
                    (column.name.clone(), ReportCell::Count(count as u64))
                })
                .collect(),
        };

        report.set_label("device", &fields.device);
        report.set_label("traffic_type", &fields.traffic_type);
        report.set_label("attack", &fields.attack);
        report
    }

    /// Assign a label column, replacing a same-named column in place.
    fn set_label(&mut self, name: &str, value: &str) {
        let cell = ReportCell::Label(value.to_string());
        match self.cells.iter_mut().find(|(n, _)| n == name) {
            Some(existing) => existing.1 = cell,
            None => self.cells.push((name.to_string(), cell)),
        }
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&ReportCell> {
        self.cells
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, cell)| cell)
    }

    pub fn count(&self, name: &str) -> Option<u64> {
        match self.get(name) {
            Some(ReportCell::Count(n)) => Some(*n),
            _ => None,
        }
    }

    /// Serialize as CSV: header row plus a single data row, no index.
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        wtr.write_record(self.column_names())
            .map_err(|e| Error::write(format!("serialize report header: {}", e)))?;
        wtr.write_record(self.cells.iter().map(|(_, cell)| cell.to_field()))
            .map_err(|e| Error::write(format!("serialize report row: {}", e)))?;

        wtr.into_inner()
            .map_err(|e| Error::write(format!("flush report: {}", e)))
    }
}
