//! Delimited demographic table parsing.

use std::{collections::BTreeMap, io::Cursor};

use anyhow::{anyhow, Context, Result};
use log::warn;
use polars::prelude::*;

use super::feature::RegionId;

/// One typed cell of a demographic row.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Finite numbers become `Number`; everything else is kept as text.
    fn parse(cell: &str) -> Self {
        match cell.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => FieldValue::Number(n),
            _ => FieldValue::Text(cell.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    pub(crate) fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Number(n) => serde_json::Number::from_f64(*n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            FieldValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

/// A row of demographic data keyed by its region.
#[derive(Debug, Clone, PartialEq)]
pub struct DemographicRecord {
    pub id: RegionId,
    /// Every non-identifier column with a non-empty cell.
    pub fields: BTreeMap<String, FieldValue>,
}

impl DemographicRecord {
    pub fn get(&self, field: &str) -> Option<&FieldValue> { self.fields.get(field) }

    pub fn number(&self, field: &str) -> Option<f64> { self.get(field).and_then(FieldValue::as_f64) }
}

/// Reads delimited text with a header row into records keyed by `id_column`.
///
/// Every column is read as text so identifiers keep their leading zeros.
/// Rows with an empty identifier are dropped with a warning; cells beyond the
/// header's width are ignored.
pub(crate) fn read_records(bytes: &[u8], id_column: &str, delimiter: u8) -> Result<Vec<DemographicRecord>> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|options| options
            .with_separator(delimiter)
            .with_truncate_ragged_lines(true))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .context("[data::csv] Failed to read delimited data")?;

    let ids = df.column(id_column)
        .map_err(|_| anyhow!("[data::csv] Missing identifier column {id_column:?}"))?
        .str()
        .context("[data::csv] Identifier column is not text")?;

    let columns = df.get_columns().iter()
        .filter(|column| column.name().as_str() != id_column)
        .map(|column| {
            let values = column.str()
                .with_context(|| format!("[data::csv] Column {:?} is not text", column.name()))?;
            Ok((column.name().to_string(), values))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let Some(id) = ids.get(row).and_then(RegionId::new) else {
            warn!("[data::csv] Dropping row {}: empty {id_column:?}", row + 1);
            continue;
        };

        let fields = columns.iter()
            .filter_map(|(name, values)| {
                let cell = values.get(row)?;
                (!cell.trim().is_empty()).then(|| (name.clone(), FieldValue::parse(cell)))
            })
            .collect();

        records.push(DemographicRecord { id, fields });
    }

    Ok(records)
}
