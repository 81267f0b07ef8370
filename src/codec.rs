//! CSV encoding of API records and decoding of stored files.

use crate::errors::{AppError, AppResult};
use crate::models::Record;
use serde_json::Value;

/// A header row plus data rows, every row as wide as the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a table whose columns follow the field order of the first record.
    ///
    /// Later records may omit fields (empty cell) but may not add new ones.
    pub fn from_records(records: &[Record]) -> AppResult<Self> {
        let first = records
            .first()
            .ok_or_else(|| AppError::DataError("no records to derive a header from".into()))?;
        let headers: Vec<String> = first.keys().cloned().collect();

        let mut rows = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            if let Some(extra) = record.keys().find(|k| !first.contains_key(k.as_str())) {
                return Err(AppError::DataError(format!(
                    "record {index} has field '{extra}' not present in header"
                )));
            }
            rows.push(
                headers
                    .iter()
                    .map(|h| record.get(h).map(render_cell).unwrap_or_default())
                    .collect(),
            );
        }

        Ok(Self { headers, rows })
    }

    /// Appends another table's rows, matching columns by name.
    ///
    /// An empty table adopts the other's header.
    pub fn append(&mut self, other: Table) -> AppResult<()> {
        if self.headers.is_empty() {
            *self = other;
            return Ok(());
        }

        let mut positions = Vec::with_capacity(other.headers.len());
        for name in &other.headers {
            let position = self
                .headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| AppError::DataError(format!("unexpected column '{name}'")))?;
            positions.push(position);
        }

        for row in other.rows {
            let mut merged = vec![String::new(); self.headers.len()];
            for (value, &position) in row.into_iter().zip(&positions) {
                merged[position] = value;
            }
            self.rows.push(merged);
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_csv(&self) -> AppResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer
            .into_inner()
            .map_err(|e| AppError::IoError(format!("Failed to flush CSV buffer: {e}")))
    }

    pub fn from_csv(bytes: &[u8]) -> AppResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Ok(Self::default());
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }
        Ok(Self { headers, rows })
    }
}

/// Renders one JSON value as a CSV cell.
///
/// Strings are written verbatim and `null` as an empty cell; everything else uses
/// its compact JSON text.
pub fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Encodes API records as CSV bytes with a header row.
pub fn encode_records(records: &[Record]) -> AppResult<Vec<u8>> {
    Table::from_records(records)?.to_csv()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: Value) -> Vec<Record> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn header_follows_first_record_order() {
        let recs = records(json!([{"b": 2, "a": 1}, {"a": 3, "b": 4}]));
        let csv = encode_records(&recs).unwrap();
        assert_eq!(String::from_utf8(csv).unwrap(), "b,a\n2,1\n4,3\n");
    }

    #[test]
    fn single_record_scenario() {
        let recs = records(json!([{"a": 1, "b": 2}]));
        let csv = encode_records(&recs).unwrap();
        assert_eq!(String::from_utf8(csv).unwrap(), "a,b\n1,2\n");
    }

    #[test]
    fn missing_field_is_empty_and_null_is_empty() {
        let recs = records(json!([{"a": 1, "b": null}, {"a": 2}]));
        let table = Table::from_records(&recs).unwrap();
        assert_eq!(table.rows, vec![vec!["1", ""], vec!["2", ""]]);
    }

    #[test]
    fn extra_field_is_rejected() {
        let recs = records(json!([{"a": 1}, {"a": 2, "c": 3}]));
        let err = Table::from_records(&recs).unwrap_err();
        assert!(matches!(err, AppError::DataError(_)));
        assert!(err.to_string().contains("'c'"));
    }

    #[test]
    fn empty_records_cannot_form_a_table() {
        assert!(matches!(
            Table::from_records(&[]),
            Err(AppError::DataError(_))
        ));
    }

    #[test]
    fn cells_render_by_type() {
        assert_eq!(render_cell(&json!("2024-01-01 00:15:00")), "2024-01-01 00:15:00");
        assert_eq!(render_cell(&json!(1.5)), "1.5");
        assert_eq!(render_cell(&json!(true)), "true");
        assert_eq!(render_cell(&json!(null)), "");
        assert_eq!(render_cell(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn quoted_values_survive_decode() {
        let recs = records(json!([{"note": "a, \"b\"", "n": 1}]));
        let csv = encode_records(&recs).unwrap();
        let table = Table::from_csv(&csv).unwrap();
        assert_eq!(table.headers, vec!["note", "n"]);
        assert_eq!(table.rows, vec![vec!["a, \"b\"", "1"]]);
    }

    #[test]
    fn decode_empty_input() {
        let table = Table::from_csv(b"").unwrap();
        assert!(table.headers.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn decode_ragged_rows_is_parse_error() {
        let err = Table::from_csv(b"a,b\n1\n").unwrap_err();
        assert!(matches!(err, AppError::ParseError(_)));
    }

    #[test]
    fn append_matches_columns_by_name() {
        let mut left = Table::from_csv(b"a,b\n1,2\n").unwrap();
        let right = Table::from_csv(b"b,a\n4,3\n").unwrap();
        left.append(right).unwrap();
        assert_eq!(left.rows, vec![vec!["1", "2"], vec!["3", "4"]]);

        let partial = Table::from_csv(b"a\n5\n").unwrap();
        left.append(partial).unwrap();
        assert_eq!(left.rows[2], vec!["5", ""]);

        let unknown = Table::from_csv(b"z\n9\n").unwrap();
        assert!(left.append(unknown).is_err());
    }

    #[test]
    fn append_into_empty_adopts_header() {
        let mut table = Table::default();
        table.append(Table::from_csv(b"x,y\n1,2\n").unwrap()).unwrap();
        assert_eq!(table.headers, vec!["x", "y"]);
        assert_eq!(table.rows.len(), 1);
    }
}
