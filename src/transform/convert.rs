use chrono::{NaiveDate, NaiveDateTime};

use crate::data::model::{CellValue, Column, ColumnType, Table};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Type coercion
// ---------------------------------------------------------------------------

/// Convert one column to the target logical type.
///
/// Numeric and datetime coercion are permissive: cells that do not parse
/// become null instead of failing the operation. Fails with
/// [`Error::Conversion`] only when the column does not exist.
pub fn coerce_column(table: &Table, name: &str, target: ColumnType) -> Result<Table> {
    let idx = table
        .column_index(name)
        .ok_or_else(|| Error::Conversion(format!("column '{name}' does not exist")))?;
    let column = &table.columns()[idx];

    let values: Vec<CellValue> = column
        .values
        .iter()
        .map(|v| match target {
            ColumnType::Numeric => to_numeric(v),
            ColumnType::Text => to_text(v),
            ColumnType::DateTime => to_datetime(v),
            ColumnType::Categorical => to_text(v),
        })
        .collect();

    Ok(table.replace_column(idx, Column::with_type(name, target, values)))
}

fn to_numeric(v: &CellValue) -> CellValue {
    match v {
        CellValue::Integer(_) | CellValue::Float(_) => v.clone(),
        CellValue::Bool(b) => CellValue::Integer(*b as i64),
        CellValue::Text(s) => match s.trim().parse::<i64>() {
            Ok(i) => CellValue::Integer(i),
            Err(_) => match s.trim().parse::<f64>() {
                Ok(f) => CellValue::Float(f),
                Err(_) => CellValue::Null,
            },
        },
        // epoch seconds, so a time axis can be regressed against
        CellValue::DateTime(dt) => CellValue::Integer(dt.and_utc().timestamp()),
        CellValue::Null => CellValue::Null,
    }
}

fn to_text(v: &CellValue) -> CellValue {
    match v {
        CellValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

fn to_datetime(v: &CellValue) -> CellValue {
    match v {
        CellValue::DateTime(_) => v.clone(),
        CellValue::Text(s) => parse_datetime(s.trim())
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Null),
        CellValue::Integer(i) => chrono::DateTime::from_timestamp(*i, 0)
            .map(|dt| CellValue::DateTime(dt.naive_utc()))
            .unwrap_or(CellValue::Null),
        CellValue::Float(f) => chrono::DateTime::from_timestamp(*f as i64, 0)
            .map(|dt| CellValue::DateTime(dt.naive_utc()))
            .unwrap_or(CellValue::Null),
        _ => CellValue::Null,
    }
}

/// Parse a datetime from the formats the tool accepts: ISO date, ISO
/// datetime (space or `T` separated), and slash-separated dates.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: [&str; 3] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
    ];
    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::new(vec![Column::new(
            "mixed",
            vec![
                CellValue::Text("1".into()),
                CellValue::Text("2.5".into()),
                CellValue::Text("n/a".into()),
                CellValue::Integer(4),
            ],
        )])
    }

    #[test]
    fn numeric_coercion_nulls_exactly_the_unparseable_cells() {
        let out = coerce_column(&table(), "mixed", ColumnType::Numeric).unwrap();
        let c = out.column("mixed").unwrap();
        assert_eq!(c.ty, ColumnType::Numeric);
        assert_eq!(c.values[0], CellValue::Integer(1));
        assert_eq!(c.values[1], CellValue::Float(2.5));
        assert_eq!(c.values[2], CellValue::Null);
        assert_eq!(c.values[3], CellValue::Integer(4));
    }

    #[test]
    fn numeric_coercion_is_idempotent_on_numeric_data() {
        let once = coerce_column(&table(), "mixed", ColumnType::Numeric).unwrap();
        let twice = coerce_column(&once, "mixed", ColumnType::Numeric).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn datetime_coercion_parses_the_supported_formats() {
        let t = Table::new(vec![Column::new(
            "when",
            vec![
                CellValue::Text("2024-03-01".into()),
                CellValue::Text("2024-03-01 12:30:00".into()),
                CellValue::Text("not a date".into()),
            ],
        )]);
        let out = coerce_column(&t, "when", ColumnType::DateTime).unwrap();
        let c = out.column("when").unwrap();
        assert_eq!(c.ty, ColumnType::DateTime);
        assert!(matches!(c.values[0], CellValue::DateTime(_)));
        assert!(matches!(c.values[1], CellValue::DateTime(_)));
        assert_eq!(c.values[2], CellValue::Null);
    }

    #[test]
    fn text_coercion_stringifies_and_keeps_nulls() {
        let t = Table::new(vec![Column::new(
            "n",
            vec![CellValue::Integer(7), CellValue::Null],
        )]);
        let out = coerce_column(&t, "n", ColumnType::Text).unwrap();
        let c = out.column("n").unwrap();
        assert_eq!(c.values[0], CellValue::Text("7".into()));
        assert_eq!(c.values[1], CellValue::Null);
    }

    #[test]
    fn categorical_coercion_retags_the_column() {
        let out = coerce_column(&table(), "mixed", ColumnType::Categorical).unwrap();
        assert_eq!(out.column("mixed").unwrap().ty, ColumnType::Categorical);
    }

    #[test]
    fn missing_column_is_a_conversion_error() {
        assert!(matches!(
            coerce_column(&table(), "nope", ColumnType::Numeric),
            Err(Error::Conversion(_))
        ));
    }
}
