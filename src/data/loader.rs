use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use serde_json::Value as JsonValue;

use super::model::{CellValue, Column, Table};
use crate::error::Error;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Source file format tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Delimited text with a header row.
    Csv,
    /// Excel workbook; the first sheet is read.
    Excel,
    /// JSON array of record objects.
    Json,
}

impl FileFormat {
    pub fn label(&self) -> &'static str {
        match self {
            FileFormat::Csv => "CSV",
            FileFormat::Excel => "Excel",
            FileFormat::Json => "JSON",
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            FileFormat::Csv => &["csv"],
            FileFormat::Excel => &["xlsx", "xls"],
            FileFormat::Json => &["json"],
        }
    }
}

/// Load a table from a file in the declared format.
///
/// Column names come from the header row (or record keys); cell types are
/// whatever the per-cell parser infers. Fails with [`Error::Load`] on
/// malformed or unreadable input, leaving any previously loaded table to
/// the caller untouched.
pub fn load_file(path: &Path, format: FileFormat) -> crate::error::Result<Table> {
    let result = match format {
        FileFormat::Csv => load_csv(path),
        FileFormat::Excel => load_excel(path),
        FileFormat::Json => load_json(path),
    };
    result.map_err(|e| Error::Load(format!("{e:#}")))
}

fn check_unique_names(names: &[String]) -> Result<()> {
    let mut seen = std::collections::BTreeSet::new();
    for n in names {
        if !seen.insert(n.as_str()) {
            bail!("duplicate column name '{n}'");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per line. Each cell
/// is parsed permissively (integer, float, boolean, else text; empty → null).
fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    check_unique_names(&headers)?;

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != headers.len() {
            bail!(
                "CSV row {row_no}: expected {} fields, found {}",
                headers.len(),
                record.len()
            );
        }
        for (col_idx, value) in record.iter().enumerate() {
            cells[col_idx].push(CellValue::parse_token(value));
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Ok(Table::new(columns))
}

// ---------------------------------------------------------------------------
// Excel loader
// ---------------------------------------------------------------------------

/// Read the first sheet of a workbook. Row 0 is the header; every other row
/// is data. Cells keep the type the workbook stored.
fn load_excel(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no sheets")?
        .context("reading first sheet")?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .context("sheet is empty")?
        .iter()
        .map(|c| c.to_string())
        .collect();
    check_unique_names(&headers)?;

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for col_idx in 0..headers.len() {
            let value = row.get(col_idx).map_or(CellValue::Null, excel_to_cell);
            cells[col_idx].push(value);
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Ok(Table::new(columns))
}

fn excel_to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => CellValue::parse_token(s),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Null),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("{e:?}")),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "city": "Oslo", "temperature": -3.5, "day": 1 },
///   { "city": "Rome", "temperature": 17.0, "day": 1 }
/// ]
/// ```
///
/// Columns are the union of record keys in first-appearance order; records
/// missing a key get a null cell.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("expected top-level JSON array")?;

    let mut names: Vec<String> = Vec::new();
    let mut by_name: BTreeMap<String, usize> = BTreeMap::new();
    let mut rows: Vec<BTreeMap<usize, CellValue>> = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("row {i} is not a JSON object"))?;
        let mut row = BTreeMap::new();
        for (key, val) in obj {
            let idx = *by_name.entry(key.clone()).or_insert_with(|| {
                names.push(key.clone());
                names.len() - 1
            });
            row.insert(idx, json_to_cell(val));
        }
        rows.push(row);
    }

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::with_capacity(rows.len()); names.len()];
    for row in &rows {
        for (col_idx, column) in cells.iter_mut().enumerate() {
            column.push(row.get(&col_idx).cloned().unwrap_or(CellValue::Null));
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Ok(Table::new(columns))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnType;
    use std::io::Write;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("rusty-analyst-loader-tests");
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn csv_load_infers_types_and_nulls() {
        let path = temp_path("basic.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "city,temp,count").unwrap();
        writeln!(f, "Oslo,-3.5,10").unwrap();
        writeln!(f, "Rome,17.0,").unwrap();
        drop(f);

        let table = load_file(&path, FileFormat::Csv).unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.n_cols(), 3);
        assert_eq!(table.column("city").unwrap().ty, ColumnType::Text);
        assert_eq!(table.column("temp").unwrap().ty, ColumnType::Numeric);
        assert_eq!(table.column("count").unwrap().values[1], CellValue::Null);
    }

    #[test]
    fn csv_ragged_row_is_a_load_error() {
        let path = temp_path("ragged.csv");
        std::fs::write(&path, "a,b\n1,2\n3\n").unwrap();
        let err = load_file(&path, FileFormat::Csv).unwrap_err();
        assert!(matches!(err, Error::Load(_)));
    }

    #[test]
    fn csv_duplicate_header_is_a_load_error() {
        let path = temp_path("dup.csv");
        std::fs::write(&path, "a,a\n1,2\n").unwrap();
        assert!(matches!(
            load_file(&path, FileFormat::Csv),
            Err(Error::Load(_))
        ));
    }

    #[test]
    fn json_records_union_columns() {
        let path = temp_path("records.json");
        std::fs::write(
            &path,
            r#"[{"a": 1, "b": "x"}, {"a": 2.5, "c": true}]"#,
        )
        .unwrap();

        let table = load_file(&path, FileFormat::Json).unwrap();
        assert_eq!(table.column_names(), vec!["a", "b", "c"]);
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.column("b").unwrap().values[1], CellValue::Null);
        assert_eq!(table.column("a").unwrap().ty, ColumnType::Numeric);
    }

    #[test]
    fn malformed_json_is_a_load_error() {
        let path = temp_path("broken.json");
        std::fs::write(&path, "{\"not\": \"an array\"}").unwrap();
        assert!(matches!(
            load_file(&path, FileFormat::Json),
            Err(Error::Load(_))
        ));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let path = temp_path("does-not-exist.csv");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(
            load_file(&path, FileFormat::Csv),
            Err(Error::Load(_))
        ));
    }
}
