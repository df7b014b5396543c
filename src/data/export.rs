use std::path::Path;

use rust_xlsxwriter::Workbook;
use serde_json::{json, Map, Value as JsonValue};

use super::model::{CellValue, Table};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Table export – format chosen by destination extension
// ---------------------------------------------------------------------------

/// Serialize the table to the destination path; the extension picks the
/// format (`.csv`, `.xlsx`, `.json`).
pub fn export_table(table: &Table, path: &Path) -> Result<()> {
    match extension(path).as_str() {
        "csv" => export_csv(table, path),
        "xlsx" => export_xlsx(table, path),
        "json" => export_json(table, path),
        other => Err(Error::Export(format!(
            "unsupported table format '.{other}' (expected .csv, .xlsx or .json)"
        ))),
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

fn export_csv(table: &Table, path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).map_err(|e| Error::Export(e.to_string()))?;
    writer
        .write_record(table.column_names())
        .map_err(|e| Error::Export(e.to_string()))?;
    for row in 0..table.n_rows() {
        writer
            .write_record(table.row_display(row))
            .map_err(|e| Error::Export(e.to_string()))?;
    }
    writer.flush().map_err(|e| Error::Export(e.to_string()))
}

fn export_xlsx(table: &Table, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    let write = |e: rust_xlsxwriter::XlsxError| Error::Export(e.to_string());
    for (col, name) in table.column_names().iter().enumerate() {
        sheet.write_string(0, col as u16, name.as_str()).map_err(write)?;
    }
    for (col_idx, column) in table.columns().iter().enumerate() {
        let col = col_idx as u16;
        for (row_idx, value) in column.values.iter().enumerate() {
            let row = row_idx as u32 + 1;
            match value {
                CellValue::Integer(i) => sheet.write_number(row, col, *i as f64).map_err(write)?,
                CellValue::Float(v) => sheet.write_number(row, col, *v).map_err(write)?,
                CellValue::Bool(b) => sheet.write_boolean(row, col, *b).map_err(write)?,
                CellValue::Null => continue,
                other => sheet.write_string(row, col, other.to_string()).map_err(write)?,
            };
        }
    }
    workbook
        .save(path)
        .map_err(|e| Error::Export(e.to_string()))
}

fn export_json(table: &Table, path: &Path) -> Result<()> {
    let records: Vec<JsonValue> = (0..table.n_rows())
        .map(|row| {
            let mut obj = Map::new();
            for column in table.columns() {
                obj.insert(column.name.clone(), cell_to_json(&column.values[row]));
            }
            JsonValue::Object(obj)
        })
        .collect();

    let text = serde_json::to_string_pretty(&json!(records))
        .map_err(|e| Error::Export(e.to_string()))?;
    std::fs::write(path, text).map_err(|e| Error::Export(e.to_string()))
}

fn cell_to_json(value: &CellValue) -> JsonValue {
    match value {
        CellValue::Integer(i) => json!(i),
        CellValue::Float(v) => serde_json::Number::from_f64(*v)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        CellValue::Text(s) => json!(s),
        CellValue::Bool(b) => json!(b),
        CellValue::DateTime(_) => json!(value.to_string()),
        CellValue::Null => JsonValue::Null,
    }
}

// ---------------------------------------------------------------------------
// Report export
// ---------------------------------------------------------------------------

/// Write the analysis report body as plain text.
pub fn export_report(text: &str, path: &Path) -> Result<()> {
    std::fs::write(path, text).map_err(|e| Error::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{load_file, FileFormat};
    use crate::data::model::Column;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("rusty-analyst-export-tests");
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    fn sample_table() -> Table {
        Table::new(vec![
            Column::new(
                "city",
                vec![CellValue::Text("Oslo".into()), CellValue::Text("Rome".into())],
            ),
            Column::new("temp", vec![CellValue::Float(-3.5), CellValue::Float(17.0)]),
            Column::new("count", vec![CellValue::Integer(10), CellValue::Null]),
        ])
    }

    #[test]
    fn csv_round_trip_preserves_names_and_values() {
        let path = temp_path("round.csv");
        let table = sample_table();
        export_table(&table, &path).unwrap();
        let reloaded = load_file(&path, FileFormat::Csv).unwrap();

        assert_eq!(reloaded.column_names(), table.column_names());
        assert_eq!(reloaded.n_rows(), table.n_rows());
        assert_eq!(reloaded.column("temp").unwrap().values[1], CellValue::Float(17.0));
        assert_eq!(reloaded.column("count").unwrap().values[1], CellValue::Null);
    }

    #[test]
    fn json_round_trip_preserves_names_and_values() {
        let path = temp_path("round.json");
        let table = sample_table();
        export_table(&table, &path).unwrap();
        let reloaded = load_file(&path, FileFormat::Json).unwrap();

        assert_eq!(reloaded.column_names(), table.column_names());
        assert_eq!(
            reloaded.column("city").unwrap().values[0],
            CellValue::Text("Oslo".into())
        );
        assert_eq!(reloaded.column("count").unwrap().values[0], CellValue::Integer(10));
    }

    #[test]
    fn unsupported_extension_is_an_export_error() {
        let path = temp_path("table.parquet");
        assert!(matches!(
            export_table(&sample_table(), &path),
            Err(Error::Export(_))
        ));
    }

    #[test]
    fn report_export_writes_the_text() {
        let path = temp_path("report.txt");
        export_report("slope: 2.0", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "slope: 2.0");
    }
}
