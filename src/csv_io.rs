//! CSV serialization for [`Table`]

use chrono::NaiveDate;
use std::path::Path;

use crate::error::VaultResult;
use crate::options::{FloatFormat, ReadOptions, WriteOptions};
use crate::types::{Column, ColumnValue, Table};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Write `table` to `path` as CSV with a header row
pub fn write_csv(table: &Table, path: &Path, options: &WriteOptions) -> VaultResult<()> {
    table.validate_lengths()?;
    let float_format = options.float_format()?;
    let columns = columns_to_write(table, options);

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(columns.iter().map(|c| c.name.as_str()))?;

    for row in 0..table.row_count() {
        writer.write_record(columns.iter().map(|c| format_cell(&c.values, row, &float_format)))?;
    }

    writer.flush()?;
    Ok(())
}

/// Read a CSV written by [`write_csv`] (or any CSV with a header row).
///
/// Column types are inferred per column; the table is named after the file stem.
pub fn read_csv(path: &Path, options: &ReadOptions) -> VaultResult<Table> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for result in reader.records() {
        let record = result?;
        for (col, cell) in cells.iter_mut().enumerate() {
            cell.push(record.get(col).unwrap_or("").to_string());
        }
    }

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut table = Table::new(name);
    for (header, column_cells) in headers.iter().zip(cells) {
        table.add_column(Column::new(header.clone(), infer_column(column_cells, options)));
    }

    if let Some(header) = options.index_column.and_then(|i| headers.get(i)) {
        table.set_index(header)?;
    }
    Ok(table)
}

/// Pick the narrowest column type every non-empty cell fits:
/// Boolean, then Number, then Date (when enabled), then Text.
/// A column with no values at all is Number (all NaN).
pub(crate) fn infer_column(cells: Vec<String>, options: &ReadOptions) -> ColumnValue {
    let filled: Vec<&String> = cells.iter().filter(|c| !c.is_empty()).collect();
    if filled.is_empty() {
        return ColumnValue::Number(vec![f64::NAN; cells.len()]);
    }
    let complete = filled.len() == cells.len();

    if complete {
        let bools: Option<Vec<bool>> = cells.iter().map(|c| options.parse_bool(c)).collect();
        if let Some(bools) = bools {
            return ColumnValue::Boolean(bools);
        }
    }

    if filled.iter().all(|c| c.trim().parse::<f64>().is_ok()) {
        let numbers = cells
            .iter()
            .map(|c| c.trim().parse::<f64>().unwrap_or(f64::NAN))
            .collect();
        return ColumnValue::Number(numbers);
    }

    if complete && options.infer_dates {
        let dates: Option<Vec<NaiveDate>> = cells
            .iter()
            .map(|c| NaiveDate::parse_from_str(c.trim(), DATE_FORMAT).ok())
            .collect();
        if let Some(dates) = dates {
            return ColumnValue::Date(dates);
        }
    }

    ColumnValue::Text(cells)
}

fn columns_to_write<'a>(table: &'a Table, options: &WriteOptions) -> Vec<&'a Column> {
    let ordered = table.ordered_columns();
    if options.write_index {
        ordered
    } else {
        ordered
            .into_iter()
            .filter(|c| Some(c.name.as_str()) != table.index.as_deref())
            .collect()
    }
}

fn format_cell(values: &ColumnValue, row: usize, float_format: &FloatFormat) -> String {
    match values {
        ColumnValue::Number(v) => float_format.format(v[row]),
        ColumnValue::Text(v) => v[row].clone(),
        ColumnValue::Date(v) => v[row].format(DATE_FORMAT).to_string(),
        ColumnValue::Boolean(v) => (if v[row] { "True" } else { "False" }).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_infer_boolean() {
        let options = ReadOptions::default();
        assert_eq!(
            infer_column(strings(&["True", "no", "Y"]), &options),
            ColumnValue::Boolean(vec![true, false, true])
        );
    }

    #[test]
    fn test_infer_number_with_gaps() {
        let options = ReadOptions::default();
        match infer_column(strings(&["1.5", "", "-2"]), &options) {
            ColumnValue::Number(v) => {
                assert_eq!(v[0], 1.5);
                assert!(v[1].is_nan());
                assert_eq!(v[2], -2.0);
            }
            other => panic!("Expected Number column, got {:?}", other),
        }
    }

    #[test]
    fn test_infer_dates_toggle() {
        let cells = strings(&["2024-01-31", "2024-02-01"]);
        let on = ReadOptions::default();
        let off = ReadOptions {
            infer_dates: false,
            ..ReadOptions::default()
        };
        assert_eq!(infer_column(cells.clone(), &on).type_name(), "Date");
        assert_eq!(infer_column(cells, &off).type_name(), "Text");
    }

    #[test]
    fn test_infer_falls_back_to_text() {
        let options = ReadOptions::default();
        assert_eq!(
            infer_column(strings(&["1", "two"]), &options),
            ColumnValue::Text(strings(&["1", "two"]))
        );
    }

    #[test]
    fn test_infer_all_empty_is_nan_numbers() {
        match infer_column(strings(&["", ""]), &ReadOptions::default()) {
            ColumnValue::Number(nums) => {
                assert_eq!(nums.len(), 2);
                assert!(nums.iter().all(|v| v.is_nan()));
            }
            other => panic!("Expected Number, got {}", other.type_name()),
        }
    }

    #[test]
    fn test_write_csv_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.csv");
        let mut table = Table::new("scores")
            .with_column("score", ColumnValue::Number(vec![0.12345, f64::NAN]))
            .with_column("id", ColumnValue::Text(strings(&["a", "b"])))
            .with_column("seen", ColumnValue::Boolean(vec![true, false]));
        table.set_index("id").unwrap();

        write_csv(&table, &path, &WriteOptions::default()).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "id,score,seen\na,0.123,True\nb,,False\n"
        );

        let no_index = WriteOptions {
            write_index: false,
            ..WriteOptions::default()
        };
        write_csv(&table, &path, &no_index).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "score,seen\n0.123,True\n,False\n"
        );
    }

    #[test]
    fn test_write_rejects_ragged_table() {
        let dir = TempDir::new().unwrap();
        let table = Table::new("bad")
            .with_column("a", ColumnValue::Number(vec![1.0, 2.0]))
            .with_column("b", ColumnValue::Number(vec![1.0]));
        assert!(write_csv(&table, &dir.path().join("bad.csv"), &WriteOptions::default()).is_err());
    }

    #[test]
    fn test_read_sets_index_and_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tn_0101_120000.csv");
        fs::write(&path, "movie,budget\nHeat,60.5\nRan,11\n").unwrap();

        let table = read_csv(&path, &ReadOptions::default()).unwrap();
        assert_eq!(table.name, "tn_0101_120000");
        assert_eq!(table.index.as_deref(), Some("movie"));
        assert_eq!(
            table.column("budget").unwrap().values,
            ColumnValue::Number(vec![60.5, 11.0])
        );

        let table = read_csv(&path, &ReadOptions::default().without_index()).unwrap();
        assert!(table.index.is_none());
    }
}
