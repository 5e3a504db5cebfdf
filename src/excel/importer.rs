//! Excel importer implementation - Excel (.xlsx) → Table

use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::csv_io::infer_column;
use crate::error::{VaultError, VaultResult};
use crate::options::ReadOptions;
use crate::types::{Column, ColumnValue, Table};

/// Selector value meaning "every sheet"
pub const ALL_SHEETS: &str = "all";

/// Which sheet(s) to read from a workbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    All,
    Named(String),
}

impl From<&str> for SheetSelector {
    fn from(name: &str) -> Self {
        if name == ALL_SHEETS {
            SheetSelector::All
        } else {
            SheetSelector::Named(name.to_string())
        }
    }
}

impl FromStr for SheetSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SheetSelector::from(s))
    }
}

/// Result of reading a workbook
#[derive(Debug, Clone, PartialEq)]
pub enum WorkbookData {
    /// A single named sheet
    Sheet(Table),
    /// Every sheet, in workbook order
    All(Vec<(String, Table)>),
}

impl WorkbookData {
    /// Tables in workbook order regardless of variant
    pub fn into_tables(self) -> Vec<Table> {
        match self {
            WorkbookData::Sheet(table) => vec![table],
            WorkbookData::All(sheets) => sheets.into_iter().map(|(_, t)| t).collect(),
        }
    }
}

/// Excel importer for reading .xlsx sheets back into tables
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    /// Create a new Excel importer
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn open(&self) -> VaultResult<Xlsx<std::io::BufReader<std::fs::File>>> {
        open_workbook(&self.path).map_err(|e| {
            VaultError::Import(format!("Failed to open Excel file {}: {}", self.path.display(), e))
        })
    }

    pub fn sheet_names(&self) -> VaultResult<Vec<String>> {
        Ok(self.open()?.sheet_names().to_vec())
    }

    /// Read one sheet or all of them
    pub fn read(&self, selector: &SheetSelector, options: &ReadOptions) -> VaultResult<WorkbookData> {
        let mut workbook = self.open()?;
        let sheet_names = workbook.sheet_names().to_vec();

        match selector {
            SheetSelector::All => {
                let mut sheets = Vec::with_capacity(sheet_names.len());
                for sheet_name in sheet_names {
                    let last_row = Self::declared_last_row(&mut workbook, &sheet_name)?;
                    let range = Self::range(&mut workbook, &sheet_name)?;
                    let table = Self::range_to_table(&sheet_name, &range, last_row, options)?;
                    sheets.push((sheet_name, table));
                }
                Ok(WorkbookData::All(sheets))
            }
            SheetSelector::Named(name) => {
                if !sheet_names.contains(name) {
                    return Err(VaultError::NotFound {
                        pattern: format!("{}[{}]", self.path.display(), name),
                    });
                }
                let last_row = Self::declared_last_row(&mut workbook, name)?;
                let range = Self::range(&mut workbook, name)?;
                Ok(WorkbookData::Sheet(Self::range_to_table(name, &range, last_row, options)?))
            }
        }
    }

    fn range(
        workbook: &mut Xlsx<std::io::BufReader<std::fs::File>>,
        sheet_name: &str,
    ) -> VaultResult<Range<Data>> {
        workbook
            .worksheet_range(sheet_name)
            .map_err(|e| VaultError::Import(format!("Failed to read sheet '{}': {}", sheet_name, e)))
    }

    /// Last row of the sheet's `<dimension>`.
    ///
    /// calamine drops empty cells from a `Range`, so trailing rows holding
    /// only formatted blanks are visible here and nowhere else.
    fn declared_last_row(
        workbook: &mut Xlsx<std::io::BufReader<std::fs::File>>,
        sheet_name: &str,
    ) -> VaultResult<u32> {
        let reader = workbook
            .worksheet_cells_reader(sheet_name)
            .map_err(|e| VaultError::Import(format!("Failed to read sheet '{}': {}", sheet_name, e)))?;
        Ok(reader.dimensions().end.0)
    }

    /// Header row, then one column per header cell. `last_row` extends the
    /// range down to rows whose cells are all blank.
    fn range_to_table(
        sheet_name: &str,
        range: &Range<Data>,
        last_row: u32,
        options: &ReadOptions,
    ) -> VaultResult<Table> {
        let mut table = Table::new(sheet_name);
        let Some((first_row, _)) = range.start() else {
            return Ok(table);
        };
        let (range_height, width) = range.get_size();
        let declared_height = last_row.saturating_sub(first_row) as usize + 1;
        let height = range_height.max(declared_height);

        let column_names: Vec<String> = (0..width)
            .map(|col| match range.get((0, col)) {
                Some(Data::String(s)) => s.clone(),
                Some(Data::Int(i)) => i.to_string(),
                Some(Data::Float(f)) => f.to_string(),
                _ => format!("col_{}", col),
            })
            .collect();

        for (col, name) in column_names.iter().enumerate() {
            let cells: Vec<Data> = (1..height)
                .map(|row| range.get((row, col)).cloned().unwrap_or(Data::Empty))
                .collect();
            table.add_column(Column::new(name.clone(), Self::convert_to_column_value(cells, options)));
        }

        if let Some(name) = options.index_column.and_then(|i| column_names.get(i)) {
            table.set_index(name)?;
        }
        Ok(table)
    }

    /// Convert Excel cells to a column: native numbers and booleans are kept,
    /// anything else goes through the same inference as CSV text.
    fn convert_to_column_value(data: Vec<Data>, options: &ReadOptions) -> ColumnValue {
        let filled: Vec<&Data> = data.iter().filter(|c| !matches!(c, Data::Empty)).collect();

        if !filled.is_empty() && filled.iter().all(|c| matches!(c, Data::Float(_) | Data::Int(_))) {
            let numbers = data
                .iter()
                .map(|cell| match cell {
                    Data::Float(f) => *f,
                    Data::Int(i) => *i as f64,
                    _ => f64::NAN,
                })
                .collect();
            return ColumnValue::Number(numbers);
        }

        if !data.is_empty() && data.iter().all(|c| matches!(c, Data::Bool(_))) {
            let bools = data.iter().map(|c| matches!(c, Data::Bool(true))).collect();
            return ColumnValue::Boolean(bools);
        }

        let texts: Vec<String> = data
            .iter()
            .map(|cell| match cell {
                Data::Empty => String::new(),
                other => other.to_string(),
            })
            .collect();
        infer_column(texts, options)
    }
}
