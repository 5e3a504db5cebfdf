//! Excel exporter implementation

use chrono::{Datelike, Local};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{VaultError, VaultResult};
use crate::options::WriteOptions;
use crate::types::{Column, ColumnValue, Table};

//==============================================================================
// Sheet entries
//==============================================================================

/// A value handed to the exporter under a sheet label.
///
/// Only [`SheetEntry::Table`] is written; everything else is skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetEntry {
    Table(Table),
    Value(serde_json::Value),
}

impl SheetEntry {
    /// The one capability check the exporter uses to decide what gets a sheet
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            SheetEntry::Table(table) => Some(table),
            SheetEntry::Value(_) => None,
        }
    }
}

impl From<Table> for SheetEntry {
    fn from(table: Table) -> Self {
        SheetEntry::Table(table)
    }
}

impl From<serde_json::Value> for SheetEntry {
    fn from(value: serde_json::Value) -> Self {
        SheetEntry::Value(value)
    }
}

impl From<i64> for SheetEntry {
    fn from(value: i64) -> Self {
        SheetEntry::Value(value.into())
    }
}

impl From<&str> for SheetEntry {
    fn from(value: &str) -> Self {
        SheetEntry::Value(value.into())
    }
}

/// Ordered sheet label → entry mapping; labels keep insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetSet {
    entries: Vec<(String, SheetEntry)>,
}

impl SheetSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry under `label`
    pub fn insert(&mut self, label: impl Into<String>, entry: impl Into<SheetEntry>) {
        let label = label.into();
        let entry = entry.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(existing) => existing.1 = entry,
            None => self.entries.push((label, entry)),
        }
    }

    pub fn with(mut self, label: impl Into<String>, entry: impl Into<SheetEntry>) -> Self {
        self.insert(label, entry);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Table entries only, in insertion order
    pub fn tables(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.entries
            .iter()
            .filter_map(|(label, entry)| entry.as_table().map(|t| (label.as_str(), t)))
    }
}

//==============================================================================
// Version tag
//==============================================================================

/// Suffix appended to every sheet label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VersionTag {
    #[default]
    Untagged,
    /// `_<MMDD>` of the export date
    Today,
    /// Appended verbatim
    Explicit(String),
}

impl VersionTag {
    pub fn suffix_for<T: Datelike>(&self, today: &T) -> String {
        match self {
            VersionTag::Untagged => String::new(),
            VersionTag::Today => format!("_{:02}{:02}", today.month(), today.day()),
            VersionTag::Explicit(tag) => tag.clone(),
        }
    }
}

impl From<bool> for VersionTag {
    fn from(tag_today: bool) -> Self {
        if tag_today {
            VersionTag::Today
        } else {
            VersionTag::Untagged
        }
    }
}

impl From<&str> for VersionTag {
    fn from(tag: &str) -> Self {
        VersionTag::Explicit(tag.to_string())
    }
}

impl From<String> for VersionTag {
    fn from(tag: String) -> Self {
        VersionTag::Explicit(tag)
    }
}

//==============================================================================
// Exporter
//==============================================================================

/// Writes every table of a [`SheetSet`] into one .xlsx workbook
pub struct ExcelExporter<'a> {
    sheets: &'a SheetSet,
    version_tag: VersionTag,
    options: WriteOptions,
}

impl<'a> ExcelExporter<'a> {
    /// Create a new Excel exporter
    pub fn new(sheets: &'a SheetSet) -> Self {
        Self {
            sheets,
            version_tag: VersionTag::Untagged,
            options: WriteOptions::default(),
        }
    }

    pub fn with_version_tag(mut self, tag: impl Into<VersionTag>) -> Self {
        self.version_tag = tag.into();
        self
    }

    pub fn with_options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }

    /// Export to `output_path`, tagging with today's date if requested.
    ///
    /// Returns the number of sheets written.
    pub fn export(&self, output_path: &Path) -> VaultResult<usize> {
        self.export_on(output_path, &Local::now())
    }

    /// Export with an explicit export date for the version tag
    pub fn export_on<T: Datelike>(&self, output_path: &Path, today: &T) -> VaultResult<usize> {
        let suffix = self.version_tag.suffix_for(today);
        let number_format = Format::new().set_num_format(self.options.float_format()?.excel_num_format());

        let mut workbook = Workbook::new();
        let mut written = 0;

        for (label, table) in self.sheets.tables() {
            let sheet_name = format!("{}{}", label, suffix);
            debug!("writing sheet {} ({} rows)", sheet_name, table.row_count());
            self.export_table(&mut workbook, &sheet_name, table, &number_format)?;
            written += 1;
        }

        let skipped = self.sheets.len() - written;
        if skipped > 0 {
            debug!("skipped {} non-table entries", skipped);
        }

        // Nothing touches disk until every sheet has been built
        workbook
            .save(output_path)
            .map_err(|e| VaultError::Export(format!("Failed to save Excel file: {}", e)))?;

        info!("wrote {} sheets to {}", written, output_path.display());
        Ok(written)
    }

    /// Export a single table to a worksheet
    fn export_table(
        &self,
        workbook: &mut Workbook,
        sheet_name: &str,
        table: &Table,
        number_format: &Format,
    ) -> VaultResult<()> {
        table.validate_lengths()?;

        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(sheet_name)
            .map_err(|e| VaultError::Export(format!("Failed to set worksheet name '{}': {}", sheet_name, e)))?;

        let columns: Vec<&Column> = table
            .ordered_columns()
            .into_iter()
            .filter(|c| self.options.write_index || Some(c.name.as_str()) != table.index.as_deref())
            .collect();

        for (col_idx, column) in columns.iter().enumerate() {
            worksheet
                .write_string(0, col_idx as u16, &column.name)
                .map_err(|e| VaultError::Export(format!("Failed to write header: {}", e)))?;

            for row_idx in 0..column.len() {
                Self::write_cell_value(
                    worksheet,
                    (row_idx + 1) as u32,
                    col_idx as u16,
                    &column.values,
                    row_idx,
                    number_format,
                )?;
            }
        }

        Ok(())
    }

    /// Write a single cell value based on column type
    fn write_cell_value(
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        values: &ColumnValue,
        index: usize,
        number_format: &Format,
    ) -> VaultResult<()> {
        match values {
            ColumnValue::Number(nums) => {
                // NaN is a formatted blank so the row stays inside the sheet dimension
                match nums.get(index) {
                    Some(value) if value.is_nan() => {
                        worksheet
                            .write_blank(row, col, number_format)
                            .map_err(|e| VaultError::Export(format!("Failed to write blank: {}", e)))?;
                    }
                    Some(&value) => {
                        worksheet
                            .write_number_with_format(row, col, value, number_format)
                            .map_err(|e| VaultError::Export(format!("Failed to write number: {}", e)))?;
                    }
                    None => {}
                }
            }
            ColumnValue::Text(texts) => {
                if let Some(value) = texts.get(index) {
                    worksheet
                        .write_string(row, col, value)
                        .map_err(|e| VaultError::Export(format!("Failed to write text: {}", e)))?;
                }
            }
            ColumnValue::Date(dates) => {
                if let Some(value) = dates.get(index) {
                    worksheet
                        .write_string(row, col, value.format("%Y-%m-%d").to_string())
                        .map_err(|e| VaultError::Export(format!("Failed to write date: {}", e)))?;
                }
            }
            ColumnValue::Boolean(bools) => {
                if let Some(&value) = bools.get(index) {
                    worksheet
                        .write_boolean(row, col, value)
                        .map_err(|e| VaultError::Export(format!("Failed to write boolean: {}", e)))?;
                }
            }
        }
        Ok(())
    }
}
