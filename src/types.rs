use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{VaultError, VaultResult};

/// Row/column cap used when previewing a table on the console.
pub const PREVIEW_LIMIT: usize = 1000;

//==============================================================================
// Column Types
//==============================================================================

/// Column value types (homogeneous arrays)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "values")]
pub enum ColumnValue {
    /// Array of numbers (f64, NaN for missing cells)
    Number(Vec<f64>),
    /// Array of text strings
    Text(Vec<String>),
    /// Array of calendar dates
    Date(Vec<NaiveDate>),
    /// Array of booleans
    Boolean(Vec<bool>),
}

impl ColumnValue {
    /// Get the length of the array
    pub fn len(&self) -> usize {
        match self {
            ColumnValue::Number(v) => v.len(),
            ColumnValue::Text(v) => v.len(),
            ColumnValue::Date(v) => v.len(),
            ColumnValue::Boolean(v) => v.len(),
        }
    }

    /// Check if array is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnValue::Number(_) => "Number",
            ColumnValue::Text(_) => "Text",
            ColumnValue::Date(_) => "Date",
            ColumnValue::Boolean(_) => "Boolean",
        }
    }

    /// Render a single cell for display (not for serialization)
    pub fn display_at(&self, index: usize) -> String {
        match self {
            ColumnValue::Number(v) => v
                .get(index)
                .map(|n| if n.is_nan() { "NaN".to_string() } else { n.to_string() })
                .unwrap_or_default(),
            ColumnValue::Text(v) => v.get(index).cloned().unwrap_or_default(),
            ColumnValue::Date(v) => v
                .get(index)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            ColumnValue::Boolean(v) => v.get(index).map(|b| b.to_string()).unwrap_or_default(),
        }
    }
}

/// A named column in a table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub values: ColumnValue,
}

impl Column {
    pub fn new(name: impl Into<String>, values: ColumnValue) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

//==============================================================================
// Table
//==============================================================================

/// A table of equally long, ordered columns.
///
/// `index` names the column used as the row label. It is written first by the
/// CSV and Excel writers and is picked back up by the readers through
/// `ReadOptions::index_column`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub index: Option<String>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            index: None,
        }
    }

    /// Add a column, replacing any existing column of the same name in place
    pub fn add_column(&mut self, column: Column) {
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
    }

    /// Builder-style variant of [`Table::add_column`]
    pub fn with_column(mut self, name: impl Into<String>, values: ColumnValue) -> Self {
        self.add_column(Column::new(name, values));
        self
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Mark an existing column as the index
    pub fn set_index(&mut self, name: &str) -> VaultResult<()> {
        if self.column(name).is_none() {
            return Err(VaultError::Parse(format!(
                "Cannot use '{}' as index: table '{}' has no such column",
                name, self.name
            )));
        }
        self.index = Some(name.to_string());
        Ok(())
    }

    /// Columns in write order: the index column first, then the rest as added
    pub fn ordered_columns(&self) -> Vec<&Column> {
        let index = self.index.as_deref().and_then(|name| self.column(name));
        index
            .into_iter()
            .chain(
                self.columns
                    .iter()
                    .filter(|c| Some(c.name.as_str()) != self.index.as_deref()),
            )
            .collect()
    }

    /// Get the number of rows (length of first column, all should be same)
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |col| col.len())
    }

    /// Validate all columns have the same length
    pub fn validate_lengths(&self) -> VaultResult<()> {
        let row_count = self.row_count();
        for column in &self.columns {
            if column.len() != row_count {
                return Err(VaultError::Parse(format!(
                    "Column '{}' has {} rows, expected {} rows",
                    column.name,
                    column.len(),
                    row_count
                )));
            }
        }
        Ok(())
    }

    /// Render up to `max_rows` rows as an aligned text grid
    pub fn preview(&self, max_rows: usize) -> String {
        let columns: Vec<&Column> = self.ordered_columns().into_iter().take(PREVIEW_LIMIT).collect();
        let shown = self.row_count().min(max_rows);

        let mut grid: Vec<Vec<String>> = Vec::with_capacity(shown + 1);
        grid.push(columns.iter().map(|c| c.name.clone()).collect());
        for row in 0..shown {
            grid.push(columns.iter().map(|c| c.values.display_at(row)).collect());
        }

        let widths: Vec<usize> = (0..columns.len())
            .map(|col| grid.iter().map(|r| r[col].chars().count()).max().unwrap_or(0))
            .collect();

        let mut out = String::new();
        for row in &grid {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect();
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        }

        let hidden = self.row_count() - shown;
        if hidden > 0 {
            out.push_str(&format!("... ({} more rows)\n", hidden));
        }
        out
    }
}
