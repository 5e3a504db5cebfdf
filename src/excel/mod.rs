//! Excel import/export for dataset snapshots
//!
//! - Export: a [`SheetSet`] of tables → one .xlsx workbook, one sheet per table
//! - Import: a .xlsx workbook → one named sheet or every sheet as tables

mod exporter;
mod importer;

pub use exporter::{ExcelExporter, SheetEntry, SheetSet, VersionTag};
pub use importer::{ExcelImporter, SheetSelector, WorkbookData, ALL_SHEETS};
