//! Pipeline-facing API over one data root
//!
//! Every operation works inside exactly one [`Namespace`]. Writers never
//! overwrite a previous timestamped snapshot (short of a same-second
//! collision); readers always pick the newest file by modification time.

use std::path::PathBuf;
use tracing::info;

use crate::csv_io::{read_csv, write_csv};
use crate::error::VaultResult;
use crate::excel::{ExcelExporter, ExcelImporter, SheetSelector, SheetSet, VersionTag, WorkbookData};
use crate::namespace::{DataRoot, Namespace};
use crate::naming::make_versioned_name;
use crate::options::{ReadOptions, WriteOptions};
use crate::resolver::{dataset_label, find_latest};
use crate::types::Table;

pub const CSV_EXT: &str = ".csv";
pub const XLSX_EXT: &str = ".xlsx";

#[derive(Debug, Clone, Default)]
pub struct Vault {
    root: DataRoot,
}

impl Vault {
    pub fn new(root: DataRoot) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &DataRoot {
        &self.root
    }

    pub fn dir(&self, namespace: Namespace) -> PathBuf {
        self.root.dir(namespace)
    }

    /// Write `table` as `<name>_<MMDD>_<HHMMSS>.csv` (or `<name>_latest.csv`)
    pub fn write_data(
        &self,
        table: &Table,
        datasource_name: &str,
        namespace: Namespace,
        with_timestamp: bool,
        options: &WriteOptions,
    ) -> VaultResult<PathBuf> {
        info!("writing table to file... {} {}", datasource_name, namespace);
        let path = make_versioned_name(&self.dir(namespace), datasource_name, CSV_EXT, with_timestamp);
        write_csv(table, &path, options)?;
        info!("finished writing table to file... {}", path.display());
        Ok(path)
    }

    /// Write every table in `sheets` into one workbook and return its path
    pub fn write_workbook(
        &self,
        sheets: &SheetSet,
        logical_name: &str,
        version_tag: impl Into<VersionTag>,
        namespace: Namespace,
        with_timestamp: bool,
        options: &WriteOptions,
    ) -> VaultResult<PathBuf> {
        info!("writing {} entries to excel... {}", sheets.len(), namespace);
        let path = make_versioned_name(&self.dir(namespace), logical_name, XLSX_EXT, with_timestamp);
        ExcelExporter::new(sheets)
            .with_version_tag(version_tag)
            .with_options(options.clone())
            .export(&path)?;
        info!("finished writing workbook... {}", path.display());
        Ok(path)
    }

    /// File name of the newest `<name>*<ext>` snapshot in `namespace`
    pub fn latest_data_filename(
        &self,
        datasource_name: &str,
        namespace: Namespace,
        extension: &str,
    ) -> VaultResult<String> {
        find_latest(&self.dir(namespace), datasource_name, extension)
    }

    /// Label (`name_MMDD`) of the newest CSV snapshot
    pub fn latest_dataset_label(&self, datasource_name: &str, namespace: Namespace) -> VaultResult<String> {
        dataset_label(&self.latest_data_filename(datasource_name, namespace, CSV_EXT)?)
    }

    /// Read the newest CSV snapshot of `datasource_name`
    pub fn read_latest(
        &self,
        datasource_name: &str,
        namespace: Namespace,
        options: &ReadOptions,
    ) -> VaultResult<Table> {
        let path = self.latest_path(datasource_name, namespace, CSV_EXT)?;
        info!("read from {}", path.display());
        read_csv(&path, options)
    }

    /// Read one sheet (or all sheets) of the newest workbook like `filename`
    pub fn read_latest_from_worksheet(
        &self,
        filename: &str,
        selector: &SheetSelector,
        namespace: Namespace,
        options: &ReadOptions,
    ) -> VaultResult<WorkbookData> {
        let path = self.latest_path(filename, namespace, XLSX_EXT)?;
        info!("read {:?} from {}", selector, path.display());
        ExcelImporter::new(&path).read(selector, options)
    }

    fn latest_path(&self, name_like: &str, namespace: Namespace, extension: &str) -> VaultResult<PathBuf> {
        let dir = self.dir(namespace);
        let fname = find_latest(&dir, name_like, extension)?;
        Ok(dir.join(fname))
    }
}
