//! Datavault - timestamp-versioned dataset snapshots on disk
//!
//! A data-preparation pipeline writes each step's output as a new snapshot
//! instead of overwriting the previous one, and downstream steps read "the
//! latest" snapshot without being told its exact filename.
//!
//! # Features
//!
//! - Versioned filenames: `<name>_<MMDD>_<HHMMSS><ext>` or `<name>_latest<ext>`
//! - Latest-file resolution by modification time within one stage folder
//! - CSV snapshots with a fixed float format
//! - Multi-sheet Excel workbooks, optionally tagged with a version suffix
//!
//! # Example
//!
//! ```no_run
//! use royalbit_datavault::namespace::{DataRoot, Namespace};
//! use royalbit_datavault::options::{ReadOptions, WriteOptions};
//! use royalbit_datavault::types::{ColumnValue, Table};
//! use royalbit_datavault::vault::Vault;
//!
//! let vault = Vault::new(DataRoot::new("data"));
//! let table = Table::new("kaggle").with_column("budget", ColumnValue::Number(vec![1.5, 2.0]));
//!
//! vault.write_data(&table, "kaggle", Namespace::Interim, true, &WriteOptions::default())?;
//! let latest = vault.read_latest("kaggle", Namespace::Interim, &ReadOptions::default())?;
//! println!("{}", latest.preview(10));
//! # Ok::<(), royalbit_datavault::error::VaultError>(())
//! ```

pub mod cli;
pub mod csv_io;
pub mod error;
pub mod excel;
pub mod logging;
pub mod namespace;
pub mod naming;
pub mod options;
pub mod resolver;
pub mod types;
pub mod vault;

// Re-export commonly used types
pub use error::{VaultError, VaultResult};
pub use namespace::{DataRoot, Namespace};
pub use naming::{make_versioned_name, VersionedName};
pub use resolver::find_latest;
pub use types::{Column, ColumnValue, Table};
pub use vault::Vault;
