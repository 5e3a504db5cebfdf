use colored::Colorize;
use std::path::PathBuf;

use crate::error::{VaultError, VaultResult};
use crate::excel::{ExcelImporter, SheetSelector, SheetSet, VersionTag};
use crate::namespace::Namespace;
use crate::naming::make_versioned_name;
use crate::options::{ReadOptions, WriteOptions};
use crate::resolver::file_version;
use crate::types::Table;
use crate::vault::{Vault, XLSX_EXT};

/// Create the data root and every stage folder
pub fn init(vault: &Vault) -> VaultResult<()> {
    vault.root().create_all()?;
    println!("{}", "✅ Data root ready".bold().green());
    for namespace in Namespace::ALL {
        println!("   {}", vault.dir(namespace).display());
    }
    Ok(())
}

/// Print the path a new snapshot of `name` would be written to
pub fn stamp(vault: &Vault, name: &str, folder: Namespace, ext: &str, latest: bool) -> VaultResult<PathBuf> {
    let path = make_versioned_name(&vault.dir(folder), name, ext, !latest);
    println!("{}", path.display());
    Ok(path)
}

/// Print the file name of the newest `<name>*<ext>` in `folder`
pub fn latest(vault: &Vault, name: &str, folder: Namespace, ext: &str) -> VaultResult<String> {
    let fname = vault.latest_data_filename(name, folder, ext)?;
    println!("{}", fname);
    Ok(fname)
}

/// Print the dataset label of the newest CSV of `name`
pub fn label(vault: &Vault, name: &str, folder: Namespace) -> VaultResult<String> {
    let label = vault.latest_dataset_label(name, folder)?;
    println!("{}", label);
    Ok(label)
}

/// Print the version (MMDD) segment of a versioned filename
pub fn version(filename: &str) -> VaultResult<String> {
    let version = file_version(filename)?;
    println!("{}", version);
    Ok(version)
}

/// Preview the newest CSV of `name`, or a sheet of its newest workbook
pub fn show(
    vault: &Vault,
    name: &str,
    folder: Namespace,
    sheet: Option<String>,
    rows: usize,
    json: bool,
) -> VaultResult<()> {
    let options = ReadOptions::default();
    let tables = match sheet {
        Some(sheet) => vault
            .read_latest_from_worksheet(name, &SheetSelector::from(sheet.as_str()), folder, &options)?
            .into_tables(),
        None => vec![vault.read_latest(name, folder, &options)?],
    };

    if json {
        let out = serde_json::to_string_pretty(&tables)
            .map_err(|e| VaultError::Parse(format!("Failed to serialize tables: {}", e)))?;
        println!("{}", out);
        return Ok(());
    }

    for table in &tables {
        print_table(table, rows);
    }
    Ok(())
}

fn print_table(table: &Table, rows: usize) {
    println!(
        "📊 {} ({} columns, {} rows)",
        table.name.bright_blue().bold(),
        table.columns.len(),
        table.row_count()
    );
    print!("{}", table.preview(rows));
    println!();
}

/// Collect the newest CSV of each dataset into one workbook
pub fn bundle(
    vault: &Vault,
    output: &str,
    folder: Namespace,
    datasets: &[String],
    tag: VersionTag,
    latest: bool,
    float_format: Option<String>,
) -> VaultResult<PathBuf> {
    println!("{}", "📦 Bundling datasets".bold().green());

    let mut sheets = SheetSet::new();
    for name in datasets {
        let table = vault.read_latest(name, folder, &ReadOptions::default())?;
        println!("   {} ← {}", name.cyan(), table.name);
        sheets.insert(name.clone(), table);
    }

    let options = WriteOptions {
        float_format,
        ..WriteOptions::default()
    };
    let path = vault.write_workbook(&sheets, output, tag, folder, !latest, &options)?;

    println!("{}", "✅ Workbook written".bold().green());
    println!("   {}", path.display());
    Ok(path)
}

/// List the sheets of the newest workbook like `name`
pub fn sheets(vault: &Vault, name: &str, folder: Namespace) -> VaultResult<Vec<String>> {
    let fname = vault.latest_data_filename(name, folder, XLSX_EXT)?;
    let names = ExcelImporter::new(vault.dir(folder).join(&fname)).sheet_names()?;
    println!("{}", fname.bold());
    for name in &names {
        println!("   {}", name);
    }
    Ok(names)
}
