use clap::{Parser, Subcommand};
use royalbit_datavault::cli;
use royalbit_datavault::excel::VersionTag;
use royalbit_datavault::logging::{init_logging, LogConfig};
use royalbit_datavault::namespace::{DataRoot, Namespace, DATA_ROOT_ENV, DEFAULT_DATA_ROOT};
use royalbit_datavault::vault::Vault;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "datavault")]
#[command(about = "Timestamp-versioned dataset snapshots: name, resolve, bundle.")]
#[command(long_about = "Datavault - versioned dataset snapshots on disk

Snapshots are named <name>_<MMDD>_<HHMMSS><ext> (or <name>_latest<ext>) and
live in one of the stage folders under the data root:
  raw | interim | processed | external | production

The latest snapshot of a dataset is the matching file with the newest
modification time.

COMMANDS:
  init     - Create the data root and stage folders
  stamp    - Print the path for a new snapshot
  latest   - Print the newest snapshot file name
  label    - Print the dataset label of the newest CSV snapshot
  version  - Print the MMDD version of a snapshot file name
  show     - Preview the newest CSV (or a workbook sheet)
  sheets   - List the sheets of the newest workbook
  bundle   - Collect the newest CSVs into one workbook

EXAMPLES:
  datavault latest kaggle --folder interim
  datavault show combined --sheet all --folder processed
  datavault bundle combined kaggle imdb --folder interim --tag-today")]
#[command(version)]
struct Cli {
    /// Data root holding the stage folders
    #[arg(long, global = true, env = DATA_ROOT_ENV, default_value = DEFAULT_DATA_ROOT)]
    root: PathBuf,

    /// Show debug logging on the console
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data root and every stage folder
    Init,

    /// Print the path a new snapshot would be written to
    Stamp {
        /// Logical dataset name
        name: String,

        /// Stage folder
        #[arg(short, long, default_value = "interim")]
        folder: Namespace,

        /// File extension (with or without the dot)
        #[arg(short, long, default_value = "csv")]
        ext: String,

        /// Use the `_latest` suffix instead of a timestamp
        #[arg(long)]
        latest: bool,
    },

    /// Print the newest snapshot file name matching <name>*<ext>
    Latest {
        /// Name prefix
        name: String,

        /// Stage folder
        #[arg(short, long, default_value = "interim")]
        folder: Namespace,

        /// File extension (with or without the dot)
        #[arg(short, long, default_value = "csv")]
        ext: String,
    },

    /// Print the dataset label (name_MMDD) of the newest CSV snapshot
    Label {
        /// Name prefix
        name: String,

        /// Stage folder
        #[arg(short, long, default_value = "interim")]
        folder: Namespace,
    },

    /// Print the MMDD version of a snapshot file name
    Version {
        /// File name such as kaggle_0102_080000.csv
        filename: String,
    },

    /// Preview the newest CSV snapshot, or a sheet of the newest workbook
    Show {
        /// Name prefix
        name: String,

        /// Stage folder
        #[arg(short, long, default_value = "interim")]
        folder: Namespace,

        /// Read the newest .xlsx instead and show this sheet ("all" for every sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Maximum rows to preview
        #[arg(short = 'n', long, default_value = "20")]
        rows: usize,

        /// Print tables as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the sheets of the newest workbook
    Sheets {
        /// Name prefix
        name: String,

        /// Stage folder
        #[arg(short, long, default_value = "interim")]
        folder: Namespace,
    },

    /// Collect the newest CSV of each dataset into one workbook
    Bundle {
        /// Logical name of the workbook
        output: String,

        /// Datasets to include, one sheet each
        #[arg(required = true)]
        datasets: Vec<String>,

        /// Stage folder (read and write)
        #[arg(short, long, default_value = "interim")]
        folder: Namespace,

        /// Append this tag to every sheet name
        #[arg(long, conflicts_with = "tag_today")]
        tag: Option<String>,

        /// Append _MMDD of today to every sheet name
        #[arg(long)]
        tag_today: bool,

        /// Use the `_latest` suffix instead of a timestamp
        #[arg(long)]
        latest: bool,

        /// printf-style float format, e.g. %.2f (default %.3f)
        #[arg(long)]
        float_format: Option<String>,
    },
}

impl Commands {
    /// Commands that only compute a name never create the data root
    fn touches_root(&self) -> bool {
        !matches!(self, Commands::Stamp { .. } | Commands::Version { .. })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_config = if cli.command.touches_root() {
        LogConfig::new(&cli.root)
    } else {
        LogConfig::console_only()
    };
    let _guard = init_logging(&log_config.debug_to_console(cli.verbose))?;
    let vault = Vault::new(DataRoot::new(cli.root));

    match cli.command {
        Commands::Init => cli::init(&vault)?,

        Commands::Stamp {
            name,
            folder,
            ext,
            latest,
        } => {
            cli::stamp(&vault, &name, folder, &ext, latest)?;
        }

        Commands::Latest { name, folder, ext } => {
            cli::latest(&vault, &name, folder, &ext)?;
        }

        Commands::Label { name, folder } => {
            cli::label(&vault, &name, folder)?;
        }

        Commands::Version { filename } => {
            cli::version(&filename)?;
        }

        Commands::Show {
            name,
            folder,
            sheet,
            rows,
            json,
        } => cli::show(&vault, &name, folder, sheet, rows, json)?,

        Commands::Sheets { name, folder } => {
            cli::sheets(&vault, &name, folder)?;
        }

        Commands::Bundle {
            output,
            datasets,
            folder,
            tag,
            tag_today,
            latest,
            float_format,
        } => {
            let tag = match tag {
                Some(tag) => VersionTag::from(tag),
                None => VersionTag::from(tag_today),
            };
            cli::bundle(&vault, &output, folder, &datasets, tag, latest, float_format)?;
        }
    }

    Ok(())
}
