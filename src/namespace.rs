//! Pipeline storage stages under the data root

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::VaultError;

/// Environment variable consulted for the data root
pub const DATA_ROOT_ENV: &str = "DATAVAULT_ROOT";

/// Data root used when nothing else is configured
pub const DEFAULT_DATA_ROOT: &str = "data";

/// One of the fixed storage stages. Resolution never crosses stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Namespace {
    Raw,
    #[default]
    Interim,
    Processed,
    External,
    Production,
}

impl Namespace {
    pub const ALL: [Namespace; 5] = [
        Namespace::Raw,
        Namespace::Interim,
        Namespace::Processed,
        Namespace::External,
        Namespace::Production,
    ];

    /// Folder name on disk
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Raw => "raw",
            Namespace::Interim => "interim",
            Namespace::Processed => "processed",
            Namespace::External => "external",
            Namespace::Production => "production",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Namespace::ALL
            .into_iter()
            .find(|ns| ns.as_str() == s)
            .ok_or_else(|| VaultError::InvalidNamespace(s.to_string()))
    }
}

/// Root data directory holding one subfolder per [`Namespace`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRoot {
    root: PathBuf,
}

impl DataRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Directory of a stage, e.g. `data/interim`
    pub fn dir(&self, namespace: Namespace) -> PathBuf {
        self.root.join(namespace.as_str())
    }

    /// Create the root and every stage folder
    pub fn create_all(&self) -> std::io::Result<()> {
        for namespace in Namespace::ALL {
            std::fs::create_dir_all(self.dir(namespace))?;
        }
        Ok(())
    }
}

impl Default for DataRoot {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_ROOT)
    }
}
