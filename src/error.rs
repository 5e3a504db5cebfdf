use thiserror::Error;

pub type VaultResult<T> = Result<T, VaultError>;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel export error: {0}")]
    Export(String),

    #[error("Excel import error: {0}")]
    Import(String),

    #[error("Unable to find any files like {pattern}")]
    NotFound { pattern: String },

    #[error("Invalid folder '{0}' (expected one of raw, interim, processed, external, production)")]
    InvalidNamespace(String),

    #[error("Filename does not follow <name>_<MMDD>_<HHMMSS> or <name>_latest: {0}")]
    MalformedName(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid file pattern: {0}")]
    Pattern(String),

    #[error("Logging error: {0}")]
    Logging(String),
}
