//! Versioned dataset filenames
//!
//! Every snapshot written by the vault is named with one grammar:
//!
//! ```text
//! <name>_<MMDD>_<HHMMSS><ext>     timestamped snapshot
//! <name>_latest<ext>              untimestamped snapshot
//! ```
//!
//! [`VersionedName`] is both the formatter and the parser for that grammar, so
//! the label and version helpers in [`crate::resolver`] never split filenames
//! on their own.

use chrono::{Datelike, Local, Timelike};
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{VaultError, VaultResult};

/// Literal suffix used for untimestamped snapshots
pub const LATEST_SUFFIX: &str = "latest";

/// The suffix segment of a versioned filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stamp {
    /// `<MMDD>_<HHMMSS>` captured at write time
    At { date: String, time: String },
    /// The literal `latest`
    Latest,
}

impl Stamp {
    /// Build a stamp from any date-time value
    pub fn at<T: Datelike + Timelike>(instant: &T) -> Self {
        Stamp::At {
            date: format!("{:02}{:02}", instant.month(), instant.day()),
            time: format!(
                "{:02}{:02}{:02}",
                instant.hour(),
                instant.minute(),
                instant.second()
            ),
        }
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stamp::At { date, time } => write!(f, "{}_{}", date, time),
            Stamp::Latest => f.write_str(LATEST_SUFFIX),
        }
    }
}

/// A filename in the vault grammar: `{name}_{stamp}{ext}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedName {
    pub name: String,
    pub stamp: Stamp,
    /// Normalized extension, always empty or starting with `.`
    pub extension: String,
}

impl VersionedName {
    pub fn new(name: impl Into<String>, stamp: Stamp, extension: &str) -> Self {
        Self {
            name: name.into(),
            stamp,
            extension: normalize_extension(extension),
        }
    }

    /// Parse a bare filename (no directory) back into its parts
    pub fn parse(filename: &str) -> VaultResult<Self> {
        let pattern = Regex::new(
            r"^(?P<name>.+)_(?:(?P<date>\d{4})_(?P<time>\d{6})|latest)(?P<ext>\.[A-Za-z0-9]+)?$",
        )
        .map_err(|e| VaultError::Parse(format!("Regex error: {}", e)))?;

        let captures = pattern
            .captures(filename)
            .ok_or_else(|| VaultError::MalformedName(filename.to_string()))?;

        let stamp = match (captures.name("date"), captures.name("time")) {
            (Some(date), Some(time)) => Stamp::At {
                date: date.as_str().to_string(),
                time: time.as_str().to_string(),
            },
            _ => Stamp::Latest,
        };

        Ok(Self {
            name: captures["name"].to_string(),
            stamp,
            extension: captures
                .name("ext")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        })
    }

    /// Parse the final component of a path
    pub fn parse_path(path: &Path) -> VaultResult<Self> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| VaultError::MalformedName(path.display().to_string()))?;
        Self::parse(filename)
    }

    /// Dataset label: everything before the final `_` segment.
    ///
    /// `foo_0102_080000.csv` → `foo_0102`, `foo_latest.csv` → `foo`.
    pub fn label(&self) -> String {
        match &self.stamp {
            Stamp::At { date, .. } => format!("{}_{}", self.name, date),
            Stamp::Latest => self.name.clone(),
        }
    }

    /// Date segment (`MMDD`) of a timestamped name, `None` for `latest`
    pub fn version(&self) -> Option<&str> {
        match &self.stamp {
            Stamp::At { date, .. } => Some(date),
            Stamp::Latest => None,
        }
    }

    pub fn file_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for VersionedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}{}", self.name, self.stamp, self.extension)
    }
}

/// Force a leading dot: `csv` → `.csv`, `.csv` → `.csv`
pub fn normalize_extension(extension: &str) -> String {
    if extension.is_empty() || extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{}", extension)
    }
}

/// Path for a new snapshot of `logical_name` in `directory`, stamped with the
/// current local time (or `_latest` when `with_timestamp` is false).
///
/// Two calls within the same clock second collide; callers accept that.
pub fn make_versioned_name(
    directory: &Path,
    logical_name: &str,
    extension: &str,
    with_timestamp: bool,
) -> PathBuf {
    make_versioned_name_at(directory, logical_name, extension, with_timestamp, &Local::now())
}

/// Same as [`make_versioned_name`] with an explicit instant
pub fn make_versioned_name_at<T: Datelike + Timelike>(
    directory: &Path,
    logical_name: &str,
    extension: &str,
    with_timestamp: bool,
    instant: &T,
) -> PathBuf {
    let stamp = if with_timestamp {
        Stamp::at(instant)
    } else {
        Stamp::Latest
    };
    directory.join(VersionedName::new(logical_name, stamp, extension).file_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn instant(h: u32, m: u32, s: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("csv"), ".csv");
        assert_eq!(normalize_extension(".xlsx"), ".xlsx");
        assert_eq!(normalize_extension(""), "");
    }

    #[test]
    fn test_timestamped_name() {
        let path = make_versioned_name_at(Path::new("data/interim"), "kaggle", "csv", true, &instant(8, 5, 9));
        assert_eq!(path, PathBuf::from("data/interim/kaggle_0102_080509.csv"));
    }

    #[test]
    fn test_latest_name_ignores_clock() {
        let a = make_versioned_name_at(Path::new("out"), "imdb", ".csv", false, &instant(1, 2, 3));
        let b = make_versioned_name_at(Path::new("out"), "imdb", ".csv", false, &instant(23, 59, 59));
        assert_eq!(a, PathBuf::from("out/imdb_latest.csv"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_seconds_differ_only_in_stamp() {
        let a = make_versioned_name_at(Path::new("d"), "tn", "csv", true, &instant(9, 0, 0));
        let b = make_versioned_name_at(Path::new("d"), "tn", "csv", true, &instant(9, 0, 1));
        assert_ne!(a, b);
        let a = VersionedName::parse_path(&a).unwrap();
        let b = VersionedName::parse_path(&b).unwrap();
        assert_eq!(a.name, b.name);
        assert_eq!(a.extension, b.extension);
        assert_eq!(a.version(), b.version());
    }

    #[test]
    fn test_parse_timestamped() {
        let parsed = VersionedName::parse("foo_0102_080000.csv").unwrap();
        assert_eq!(parsed.name, "foo");
        assert_eq!(
            parsed.stamp,
            Stamp::At {
                date: "0102".to_string(),
                time: "080000".to_string()
            }
        );
        assert_eq!(parsed.extension, ".csv");
        assert_eq!(parsed.label(), "foo_0102");
        assert_eq!(parsed.version(), Some("0102"));
    }

    #[test]
    fn test_parse_name_with_underscores() {
        let parsed = VersionedName::parse("k_and_imdb_1231_235959.xlsx").unwrap();
        assert_eq!(parsed.name, "k_and_imdb");
        assert_eq!(parsed.label(), "k_and_imdb_1231");
    }

    #[test]
    fn test_parse_latest() {
        let parsed = VersionedName::parse("combined_latest.xlsx").unwrap();
        assert_eq!(parsed.name, "combined");
        assert_eq!(parsed.stamp, Stamp::Latest);
        assert_eq!(parsed.label(), "combined");
        assert_eq!(parsed.version(), None);
    }

    #[test]
    fn test_parse_malformed() {
        for bad in ["foo.csv", "foo_0102.csv", "foo_01a2_080000.csv", "_latest.csv"] {
            assert!(
                matches!(VersionedName::parse(bad), Err(VaultError::MalformedName(_))),
                "{} should not parse",
                bad
            );
        }
    }

    #[test]
    fn test_format_parse_agree() {
        let name = VersionedName::new("raw_scrape", Stamp::at(&instant(12, 30, 0)), "csv");
        assert_eq!(VersionedName::parse(&name.file_name()).unwrap(), name);
    }
}
