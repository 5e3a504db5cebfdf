//! Latest-version resolution
//!
//! Candidates are the regular files in one directory whose name matches
//! `<name_like>*<ext>`. The newest modification time wins; on a tie the
//! lexically greatest file name wins so the result does not depend on
//! directory listing order.

use glob::Pattern;
use std::fs;
use std::path::Path;
use std::time::SystemTime;
use tracing::debug;

use crate::error::{VaultError, VaultResult};
use crate::naming::{normalize_extension, VersionedName};

/// A file that matched the candidate pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub modified: SystemTime,
}

/// List the files in `directory` matching `<name_like>*<extension>`.
///
/// The prefix and extension are matched literally; only the `*` between them
/// is a wildcard.
pub fn candidates(directory: &Path, name_like: &str, extension: &str) -> VaultResult<Vec<Candidate>> {
    let pattern = candidate_pattern(name_like, extension)?;

    let mut found = Vec::new();
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !pattern.matches(&name) {
            continue;
        }
        let metadata = fs::metadata(entry.path())?;
        if !metadata.is_file() {
            continue;
        }
        found.push(Candidate {
            name,
            modified: metadata.modified()?,
        });
    }
    Ok(found)
}

/// Base name of the newest file in `directory` matching `<name_like>*<extension>`.
///
/// Fails with [`VaultError::NotFound`] when nothing matches.
pub fn find_latest(directory: &Path, name_like: &str, extension: &str) -> VaultResult<String> {
    let extension = normalize_extension(extension);
    let all_files = candidates(directory, name_like, &extension)?;
    debug!(
        "{} candidates for {}*{} in {}",
        all_files.len(),
        name_like,
        extension,
        directory.display()
    );

    all_files
        .into_iter()
        .max_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.name.cmp(&b.name)))
        .map(|latest| latest.name)
        .ok_or_else(|| VaultError::NotFound {
            pattern: format!("{}{}", directory.join(name_like).display(), extension),
        })
}

/// Dataset label of a versioned filename: `foo_0102_080000.csv` → `foo_0102`
pub fn dataset_label(filename: &str) -> VaultResult<String> {
    Ok(VersionedName::parse(filename)?.label())
}

/// Version (date segment) of a versioned filename: `foo_0102_080000.csv` → `0102`
pub fn file_version(filename: &str) -> VaultResult<String> {
    VersionedName::parse(filename)?
        .version()
        .map(str::to_string)
        .ok_or_else(|| VaultError::MalformedName(format!("{} carries no version", filename)))
}

/// Resolve the latest `<name_like>*<extension>` file and return its label
pub fn latest_label(directory: &Path, name_like: &str, extension: &str) -> VaultResult<String> {
    dataset_label(&find_latest(directory, name_like, extension)?)
}

fn candidate_pattern(name_like: &str, extension: &str) -> VaultResult<Pattern> {
    let raw = format!("{}*{}", Pattern::escape(name_like), Pattern::escape(extension));
    Pattern::new(&raw).map_err(|e| VaultError::Pattern(format!("{}: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str, secs_after_epoch: u64) {
        let file = File::create(dir.join(name)).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs_after_epoch))
            .unwrap();
    }

    #[test]
    fn test_newest_mtime_beats_name_order() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "foo_0101_090000.csv", 2_000);
        touch(dir.path(), "foo_0102_080000.csv", 1_000);

        assert_eq!(find_latest(dir.path(), "foo", ".csv").unwrap(), "foo_0101_090000.csv");
    }

    #[test]
    fn test_bare_extension_is_normalized() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "foo_latest.csv", 10);
        assert_eq!(find_latest(dir.path(), "foo", "csv").unwrap(), "foo_latest.csv");
    }

    #[test]
    fn test_tie_breaks_on_name() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "foo_0101_090000.csv", 500);
        touch(dir.path(), "foo_0103_090000.csv", 500);
        touch(dir.path(), "foo_0102_090000.csv", 500);

        assert_eq!(find_latest(dir.path(), "foo", ".csv").unwrap(), "foo_0103_090000.csv");
    }

    #[test]
    fn test_not_found() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "bar_0101_090000.csv", 1);

        let err = find_latest(dir.path(), "foo", ".csv").unwrap_err();
        assert!(matches!(err, VaultError::NotFound { .. }));
        assert!(err.to_string().contains("foo.csv"));
    }

    #[test]
    fn test_extension_filters_candidates() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "foo_0101_090000.xlsx", 900);
        touch(dir.path(), "foo_0101_080000.csv", 100);

        assert_eq!(find_latest(dir.path(), "foo", ".csv").unwrap(), "foo_0101_080000.csv");
        assert_eq!(find_latest(dir.path(), "foo", "xlsx").unwrap(), "foo_0101_090000.xlsx");
    }

    #[test]
    fn test_prefix_is_ambiguous() {
        // "foo" also matches "food_*": the pattern is a prefix, not a name
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "foo_0101_090000.csv", 100);
        touch(dir.path(), "food_0101_090000.csv", 200);

        assert_eq!(find_latest(dir.path(), "foo", ".csv").unwrap(), "food_0101_090000.csv");
        assert_eq!(find_latest(dir.path(), "foo_", ".csv").unwrap(), "foo_0101_090000.csv");
    }

    #[test]
    fn test_glob_metacharacters_are_literal() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a_0101_090000.csv", 100);

        assert!(find_latest(dir.path(), "[a]", ".csv").is_err());
    }

    #[test]
    fn test_directories_are_ignored() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("foo_backup.csv")).unwrap();

        assert!(matches!(
            find_latest(dir.path(), "foo", ".csv"),
            Err(VaultError::NotFound { .. })
        ));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = find_latest(&dir.path().join("nope"), "foo", ".csv").unwrap_err();
        assert!(matches!(err, VaultError::Io(_)));
    }

    #[test]
    fn test_label_and_version() {
        assert_eq!(dataset_label("foo_0102_080000.csv").unwrap(), "foo_0102");
        assert_eq!(file_version("foo_0102_080000.csv").unwrap(), "0102");
        assert_eq!(dataset_label("foo_latest.csv").unwrap(), "foo");
        assert!(file_version("foo_latest.csv").is_err());
        assert!(dataset_label("notes.txt").is_err());
    }

    #[test]
    fn test_latest_label() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "kaggle_0101_090000.csv", 100);
        touch(dir.path(), "kaggle_0315_101500.csv", 300);

        assert_eq!(latest_label(dir.path(), "kaggle", ".csv").unwrap(), "kaggle_0315");
    }
}
