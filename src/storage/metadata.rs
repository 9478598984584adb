use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const METADATA_FILE: &str = "metadata.json";

/// Identity of one tracked database: its name, the ordered activity
/// catalog and the directory the database lives under. Written once
/// when the database is created and immutable afterwards; the on-disk
/// copy is the single source of truth for which activities exist.
///
/// Activities are referenced everywhere else by their position in
/// `activities`, so the catalog must never be reordered.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseMetadata {
    pub name: String,
    pub activities: Vec<String>,
    pub par_dir: PathBuf,
}

impl DatabaseMetadata {
    pub fn new(name: impl Into<String>, activities: Vec<String>, par_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            activities,
            par_dir: par_dir.into(),
        }
    }

    /// Root directory of the database, owner of the whole log tree.
    pub fn db_path(&self) -> PathBuf {
        self.par_dir.join(&self.name)
    }

    pub fn file(&self) -> PathBuf {
        self.db_path().join(METADATA_FILE)
    }

    pub fn metadata_file(par_dir: &Path, name: &str) -> PathBuf {
        par_dir.join(name).join(METADATA_FILE)
    }

    pub fn activity_name(&self, position: usize) -> Option<&str> {
        self.activities.get(position).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_derive_from_parent_and_name() {
        let metadata = DatabaseMetadata::new(
            "habits",
            vec!["projects".into(), "rest".into()],
            "/tmp/data",
        );

        assert_eq!(metadata.db_path(), PathBuf::from("/tmp/data/habits"));
        assert_eq!(
            metadata.file(),
            PathBuf::from("/tmp/data/habits/metadata.json")
        );
        assert_eq!(
            DatabaseMetadata::metadata_file(Path::new("/tmp/data"), "habits"),
            metadata.file()
        );
    }

    #[test]
    fn test_activity_name_lookup() {
        let metadata =
            DatabaseMetadata::new("habits", vec!["projects".into(), "rest".into()], "/tmp");

        assert_eq!(metadata.activity_name(1), Some("rest"));
        assert_eq!(metadata.activity_name(2), None);
    }
}
