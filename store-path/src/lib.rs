//! Where the store keeps its files.
//!
//! A `store-data/game_store.db` next to the executable switches to portable mode; otherwise
//! everything lives in the per-user data directory.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;

pub const DB_FILE_NAME: &str = "game_store.db";
pub const BACKUP_DIR_NAME: &str = "backups";
const PORTABLE_DIR_NAME: &str = "store-data";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot resolve the user data directory")]
pub struct NoDataDir;

/// Resolved data directory layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    data_dir: PathBuf,
}

impl StorePaths {
    pub fn resolve() -> Result<Self, NoDataDir> {
        if let Some(portable) = portable_dir() {
            return Ok(Self::at(portable));
        }
        ProjectDirs::from("com", "gamestore", "game-store")
            .map(|dirs| Self::at(dirs.data_dir()))
            .ok_or(NoDataDir)
    }

    pub fn at(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn database_file(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.data_dir.join(BACKUP_DIR_NAME)
    }
}

fn portable_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let dir = exe.parent()?.join(PORTABLE_DIR_NAME);
    dir.join(DB_FILE_NAME).is_file().then_some(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_sit_under_the_data_dir() {
        let paths = StorePaths::at("/srv/store");
        assert_eq!(paths.database_file(), PathBuf::from("/srv/store/game_store.db"));
        assert_eq!(paths.backup_dir(), PathBuf::from("/srv/store/backups"));
    }

    #[test]
    fn resolved_dir_is_named_after_the_store() {
        // no home directory in some sandboxes
        if let Ok(paths) = StorePaths::resolve() {
            let dir = paths.data_dir().to_string_lossy().to_lowercase();
            assert!(dir.contains("game-store") || dir.contains("gamestore"));
        }
    }
}
