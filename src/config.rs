//! Startup configuration
//!
//! Built once from the command line; paths the user leaves out come from `store-path`.

use std::path::PathBuf;

use clap::Parser;
use store_path::StorePaths;

use crate::error::Result;
use crate::utils::logs::LogLevel;

#[derive(Parser, Debug)]
#[command(name = "game-store")]
#[command(about = "A video game storefront", version, long_about = None)]
pub struct Args {
    /// SQLite database file (created on first start)
    #[arg(long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Directory for database backups
    #[arg(long, value_name = "DIR")]
    pub backup_dir: Option<PathBuf>,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Username of the administrator created when the store has none
    #[arg(long, value_name = "USERNAME", default_value = "admin")]
    pub admin_username: String,

    /// Password of that administrator
    #[arg(long, value_name = "PASSWORD")]
    pub admin_password: Option<String>,
}

/// Seed administrator credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub database_path: PathBuf,
    pub backup_dir: PathBuf,
    pub log_level: LogLevel,
    /// `None` skips seeding
    pub admin_seed: Option<AdminSeed>,
}

impl StoreConfig {
    pub fn from_args(args: Args) -> Result<Self> {
        let database_path = match args.database {
            Some(path) => path,
            None => StorePaths::resolve()?.database_file(),
        };
        // backups go next to a custom database unless asked otherwise
        let backup_dir = match (args.backup_dir, database_path.parent()) {
            (Some(dir), _) => dir,
            (None, Some(parent)) if !parent.as_os_str().is_empty() => {
                parent.join(store_path::BACKUP_DIR_NAME)
            }
            (None, _) => StorePaths::resolve()?.backup_dir(),
        };
        let admin_seed = args.admin_password.map(|password| AdminSeed {
            username: args.admin_username,
            password,
        });

        Ok(Self {
            database_path,
            backup_dir,
            log_level: args.log_level,
            admin_seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_paths_win() {
        let args = Args::parse_from([
            "game-store",
            "--database",
            "/tmp/store/shop.db",
            "--log-level",
            "debug",
            "--admin-password",
            "changeme",
        ]);
        let config = StoreConfig::from_args(args).unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/store/shop.db"));
        assert_eq!(config.backup_dir, PathBuf::from("/tmp/store/backups"));
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(
            config.admin_seed,
            Some(AdminSeed {
                username: "admin".into(),
                password: "changeme".into()
            })
        );
    }

    #[test]
    fn no_password_means_no_seed() {
        let args = Args::parse_from([
            "game-store",
            "--database",
            "shop.db",
            "--backup-dir",
            "bk",
        ]);
        let config = StoreConfig::from_args(args).unwrap();
        assert_eq!(config.backup_dir, PathBuf::from("bk"));
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.admin_seed, None);
    }
}
