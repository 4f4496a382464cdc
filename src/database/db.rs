use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, RuntimeErr};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Database backup result
#[derive(Debug, Clone)]
pub struct BackupResult {
    pub path: PathBuf,
    pub message: String,
}

// ==================== Connection management ====================

/// Builds the sqlx connection string for a database file.
pub fn sqlite_url_for_path(db_path: &Path) -> Result<String, DbErr> {
    let db_url = Url::from_file_path(db_path).map_err(|_| {
        DbErr::Conn(RuntimeErr::Internal(format!(
            "Invalid database path: {}",
            db_path.display()
        )))
    })?;

    Ok(format!("sqlite:{}?mode=rwc", db_url.path()))
}

/// Opens (and creates when missing) the database file at `db_path`.
pub async fn connect_file(db_path: &Path) -> Result<DatabaseConnection, DbErr> {
    // 1. Create the directory on first start
    if !db_path.exists() {
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DbErr::Conn(RuntimeErr::Internal(format!(
                    "cannot create database directory: {}",
                    e
                )))
            })?;
        }
        log::info!("first start, creating database: {}", db_path.display());
    } else {
        log::info!("using database: {}", db_path.display());
    }

    // 2. Build the connection string with `url`
    let connection_string = sqlite_url_for_path(db_path)?;

    establish_connection(&connection_string).await
}

/// Establish a SeaORM database connection.
///
/// A local SQLite file needs exactly one pooled connection; it also keeps `sqlite::memory:`
/// databases alive for the lifetime of the connection.
pub async fn establish_connection(connection_string: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(connection_string.to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    #[cfg(debug_assertions)]
    log::debug!("database connection string: {}", options.get_url());

    Database::connect(options).await
}

/// Closes the database connection
pub async fn close_connection(conn: DatabaseConnection) -> Result<(), DbErr> {
    conn.close().await?;
    Ok(())
}

// ==================== Backup ====================

/// Timestamped backup file name
fn generate_backup_filename() -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S_%3f").to_string();
    format!("game_store_{}.db", timestamp)
}

/// Hot backup through `VACUUM INTO`.
///
/// Safe while the database is in use; the copy is also compacted.
pub async fn backup_database(
    db: &DatabaseConnection,
    backup_dir: &Path,
) -> Result<BackupResult, DbErr> {
    if !backup_dir.exists() {
        fs::create_dir_all(backup_dir).map_err(|e| {
            DbErr::Custom(format!("cannot create backup directory: {}", e))
        })?;
    }

    let target_path = backup_dir.join(generate_backup_filename());

    // SQLite accepts forward slashes on Windows too, so only quotes need escaping
    let target_path_str = target_path
        .to_str()
        .ok_or_else(|| DbErr::Custom("backup path is not valid UTF-8".to_string()))?
        .replace('\\', "/");
    let escaped_path = target_path_str.replace('\'', "''");

    db.execute_unprepared(&format!("VACUUM INTO '{}'", escaped_path))
        .await?;

    log::info!("database backed up to {}", target_path_str);

    Ok(BackupResult {
        path: target_path,
        message: "Database backup created".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};

    #[tokio::test]
    async fn file_database_is_created_with_its_directory() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("data").join("store.db");

        let db = connect_file(&db_path).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        close_connection(db).await.unwrap();

        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn vacuum_backup_writes_a_copy() {
        let dir = tempfile::tempdir().unwrap();
        let db = establish_connection("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let result = backup_database(&db, &dir.path().join("backups"))
            .await
            .unwrap();

        assert!(result.path.exists());
        assert!(fs::metadata(&result.path).unwrap().len() > 0);
    }

    #[test]
    fn url_uses_rwc_mode() {
        let dir = tempfile::tempdir().unwrap();
        let url = sqlite_url_for_path(&dir.path().join("store.db")).unwrap();
        assert!(url.starts_with("sqlite:"));
        assert!(url.ends_with("store.db?mode=rwc"));
    }
}
