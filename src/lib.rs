pub mod cart;
pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod terminal;
pub mod ui;
pub mod utils;

#[cfg(test)]
mod test_support;

use clap::Parser;
use migration::{Migrator, MigratorTrait};

use config::{Args, StoreConfig};
use database::db;
use error::Result;
use utils::logs::init_logging;

pub fn run() {
    let config = match StoreConfig::from_args(Args::parse()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    init_logging(config.log_level);

    if let Err(e) = start(&config) {
        log::error!("game store stopped: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn start(config: &StoreConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let conn = db::connect_file(&config.database_path).await?;
        log::info!("database connection established");

        log::info!("running database migrations...");
        if let Err(e) = Migrator::up(&conn, None).await {
            log::error!("database migration failed: {}", e);
            db::close_connection(conn).await?;
            return Err(e.into());
        }
        log::info!("database migrations complete");

        if let Some(seed) = &config.admin_seed {
            match database::ensure_default_admin(&conn, &seed.username, &seed.password).await {
                Ok(Some(admin)) => log::info!("created administrator {}", admin.username()),
                Ok(None) => log::debug!("an administrator already exists"),
                Err(e) => log::warn!("could not create the administrator: {}", e),
            }
        }

        let result = terminal::run_shell(&conn, config).await;

        // close before reporting so the file is released either way
        match db::close_connection(conn).await {
            Ok(()) => log::info!("database connection closed"),
            Err(e) => log::error!("error closing the database connection: {}", e),
        }
        result
    })
}
