use std::process;
use std::time::Duration;

use env_logger::Env;

use product_store::db::{establish_connection_pool_with_timeout, run_migrations};
use product_store::models::config::StoreConfig;
use product_store::repository::{DieselRepository, ProductReader};

fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match StoreConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            process::exit(1);
        }
    };

    let pool = match establish_connection_pool_with_timeout(
        &config.database_url,
        Duration::from_millis(config.busy_timeout_ms),
    ) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to open database {}: {e}", config.database_url);
            process::exit(1);
        }
    };

    let migrated = pool
        .get()
        .map_err(|e| e.to_string())
        .and_then(|mut conn| run_migrations(&mut conn).map_err(|e| e.to_string()));
    if let Err(e) = migrated {
        log::error!("Failed to prepare database schema: {e}");
        process::exit(1);
    }

    let repo = DieselRepository::new(pool);
    match repo.count_products() {
        Ok(total) => log::info!("Database {} ready, {total} products stored", config.database_url),
        Err(e) => {
            log::error!("Failed to count products: {e}");
            process::exit(1);
        }
    }
}
