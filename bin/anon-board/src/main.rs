//! # anon-board Binary
//!
//! The entry point that assembles the application based on compile-time features.

mod settings;

use std::sync::Arc;

use ab_api::{build_app, AppState};
use ab_core::{BoardService, ThreadStore};
use actix_web::{web, HttpServer};
use settings::AppConfig;

// Feature-gated imports: the store is picked at compile time
#[cfg(feature = "db-sqlite")]
use ab_db_sqlite::SqliteThreadStore;

#[cfg(all(feature = "db-memory", not(feature = "db-sqlite")))]
use ab_db_memory::MemoryThreadStore;

#[cfg(not(any(feature = "db-sqlite", feature = "db-memory")))]
compile_error!("enable one of the `db-sqlite` or `db-memory` features");

#[cfg(feature = "db-sqlite")]
async fn open_store(cfg: &AppConfig) -> anyhow::Result<Arc<dyn ThreadStore>> {
    Ok(Arc::new(SqliteThreadStore::new(&cfg.database_url).await?))
}

#[cfg(all(feature = "db-memory", not(feature = "db-sqlite")))]
async fn open_store(_cfg: &AppConfig) -> anyhow::Result<Arc<dyn ThreadStore>> {
    log::warn!("Using in-memory thread store; nothing will survive a restart");
    Ok(Arc::new(MemoryThreadStore::new()))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cfg = AppConfig::load()?;

    // 1. Initialize the store, then hand it to the service once
    let store = open_store(&cfg).await?;
    let state = web::Data::new(AppState {
        service: BoardService::new(store),
    });

    log::info!("anon-board starting on http://{}:{}", cfg.host, cfg.port);

    HttpServer::new(move || build_app(state.clone()))
        .bind((cfg.host.as_str(), cfg.port))?
        .run()
        .await?;

    Ok(())
}
