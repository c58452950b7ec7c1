//! Single binary web server: JSON REST API over the poker ledger.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env (or .env): HOST, PORT,
//! LEDGER_PATH (CSV ledger file, default players.csv), CACHE_TTL_SECS (default 5).

use actix_web::{get, web::Data, App, HttpResponse, HttpServer};
use poker_ledger_web::{web, CsvLedgerStore, Ledger, Settings};
use std::sync::Arc;

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = Settings::from_env();
    let store = CsvLedgerStore::open(&settings.ledger_path)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    log::info!(
        "Ledger at {} (cache TTL {:?})",
        store.path().display(),
        settings.cache_ttl
    );

    let ledger = Data::new(Ledger::new(Arc::new(store), settings.cache_ttl));

    let bind = (settings.host.as_str(), settings.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(ledger.clone())
            .service(favicon)
            .configure(web::configure)
    })
    .bind(bind)?
    .run()
    .await
}
