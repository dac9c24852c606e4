mod admin_handlers;
mod auth;
mod booking_handlers;
mod config;
mod db;
mod error;
mod images;
mod models;
mod routes;
mod state;
mod user_handlers;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::db::MemoryStore;
use crate::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;
    let addr = format!("0.0.0.0:{}", config.port);

    let state = web::Data::new(AppState::new(&config, Arc::new(MemoryStore::new())));

    let origins = config.cors_origins.clone();
    info!(%addr, ?origins, "listening");

    HttpServer::new(move || {
        App::new()
            .wrap(routes::cors(&origins))
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind(addr)?
    .run()
    .await
}
