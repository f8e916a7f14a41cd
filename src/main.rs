use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use sqlx::{Pool, Sqlite};
use std::sync::Arc;
use std::time::Duration;

use crate::config::dashboard_config::DashboardConfig;
use crate::logger::init_logger;
use crate::services::analytics_service::AnalyticsService;
use crate::services::status_service::{InMemoryOverrideStore, StatusService};
use crate::services::telegram_service::TelegramService;
use crate::services::user_service::UserService;

mod app;
mod config;
mod handlers;
mod logger;
mod models;
mod services;
#[cfg(test)]
mod tests;

async fn setup_database() -> Pool<Sqlite> {
    // DATABASE_URL apunta al store que escribe el bot; si no está, un
    // SQLite local en ./data (se crea si no existe).
    let db_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            std::fs::create_dir_all("data").expect("No se pudo crear directorio 'data'");
            let db_path = std::env::current_dir()
                .expect("No se pudo obtener el current_dir")
                .join("data")
                .join("dashboard.db");
            format!("sqlite:{}?mode=rwc", db_path.to_string_lossy())
        }
    };

    log::info!("Conectando a SQLite en {}", db_url);

    Pool::<Sqlite>::connect(&db_url)
        .await
        .expect("No se pudo conectar a la base de datos SQLite.")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Cargar .env al inicio
    init_logger();

    let config = DashboardConfig::from_env();
    if config.telegram_bot_token.is_empty() {
        log::warn!("TELEGRAM_BOT_TOKEN no está definido; los broadcasts van a fallar");
    }

    let db_pool = setup_database().await;

    let analytics_service = AnalyticsService::new(db_pool.clone());
    if let Err(e) = analytics_service.run_migrations().await {
        panic!("Fallo en migraciones: {:?}", e);
    }

    let user_service = UserService::new(db_pool.clone());
    let telegram_service = TelegramService::new(config.telegram_bot_token.clone());
    let status_service = StatusService::new(
        config.bot_health_url.clone(),
        Arc::new(InMemoryOverrideStore::default()),
    )
    .probe_timeout(Duration::from_secs(config.probe_timeout_secs));

    log::info!(
        "Levantando servidor en {}:{}",
        config.bind_address,
        config.bind_port
    );
    let bind = (config.bind_address.clone(), config.bind_port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(analytics_service.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(telegram_service.clone()))
            .app_data(web::Data::new(status_service.clone()))
            .configure(app::init_app)
    })
    .workers(1)
    .bind(bind)?
    .run()
    .await
}
