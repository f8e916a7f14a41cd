//! config/dashboard_config.rs
//! Configuración global del dashboard, con valores por defecto
//! sobreescribibles por variables de entorno (.env vía dotenv).

use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub bind_address: String,
    pub bind_port: u16,
    /// Password del área admin (ADMIN_PASSWORD). Default solo para dev.
    pub admin_password: String,
    /// Token del bot (TELEGRAM_BOT_TOKEN). Sin él, los envíos fallan.
    pub telegram_bot_token: String,
    /// Endpoint de health del bot (BOT_HEALTH_URL).
    pub bot_health_url: String,
    pub probe_timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            bind_address: "0.0.0.0".to_string(),
            bind_port: 5023,
            admin_password: "admin".to_string(),
            telegram_bot_token: String::new(),
            bot_health_url: "https://thenagger.onrender.com/health".to_string(),
            probe_timeout_secs: 5,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        let defaults = DashboardConfig::default();
        DashboardConfig {
            bind_address: env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            bind_port: env::var("BIND_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.bind_port),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN")
                .unwrap_or(defaults.telegram_bot_token),
            bot_health_url: env::var("BOT_HEALTH_URL").unwrap_or(defaults.bot_health_url),
            probe_timeout_secs: env::var("PROBE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.probe_timeout_secs),
        }
    }
}
