//! services/status_service.rs
//! Estado del bot en dos niveles: override manual del admin y, si está en
//! `auto`, un health check activo contra el endpoint del bot.

use chrono::Utc;
use reqwest::Client;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::models::status_model::{BotStatus, StatusKind, StatusOverride, StatusSource};

const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Almacén del override manual. Es un trait para que los tests metan un
/// fake y para poder respaldarlo en un store compartido si algún día hay
/// más de una instancia.
pub trait OverrideStore: Send + Sync {
    fn get(&self) -> StatusOverride;
    fn set(&self, value: StatusOverride);
}

/// Implementación por proceso: se pierde al reiniciar y no expira, igual
/// que el flag original. Escrituras concurrentes: gana la última (acción
/// rara, manual, de admin).
pub struct InMemoryOverrideStore {
    value: RwLock<StatusOverride>,
}

impl Default for InMemoryOverrideStore {
    fn default() -> Self {
        Self {
            value: RwLock::new(StatusOverride::Auto),
        }
    }
}

impl OverrideStore for InMemoryOverrideStore {
    fn get(&self) -> StatusOverride {
        *self.value.read().unwrap()
    }

    fn set(&self, value: StatusOverride) {
        *self.value.write().unwrap() = value;
    }
}

#[derive(Clone)]
pub struct StatusService {
    http_client: Client,
    health_url: String,
    probe_timeout: Duration,
    overrides: Arc<dyn OverrideStore>,
}

impl StatusService {
    pub fn new(health_url: String, overrides: Arc<dyn OverrideStore>) -> Self {
        Self {
            http_client: Client::new(),
            health_url,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            overrides,
        }
    }

    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Estado actual. Se recalcula en cada llamada, sin cache: en modo
    /// `auto` eso implica un probe de red por lectura.
    ///
    /// El probe que falla no es un error a propagar: es el mecanismo
    /// normal de detección de caída. Siempre devuelve un BotStatus.
    pub async fn bot_status(&self) -> BotStatus {
        if let Some(kind) = self.overrides.get().as_kind() {
            return BotStatus {
                status: kind,
                message: kind.manual_message().to_string(),
                source: StatusSource::Manual,
                last_checked: Utc::now(),
            };
        }

        let (status, message) = match self
            .http_client
            .get(&self.health_url)
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => (
                StatusKind::Operational,
                "All systems operational".to_string(),
            ),
            Ok(response) => (
                StatusKind::Issues,
                format!("Health check returned {}", response.status().as_u16()),
            ),
            Err(e) => {
                log::debug!("Health probe failed: {:?}", e);
                (StatusKind::Down, "Bot is unreachable".to_string())
            }
        };

        BotStatus {
            status,
            message,
            source: StatusSource::Auto,
            last_checked: Utc::now(),
        }
    }

    pub fn override_value(&self) -> StatusOverride {
        self.overrides.get()
    }

    pub fn set_override(&self, value: StatusOverride) {
        log::info!("Manual status override set to {:?}", value);
        self.overrides.set(value);
    }
}
