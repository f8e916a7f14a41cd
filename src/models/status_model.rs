//! models/status_model.rs
//! Estructuras y enums para el estado del bot (público y override manual).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Estado operativo que ve el público en la status page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Operational,
    Issues,
    Down,
    Maintenance,
}

impl StatusKind {
    /// Mensaje fijo que acompaña a cada estado cuando el admin lo fuerza.
    pub fn manual_message(self) -> &'static str {
        match self {
            StatusKind::Operational => "System forcibly marked as operational.",
            StatusKind::Issues => "Performance issues reported.",
            StatusKind::Down => "Major outage.",
            StatusKind::Maintenance => "Scheduled maintenance in progress.",
        }
    }
}

/// Valor del override manual: `auto` delega en el health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusOverride {
    Auto,
    Operational,
    Issues,
    Down,
    Maintenance,
}

impl StatusOverride {
    /// `None` cuando el override está en `auto`.
    pub fn as_kind(self) -> Option<StatusKind> {
        match self {
            StatusOverride::Auto => None,
            StatusOverride::Operational => Some(StatusKind::Operational),
            StatusOverride::Issues => Some(StatusKind::Issues),
            StatusOverride::Down => Some(StatusKind::Down),
            StatusOverride::Maintenance => Some(StatusKind::Maintenance),
        }
    }
}

impl FromStr for StatusOverride {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(StatusOverride::Auto),
            "operational" => Ok(StatusOverride::Operational),
            "issues" => Ok(StatusOverride::Issues),
            "down" => Ok(StatusOverride::Down),
            "maintenance" => Ok(StatusOverride::Maintenance),
            _ => Err(InvalidStatus),
        }
    }
}

/// Token de estado fuera del set permitido.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidStatus;

impl fmt::Display for InvalidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Invalid status")
    }
}

impl std::error::Error for InvalidStatus {}

/// Origen del estado reportado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusSource {
    Auto,
    Manual,
}

/// Respuesta de GET /api/status. Se recalcula en cada lectura.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotStatus {
    pub status: StatusKind,
    pub message: String,
    pub source: StatusSource,
    pub last_checked: DateTime<Utc>,
}
