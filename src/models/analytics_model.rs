//! models/analytics_model.rs
//! Estructuras para las métricas del dashboard admin.

use serde::Serialize;
use sqlx::FromRow;

/// Tarjetas principales del dashboard. Los números de usuarios se derivan
/// del historial de `tasks` (fuente de verdad de actividad), no de `users`.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub active_users: u64,
    pub total_tasks: u64,
    pub active_tasks: u64,
    pub new_users_last7_days: u64,
}

/// Punto de la gráfica de tareas creadas por día.
#[derive(Debug, Clone, Serialize)]
pub struct ChartPoint {
    pub date: String,
    pub count: u64,
}

/// Fila de `bot_errors`, paginada en el panel de errores.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BotErrorRecord {
    pub id: i64,
    pub error_type: String,
    pub error_message: String,
    pub user_id: Option<i64>,
    pub timestamp: String,
}
