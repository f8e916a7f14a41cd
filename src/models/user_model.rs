//! models/user_model.rs
//! Estructuras de la tabla `users` y del backfill desde `tasks`.

use serde::Serialize;

/// Conteos de la tabla `users` (requiere haber corrido el sync).
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_registered: u64,
    pub active_users: u64,
    pub new_users_last7_days: u64,
}

/// Resultado de GET /api/admin/sync-users.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub synced: u64,
    pub message: String,
}
