//! models/broadcast_model.rs
//! Request/response del envío masivo a usuarios del bot.

use serde::{Deserialize, Serialize};

/// Request de POST /api/broadcast. No se persiste.
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastRequest {
    /// Markdown tal cual lo escribió el admin.
    pub message: String,
}

/// Conteo agregado del fan-out.
/// Invariante: success_count + failure_count == destinatarios resueltos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastResult {
    pub success_count: u64,
    pub failure_count: u64,
}
