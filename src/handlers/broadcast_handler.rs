//! handlers/broadcast_handler.rs

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::handlers::auth_handler::require_admin;
use crate::models::broadcast_model::BroadcastRequest;
use crate::services::analytics_service::AnalyticsService;
use crate::services::telegram_service::TelegramService;

/// POST /api/broadcast
///
/// Valida el mensaje antes de resolver destinatarios: vacío o solo
/// espacios es error del cliente, sin efectos. Si la resolución contra el
/// store falla, el broadcast completo falla; fallos de envío individuales
/// solo se cuentan.
pub async fn send_broadcast_endpoint(
    req: HttpRequest,
    analytics_service: web::Data<AnalyticsService>,
    telegram_service: web::Data<TelegramService>,
    body: web::Json<BroadcastRequest>,
) -> HttpResponse {
    if let Some(denied) = require_admin(&req) {
        return denied;
    }

    let message = body.into_inner().message;
    if message.trim().is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Message content is required"
        }));
    }

    let recipients = match analytics_service.broadcast_recipients().await {
        Ok(ids) => ids,
        Err(e) => {
            log::error!("Broadcast error: {:?}", e);
            return HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to send broadcast",
                "error": e.to_string()
            }));
        }
    };

    if recipients.is_empty() {
        return HttpResponse::Ok().json(json!({
            "success": true,
            "result": {
                "successCount": 0,
                "failureCount": 0,
                "message": "No users found to broadcast to."
            }
        }));
    }

    log::info!("Broadcasting to {} recipients", recipients.len());
    let result = telegram_service.broadcast(&recipients, &message).await;

    HttpResponse::Ok().json(json!({ "success": true, "result": result }))
}
