//! handlers/status_handler.rs

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::handlers::auth_handler::require_admin;
use crate::models::status_model::StatusOverride;
use crate::services::status_service::StatusService;

/// GET /api/status (público)
pub async fn get_status_endpoint(status_service: web::Data<StatusService>) -> HttpResponse {
    let status = status_service.bot_status().await;
    HttpResponse::Ok().json(status)
}

/// GET /api/admin/status
pub async fn get_override_endpoint(
    req: HttpRequest,
    status_service: web::Data<StatusService>,
) -> HttpResponse {
    if let Some(denied) = require_admin(&req) {
        return denied;
    }

    HttpResponse::Ok().json(json!({ "status": status_service.override_value() }))
}

#[derive(Deserialize)]
pub struct SetStatusRequest {
    status: String,
}

/// POST /api/admin/status
///
/// Acepta exactamente los cinco tokens (`auto` + los cuatro estados);
/// cualquier otra cosa es 400 sin efectos.
pub async fn set_override_endpoint(
    req: HttpRequest,
    status_service: web::Data<StatusService>,
    body: web::Json<SetStatusRequest>,
) -> HttpResponse {
    if let Some(denied) = require_admin(&req) {
        return denied;
    }

    match body.status.parse::<StatusOverride>() {
        Ok(value) => {
            status_service.set_override(value);
            HttpResponse::Ok().json(json!({
                "success": true,
                "status": status_service.override_value()
            }))
        }
        Err(_) => HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Invalid status"
        })),
    }
}
