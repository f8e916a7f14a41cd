//! handlers/user_handler.rs

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::handlers::auth_handler::require_admin;
use crate::services::user_service::UserService;

/// GET /api/analytics/users
pub async fn user_stats_endpoint(user_service: web::Data<UserService>) -> HttpResponse {
    match user_service.user_stats().await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => HttpResponse::InternalServerError().json(json!({
            "success": false,
            "message": "Failed to fetch user stats",
            "error": e.to_string()
        })),
    }
}

/// GET /api/admin/sync-users
pub async fn sync_users_endpoint(
    req: HttpRequest,
    user_service: web::Data<UserService>,
) -> HttpResponse {
    if let Some(denied) = require_admin(&req) {
        return denied;
    }

    match user_service.sync_users().await {
        Ok(report) => HttpResponse::Ok().json(json!({
            "success": true,
            "synced": report.synced,
            "message": report.message
        })),
        Err(e) => {
            log::error!("Sync error: {:?}", e);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": e.to_string()
            }))
        }
    }
}
