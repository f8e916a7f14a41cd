//! handlers/auth_handler.rs
//! Login del admin y guard de cookie para las rutas mutantes.

use actix_web::cookie::{time, Cookie};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::config::dashboard_config::DashboardConfig;

pub const ADMIN_COOKIE: &str = "admin_session";
const ADMIN_COOKIE_VALUE: &str = "authenticated";

#[derive(Deserialize)]
pub struct LoginRequest {
    password: String,
}

/// POST /api/auth
pub async fn login_endpoint(
    config: web::Data<DashboardConfig>,
    body: web::Json<LoginRequest>,
) -> HttpResponse {
    if body.password != config.admin_password {
        return HttpResponse::Unauthorized().json(json!({
            "success": false,
            "message": "Invalid password"
        }));
    }

    let cookie = Cookie::build(ADMIN_COOKIE, ADMIN_COOKIE_VALUE)
        .path("/")
        .http_only(true)
        .max_age(time::Duration::days(1))
        .finish();

    HttpResponse::Ok().cookie(cookie).json(json!({ "success": true }))
}

/// `Some(respuesta 401)` si el request no trae la cookie de sesión.
/// Los handlers admin lo llaman antes de tocar nada.
pub fn require_admin(req: &HttpRequest) -> Option<HttpResponse> {
    match req.cookie(ADMIN_COOKIE) {
        Some(cookie) if cookie.value() == ADMIN_COOKIE_VALUE => None,
        _ => Some(HttpResponse::Unauthorized().json(json!({
            "success": false,
            "message": "Authentication required"
        }))),
    }
}
