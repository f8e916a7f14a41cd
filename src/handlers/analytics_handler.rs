//! handlers/analytics_handler.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::services::analytics_service::AnalyticsService;

#[derive(Deserialize)]
pub struct ErrorsQuery {
    limit: Option<i64>,
    offset: Option<i64>,
}

/// GET /api/analytics/stats
pub async fn dashboard_stats_endpoint(
    analytics_service: web::Data<AnalyticsService>,
) -> HttpResponse {
    match analytics_service.dashboard_stats().await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => HttpResponse::InternalServerError().json(json!({
            "success": false,
            "message": "Failed to fetch stats",
            "error": e.to_string()
        })),
    }
}

/// GET /api/analytics/history
pub async fn task_history_endpoint(
    analytics_service: web::Data<AnalyticsService>,
) -> HttpResponse {
    match analytics_service.task_creation_history().await {
        Ok(points) => HttpResponse::Ok().json(points),
        Err(e) => HttpResponse::InternalServerError().json(json!({
            "success": false,
            "message": "Failed to fetch history",
            "error": e.to_string()
        })),
    }
}

/// GET /api/analytics/metrics
pub async fn avg_reply_time_endpoint(
    analytics_service: web::Data<AnalyticsService>,
) -> HttpResponse {
    match analytics_service.avg_reply_time_ms().await {
        Ok(avg) => HttpResponse::Ok().json(json!({
            "success": true,
            "avgReplyTimeMs": avg
        })),
        Err(e) => HttpResponse::InternalServerError().json(json!({
            "success": false,
            "message": "Failed to fetch metrics",
            "error": e.to_string()
        })),
    }
}

/// GET /api/analytics/errors
pub async fn list_errors_endpoint(
    analytics_service: web::Data<AnalyticsService>,
    query: web::Query<ErrorsQuery>,
) -> HttpResponse {
    let limit = query.limit.unwrap_or(50);
    let offset = query.offset.unwrap_or(0);

    match analytics_service.list_errors(limit, offset).await {
        Ok((errors, count)) => HttpResponse::Ok().json(json!({
            "success": true,
            "errors": errors,
            "count": count
        })),
        Err(e) => HttpResponse::InternalServerError().json(json!({
            "success": false,
            "message": "Failed to fetch errors",
            "error": e.to_string()
        })),
    }
}
