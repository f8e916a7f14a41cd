//! app.rs
use crate::handlers::{
    analytics_handler, auth_handler, broadcast_handler, status_handler, user_handler,
};
use actix_web::web;

pub fn init_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/auth").route("", web::post().to(auth_handler::login_endpoint)),
            )
            .service(
                web::scope("/status")
                    .route("", web::get().to(status_handler::get_status_endpoint)),
            )
            .service(
                web::scope("/broadcast")
                    .route("", web::post().to(broadcast_handler::send_broadcast_endpoint)),
            )
            .service(
                web::scope("/admin")
                    .route(
                        "/status",
                        web::get().to(status_handler::get_override_endpoint),
                    )
                    .route(
                        "/status",
                        web::post().to(status_handler::set_override_endpoint),
                    )
                    .route(
                        "/sync-users",
                        web::get().to(user_handler::sync_users_endpoint),
                    ),
            )
            .service(
                web::scope("/analytics")
                    .route(
                        "/stats",
                        web::get().to(analytics_handler::dashboard_stats_endpoint),
                    )
                    .route(
                        "/history",
                        web::get().to(analytics_handler::task_history_endpoint),
                    )
                    .route(
                        "/metrics",
                        web::get().to(analytics_handler::avg_reply_time_endpoint),
                    )
                    .route(
                        "/errors",
                        web::get().to(analytics_handler::list_errors_endpoint),
                    )
                    .route("/users", web::get().to(user_handler::user_stats_endpoint)),
            ),
    );
}
