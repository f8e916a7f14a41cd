//! tests/analytics_tests.rs
//! Pruebas de las lecturas del store (tasks, users, métricas, errores)
//! sobre un SQLite en memoria con las migraciones aplicadas.

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::{Pool, Sqlite};

    use crate::services::analytics_service::AnalyticsService;
    use crate::services::user_service::UserService;

    // Pool de UNA conexión: con :memory: cada conexión nueva sería una
    // base vacía distinta.
    async fn test_pool() -> Pool<Sqlite> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("No se pudo abrir SQLite en memoria");

        AnalyticsService::new(pool.clone())
            .run_migrations()
            .await
            .expect("Fallo en migraciones");

        pool
    }

    fn days_ago(days: i64) -> String {
        (Utc::now() - Duration::days(days)).to_rfc3339()
    }

    fn days_ahead(days: i64) -> String {
        (Utc::now() + Duration::days(days)).to_rfc3339()
    }

    async fn insert_task(
        pool: &Pool<Sqlite>,
        user_id: i64,
        created_at: &str,
        completed: bool,
        deadline: Option<&str>,
    ) {
        sqlx::query(
            "INSERT INTO tasks (user_id, title, completed, deadline, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(user_id)
        .bind("tarea")
        .bind(completed as i64)
        .bind(deadline)
        .bind(created_at)
        .execute(pool)
        .await
        .expect("Failed to insert task");
    }

    async fn insert_error(pool: &Pool<Sqlite>, error_type: &str, timestamp: &str) {
        sqlx::query(
            "INSERT INTO bot_errors (error_type, error_message, user_id, timestamp) \
             VALUES (?1, ?2, NULL, ?3)",
        )
        .bind(error_type)
        .bind("algo explotó")
        .bind(timestamp)
        .execute(pool)
        .await
        .expect("Failed to insert error");
    }

    async fn insert_metric(pool: &Pool<Sqlite>, processing_time_ms: i64, timestamp: &str) {
        sqlx::query(
            "INSERT INTO bot_metrics (command, processing_time_ms, timestamp) \
             VALUES ('remind', ?1, ?2)",
        )
        .bind(processing_time_ms)
        .bind(timestamp)
        .execute(pool)
        .await
        .expect("Failed to insert metric");
    }

    #[actix_rt::test]
    async fn recipients_are_distinct_task_user_ids() {
        let pool = test_pool().await;
        insert_task(&pool, 100, &days_ago(1), false, None).await;
        insert_task(&pool, 100, &days_ago(2), true, None).await;
        insert_task(&pool, 200, &days_ago(30), true, None).await;

        let service = AnalyticsService::new(pool);
        let mut ids = service.broadcast_recipients().await.unwrap();
        ids.sort();

        // Sin filtro de recencia: el usuario de hace 30 días también entra
        assert_eq!(ids, vec![100, 200]);
    }

    #[actix_rt::test]
    async fn empty_store_resolves_zero_recipients() {
        let pool = test_pool().await;
        let service = AnalyticsService::new(pool);

        assert!(service.broadcast_recipients().await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn dashboard_stats_derive_users_from_task_history() {
        let pool = test_pool().await;
        // user 1: visto hace 30 días, activo ayer
        insert_task(&pool, 1, &days_ago(30), true, None).await;
        insert_task(&pool, 1, &days_ago(1), false, Some(&days_ahead(3))).await;
        // user 2: solo actividad vieja
        insert_task(&pool, 2, &days_ago(20), true, None).await;
        // user 3: nuevo esta semana, tarea vencida
        insert_task(&pool, 3, &days_ago(2), false, Some(&days_ago(1))).await;

        let service = AnalyticsService::new(pool);
        let stats = service.dashboard_stats().await.unwrap();

        assert_eq!(stats.total_users, 3);
        assert_eq!(stats.total_tasks, 4);
        // Activos en 7 días: 1 y 3
        assert_eq!(stats.active_users, 2);
        // Primera vez visto en 7 días: solo 3
        assert_eq!(stats.new_users_last7_days, 1);
        // No completada y con deadline a futuro: solo la segunda de user 1
        assert_eq!(stats.active_tasks, 1);
    }

    #[actix_rt::test]
    async fn history_groups_tasks_by_day_ascending() {
        let pool = test_pool().await;
        insert_task(&pool, 1, &days_ago(1), false, None).await;
        insert_task(&pool, 2, &days_ago(1), false, None).await;
        insert_task(&pool, 1, &days_ago(2), false, None).await;
        // Fuera de la ventana de 7 días
        insert_task(&pool, 1, &days_ago(10), false, None).await;

        let service = AnalyticsService::new(pool);
        let points = service.task_creation_history().await.unwrap();

        assert_eq!(points.len(), 2);
        assert!(points[0].date < points[1].date);
        assert_eq!(points[0].count, 1);
        assert_eq!(points[1].count, 2);
    }

    #[actix_rt::test]
    async fn avg_reply_time_is_the_rounded_mean() {
        let pool = test_pool().await;

        let service = AnalyticsService::new(pool.clone());
        assert_eq!(service.avg_reply_time_ms().await.unwrap(), 0);

        insert_metric(&pool, 100, &days_ago(1)).await;
        insert_metric(&pool, 251, &days_ago(0)).await;

        assert_eq!(service.avg_reply_time_ms().await.unwrap(), 176);
    }

    #[actix_rt::test]
    async fn errors_paginate_newest_first_with_total() {
        let pool = test_pool().await;
        insert_error(&pool, "timeout", &days_ago(3)).await;
        insert_error(&pool, "db_error", &days_ago(2)).await;
        insert_error(&pool, "api_error", &days_ago(1)).await;

        let service = AnalyticsService::new(pool);
        let (errors, count) = service.list_errors(2, 0).await.unwrap();

        assert_eq!(count, 3);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].error_type, "api_error");
        assert_eq!(errors[1].error_type, "db_error");

        let (rest, _) = service.list_errors(2, 2).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].error_type, "timeout");
    }

    #[actix_rt::test]
    async fn sync_users_backfills_only_missing_users() {
        let pool = test_pool().await;
        let first_seen = days_ago(5);
        let last_seen = days_ago(1);
        insert_task(&pool, 1, &first_seen, true, None).await;
        insert_task(&pool, 1, &days_ago(3), true, None).await;
        insert_task(&pool, 1, &last_seen, false, None).await;
        insert_task(&pool, 2, &days_ago(2), false, None).await;

        let service = UserService::new(pool.clone());
        let report = service.sync_users().await.unwrap();
        assert_eq!(report.synced, 2);

        let row: (String, String) =
            sqlx::query_as("SELECT created_at, last_active_at FROM users WHERE user_id = 1")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(row.0, first_seen);
        assert_eq!(row.1, last_seen);

        // Idempotente: la segunda corrida no inserta nada
        let report = service.sync_users().await.unwrap();
        assert_eq!(report.synced, 0);
        assert_eq!(report.message, "No missing users found");
    }

    #[actix_rt::test]
    async fn sync_users_with_empty_store_reports_zero() {
        let pool = test_pool().await;
        let service = UserService::new(pool);

        let report = service.sync_users().await.unwrap();
        assert_eq!(report.synced, 0);
        assert_eq!(report.message, "No tasks found");
    }

    #[actix_rt::test]
    async fn user_stats_count_recent_activity() {
        let pool = test_pool().await;
        insert_task(&pool, 1, &days_ago(30), true, None).await;
        insert_task(&pool, 1, &days_ago(1), false, None).await;
        insert_task(&pool, 2, &days_ago(20), true, None).await;
        insert_task(&pool, 3, &days_ago(2), false, None).await;

        let service = UserService::new(pool);
        service.sync_users().await.unwrap();
        let stats = service.user_stats().await.unwrap();

        assert_eq!(stats.total_registered, 3);
        // last_active_at dentro de 7 días: users 1 y 3
        assert_eq!(stats.active_users, 2);
        // created_at (primera actividad) dentro de 7 días: solo user 3
        assert_eq!(stats.new_users_last7_days, 1);
    }
}
