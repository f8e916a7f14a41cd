//! services/analytics_service.rs
//! Lecturas del store del bot: destinatarios del broadcast, métricas del
//! dashboard, historial de tareas y log de errores.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use sqlx::{Pool, Sqlite};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::analytics_model::{BotErrorRecord, ChartPoint, DashboardStats};

#[derive(Clone, Debug)]
pub struct AnalyticsService {
    db_pool: Pool<Sqlite>,
}

impl AnalyticsService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        AnalyticsService { db_pool }
    }

    /// Corre migraciones con sqlx
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.db_pool).await?;
        Ok(())
    }

    /// Destinatarios del broadcast: todo chat que alguna vez creó una
    /// tarea. La tabla `users` no se usa aquí porque no está garantizado
    /// que esté sincronizada; el historial de tasks sí.
    pub async fn broadcast_recipients(&self) -> Result<Vec<i64>> {
        let rows: Vec<(i64,)> = sqlx::query_as("SELECT DISTINCT user_id FROM tasks")
            .fetch_all(&self.db_pool)
            .await
            .context("Failed to resolve broadcast recipients")?;

        Ok(rows.into_iter().map(|(user_id,)| user_id).collect())
    }

    /// Tarjetas del dashboard. Los conteos de usuarios se derivan del
    /// historial completo de `tasks`.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        let total_tasks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
            .fetch_one(&self.db_pool)
            .await
            .context("Failed to count tasks")?;

        // Activa = no completada y con deadline a futuro
        let active_tasks: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks WHERE completed = 0 AND deadline > ?1",
        )
        .bind(&now_str)
        .fetch_one(&self.db_pool)
        .await
        .context("Failed to count active tasks")?;

        let rows: Vec<(i64, String)> = sqlx::query_as("SELECT user_id, created_at FROM tasks")
            .fetch_all(&self.db_pool)
            .await
            .context("Failed to load task history")?;

        let seven_days_ago = now - Duration::days(7);

        let mut all_users: HashSet<i64> = HashSet::new();
        let mut active_users: HashSet<i64> = HashSet::new();
        let mut first_seen: HashMap<i64, DateTime<Utc>> = HashMap::new();

        for (user_id, created_at) in &rows {
            all_users.insert(*user_id);
            let Some(created_at) = parse_timestamp(created_at) else {
                continue;
            };
            if created_at >= seven_days_ago {
                active_users.insert(*user_id);
            }
            first_seen
                .entry(*user_id)
                .and_modify(|seen| {
                    if created_at < *seen {
                        *seen = created_at;
                    }
                })
                .or_insert(created_at);
        }

        let new_users_last7_days = first_seen
            .values()
            .filter(|seen| **seen >= seven_days_ago)
            .count() as u64;

        Ok(DashboardStats {
            total_users: all_users.len() as u64,
            active_users: active_users.len() as u64,
            total_tasks: total_tasks as u64,
            active_tasks: active_tasks as u64,
            new_users_last7_days,
        })
    }

    /// Tareas creadas por día en los últimos 7 días, ascendente.
    pub async fn task_creation_history(&self) -> Result<Vec<ChartPoint>> {
        let cutoff = (Utc::now() - Duration::days(7)).to_rfc3339();

        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT created_at FROM tasks WHERE created_at >= ?1 ORDER BY created_at ASC",
        )
        .bind(&cutoff)
        .fetch_all(&self.db_pool)
        .await
        .context("Failed to load task creation history")?;

        let mut grouped: BTreeMap<String, u64> = BTreeMap::new();
        for (created_at,) in &rows {
            if let Some(created_at) = parse_timestamp(created_at) {
                *grouped
                    .entry(created_at.date_naive().to_string())
                    .or_insert(0) += 1;
            }
        }

        Ok(grouped
            .into_iter()
            .map(|(date, count)| ChartPoint { date, count })
            .collect())
    }

    /// Promedio de processing_time_ms sobre los últimos 1000 comandos.
    pub async fn avg_reply_time_ms(&self) -> Result<i64> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "SELECT processing_time_ms FROM bot_metrics ORDER BY timestamp DESC LIMIT 1000",
        )
        .fetch_all(&self.db_pool)
        .await
        .context("Failed to load bot metrics")?;

        if rows.is_empty() {
            return Ok(0);
        }

        let total: i64 = rows.iter().map(|(ms,)| ms).sum();
        Ok((total as f64 / rows.len() as f64).round() as i64)
    }

    /// Página de `bot_errors`, más recientes primero. Devuelve también el
    /// total para la paginación del panel.
    pub async fn list_errors(&self, limit: i64, offset: i64) -> Result<(Vec<BotErrorRecord>, u64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bot_errors")
            .fetch_one(&self.db_pool)
            .await
            .context("Failed to count bot errors")?;

        let errors: Vec<BotErrorRecord> = sqlx::query_as(
            r#"
            SELECT id, error_type, error_message, user_id, timestamp
            FROM bot_errors
            ORDER BY timestamp DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db_pool)
        .await
        .context("Failed to load bot errors")?;

        Ok((errors, total as u64))
    }
}

/// Fechas RFC 3339 guardadas como texto; una fila con fecha rota no debe
/// tirar la consulta completa.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
