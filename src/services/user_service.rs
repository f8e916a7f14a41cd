//! services/user_service.rs
//! Conteos sobre la tabla `users` y el backfill desde la actividad de
//! `tasks` (la tabla `users` se desincroniza; tasks es la fuente de
//! verdad).

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use sqlx::{Pool, Sqlite};
use std::collections::{HashMap, HashSet};

use crate::models::user_model::{SyncReport, UserStats};

#[derive(Clone, Debug)]
pub struct UserService {
    db_pool: Pool<Sqlite>,
}

impl UserService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        UserService { db_pool }
    }

    pub async fn user_stats(&self) -> Result<UserStats> {
        let cutoff = (Utc::now() - Duration::days(7)).to_rfc3339();

        let total_registered: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db_pool)
            .await
            .context("Failed to count users")?;

        let active_users: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE last_active_at >= ?1")
                .bind(&cutoff)
                .fetch_one(&self.db_pool)
                .await
                .context("Failed to count active users")?;

        let new_users: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE created_at >= ?1")
                .bind(&cutoff)
                .fetch_one(&self.db_pool)
                .await
                .context("Failed to count new users")?;

        Ok(UserStats {
            total_registered: total_registered as u64,
            active_users: active_users as u64,
            new_users_last7_days: new_users as u64,
        })
    }

    /// Inserta en `users` los chats que aparecen en `tasks` pero no están
    /// registrados, con primera y última actividad derivadas del
    /// historial. Idempotente: una segunda corrida no inserta nada.
    pub async fn sync_users(&self) -> Result<SyncReport> {
        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT user_id, created_at FROM tasks ORDER BY created_at ASC")
                .fetch_all(&self.db_pool)
                .await
                .context("Failed to load task activity")?;

        if rows.is_empty() {
            return Ok(SyncReport {
                synced: 0,
                message: "No tasks found".to_string(),
            });
        }

        // (primera, última) actividad por usuario; las filas vienen
        // ordenadas, así que la última vista gana.
        let mut activity: HashMap<i64, (String, String)> = HashMap::new();
        for (user_id, created_at) in rows {
            activity
                .entry(user_id)
                .and_modify(|(_, last)| *last = created_at.clone())
                .or_insert_with(|| (created_at.clone(), created_at.clone()));
        }

        let existing: Vec<(i64,)> = sqlx::query_as("SELECT user_id FROM users")
            .fetch_all(&self.db_pool)
            .await
            .context("Failed to load existing users")?;
        let existing: HashSet<i64> = existing.into_iter().map(|(id,)| id).collect();

        let mut synced = 0u64;
        for (user_id, (first, last)) in &activity {
            if existing.contains(user_id) {
                continue;
            }
            sqlx::query(
                "INSERT INTO users (user_id, created_at, last_active_at) VALUES (?1, ?2, ?3)",
            )
            .bind(*user_id)
            .bind(first)
            .bind(last)
            .execute(&self.db_pool)
            .await
            .context("Failed to insert synced user")?;
            synced += 1;
        }

        let message = if synced == 0 {
            "No missing users found".to_string()
        } else {
            format!("Synced {} users", synced)
        };

        log::info!("(sync_users) {}", message);
        Ok(SyncReport { synced, message })
    }
}
