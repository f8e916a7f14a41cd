//! handlers/mod.rs
//! Módulo que agrupa los distintos handlers (status, broadcast, etc.).

pub mod analytics_handler;
pub mod auth_handler;
pub mod broadcast_handler;
pub mod status_handler;
pub mod user_handler;
