//! services/telegram_service.rs
//! Cliente del Bot API de Telegram: envío individual y fan-out masivo.

use anyhow::{anyhow, Context, Result};
use futures::future;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde_json::{json, Value};

use crate::models::broadcast_model::BroadcastResult;
use crate::services::markdown;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

#[derive(Clone)]
pub struct TelegramService {
    http_client: Client,
    bot_token: String,
    api_base: String,
    /// Tope opcional de envíos en vuelo. `None` = sin límite (contrato
    /// original). Telegram ronda los 30 msg/s; ver DESIGN.md.
    max_in_flight: Option<usize>,
}

impl TelegramService {
    pub fn new(bot_token: String) -> Self {
        Self::with_api_base(bot_token, TELEGRAM_API_BASE.to_string())
    }

    /// Base alternativa del API (tests apuntan a un server local).
    pub fn with_api_base(bot_token: String, api_base: String) -> Self {
        Self {
            http_client: Client::new(),
            bot_token,
            api_base,
            max_in_flight: None,
        }
    }

    pub fn max_in_flight(mut self, limit: usize) -> Self {
        self.max_in_flight = Some(limit);
        self
    }

    /// Manda `message` (Markdown) a todos los destinatarios.
    ///
    /// La conversión a HTML se hace una sola vez; si falla, se manda el
    /// texto original sin parse_mode en vez de abortar el broadcast. Cada
    /// envío es independiente: un fallo no frena ni revierte a los demás,
    /// y no hay reintentos. Devuelve el conteo agregado cuando todos los
    /// envíos terminaron.
    pub async fn broadcast(&self, recipients: &[i64], message: &str) -> BroadcastResult {
        if recipients.is_empty() {
            return BroadcastResult {
                success_count: 0,
                failure_count: 0,
            };
        }

        let (text, parse_mode) = match markdown::to_telegram_html(message) {
            Ok(html) => (html, Some("HTML")),
            Err(e) => {
                log::warn!("Markdown conversion failed, sending raw text: {:?}", e);
                (message.to_string(), None)
            }
        };

        let sends = recipients.iter().map(|&chat_id| {
            let text = text.as_str();
            async move {
                match self.send_message(chat_id, text, parse_mode).await {
                    Ok(_) => true,
                    Err(e) => {
                        log::warn!("Failed to send to {}: {:?}", chat_id, e);
                        false
                    }
                }
            }
        });

        let outcomes: Vec<bool> = match self.max_in_flight {
            Some(limit) => stream::iter(sends).buffer_unordered(limit).collect().await,
            None => future::join_all(sends).await,
        };

        let success_count = outcomes.iter().filter(|ok| **ok).count() as u64;
        BroadcastResult {
            success_count,
            failure_count: outcomes.len() as u64 - success_count,
        }
    }

    /// Un sendMessage. Respuesta con `"ok": false` cuenta como fallo
    /// aunque el transporte haya devuelto 2xx.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        parse_mode: Option<&str>,
    ) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);

        let mut payload = json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(mode) = parse_mode {
            payload["parse_mode"] = json!(mode);
        }

        let response = self
            .http_client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .context("Failed to reach Telegram API")?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .context("Failed to parse Telegram response")?;

        if !body["ok"].as_bool().unwrap_or(false) {
            let description = body["description"].as_str().unwrap_or("unknown error");
            return Err(anyhow!("Telegram API error ({}): {}", status, description));
        }

        Ok(())
    }
}
