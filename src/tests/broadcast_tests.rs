//! tests/broadcast_tests.rs
//! Pruebas del fan-out contra un doble local del Bot API.

#[cfg(test)]
mod tests {
    use actix_web::{web, App, HttpResponse, HttpServer};
    use serde_json::{json, Value};
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    use crate::services::telegram_service::TelegramService;

    #[derive(Clone)]
    struct MockTelegram {
        fail_ids: Arc<HashSet<i64>>,
        received: Arc<Mutex<Vec<Value>>>,
    }

    async fn mock_send(state: web::Data<MockTelegram>, body: web::Json<Value>) -> HttpResponse {
        let payload = body.into_inner();
        let chat_id = payload["chat_id"].as_i64().unwrap_or_default();
        state.received.lock().unwrap().push(payload);

        if state.fail_ids.contains(&chat_id) {
            // 200 con ok=false: así reporta Telegram un chat bloqueado
            HttpResponse::Ok().json(json!({
                "ok": false,
                "description": "Forbidden: bot was blocked by the user"
            }))
        } else {
            HttpResponse::Ok().json(json!({ "ok": true, "result": { "message_id": 1 } }))
        }
    }

    // Levanta el doble en un puerto libre y devuelve la base del API más
    // el log de payloads recibidos.
    fn spawn_mock_telegram(fail_ids: HashSet<i64>) -> (String, Arc<Mutex<Vec<Value>>>) {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = MockTelegram {
            fail_ids: Arc::new(fail_ids),
            received: received.clone(),
        };

        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
        let port = listener.local_addr().unwrap().port();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(state.clone()))
                .route("/bot{token}/sendMessage", web::post().to(mock_send))
        })
        .listen(listener)
        .expect("Failed to listen")
        .workers(1)
        .run();
        actix_rt::spawn(server);

        (format!("http://127.0.0.1:{}", port), received)
    }

    fn service_for(base: &str) -> TelegramService {
        TelegramService::with_api_base("TEST_TOKEN".to_string(), base.to_string())
    }

    #[actix_rt::test]
    async fn empty_recipient_set_sends_nothing() {
        let (base, received) = spawn_mock_telegram(HashSet::new());
        let service = service_for(&base);

        let result = service.broadcast(&[], "hola").await;

        assert_eq!(result.success_count, 0);
        assert_eq!(result.failure_count, 0);
        assert!(received.lock().unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn counts_failures_without_aborting_peers() {
        let fail_ids: HashSet<i64> = [2, 4].into_iter().collect();
        let (base, received) = spawn_mock_telegram(fail_ids);
        let service = service_for(&base);

        let result = service.broadcast(&[1, 2, 3, 4, 5], "*aviso* general").await;

        assert_eq!(result.success_count, 3);
        assert_eq!(result.failure_count, 2);
        // Los 5 envíos se intentaron aunque hubo fallos en medio
        assert_eq!(received.lock().unwrap().len(), 5);
    }

    #[actix_rt::test]
    async fn bounded_concurrency_still_reaches_everyone() {
        let (base, received) = spawn_mock_telegram(HashSet::new());
        let service = service_for(&base).max_in_flight(2);

        let result = service.broadcast(&[10, 20, 30, 40, 50], "hola").await;

        assert_eq!(result.success_count, 5);
        assert_eq!(result.failure_count, 0);
        assert_eq!(received.lock().unwrap().len(), 5);
    }

    #[actix_rt::test]
    async fn markdown_is_converted_once_for_all_recipients() {
        let (base, received) = spawn_mock_telegram(HashSet::new());
        let service = service_for(&base);

        service.broadcast(&[1, 2], "# Aviso\n\nHola a todos").await;

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 2);
        for payload in received.iter() {
            assert_eq!(payload["parse_mode"].as_str().unwrap(), "HTML");
            assert!(payload["text"].as_str().unwrap().contains("<b>Aviso</b>"));
        }
    }

    #[actix_rt::test]
    async fn unconvertible_markdown_falls_back_to_raw_text() {
        let (base, received) = spawn_mock_telegram(HashSet::new());
        let service = service_for(&base);

        // Solo una imagen sin alt: la conversión queda vacía, así que se
        // manda el texto original sin parse_mode
        let source = "![](https://example.com/x.png)";
        let result = service.broadcast(&[7], source).await;

        assert_eq!(result.success_count, 1);
        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0]["text"].as_str().unwrap(), source);
        assert!(received[0].get("parse_mode").is_none());
    }

    #[actix_rt::test]
    async fn transport_errors_count_as_failures_not_panics() {
        // Nadie escucha en este puerto: los 3 envíos fallan pero el
        // broadcast devuelve conteos, nunca error
        let service = service_for("http://127.0.0.1:9");

        let result = service.broadcast(&[1, 2, 3], "hola").await;

        assert_eq!(result.success_count, 0);
        assert_eq!(result.failure_count, 3);
    }
}
