//! Mock Telegram API Server for testing
//!
//! This module provides a mock HTTP server that simulates the Telegram Bot API
//! for testing purposes. It uses wiremock to create configurable mock responses.

use serde_json::{json, Value};
use teloxide::Bot;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_BOT_TOKEN: &str = "12345:test_token";

/// Mock Telegram API server for testing
pub struct TelegramMockServer {
    pub server: MockServer,
}

impl TelegramMockServer {
    /// Create a new mock Telegram API server that already answers GetMe
    pub async fn new() -> Self {
        let mock = Self {
            server: MockServer::start().await,
        };
        mock.mock_get_me().await;
        mock
    }

    /// A bot whose API calls go to this server
    pub fn bot(&self) -> Bot {
        let api_url = url::Url::parse(&self.server.uri()).unwrap();
        Bot::new(TEST_BOT_TOKEN).set_api_url(api_url)
    }

    /// Request path of an API method; teloxide names methods in PascalCase
    pub fn method_path(method_name: &str) -> String {
        format!("/bot{}/{}", TEST_BOT_TOKEN, method_name)
    }

    /// Setup mock for GetMe, which command filtering needs for the bot username
    pub async fn mock_get_me(&self) {
        Mock::given(method("POST"))
            .and(path(Self::method_path("GetMe")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {
                    "id": 12345,
                    "is_bot": true,
                    "first_name": "TestBot",
                    "username": "my_bot",
                    "can_join_groups": true,
                    "can_read_all_group_messages": false,
                    "supports_inline_queries": false,
                    "can_connect_to_business": false,
                    "has_main_web_app": false
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Setup mock for SendMessage endpoint
    pub async fn mock_send_message(&self) {
        Mock::given(method("POST"))
            .and(path(Self::method_path("SendMessage")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {
                    "message_id": 123,
                    "from": {
                        "id": 12345,
                        "is_bot": true,
                        "first_name": "TestBot",
                        "username": "test_bot"
                    },
                    "chat": {
                        "id": 42,
                        "first_name": "Ada",
                        "type": "private"
                    },
                    "date": 1640995200,
                    "text": "Test message"
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// SendMessage that fails the way Telegram rejects a bad chat
    pub async fn mock_send_message_failure(&self) {
        Mock::given(method("POST"))
            .and(path(Self::method_path("SendMessage")))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            })))
            .mount(&self.server)
            .await;
    }

    /// GetWebhookInfo reporting `url`; limited to `times` answers when given
    pub async fn mock_webhook_info(&self, url: &str, times: Option<u64>) {
        let mut mock = Mock::given(method("POST"))
            .and(path(Self::method_path("GetWebhookInfo")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {
                    "url": url,
                    "has_custom_certificate": false,
                    "pending_update_count": 0
                }
            })));
        if let Some(times) = times {
            mock = mock.up_to_n_times(times);
        }
        mock.mount(&self.server).await;
    }

    /// Mock for a method answering `true`, expected exactly `calls` times
    pub async fn mock_true_method(&self, method_name: &str, calls: u64) {
        Mock::given(method("POST"))
            .and(path(Self::method_path(method_name)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": true
            })))
            .expect(calls)
            .mount(&self.server)
            .await;
    }

    /// Raw bodies of the requests made to one API method
    pub async fn request_bodies(&self, method_name: &str) -> Vec<Vec<u8>> {
        let expected = Self::method_path(method_name);
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == expected)
            .map(|request| request.body)
            .collect()
    }

    /// JSON payloads sent to SendMessage
    pub async fn sent_messages(&self) -> Vec<Value> {
        self.request_bodies("SendMessage")
            .await
            .iter()
            .map(|body| serde_json::from_slice(body).unwrap())
            .collect()
    }
}
