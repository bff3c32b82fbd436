//! Test data helpers for creating Telegram updates
//!
//! Updates are built as the JSON Telegram posts to the webhook.

use serde_json::{json, Value};
use teloxide::types::Update;

pub const TEST_CHAT_ID: i64 = 42;

/// A Telegram user as it appears in updates
pub fn test_user(first_name: &str, last_name: Option<&str>) -> Value {
    let mut user = json!({
        "id": TEST_CHAT_ID,
        "is_bot": false,
        "first_name": first_name,
        "username": "ada",
        "language_code": "en"
    });
    if let Some(last_name) = last_name {
        user["last_name"] = json!(last_name);
    }
    user
}

/// Message update with text, sent from `user` in a private chat
pub fn message_update_from(update_id: u32, text: &str, user: Value) -> Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id * 10,
            "date": 1640995200,
            "chat": {
                "id": TEST_CHAT_ID,
                "type": "private",
                "first_name": user["first_name"].clone()
            },
            "from": user,
            "text": text
        }
    })
}

/// Text message update from Ada Lovelace
pub fn text_update(update_id: u32, text: &str) -> Value {
    message_update_from(update_id, text, test_user("Ada", Some("Lovelace")))
}

/// Message update sharing a location and carrying no text
pub fn location_update(update_id: u32) -> Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id * 10,
            "date": 1640995200,
            "chat": {"id": TEST_CHAT_ID, "type": "private", "first_name": "Ada"},
            "from": test_user("Ada", Some("Lovelace")),
            "location": {"latitude": 51.5072, "longitude": -0.1276}
        }
    })
}

/// Edited-message update, which message handlers never see
pub fn edited_message_update(update_id: u32, text: &str) -> Value {
    json!({
        "update_id": update_id,
        "edited_message": {
            "message_id": update_id * 10,
            "date": 1640995200,
            "edit_date": 1640995260,
            "chat": {"id": TEST_CHAT_ID, "type": "private", "first_name": "Ada"},
            "from": test_user("Ada", Some("Lovelace")),
            "text": text
        }
    })
}

/// Parse the way the webhook endpoint does; `from_value` loses the update kind
pub fn to_update(value: Value) -> Update {
    serde_json::from_str(&value.to_string()).unwrap()
}
