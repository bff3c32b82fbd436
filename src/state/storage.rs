//! State storage implementation
//!
//! Per-chat conversation state persisted in Redis as JSON under the
//! prefixed key `state:<chat_id>`.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use teloxide::types::ChatId;
use tracing::{debug, error};

use crate::services::redis::RedisStorage;
use crate::utils::errors::{MyBotError, Result};

/// Redis-based state storage manager
#[derive(Debug, Clone)]
pub struct StateStorage {
    redis: Arc<RedisStorage>,
}

impl StateStorage {
    pub fn new(redis: Arc<RedisStorage>) -> Self {
        Self { redis }
    }

    /// Underlying key-value handle
    pub fn redis(&self) -> &Arc<RedisStorage> {
        &self.redis
    }

    /// Storage key for a chat, before prefixing
    pub fn state_key(chat_id: ChatId) -> String {
        format!("state:{}", chat_id.0)
    }

    /// Save the state value for a chat
    pub async fn set_state<T: Serialize>(&self, chat_id: ChatId, state: &T) -> Result<()> {
        let serialized = match serde_json::to_string(state) {
            Ok(data) => data,
            Err(e) => {
                error!(chat_id = chat_id.0, error = %e, "Failed to serialize state");
                return Err(e.into());
            }
        };

        self.redis.set(&Self::state_key(chat_id), serialized, None).await?;
        debug!(chat_id = chat_id.0, "State saved");
        Ok(())
    }

    /// Load the state value for a chat
    pub async fn get_state<T: DeserializeOwned>(&self, chat_id: ChatId) -> Result<Option<T>> {
        let Some(value) = self.redis.get(&Self::state_key(chat_id)).await? else {
            debug!(chat_id = chat_id.0, "No state stored");
            return Ok(None);
        };

        let text = value.as_text().ok_or_else(|| {
            MyBotError::InvalidInput(format!("state for chat {} is not valid UTF-8", chat_id.0))
        })?;
        Ok(Some(serde_json::from_str(text)?))
    }

    /// Remove the state for a chat; returns whether anything was stored
    pub async fn reset_state(&self, chat_id: ChatId) -> Result<bool> {
        let deleted = self.redis.delete(&Self::state_key(chat_id)).await?;
        debug!(chat_id = chat_id.0, deleted = deleted, "State reset");
        Ok(deleted)
    }
}
