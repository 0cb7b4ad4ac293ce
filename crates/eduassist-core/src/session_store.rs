//! Client-side session store.
//!
//! The dashboard keeps a handful of JSON blobs on the device (auth tokens,
//! chat transcripts, a recipient hand-off between views). This module
//! defines the key set and the store interface so the persistence backend
//! can be swapped (in-memory for tests, a JSON file for the CLI).

use crate::error::{EduError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

/// Every key the client persists. Each value is a JSON blob whose schema
/// belongs to the component that owns the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKey {
    /// Teacher bearer token (JSON string)
    Token,
    /// Student bearer token (JSON string)
    StudentToken,
    /// Student profile returned by the student login
    StudentData,
    /// Section picked in the roster view
    SelectedSectionId,
    /// Recipients handed from the roster view to the communication composer
    PreselectedUsers,
    /// Enhanced assistant transcript (expires after one hour)
    EducatorAiChat,
    /// Dashboard transcript plus conversation context
    EduassistMessages,
    /// Simple chatbot history
    SimpleChatbotHistory,
}

impl StorageKey {
    pub const ALL: [StorageKey; 8] = [
        StorageKey::Token,
        StorageKey::StudentToken,
        StorageKey::StudentData,
        StorageKey::SelectedSectionId,
        StorageKey::PreselectedUsers,
        StorageKey::EducatorAiChat,
        StorageKey::EduassistMessages,
        StorageKey::SimpleChatbotHistory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Token => "token",
            StorageKey::StudentToken => "studentToken",
            StorageKey::StudentData => "studentData",
            StorageKey::SelectedSectionId => "selectedSectionId",
            StorageKey::PreselectedUsers => "preselectedUsers",
            StorageKey::EducatorAiChat => "educator_ai_chat",
            StorageKey::EduassistMessages => "eduassist_messages",
            StorageKey::SimpleChatbotHistory => "simple_chatbot_history_v1",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == raw)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Synchronous key/value store for client session state.
pub trait SessionStore: Send + Sync {
    /// Returns the stored value, or `None` if the key was never set or was cleared.
    fn get(&self, key: StorageKey) -> Result<Option<Value>>;

    /// Replaces the value under `key`.
    fn set(&self, key: StorageKey, value: Value) -> Result<()>;

    /// Removes the value under `key`. Clearing a missing key is not an error.
    fn clear(&self, key: StorageKey) -> Result<()>;
}

/// Typed helpers on top of [`SessionStore`].
pub trait SessionStoreExt: SessionStore {
    fn get_json<T: DeserializeOwned>(&self, key: StorageKey) -> Result<Option<T>> {
        match self.get(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize>(&self, key: StorageKey, value: &T) -> Result<()> {
        self.set(key, serde_json::to_value(value)?)
    }

    /// Reads a string value, ignoring blank strings.
    fn get_string(&self, key: StorageKey) -> Result<Option<String>> {
        Ok(self
            .get(key)?
            .and_then(|value| value.as_str().map(str::to_string))
            .filter(|value| !value.is_empty()))
    }
}

impl<S: SessionStore + ?Sized> SessionStoreExt for S {}

/// In-memory store used by tests and as a fallback when no data directory
/// is available.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<StorageKey, Value>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<StorageKey, Value>>> {
        self.entries
            .lock()
            .map_err(|_| EduError::storage("session store lock poisoned"))
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: StorageKey) -> Result<Option<Value>> {
        Ok(self.lock()?.get(&key).cloned())
    }

    fn set(&self, key: StorageKey, value: Value) -> Result<()> {
        self.lock()?.insert(key, value);
        Ok(())
    }

    fn clear(&self, key: StorageKey) -> Result<()> {
        self.lock()?.remove(&key);
        Ok(())
    }
}
