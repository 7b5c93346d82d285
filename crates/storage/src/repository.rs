use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// The four independent slots the application persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    QuestionBanks,
    MissedQuestions,
    Progress,
    SelectedBankId,
}

impl StateKey {
    pub const ALL: [StateKey; 4] = [
        StateKey::QuestionBanks,
        StateKey::MissedQuestions,
        StateKey::Progress,
        StateKey::SelectedBankId,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StateKey::QuestionBanks => "quiz_app_questionBanks",
            StateKey::MissedQuestions => "quiz_app_incorrectQuestions",
            StateKey::Progress => "quiz_app_userProgress",
            StateKey::SelectedBankId => "quiz_app_currentQuestionBankId",
        }
    }
}

/// String-valued key-value store backing the persistence gateway.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a slot. Missing keys yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a slot, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Simple in-memory store for tests and throwaway sessions.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Holds the state store behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub state: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let state: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        Self { state }
    }
}
