//! Best-effort persistence of the application state.
//!
//! Each slot is written and read on its own. Failures are logged and swallowed
//! so the application keeps working from memory.

use std::sync::Arc;

use quiz_core::model::{AppState, BankId, IncorrectQuestionSet, ProgressState, QuestionBank};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::records::{BankRecord, ProgressRecord, QuestionRecord};
use crate::repository::{KeyValueStore, StateKey, Storage, StorageError};

/// Whatever could be recovered from storage. Missing or corrupt slots are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialState {
    pub banks: Option<Vec<QuestionBank>>,
    pub missed: Option<IncorrectQuestionSet>,
    pub progress: Option<ProgressState>,
    pub selected_bank_id: Option<BankId>,
}

impl PartialState {
    /// Overwrites the fields that were loaded. A selected id that does not
    /// resolve against the resulting banks leaves no bank selected.
    pub fn apply(self, state: &mut AppState) {
        if let Some(banks) = self.banks {
            state.replace_banks(banks);
        }
        if let Some(missed) = self.missed {
            state.replace_missed(missed);
        }
        if let Some(progress) = self.progress {
            state.replace_progress(progress);
        }
        state.set_selected(self.selected_bank_id);
    }

    #[must_use]
    pub fn into_state(self) -> AppState {
        let mut state = AppState::new();
        self.apply(&mut state);
        state
    }
}

#[derive(Clone)]
pub struct PersistenceGateway {
    store: Arc<dyn KeyValueStore>,
}

impl PersistenceGateway {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn from_storage(storage: &Storage) -> Self {
        Self::new(Arc::clone(&storage.state))
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_storage(&Storage::in_memory())
    }

    /// Persist every slot, logging instead of failing.
    pub async fn save(&self, state: &AppState) {
        if let Err(err) = self.try_save(state).await {
            warn!(error = %err, "failed to persist quiz state; continuing in memory");
        }
    }

    /// Persist every slot.
    ///
    /// # Errors
    ///
    /// Returns the first `StorageError` hit; later slots are not written.
    pub async fn try_save(&self, state: &AppState) -> Result<(), StorageError> {
        let banks: Vec<BankRecord> = state.banks().iter().map(BankRecord::from_bank).collect();
        let missed: Vec<QuestionRecord> = state
            .missed()
            .as_slice()
            .iter()
            .map(QuestionRecord::from_question)
            .collect();
        let progress = ProgressRecord::from_progress(state.progress());
        let selected = state
            .selected_id()
            .map(|id| id.to_string())
            .unwrap_or_default();

        self.put_json(StateKey::QuestionBanks, &banks).await?;
        self.put_json(StateKey::MissedQuestions, &missed).await?;
        self.put_json(StateKey::Progress, &progress).await?;
        self.store
            .set(StateKey::SelectedBankId.as_str(), &selected)
            .await?;

        debug!(
            banks = banks.len(),
            missed = missed.len(),
            selected = %selected,
            "persisted quiz state"
        );
        Ok(())
    }

    /// Read every slot independently. Never fails.
    pub async fn load(&self) -> PartialState {
        let banks = self
            .get_json::<Vec<BankRecord>>(StateKey::QuestionBanks)
            .await
            .map(decode_banks);
        let missed = self
            .get_json::<Vec<QuestionRecord>>(StateKey::MissedQuestions)
            .await
            .map(decode_missed);
        let progress = self
            .get_json::<ProgressRecord>(StateKey::Progress)
            .await
            .and_then(|record| match record.into_progress() {
                Ok(progress) => Some(progress),
                Err(err) => {
                    warn!(error = %err, "ignoring stored progress");
                    None
                }
            });
        let selected_bank_id = self.get_raw(StateKey::SelectedBankId).await.and_then(|raw| {
            if raw.trim().is_empty() {
                return None;
            }
            match raw.parse::<BankId>() {
                Ok(id) => Some(id),
                Err(err) => {
                    warn!(error = %err, raw = %raw, "ignoring stored bank selection");
                    None
                }
            }
        });

        PartialState {
            banks,
            missed,
            progress,
            selected_bank_id,
        }
    }

    async fn put_json<T: Serialize + ?Sized>(
        &self,
        key: StateKey,
        value: &T,
    ) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.store.set(key.as_str(), &json).await
    }

    async fn get_raw(&self, key: StateKey) -> Option<String> {
        match self.store.get(key.as_str()).await {
            Ok(value) => value,
            Err(err) => {
                warn!(key = key.as_str(), error = %err, "failed to read stored slot");
                None
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, key: StateKey) -> Option<T> {
        let raw = self.get_raw(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key = key.as_str(), error = %err, "ignoring corrupt stored slot");
                None
            }
        }
    }
}

fn decode_banks(records: Vec<BankRecord>) -> Vec<QuestionBank> {
    let mut banks = Vec::with_capacity(records.len());
    for record in records {
        let id = record.id;
        match record.into_bank() {
            Ok((bank, skipped)) => {
                if skipped > 0 {
                    warn!(bank_id = id, skipped, "skipped invalid stored questions");
                }
                if banks.iter().any(|b: &QuestionBank| b.id() == bank.id()) {
                    warn!(bank_id = id, "skipping duplicate stored bank");
                    continue;
                }
                banks.push(bank);
            }
            Err(err) => warn!(bank_id = id, error = %err, "skipping invalid stored bank"),
        }
    }
    banks
}

fn decode_missed(records: Vec<QuestionRecord>) -> IncorrectQuestionSet {
    let questions = records
        .into_iter()
        .filter_map(|record| match record.into_question() {
            Ok(question) => Some(question),
            Err(err) => {
                warn!(error = %err, "skipping invalid stored missed question");
                None
            }
        });
    IncorrectQuestionSet::from_questions(questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quiz_core::model::{Answer, OptionId, Question, QuestionId, QuestionOption};
    use quiz_core::time::fixed_now;

    use crate::repository::InMemoryStore;

    fn question(id: u64, text: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            text,
            vec![
                QuestionOption::new(OptionId::A, "x"),
                QuestionOption::new(OptionId::B, "y"),
            ],
            Answer::parse("A").unwrap(),
        )
        .unwrap()
    }

    fn bank(id: u64) -> QuestionBank {
        QuestionBank::new(
            BankId::new(id),
            format!("{id}.txt"),
            vec![question(1, "Q1"), question(2, "Q2")],
            fixed_now(),
        )
        .unwrap()
    }

    fn populated_state() -> AppState {
        let mut state = AppState::new();
        state.add_bank(bank(10)).unwrap();
        state.add_bank(bank(20)).unwrap();
        state.select_bank(BankId::new(10)).unwrap();
        state.missed_mut().insert(question(2, "Q2"));
        state.progress_mut().add(3, 4).unwrap();
        state
    }

    struct FailingStore;

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("offline".into()))
        }
    }

    #[tokio::test]
    async fn save_then_load_restores_state() {
        let gateway = PersistenceGateway::in_memory();
        let state = populated_state();
        gateway.try_save(&state).await.unwrap();

        let restored = gateway.load().await.into_state();
        assert_eq!(restored, state);
    }

    #[tokio::test]
    async fn empty_store_loads_nothing() {
        let partial = PersistenceGateway::in_memory().load().await;
        assert_eq!(partial, PartialState::default());
        assert_eq!(partial.into_state(), AppState::new());
    }

    #[tokio::test]
    async fn no_selection_is_stored_as_empty_string() {
        let store = InMemoryStore::new();
        let gateway = PersistenceGateway::new(Arc::new(store.clone()));
        gateway.try_save(&AppState::new()).await.unwrap();

        let raw = store.get(StateKey::SelectedBankId.as_str()).await.unwrap();
        assert_eq!(raw.as_deref(), Some(""));
        assert_eq!(gateway.load().await.selected_bank_id, None);
    }

    #[tokio::test]
    async fn dangling_selection_resolves_to_none() {
        let store = InMemoryStore::new();
        let gateway = PersistenceGateway::new(Arc::new(store.clone()));
        gateway.try_save(&populated_state()).await.unwrap();
        store
            .set(StateKey::SelectedBankId.as_str(), "999")
            .await
            .unwrap();

        let state = gateway.load().await.into_state();
        assert_eq!(state.banks().len(), 2);
        assert!(state.current_bank().is_none());
    }

    #[tokio::test]
    async fn corrupt_slot_does_not_poison_others() {
        let store = InMemoryStore::new();
        let gateway = PersistenceGateway::new(Arc::new(store.clone()));
        gateway.try_save(&populated_state()).await.unwrap();
        store
            .set(StateKey::QuestionBanks.as_str(), "{not json")
            .await
            .unwrap();

        let partial = gateway.load().await;
        assert!(partial.banks.is_none());
        assert_eq!(partial.missed.as_ref().map(IncorrectQuestionSet::len), Some(1));
        assert_eq!(partial.progress.map(|p| p.correct_count()), Some(3));
    }

    #[tokio::test]
    async fn storage_failures_are_swallowed() {
        let gateway = PersistenceGateway::new(Arc::new(FailingStore));
        gateway.save(&populated_state()).await;
        assert!(gateway.try_save(&populated_state()).await.is_err());
        assert_eq!(gateway.load().await, PartialState::default());
    }

    #[tokio::test]
    async fn reads_legacy_progress_with_accuracy_field() {
        let store = InMemoryStore::new();
        store
            .set(
                StateKey::Progress.as_str(),
                r#"{"correctCount":9,"totalAnswered":10,"accuracy":90}"#,
            )
            .await
            .unwrap();
        let gateway = PersistenceGateway::new(Arc::new(store));
        let progress = gateway.load().await.progress.unwrap();
        assert_eq!(progress.accuracy(), 90);
    }
}
