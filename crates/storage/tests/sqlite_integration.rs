use quiz_core::model::{
    Answer, AppState, BankId, OptionId, Question, QuestionBank, QuestionId, QuestionOption,
};
use quiz_core::time::fixed_now;
use storage::repository::{KeyValueStore, StateKey, Storage};
use storage::sqlite::SqliteRepository;
use storage::PersistenceGateway;

fn build_question(id: u64, answer: &str) -> Question {
    Question::new(
        QuestionId::new(id),
        format!("Q{id}"),
        vec![
            QuestionOption::new(OptionId::A, "x"),
            QuestionOption::new(OptionId::B, "y"),
            QuestionOption::new(OptionId::C, "z"),
        ],
        Answer::parse(answer).unwrap(),
    )
    .unwrap()
}

#[tokio::test]
async fn sqlite_store_upserts_slots() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_upsert?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    // migrations are idempotent
    repo.migrate().await.expect("migrate again");

    assert_eq!(repo.get("missing").await.unwrap(), None);

    repo.set(StateKey::SelectedBankId.as_str(), "1").await.unwrap();
    repo.set(StateKey::SelectedBankId.as_str(), "").await.unwrap();
    let value = repo.get(StateKey::SelectedBankId.as_str()).await.unwrap();
    assert_eq!(value.as_deref(), Some(""));
}

#[tokio::test]
async fn sqlite_gateway_roundtrips_app_state() {
    let storage = Storage::sqlite("sqlite:file:memdb_gateway_roundtrip?mode=memory&cache=shared")
        .await
        .expect("storage");
    let gateway = PersistenceGateway::from_storage(&storage);

    let mut state = AppState::new();
    let bank = QuestionBank::new(
        BankId::new(1_700_000_000_000),
        "保密知识.txt",
        vec![build_question(1, "A"), build_question(2, "BC")],
        fixed_now(),
    )
    .unwrap();
    state.add_bank(bank).unwrap();
    state.missed_mut().insert(build_question(2, "BC"));
    state.progress_mut().add(1, 2).unwrap();

    gateway.try_save(&state).await.expect("save");

    let restored = gateway.load().await.into_state();
    assert_eq!(restored, state);
    assert_eq!(
        restored.current_bank().map(QuestionBank::id),
        Some(BankId::new(1_700_000_000_000))
    );
    assert_eq!(restored.progress().accuracy(), 50);
}
