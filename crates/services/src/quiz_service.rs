use std::path::Path;

use quiz_core::Clock;
use quiz_core::model::{
    Answer, AppState, BankId, IncorrectQuestionSet, OptionId, ProgressState, Question,
    QuestionBank,
};
use quiz_core::parser::Parser;
use storage::PersistenceGateway;
use tracing::{debug, info};

use crate::error::QuizError;
use crate::progress_tracker::TitleStatus;
use crate::sample;
use crate::sessions::{Direction, RunSummary, SessionService, SubmitOutcome};

/// Result of importing a bank file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub bank_id: BankId,
    pub name: String,
    pub questions: usize,
    /// Question blocks skipped for lacking a usable answer line.
    pub dropped: usize,
}

/// Owns the application state and the active run.
///
/// Every state-changing operation persists through the gateway before it
/// returns. Validation failures leave both state and run untouched.
pub struct QuizService {
    clock: Clock,
    gateway: PersistenceGateway,
    parser: Parser,
    state: AppState,
    session: Option<SessionService>,
}

impl QuizService {
    /// Creates a service with empty state. Nothing is loaded or saved.
    #[must_use]
    pub fn new(clock: Clock, gateway: PersistenceGateway) -> Self {
        Self {
            clock,
            gateway,
            parser: Parser::default(),
            state: AppState::new(),
            session: None,
        }
    }

    /// Loads persisted state; seeds the sample bank when there are no banks.
    pub async fn bootstrap(clock: Clock, gateway: PersistenceGateway, seed_sample: bool) -> Self {
        let mut service = Self::new(clock, gateway);
        service.gateway.load().await.apply(&mut service.state);
        debug!(
            banks = service.state.banks().len(),
            missed = service.state.missed().len(),
            "state loaded"
        );

        if seed_sample && service.state.banks().is_empty() {
            match service.add_bank(sample::SAMPLE_BANK_NAME, sample::sample_questions()) {
                Ok(id) => {
                    info!(bank_id = %id, "seeded sample bank");
                    service.persist().await;
                }
                Err(err) => debug!(error = %err, "sample bank not seeded"),
            }
        }
        service
    }

    #[must_use]
    pub fn with_parser(mut self, parser: Parser) -> Self {
        self.parser = parser;
        self
    }

    async fn persist(&self) {
        self.gateway.save(&self.state).await;
    }

    fn next_bank_id(&self) -> BankId {
        let mut raw = self.clock.now_millis();
        while self.state.bank(BankId::new(raw)).is_some() {
            raw += 1;
        }
        BankId::new(raw)
    }

    fn add_bank(
        &mut self,
        name: &str,
        questions: Vec<Question>,
    ) -> Result<BankId, QuizError> {
        let bank = QuestionBank::new(self.next_bank_id(), name, questions, self.clock.now())?;
        Ok(self.state.add_bank(bank)?.id())
    }

    //
    // ─── QUERIES ──────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn banks(&self) -> &[QuestionBank] {
        self.state.banks()
    }

    #[must_use]
    pub fn current_bank(&self) -> Option<&QuestionBank> {
        self.state.current_bank()
    }

    #[must_use]
    pub fn missed(&self) -> &IncorrectQuestionSet {
        self.state.missed()
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressState {
        self.state.progress()
    }

    #[must_use]
    pub fn title_status(&self) -> TitleStatus {
        TitleStatus::from_progress(self.state.progress())
    }

    /// The active or just-finished run, if any.
    #[must_use]
    pub fn session(&self) -> Option<&SessionService> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn is_run_finished(&self) -> bool {
        self.session.as_ref().is_some_and(SessionService::is_complete)
    }

    fn session_mut(&mut self) -> Result<&mut SessionService, QuizError> {
        self.session.as_mut().ok_or(QuizError::NoActiveRun)
    }

    //
    // ─── BANKS ────────────────────────────────────────────────────────────────
    //

    /// Parse an uploaded `.txt` file and store it as the current bank.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidFileType` for non-`.txt` names and
    /// `QuizError::UnparseableBank` when no question survives parsing.
    pub async fn upload_bank(
        &mut self,
        file_name: &str,
        contents: &str,
    ) -> Result<UploadReport, QuizError> {
        let is_txt = Path::new(file_name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
        if !is_txt {
            return Err(QuizError::InvalidFileType(file_name.to_owned()));
        }

        let report = self.parser.parse_report(contents);
        if report.questions.is_empty() {
            return Err(QuizError::UnparseableBank(file_name.to_owned()));
        }
        let questions = report.questions.len();
        let bank_id = self.add_bank(file_name, report.questions)?;
        info!(
            bank_id = %bank_id,
            name = file_name,
            questions,
            dropped = report.dropped,
            "imported question bank"
        );
        self.persist().await;

        Ok(UploadReport {
            bank_id,
            name: file_name.to_owned(),
            questions,
            dropped: report.dropped,
        })
    }

    /// # Errors
    ///
    /// Returns `QuizError::BankNotFound` for an unknown id.
    pub async fn select_bank(&mut self, id: BankId) -> Result<&QuestionBank, QuizError> {
        if self.state.bank(id).is_none() {
            return Err(QuizError::BankNotFound(id));
        }
        self.state.select_bank(id)?;
        self.persist().await;
        self.state.bank(id).ok_or(QuizError::BankNotFound(id))
    }

    /// Remove a bank; the first remaining bank becomes current if needed.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::BankNotFound` for an unknown id.
    pub async fn delete_bank(&mut self, id: BankId) -> Result<QuestionBank, QuizError> {
        let removed = self
            .state
            .delete_bank(id)
            .ok_or(QuizError::BankNotFound(id))?;
        info!(bank_id = %id, name = removed.name(), "deleted question bank");
        self.persist().await;
        Ok(removed)
    }

    //
    // ─── RUNS ─────────────────────────────────────────────────────────────────
    //

    /// Start a practice run over the current bank, replacing any existing run.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoBankSelected` when no bank is current.
    pub async fn start_practice(&mut self) -> Result<&SessionService, QuizError> {
        let session = SessionService::start_practice(self.state.current_bank())?;
        let now = self.clock.now();
        if let Some(bank) = self
            .state
            .selected_id()
            .and_then(|id| self.state.bank_mut(id))
        {
            bank.touch(now);
        }
        self.persist().await;
        Ok(self.session.insert(session))
    }

    /// Practice the current bank again from the start.
    ///
    /// # Errors
    ///
    /// Same as [`QuizService::start_practice`].
    pub async fn restart_practice(&mut self) -> Result<&SessionService, QuizError> {
        self.start_practice().await
    }

    /// Start a review run over the missed-question set.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoMissedQuestions` when the set is empty; the
    /// current run, if any, is kept.
    pub fn start_review(&mut self) -> Result<&SessionService, QuizError> {
        let session = SessionService::start_review(&self.state)?;
        Ok(self.session.insert(session))
    }

    /// Record this run's wrong answers in the missed set, then review it.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoActiveRun` without a run and
    /// `QuizError::NoRunErrors` if the run had no wrong answers.
    pub async fn review_run_errors(&mut self) -> Result<&SessionService, QuizError> {
        let session = self.session.as_ref().ok_or(QuizError::NoActiveRun)?;
        let wrong: Vec<_> = session
            .incorrect_questions()
            .into_iter()
            .cloned()
            .collect();
        if wrong.is_empty() {
            return Err(QuizError::NoRunErrors);
        }
        for question in wrong {
            self.state.missed_mut().insert(question);
        }
        self.persist().await;
        self.start_review()
    }

    /// Check an answer for the current question and persist the result.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoActiveRun` or a `SessionError` validation failure.
    pub async fn submit_answer(
        &mut self,
        selected: &[OptionId],
    ) -> Result<SubmitOutcome, QuizError> {
        let session = self.session.as_mut().ok_or(QuizError::NoActiveRun)?;
        let outcome = session.submit_answer(&mut self.state, selected)?;
        self.persist().await;
        Ok(outcome)
    }

    /// Parse letters such as `"AC"` or `"a,c"` and submit them.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidSelection` for characters outside `A`-`D`,
    /// otherwise the same failures as [`QuizService::submit_answer`].
    pub async fn submit_letters(&mut self, raw: &str) -> Result<SubmitOutcome, QuizError> {
        let mut selected = Vec::new();
        for c in raw.chars().filter(|c| *c != ',' && !c.is_whitespace()) {
            match OptionId::from_char(c.to_ascii_uppercase()) {
                Ok(id) => selected.push(id),
                Err(_) => return Err(QuizError::InvalidSelection(raw.to_owned())),
            }
        }
        self.submit_answer(&selected).await
    }

    /// # Errors
    ///
    /// Returns `QuizError::NoActiveRun` or `SessionError::Finished`.
    pub fn advance(&mut self, direction: Direction) -> Result<bool, QuizError> {
        Ok(self.session_mut()?.advance(direction)?)
    }

    /// # Errors
    ///
    /// Returns `QuizError::NoActiveRun`, `SessionError::Finished` or
    /// `SessionError::AlreadyChecked`.
    pub fn reveal_answer(&mut self) -> Result<Answer, QuizError> {
        Ok(self.session_mut()?.reveal_answer()?.clone())
    }

    /// Finish the run and persist.
    ///
    /// Lifetime progress was already updated per answer, so nothing is added here.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoActiveRun` without a run.
    pub async fn finish_run(&mut self) -> Result<RunSummary, QuizError> {
        let summary = self.session_mut()?.finish();
        self.persist().await;
        Ok(summary)
    }

    /// Leave the current run, returning to idle.
    pub fn end_run(&mut self) -> Option<RunSummary> {
        self.session.take().map(|session| session.summary())
    }
}
