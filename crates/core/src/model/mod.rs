mod bank;
mod ids;
mod missed;
mod progress;
mod question;
mod state;

pub use ids::{BankId, ParseIdError, QuestionId};

pub use bank::{BankError, QuestionBank};
pub use missed::IncorrectQuestionSet;
pub use progress::{ProgressError, ProgressState, accuracy};
pub use question::{Answer, OptionId, OptionIdError, Question, QuestionError, QuestionOption};
pub use state::{AppState, AppStateError};
