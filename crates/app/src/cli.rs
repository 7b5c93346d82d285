use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quiz_core::model::BankId;
use quiz_core::parser::ANSWER_PREFIX;

/// Practice multiple-choice question banks in the terminal.
#[derive(Debug, Parser)]
#[command(name = "quiz", version, about)]
pub struct Cli {
    /// SQLite URL or path for saved state; `memory` keeps state for this run only.
    #[arg(long, env = "QUIZ_DB_URL", default_value = "sqlite://quiz.sqlite3", global = true)]
    pub db: String,

    /// Do not add the sample bank when no banks exist.
    #[arg(long, global = true)]
    pub no_sample: bool,

    /// Marker that starts the answer line in imported banks.
    #[arg(long, env = "QUIZ_ANSWER_PREFIX", default_value = ANSWER_PREFIX, global = true)]
    pub answer_prefix: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import a .txt question bank and select it.
    Import { file: PathBuf },
    /// List banks; the current one is marked with `*`.
    Banks,
    /// Make a bank current.
    Select { id: BankId },
    /// Delete a bank.
    Delete { id: BankId },
    /// Practice the current bank.
    Practice,
    /// Review missed questions.
    Review,
    /// Show lifetime accuracy and title.
    Stats,
}

/// Where state is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbTarget {
    Memory,
    Sqlite(String),
}

impl DbTarget {
    #[must_use]
    pub fn from_arg(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("memory") {
            return Self::Memory;
        }
        Self::Sqlite(normalize_sqlite_url(raw))
    }
}

fn normalize_sqlite_url(raw: &str) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw.to_owned();
    }

    let path_str = raw.strip_prefix("sqlite:").unwrap_or(raw);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}
