use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser as _;
use quiz_core::parser::Parser;
use services::{Clock, QuizService};
use storage::{PersistenceGateway, Storage};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;
mod terminal;

use cli::{Cli, Command, DbTarget};

/// Logs go to stderr so they never interleave with the quiz on stdout.
fn init_logging() {
    let filter = EnvFilter::try_from_env("QUIZ_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

/// Make sure the parent directory of a file-backed database exists.
fn prepare_sqlite_dir(db_url: &str) -> Result<()> {
    let Some(path) = db_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    if let Some(parent) = Path::new(path).parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    Ok(())
}

async fn open_storage(target: &DbTarget) -> Result<Storage> {
    match target {
        DbTarget::Memory => Ok(Storage::in_memory()),
        DbTarget::Sqlite(url) => {
            prepare_sqlite_dir(url)?;
            let storage = Storage::sqlite(url)
                .await
                .with_context(|| format!("opening {url}"))?;
            debug!(url = %url, "storage ready");
            Ok(storage)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let storage = open_storage(&DbTarget::from_arg(&cli.db)).await?;
    let gateway = PersistenceGateway::from_storage(&storage);
    let mut quiz = QuizService::bootstrap(Clock::default(), gateway, !cli.no_sample)
        .await
        .with_parser(Parser::new().with_answer_prefix(cli.answer_prefix));

    match cli.command {
        None | Some(Command::Banks) => terminal::print_banks(&quiz),
        Some(Command::Stats) => terminal::print_stats(&quiz),
        Some(Command::Import { file }) => {
            let contents = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let name = file
                .file_name()
                .map_or_else(|| file.display().to_string(), |n| n.to_string_lossy().into_owned());
            let report = quiz.upload_bank(&name, &contents).await?;
            println!(
                "Imported {name}: {count} questions (id {id})",
                name = report.name,
                count = report.questions,
                id = report.bank_id,
            );
            if report.dropped > 0 {
                println!("Skipped {} question(s) without a usable answer line.", report.dropped);
            }
        }
        Some(Command::Select { id }) => {
            let bank = quiz.select_bank(id).await?;
            println!("Selected {}", bank.name());
        }
        Some(Command::Delete { id }) => {
            let bank = quiz.delete_bank(id).await?;
            println!("Deleted {}", bank.name());
        }
        Some(Command::Practice) => {
            quiz.start_practice().await?;
            terminal::run_interactive(&mut quiz).await?;
        }
        Some(Command::Review) => {
            quiz.start_review()?;
            terminal::run_interactive(&mut quiz).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("{err:#}");
        std::process::exit(2);
    }
}
