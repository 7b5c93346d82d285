//! Plain terminal rendering and the interactive run loop.

use anyhow::Result;
use quiz_core::titles::NextTitle;
use services::{
    AnswerSlot, Direction, QuizError, QuizService, RunMode, RunSummary, SessionService,
    SubmitOutcome, TitleStatus,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

const HELP: &str = "letters (e.g. A or AC) answer · n next · p previous · s show answer · f finish · q quit";
const AFTER_RUN_HELP: &str = "r review this run's mistakes · a practice again · q quit";

pub fn print_banks(quiz: &QuizService) {
    if quiz.banks().is_empty() {
        println!("No question banks yet. Import one with `quiz import <file.txt>`.");
        return;
    }
    let current = quiz.state().selected_id();
    for bank in quiz.banks() {
        let marker = if Some(bank.id()) == current { '*' } else { ' ' };
        println!(
            "{marker} {id}  {name}  ({count} questions, last used {last_used})",
            id = bank.id(),
            name = bank.name(),
            count = bank.len(),
            last_used = bank.last_used().format("%Y-%m-%d %H:%M"),
        );
    }
}

pub fn print_stats(quiz: &QuizService) {
    let progress = quiz.progress();
    println!(
        "Answered {total}, correct {correct}, accuracy {acc}%",
        total = progress.total_answered(),
        correct = progress.correct_count(),
        acc = progress.accuracy(),
    );
    println!("Missed questions saved: {}", quiz.missed().len());
    print_title(&quiz.title_status());
}

fn print_title(status: &TitleStatus) {
    match status.current {
        Some(tier) => println!("Title: {} ({}%)", tier.name, tier.min_accuracy),
        None => println!("Title: 继续努力！"),
    }
    match status.next {
        NextTitle::Tier(tier) => println!("Next:  {} ({}%)", tier.name, tier.min_accuracy),
        NextTitle::MaxReached => println!("Next:  已是最高称号！"),
    }
}

fn print_question(session: &SessionService) {
    let question = session.current_question();
    let kind = if question.is_multiple_choice() {
        "multiple choice"
    } else {
        "single choice"
    };
    println!();
    println!(
        "[{mode}] Question {n}/{total} ({kind})",
        mode = match session.mode() {
            RunMode::Practice => "practice",
            RunMode::Review => "review",
        },
        n = session.current_index() + 1,
        total = session.total_questions(),
    );
    println!("{}", question.text());

    let slot = session.current_slot();
    for option in question.options() {
        let picked = slot.record().is_some_and(|r| r.selected.contains(&option.id));
        let mark = match slot {
            AnswerSlot::Unanswered => ' ',
            _ if question.answer().contains(option.id) => '✓',
            _ if picked => '✗',
            _ => ' ',
        };
        println!("  {mark} {}. {}", option.id, option.text);
    }
}

fn print_outcome(outcome: &SubmitOutcome) {
    if outcome.record.is_correct {
        println!("Correct!");
    } else {
        println!("Wrong. The answer is {}.", outcome.correct_answer);
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!(
        "Score {correct}/{total} ({acc}%), wrong {wrong}, shown {shown}, skipped {skipped}",
        correct = summary.correct,
        total = summary.total_questions,
        acc = summary.accuracy,
        wrong = summary.incorrect,
        shown = summary.revealed,
        skipped = summary.unanswered().saturating_sub(summary.revealed),
    );
}

/// Choices offered on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AfterRun {
    ReviewErrors,
    PracticeAgain,
    Leave,
}

impl AfterRun {
    fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "r" | "review" => Some(Self::ReviewErrors),
            "a" | "again" => Some(Self::PracticeAgain),
            "q" | "quit" | "" => Some(Self::Leave),
            _ => None,
        }
    }
}

/// How answering stopped.
enum RunExit {
    Completed,
    Left,
}

type Input = Lines<BufReader<Stdin>>;

/// Drives runs from stdin until the user leaves or input ends.
///
/// A completed run shows its results and can be followed by a review of
/// its mistakes or another practice run of the current bank.
pub async fn run_interactive(quiz: &mut QuizService) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");

    loop {
        match answer_questions(quiz, &mut lines).await? {
            RunExit::Left => {
                if let Some(summary) = quiz.end_run() {
                    print_summary(&summary);
                }
                print_title(&quiz.title_status());
                return Ok(());
            }
            RunExit::Completed => {
                if let Some(summary) = quiz.session().map(SessionService::summary) {
                    print_summary(&summary);
                }
                print_title(&quiz.title_status());
                if !start_next_run(quiz, &mut lines).await? {
                    quiz.end_run();
                    return Ok(());
                }
            }
        }
    }
}

async fn answer_questions(quiz: &mut QuizService, lines: &mut Input) -> Result<RunExit> {
    loop {
        let Some(session) = quiz.session() else {
            return Ok(RunExit::Left);
        };
        if session.is_complete() {
            return Ok(RunExit::Completed);
        }
        print_question(session);

        let Some(line) = lines.next_line().await? else {
            return Ok(RunExit::Left);
        };
        let result = match line.trim() {
            "" => Ok(()),
            "q" | "quit" => return Ok(RunExit::Left),
            "h" | "?" => {
                println!("{HELP}");
                Ok(())
            }
            "n" => step(quiz, Direction::Next),
            "p" => step(quiz, Direction::Prev),
            "s" => quiz
                .reveal_answer()
                .map(|answer| println!("Answer: {answer}")),
            "f" => quiz.finish_run().await.map(|_| ()),
            letters => quiz
                .submit_letters(letters)
                .await
                .map(|outcome| print_outcome(&outcome)),
        };
        if let Err(err) = result {
            println!("! {err}");
        }
    }
}

/// Returns `false` when the user leaves instead of starting another run.
async fn start_next_run(quiz: &mut QuizService, lines: &mut Input) -> Result<bool> {
    loop {
        println!("{AFTER_RUN_HELP}");
        let Some(line) = lines.next_line().await? else {
            return Ok(false);
        };
        let started = match AfterRun::parse(&line) {
            Some(AfterRun::Leave) => return Ok(false),
            Some(AfterRun::ReviewErrors) => quiz.review_run_errors().await.map(|_| ()),
            Some(AfterRun::PracticeAgain) => quiz.restart_practice().await.map(|_| ()),
            None => continue,
        };
        match started {
            Ok(()) => return Ok(true),
            Err(err) => println!("! {err}"),
        }
    }
}

fn step(quiz: &mut QuizService, direction: Direction) -> Result<(), QuizError> {
    if !quiz.advance(direction)? {
        println!("! no more questions that way");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_screen_choices() {
        assert_eq!(AfterRun::parse("r"), Some(AfterRun::ReviewErrors));
        assert_eq!(AfterRun::parse(" review "), Some(AfterRun::ReviewErrors));
        assert_eq!(AfterRun::parse("a"), Some(AfterRun::PracticeAgain));
        assert_eq!(AfterRun::parse("q"), Some(AfterRun::Leave));
        assert_eq!(AfterRun::parse(""), Some(AfterRun::Leave));
        assert_eq!(AfterRun::parse("x"), None);
    }
}
