//! Plain-text question bank parser.
//!
//! ```text
//! 1.question text
//! A.option
//! B.option
//! 答案：A,B
//! ```
//!
//! Parsing is lenient: unrecognized lines are skipped and question blocks
//! without a usable answer line are dropped.

use std::fmt::Write as _;

use tracing::debug;

use crate::model::{Answer, OptionId, Question, QuestionId, QuestionOption};

/// Marker that introduces the answer line.
pub const ANSWER_PREFIX: &str = "答案：";

/// Questions recovered from a bank file plus the number of blocks that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub questions: Vec<Question>,
    pub dropped: usize,
}

/// Line-oriented bank parser with a configurable answer marker.
#[derive(Debug, Clone)]
pub struct Parser {
    answer_prefix: String,
}

impl Default for Parser {
    fn default() -> Self {
        Self {
            answer_prefix: ANSWER_PREFIX.to_owned(),
        }
    }
}

/// A question block still being read.
struct OpenQuestion {
    text: String,
    options: Vec<QuestionOption>,
    answer: Option<Answer>,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_answer_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.answer_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn answer_prefix(&self) -> &str {
        &self.answer_prefix
    }

    /// Parses raw bank text. Never fails; may return an empty list.
    #[must_use]
    pub fn parse(&self, raw: &str) -> Vec<Question> {
        self.parse_report(raw).questions
    }

    /// Parses raw bank text and counts blocks dropped for lacking a usable answer.
    #[must_use]
    pub fn parse_report(&self, raw: &str) -> ParseReport {
        let mut report = ParseReport::default();
        let mut open: Option<OpenQuestion> = None;

        for line in raw.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
            if let Some(text) = strip_question_number(line) {
                if let Some(prev) = open.take() {
                    flush(prev, &mut report);
                }
                open = Some(OpenQuestion {
                    text: text.trim().to_owned(),
                    options: Vec::new(),
                    answer: None,
                });
                continue;
            }

            let Some(current) = open.as_mut() else {
                continue;
            };

            if let Some((id, text)) = split_option(line) {
                current.options.push(QuestionOption::new(id, text.trim()));
            } else if let Some(rest) = line.strip_prefix(self.answer_prefix.as_str()) {
                let letters: String = rest
                    .chars()
                    .take_while(|c| matches!(c, 'A'..='D' | ','))
                    .filter(|c| *c != ',')
                    .collect();
                // an unusable answer line leaves any earlier answer in place
                if let Ok(answer) = Answer::parse(&letters) {
                    current.answer = Some(answer);
                }
            }
        }

        if let Some(last) = open {
            flush(last, &mut report);
        }

        debug!(
            questions = report.questions.len(),
            dropped = report.dropped,
            "parsed question bank"
        );
        report
    }

    /// Renders questions back into the bank text format.
    #[must_use]
    pub fn render(&self, questions: &[Question]) -> String {
        let mut out = String::new();
        for question in questions {
            let _ = writeln!(out, "{}.{}", question.id(), question.text());
            for option in question.options() {
                let _ = writeln!(out, "{}.{}", option.id, option.text);
            }
            let _ = writeln!(out, "{}{}", self.answer_prefix, question.answer());
            out.push('\n');
        }
        out
    }
}

/// Parses with the default answer marker.
#[must_use]
pub fn parse(raw: &str) -> Vec<Question> {
    Parser::default().parse(raw)
}

/// Parses with the default answer marker, reporting dropped blocks.
#[must_use]
pub fn parse_report(raw: &str) -> ParseReport {
    Parser::default().parse_report(raw)
}

/// Renders with the default answer marker.
#[must_use]
pub fn render(questions: &[Question]) -> String {
    Parser::default().render(questions)
}

fn flush(open: OpenQuestion, report: &mut ParseReport) {
    let Some(answer) = open.answer else {
        report.dropped += 1;
        return;
    };
    let id = QuestionId::new(report.questions.len() as u64 + 1);
    match Question::new(id, open.text, open.options, answer) {
        Ok(question) => report.questions.push(question),
        Err(err) => {
            debug!(error = %err, "dropping question block");
            report.dropped += 1;
        }
    }
}

/// `^\d+\.` → remainder after the period.
fn strip_question_number(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix('.')
}

/// `^[A-D]\.` → option letter and remainder.
fn split_option(line: &str) -> Option<(OptionId, &str)> {
    let mut chars = line.chars();
    let id = OptionId::from_char(chars.next()?).ok()?;
    let rest = chars.as_str().strip_prefix('.')?;
    Some((id, rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_question() {
        let questions = parse("1.Q1\nA.x\nB.y\n答案：A\n");
        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert_eq!(q.id(), QuestionId::new(1));
        assert_eq!(q.text(), "Q1");
        assert_eq!(
            q.options(),
            &[
                QuestionOption::new(OptionId::A, "x"),
                QuestionOption::new(OptionId::B, "y"),
            ]
        );
        assert_eq!(q.answer().as_letters(), "A");
    }

    #[test]
    fn parses_comma_separated_multi_answer_and_trims() {
        let raw = "  12.  Which are safe?  \r\n A. one \nB.two\nC.three\nD.four\n答案：A,D\n";
        let questions = parse(raw);
        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert_eq!(q.text(), "Which are safe?");
        assert_eq!(q.options()[0].text, "one");
        assert_eq!(q.answer().as_letters(), "AD");
        assert!(q.is_multiple_choice());
    }

    #[test]
    fn drops_blocks_without_answer_and_keeps_ids_dense() {
        let raw = "1.first\nA.a\nB.b\n\n2.no answer\nA.a\n\n3.third\nA.a\nB.b\n答案：B\n4.tail\nA.a\n";
        let report = parse_report(raw);
        assert_eq!(report.dropped, 3);
        assert_eq!(report.questions.len(), 1);
        assert_eq!(report.questions[0].text(), "third");
        assert_eq!(report.questions[0].id(), QuestionId::new(1));
    }

    #[test]
    fn ignores_annotation_lines_and_orphan_options() {
        let raw = "Chapter one\nA.orphan\n答案：A\n1.Q\n解析：because\nA.x\nB.y\n答案：B\nnotes";
        let questions = parse(raw);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].options().len(), 2);
        assert_eq!(questions[0].answer().as_letters(), "B");
    }

    #[test]
    fn answer_run_stops_at_first_other_character() {
        let questions = parse("1.Q\nA.x\nB.y\nC.z\n答案：AC（见教材）\n");
        assert_eq!(questions[0].answer().as_letters(), "AC");

        let report = parse_report("1.Q\nA.x\n答案： A\n");
        assert!(report.questions.is_empty());
        assert_eq!(report.dropped, 1);
    }

    #[test]
    fn drops_answer_naming_missing_option() {
        let report = parse_report("1.Q\nA.x\nB.y\n答案：C\n");
        assert!(report.questions.is_empty());
        assert_eq!(report.dropped, 1);
    }

    #[test]
    fn unparseable_input_yields_nothing() {
        assert!(parse("").is_empty());
        assert!(parse("hello\nworld").is_empty());
        assert!(parse("1.Q\nA.x\n").is_empty());
    }

    #[test]
    fn custom_answer_prefix() {
        let parser = Parser::new().with_answer_prefix("Answer:");
        let questions = parser.parse("1.Q\nA.x\nB.y\nAnswer:B\n");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].answer().as_letters(), "B");
        assert!(parser.parse("1.Q\nA.x\n答案：A\n").is_empty());
    }

    #[test]
    fn question_number_needs_digits_and_period() {
        assert_eq!(strip_question_number("12.abc"), Some("abc"));
        assert_eq!(strip_question_number("12abc"), None);
        assert_eq!(strip_question_number(".abc"), None);
        assert_eq!(split_option("D.x"), Some((OptionId::D, "x")));
        assert_eq!(split_option("E.x"), None);
        assert_eq!(split_option("A x"), None);
    }

    #[test]
    fn reparsing_rendered_text_is_idempotent() {
        let raw = "1.涉密设备可以接入（ ）。\nA.涉密计算机\nB.内部网络\nC.互联网\nD.公共网络\n答案：A\n\
                   2.下面符合规定的是\nA.one\nB.two\nC.three\nD.four\n答案：A,D\n";
        let first = parse(raw);
        assert_eq!(first.len(), 2);
        let second = parse(&render(&first));
        assert_eq!(first, second);
    }
}
