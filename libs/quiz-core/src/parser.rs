//! Parser for the plain-text quiz format.
//!
//! # Format
//! ```text
//! # name=Sample quiz
//! # time=20
//!
//! @Geography
//! Which of these is a capital city?
//! A. Lyon
//! B. Madrid
//! C. Porto
//! B
//! Explanation: Madrid is the capital of Spain.
//!
//! Pair each country with its capital.
//! A. Rome
//! B. Oslo
//! > Italy
//! > Norway
//! AB
//! ```
//!
//! Topic lines (`@...`) apply to every following question until the next
//! topic line. A `#` line is a metadata directive or a comment. The line of
//! uppercase letters after the answers names the correct choices; for
//! match-pairs questions it follows the `>` items and pairs them with
//! answers by position.
//!
//! The parser is tolerant by design: the format is hand-edited, so it never
//! fails. Malformed constructs are skipped or dropped and the rest of the
//! file is still read.

use crate::types::{Answer, ChoiceQuestion, MatchQuestion, Question, QuestionKind, QuizMeta};

const OVERRIDE_MARKER: &str = "OverrideType=";

/// Result of one parse call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedQuiz {
    pub questions: Vec<Question>,
    pub meta: QuizMeta,
}

/// Parse quiz text into questions and metadata.
///
/// Total for any input: the worst case is an empty question list and a
/// partial [`QuizMeta`].
pub fn parse(text: &str) -> ParsedQuiz {
    let mut cursor = Cursor::new(text);
    let mut questions = Vec::new();
    let mut meta = QuizMeta::default();
    let mut topic: Option<String> = None;
    let mut override_kind: Option<QuestionKind> = None;

    while let Some(line) = cursor.peek() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            cursor.advance();
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix('#') {
            apply_directive(&mut meta, rest);
            cursor.advance();
            continue;
        }

        if trimmed.starts_with('@') {
            // A directive line is either a topic name or a one-shot type
            // override, never both.
            if trimmed.contains(OVERRIDE_MARKER) {
                if let Some(kind) = parse_override(trimmed) {
                    override_kind = Some(kind);
                }
            } else {
                topic = Some(clean_topic(trimmed));
            }
            cursor.advance();
            continue;
        }

        if let Some(question) = read_question(&mut cursor, topic.as_deref()) {
            let question = match override_kind.take() {
                Some(kind) => question.with_kind(kind),
                None => question,
            };
            questions.push(question);
        }
    }

    ParsedQuiz { questions, meta }
}

/// Owns the current position in the line sequence.
struct Cursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        Self { lines, pos: 0 }
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn next_line(&mut self) -> Option<&'a str> {
        let line = self.peek();
        if line.is_some() {
            self.pos += 1;
        }
        line
    }

    fn skip_blank(&mut self) {
        while matches!(self.peek(), Some(line) if line.trim().is_empty()) {
            self.advance();
        }
    }
}

/// Read one question block starting at the cursor.
///
/// Returns `None` when the input ends mid-block; the partially built
/// question is discarded rather than emitted truncated.
fn read_question(cursor: &mut Cursor<'_>, topic: Option<&str>) -> Option<Question> {
    // Question text: the starting line plus following non-blank lines up to
    // the first answer line.
    let mut text_lines = vec![cursor.next_line()?.trim()];
    while let Some(line) = cursor.peek() {
        if is_answer_line(line) || line.trim().is_empty() {
            break;
        }
        text_lines.push(line.trim());
        cursor.advance();
    }
    let text = text_lines.join("\n");

    // Answer options, variable length.
    let mut answers = Vec::new();
    while let Some(line) = cursor.peek() {
        if !is_answer_line(line) {
            break;
        }
        let trimmed = line.trim();
        let label = trimmed.as_bytes()[0] as char;
        answers.push(Answer::new(label, trimmed[2..].trim_start()));
        cursor.advance();
    }

    // Either a solution line (choice) or an item block (match) follows.
    cursor.skip_blank();
    let peeked = cursor.peek()?.trim();

    let topic = topic.map(str::to_owned);

    if peeked.starts_with('>') {
        let mut items = Vec::new();
        while let Some(line) = cursor.peek() {
            let trimmed = line.trim();
            if !trimmed.starts_with('>') {
                break;
            }
            let item = trimmed[1..].trim_start();
            if !item.is_empty() {
                items.push(item.to_string());
            }
            cursor.advance();
        }

        // The mapping line pairs items with answers, e.g. ACBD or A C B D.
        cursor.skip_blank();
        let map_line = cursor.next_line()?;
        let correct_map = resolve_labels(&extract_labels(map_line), &answers);
        let explanation = read_explanation(cursor);

        Some(Question::Match(MatchQuestion {
            topic,
            text,
            answers,
            items,
            correct_map,
            explanation,
        }))
    } else {
        let solution = cursor.next_line()?;
        let letters = extract_labels(solution);
        // The single/multiple tag counts the raw letters, not the ones that
        // resolved to a known answer.
        let multi = letters.len() > 1;
        let correct = resolve_labels(&letters, &answers);
        let explanation = read_explanation(cursor);

        let choice = ChoiceQuestion {
            topic,
            text,
            answers,
            correct,
            explanation,
        };
        Some(if multi {
            Question::Multiple(choice)
        } else {
            Question::Single(choice)
        })
    }
}

/// Consume non-blank lines after the solution line as the explanation,
/// stripping a leading `Explanation:` token from each.
fn read_explanation(cursor: &mut Cursor<'_>) -> String {
    let mut lines = Vec::new();
    while let Some(line) = cursor.peek() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        let stripped = strip_explanation_token(trimmed);
        if !stripped.is_empty() {
            lines.push(stripped);
        }
        cursor.advance();
    }
    lines.join("\n")
}

fn strip_explanation_token(line: &str) -> &str {
    const TOKEN: &str = "explanation:";
    if let Some(head) = line.get(..TOKEN.len()) {
        if head.eq_ignore_ascii_case(TOKEN) {
            return line[TOKEN.len()..].trim();
        }
    }
    line
}

/// An answer line is one uppercase letter, a dot, then whitespace.
fn is_answer_line(line: &str) -> bool {
    let mut chars = line.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(label), Some('.'), Some(ws)) if label.is_ascii_uppercase() && ws.is_whitespace()
    )
}

/// Uppercase A-Z letters of a line, in order of appearance.
fn extract_labels(line: &str) -> Vec<char> {
    line.chars().filter(|c| c.is_ascii_uppercase()).collect()
}

/// Map letters to answer indices, dropping the ones that match no label.
fn resolve_labels(letters: &[char], answers: &[Answer]) -> Vec<usize> {
    letters
        .iter()
        .filter_map(|&letter| answers.iter().position(|a| a.label == Some(letter)))
        .collect()
}

/// Topic name: strip the `@`, keep letters and whitespace only.
fn clean_topic(line: &str) -> String {
    line.strip_prefix('@')
        .unwrap_or(line)
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

fn parse_override(line: &str) -> Option<QuestionKind> {
    let at = line.find(OVERRIDE_MARKER)?;
    let rest = &line[at + OVERRIDE_MARKER.len()..];
    QuestionKind::from_str(rest.split_whitespace().next()?)
}

/// Apply one `# key=value` directive to the metadata. Lines without both a
/// key and a value are comments.
fn apply_directive(meta: &mut QuizMeta, rest: &str) {
    let Some((key, value)) = rest.split_once('=') else {
        return;
    };
    let key = key.trim().to_lowercase();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return;
    }

    if key.contains("question") {
        if let Ok(n) = value.parse::<u32>() {
            meta.questions_default = Some(n);
        }
    } else if key.contains("time") {
        if let Ok(n) = value.parse::<u32>() {
            meta.time_default = Some(n);
        }
    } else if key == "author" {
        meta.author = Some(value.to_string());
    } else if key == "version" {
        meta.version = Some(value.to_string());
    } else if key.contains("name") {
        meta.name = Some(value.to_string());
    }
}
