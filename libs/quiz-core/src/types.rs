//! Core types for the quiz text format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const LABELS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Label assigned to an answer at `index` when none was given explicitly.
pub fn position_label(index: usize) -> char {
    LABELS.get(index).copied().map(char::from).unwrap_or('?')
}

/// Optional descriptive metadata carried at the top of a quiz file.
///
/// Absent fields stay unset; applying defaults is a caller concern
/// (see [`QuizConfig::from_meta`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Suggested number of questions per quiz run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions_default: Option<u32>,
    /// Suggested time limit in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_default: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// One selectable answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Uppercase A-Z, unique within a question. `None` means the label is
    /// regenerated positionally on serialization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<char>,
    pub text: String,
}

impl Answer {
    pub fn new(label: char, text: impl Into<String>) -> Self {
        Self {
            label: Some(label),
            text: text.into(),
        }
    }

    pub fn unlabeled(text: impl Into<String>) -> Self {
        Self {
            label: None,
            text: text.into(),
        }
    }

    /// The stored label, or the positional one for an answer at `index`.
    pub fn label_at(&self, index: usize) -> char {
        self.label.unwrap_or_else(|| position_label(index))
    }
}

/// Question type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Single,
    Multiple,
    Match,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multiple => "multiple",
            Self::Match => "match",
        }
    }

    /// Parse from string, case-insensitively.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Some(Self::Single),
            "multiple" => Some(Self::Multiple),
            "match" => Some(Self::Match),
            _ => None,
        }
    }
}

/// A single- or multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceQuestion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub text: String,
    pub answers: Vec<Answer>,
    /// Indices into `answers` identifying the correct choices. May be empty
    /// (a no-correct-answer question), never dangling.
    pub correct: Vec<usize>,
    pub explanation: String,
}

/// A match-pairs question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchQuestion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub text: String,
    pub answers: Vec<Answer>,
    /// Prompt strings to be paired with answers.
    pub items: Vec<String>,
    /// Parallel to `items`: index into `answers` giving the correct pairing.
    /// May be shorter than `items` when source labels did not resolve.
    pub correct_map: Vec<usize>,
    pub explanation: String,
}

/// A parsed question, tagged by type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Question {
    Single(ChoiceQuestion),
    Multiple(ChoiceQuestion),
    Match(MatchQuestion),
}

impl Question {
    pub fn kind(&self) -> QuestionKind {
        match self {
            Self::Single(_) => QuestionKind::Single,
            Self::Multiple(_) => QuestionKind::Multiple,
            Self::Match(_) => QuestionKind::Match,
        }
    }

    pub fn topic(&self) -> Option<&str> {
        match self {
            Self::Single(q) | Self::Multiple(q) => q.topic.as_deref(),
            Self::Match(q) => q.topic.as_deref(),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Single(q) | Self::Multiple(q) => &q.text,
            Self::Match(q) => &q.text,
        }
    }

    pub fn answers(&self) -> &[Answer] {
        match self {
            Self::Single(q) | Self::Multiple(q) => &q.answers,
            Self::Match(q) => &q.answers,
        }
    }

    pub fn explanation(&self) -> &str {
        match self {
            Self::Single(q) | Self::Multiple(q) => &q.explanation,
            Self::Match(q) => &q.explanation,
        }
    }

    /// Retag this question with `kind`, converting fields as needed.
    ///
    /// Choice to match keeps the solution indices as the pairing map and
    /// leaves `items` empty; match to choice drops `items` and keeps the
    /// pairing map as the solution.
    pub fn with_kind(self, kind: QuestionKind) -> Self {
        match kind {
            QuestionKind::Match => match self {
                Self::Match(q) => Self::Match(q),
                Self::Single(q) | Self::Multiple(q) => Self::Match(MatchQuestion {
                    topic: q.topic,
                    text: q.text,
                    answers: q.answers,
                    items: Vec::new(),
                    correct_map: q.correct,
                    explanation: q.explanation,
                }),
            },
            QuestionKind::Single | QuestionKind::Multiple => {
                let choice = match self {
                    Self::Single(q) | Self::Multiple(q) => q,
                    Self::Match(q) => ChoiceQuestion {
                        topic: q.topic,
                        text: q.text,
                        answers: q.answers,
                        correct: q.correct_map,
                        explanation: q.explanation,
                    },
                };
                if kind == QuestionKind::Single {
                    Self::Single(choice)
                } else {
                    Self::Multiple(choice)
                }
            }
        }
    }
}

/// Effective quiz-run settings (question count and time limit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    pub num_questions: u32,
    pub minutes: u32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            num_questions: 10,
            minutes: 10,
        }
    }
}

impl QuizConfig {
    /// Apply metadata suggestions over the defaults.
    pub fn from_meta(meta: &QuizMeta) -> Self {
        let defaults = Self::default();
        Self {
            num_questions: meta.questions_default.unwrap_or(defaults.num_questions),
            minutes: meta.time_default.unwrap_or(defaults.minutes),
        }
    }
}

/// A named quiz snapshot. The raw text is the source of truth; it is
/// re-parsed when the quiz is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQuiz {
    pub id: Uuid,
    pub name: String,
    pub text: String,
    /// Number of questions the text parsed to when saved.
    pub question_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_questions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<u32>,
    pub saved_at: DateTime<Utc>,
}
