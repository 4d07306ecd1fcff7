//! Core library for plain-text quiz banks.
//!
//! Provides:
//! - Parser for the hand-editable quiz text format (topics, single/multiple
//!   choice and match-pairs questions, inline metadata)
//! - Serializer producing text the parser reads back (round-trip)
//! - Quiz session logic (question drawing, answer shuffling, grading)
//! - Saved-quiz JSON persistence

pub mod error;
pub mod parser;
pub mod serializer;
pub mod session;
pub mod store;
pub mod types;

pub use error::{QuizError, Result};
pub use parser::{parse, ParsedQuiz};
pub use serializer::serialize;
pub use session::{draw, draw_with_rng, grade, QuestionResult, QuizReport, Selection};
pub use store::QuizStore;
pub use types::{
    Answer, ChoiceQuestion, MatchQuestion, Question, QuestionKind, QuizConfig, QuizMeta, SavedQuiz,
};
