//! Quiz session logic: drawing questions, shuffling answers, grading.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{QuizError, Result};
use crate::types::{Answer, Question};

/// Draw up to `count` questions from the bank, shuffling both the question
/// order and each question's answers.
pub fn draw(bank: &[Question], count: usize) -> Result<Vec<Question>> {
    draw_with_rng(bank, count, &mut rand::thread_rng())
}

/// [`draw`] with a caller-provided rng, for deterministic tests.
pub fn draw_with_rng<R: Rng + ?Sized>(
    bank: &[Question],
    count: usize,
    rng: &mut R,
) -> Result<Vec<Question>> {
    if bank.is_empty() {
        return Err(QuizError::EmptyBank);
    }

    let mut picked: Vec<Question> = bank.to_vec();
    picked.shuffle(rng);
    picked.truncate(count.min(bank.len()));

    Ok(picked
        .into_iter()
        .map(|question| shuffle_answers(question, rng))
        .collect())
}

/// Shuffle a question's answers, remapping the solution indices so they
/// keep pointing at the same answers.
fn shuffle_answers<R: Rng + ?Sized>(question: Question, rng: &mut R) -> Question {
    match question {
        Question::Single(mut q) => {
            q.correct = reindex(&mut q.answers, &q.correct, rng);
            Question::Single(q)
        }
        Question::Multiple(mut q) => {
            q.correct = reindex(&mut q.answers, &q.correct, rng);
            Question::Multiple(q)
        }
        Question::Match(mut q) => {
            q.correct_map = reindex(&mut q.answers, &q.correct_map, rng);
            Question::Match(q)
        }
    }
}

fn reindex<R: Rng + ?Sized>(
    answers: &mut Vec<Answer>,
    indices: &[usize],
    rng: &mut R,
) -> Vec<usize> {
    let mut order: Vec<usize> = (0..answers.len()).collect();
    order.shuffle(rng);

    // order[new] = old; invert to map old positions to new ones.
    let mut new_pos = vec![0usize; answers.len()];
    for (new, &old) in order.iter().enumerate() {
        new_pos[old] = new;
    }

    let shuffled: Vec<Answer> = order.iter().map(|&old| answers[old].clone()).collect();
    *answers = shuffled;
    indices
        .iter()
        .filter(|&&idx| idx < new_pos.len())
        .map(|&idx| new_pos[idx])
        .collect()
}

/// The taker's response to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Labels of the chosen answers.
    Choice { labels: BTreeSet<char> },
    /// Per item, the label of the answer paired with it.
    Match { pairs: Vec<Option<char>> },
}

impl Selection {
    /// The blank selection for `question` (nothing chosen yet).
    pub fn empty_for(question: &Question) -> Self {
        match question {
            Question::Single(_) | Question::Multiple(_) => Self::Choice {
                labels: BTreeSet::new(),
            },
            Question::Match(q) => Self::Match {
                pairs: vec![None; q.items.len()],
            },
        }
    }
}

/// Outcome of one graded question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub is_correct: bool,
    pub correct_labels: Vec<char>,
    pub selected_labels: Vec<char>,
}

/// Outcome of a finished quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizReport {
    pub results: Vec<QuestionResult>,
    pub correct_count: usize,
    pub total: usize,
}

/// Grade selections against questions. A missing selection counts as an
/// empty one.
pub fn grade(questions: &[Question], selections: &[Selection]) -> QuizReport {
    let results: Vec<QuestionResult> = questions
        .iter()
        .enumerate()
        .map(|(idx, question)| {
            let selection = selections.get(idx).cloned();
            grade_one(question, selection)
        })
        .collect();

    let correct_count = results.iter().filter(|r| r.is_correct).count();
    QuizReport {
        correct_count,
        total: questions.len(),
        results,
    }
}

fn grade_one(question: &Question, selection: Option<Selection>) -> QuestionResult {
    let selection = selection.unwrap_or_else(|| Selection::empty_for(question));
    let answers = question.answers();

    match question {
        Question::Single(q) | Question::Multiple(q) => {
            let correct: BTreeSet<char> = q
                .correct
                .iter()
                .filter_map(|&idx| answers.get(idx).map(|a| a.label_at(idx)))
                .collect();
            let selected = match &selection {
                Selection::Choice { labels } => labels.clone(),
                Selection::Match { .. } => BTreeSet::new(),
            };
            QuestionResult {
                is_correct: selected == correct,
                correct_labels: correct.into_iter().collect(),
                selected_labels: selected.into_iter().collect(),
            }
        }
        Question::Match(q) => {
            let correct: Vec<char> = q
                .correct_map
                .iter()
                .filter_map(|&idx| answers.get(idx).map(|a| a.label_at(idx)))
                .collect();
            let pairs = match &selection {
                Selection::Match { pairs } => pairs.clone(),
                Selection::Choice { .. } => Vec::new(),
            };
            let is_correct = correct
                .iter()
                .enumerate()
                .all(|(k, &label)| pairs.get(k).copied().flatten() == Some(label));
            QuestionResult {
                is_correct,
                correct_labels: correct,
                selected_labels: pairs.into_iter().flatten().collect(),
            }
        }
    }
}
