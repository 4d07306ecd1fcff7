//! Serializer producing the plain-text quiz format.
//!
//! The output is designed to be read back by [`crate::parser::parse`] into
//! an equivalent model, so quizzes can be authored in memory and exported
//! as hand-editable text.

use crate::types::{position_label, Answer, Question, QuizMeta};

/// Serialize metadata and questions to quiz text. Total: never fails for a
/// model honoring the data-model invariants.
pub fn serialize(meta: &QuizMeta, questions: &[Question]) -> String {
    let mut lines: Vec<String> = Vec::new();

    push_meta(&mut lines, meta);
    if !lines.is_empty() {
        lines.push(String::new());
    }

    let mut last_topic: Option<&str> = None;
    for question in questions {
        if let Some(topic) = question.topic() {
            if !topic.is_empty() && last_topic != Some(topic) {
                lines.push(format!("@{topic}"));
                last_topic = Some(topic);
            }
        }

        lines.push(question.text().to_string());

        let answers = question.answers();
        for (idx, answer) in answers.iter().enumerate() {
            lines.push(format!("{}. {}", answer.label_at(idx), answer.text));
        }

        match question {
            Question::Match(q) => {
                for item in &q.items {
                    lines.push(format!("> {item}"));
                }
                lines.push(label_line(&q.correct_map, answers));
            }
            Question::Single(q) | Question::Multiple(q) => {
                lines.push(label_line(&q.correct, answers));
            }
        }

        let explanation = question.explanation().trim();
        if !explanation.is_empty() {
            lines.push(format!("Explanation: {explanation}"));
        }

        lines.push(String::new());
    }

    lines.join("\n")
}

fn push_meta(lines: &mut Vec<String>, meta: &QuizMeta) {
    if let Some(name) = meta.name.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("# name={name}"));
    }
    if let Some(n) = meta.questions_default {
        lines.push(format!("# questions={n}"));
    }
    if let Some(t) = meta.time_default {
        lines.push(format!("# time={t}"));
    }
    if let Some(author) = meta.author.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("# author={author}"));
    }
    if let Some(version) = meta.version.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("# version={version}"));
    }
}

/// Concatenated labels of the answers referenced by `indices`.
fn label_line(indices: &[usize], answers: &[Answer]) -> String {
    indices
        .iter()
        .map(|&idx| match answers.get(idx) {
            Some(answer) => answer.label_at(idx),
            None => position_label(idx),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::types::{ChoiceQuestion, MatchQuestion};
    use pretty_assertions::assert_eq;

    fn answers(labels: &[(char, &str)]) -> Vec<Answer> {
        labels.iter().map(|&(l, t)| Answer::new(l, t)).collect()
    }

    fn sample_meta() -> QuizMeta {
        QuizMeta {
            name: Some("Capitals".into()),
            questions_default: Some(5),
            time_default: Some(20),
            author: Some("Ada".into()),
            version: Some("1".into()),
        }
    }

    fn sample_questions() -> Vec<Question> {
        vec![
            Question::Single(ChoiceQuestion {
                topic: Some("Geography".into()),
                text: "Which is a capital?\nPick one.".into(),
                answers: answers(&[('A', "Lyon"), ('B', "Madrid"), ('C', "Porto")]),
                correct: vec![1],
                explanation: "Madrid is the capital of Spain.".into(),
            }),
            Question::Multiple(ChoiceQuestion {
                topic: Some("Geography".into()),
                text: "Which are in Europe?\nMore than one.".into(),
                answers: answers(&[('A', "Oslo"), ('B', "Lima"), ('C', "Rome")]),
                correct: vec![0, 2],
                explanation: "Lima is in Peru.".into(),
            }),
            Question::Match(MatchQuestion {
                topic: Some("History".into()),
                text: "Pair the event\nwith its century.".into(),
                answers: answers(&[('A', "XV"), ('B', "XVIII")]),
                items: vec!["French revolution".into(), "Fall of Constantinople".into()],
                correct_map: vec![1, 0],
                explanation: "Both reshaped Europe.".into(),
            }),
        ]
    }

    #[test]
    fn meta_lines_come_first_in_fixed_order() {
        let text = serialize(&sample_meta(), &[]);
        assert_eq!(
            text,
            "# name=Capitals\n# questions=5\n# time=20\n# author=Ada\n# version=1\n"
        );
    }

    #[test]
    fn empty_meta_emits_no_leading_blank() {
        let questions = sample_questions();
        let text = serialize(&QuizMeta::default(), &questions[..1]);
        assert!(text.starts_with("@Geography\n"));
    }

    #[test]
    fn topic_line_emitted_only_on_change() {
        let text = serialize(&QuizMeta::default(), &sample_questions());
        assert_eq!(text.matches("@Geography").count(), 1);
        assert_eq!(text.matches("@History").count(), 1);
    }

    #[test]
    fn positional_labels_regenerated_when_absent() {
        let question = Question::Single(ChoiceQuestion {
            topic: None,
            text: "Q?".into(),
            answers: vec![Answer::unlabeled("one"), Answer::unlabeled("two")],
            correct: vec![1],
            explanation: String::new(),
        });
        let text = serialize(&QuizMeta::default(), &[question]);
        assert_eq!(text, "Q?\nA. one\nB. two\nB\n");
    }

    #[test]
    fn empty_explanation_is_omitted() {
        let question = Question::Single(ChoiceQuestion {
            topic: None,
            text: "Q?".into(),
            answers: answers(&[('A', "a")]),
            correct: vec![0],
            explanation: "   ".into(),
        });
        let text = serialize(&QuizMeta::default(), &[question]);
        assert!(!text.contains("Explanation:"));
    }

    #[test]
    fn match_question_emits_items_then_mapping_labels() {
        let text = serialize(&QuizMeta::default(), &sample_questions()[2..]);
        assert_eq!(
            text,
            "@History\nPair the event\nwith its century.\nA. XV\nB. XVIII\n\
             > French revolution\n> Fall of Constantinople\nBA\n\
             Explanation: Both reshaped Europe.\n"
        );
    }

    #[test]
    fn round_trip_reproduces_the_model() {
        let meta = sample_meta();
        let questions = sample_questions();
        let text = serialize(&meta, &questions);
        let parsed = parse(&text);
        assert_eq!(parsed.meta, meta);
        assert_eq!(parsed.questions, questions);
    }

    #[test]
    fn round_trip_regenerates_positional_labels() {
        let question = Question::Multiple(ChoiceQuestion {
            topic: None,
            text: "Q?".into(),
            answers: vec![
                Answer::unlabeled("one"),
                Answer::unlabeled("two"),
                Answer::unlabeled("three"),
            ],
            correct: vec![0, 2],
            explanation: String::new(),
        });
        let text = serialize(&QuizMeta::default(), &[question]);
        let parsed = parse(&text);
        match &parsed.questions[0] {
            Question::Multiple(q) => {
                assert_eq!(q.correct, vec![0, 2]);
                let labels: Vec<_> = q.answers.iter().map(|a| a.label).collect();
                assert_eq!(labels, vec![Some('A'), Some('B'), Some('C')]);
            }
            other => panic!("expected multiple question, got {:?}", other.kind()),
        }
    }
}
