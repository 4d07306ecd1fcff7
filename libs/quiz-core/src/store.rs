//! Saved-quiz persistence.
//!
//! Named quizzes are stored as one JSON file per quiz in a directory. The
//! raw quiz text is kept verbatim and re-parsed on load, so the text file
//! format stays the single source of truth.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{QuizError, Result};
use crate::parser;
use crate::types::{QuizConfig, SavedQuiz};

/// Directory-backed store of named quizzes.
pub struct QuizStore {
    dir: PathBuf,
}

impl QuizStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Save a quiz under `name`, keeping the raw text and the run settings.
    pub fn save(&self, name: &str, text: &str, config: &QuizConfig) -> Result<SavedQuiz> {
        let parsed = parser::parse(text);
        let entry = SavedQuiz {
            id: Uuid::new_v4(),
            name: name.to_string(),
            text: text.to_string(),
            question_count: parsed.questions.len(),
            num_questions: Some(config.num_questions),
            minutes: Some(config.minutes),
            saved_at: Utc::now(),
        };

        let json = serde_json::to_string_pretty(&entry)?;
        fs::write(self.path_for(entry.id), json)?;
        tracing::info!(
            "Saved quiz '{}' ({} questions) as {}",
            entry.name,
            entry.question_count,
            entry.id
        );
        Ok(entry)
    }

    /// Load a saved quiz by id.
    pub fn load(&self, id: Uuid) -> Result<SavedQuiz> {
        let path = self.path_for(id);
        let json = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                QuizError::QuizNotFound(id)
            } else {
                QuizError::from(e)
            }
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    /// All saved quizzes, newest first. Unreadable entries are skipped.
    pub fn list(&self) -> Result<Vec<SavedQuiz>> {
        let mut entries = Vec::new();
        for dir_entry in fs::read_dir(&self.dir)? {
            let path = dir_entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match read_entry(&path) {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    tracing::warn!("Skipping unreadable saved quiz {}: {}", path.display(), err);
                }
            }
        }
        entries.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(entries)
    }

    /// Delete a saved quiz by id.
    pub fn delete(&self, id: Uuid) -> Result<()> {
        fs::remove_file(self.path_for(id)).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                QuizError::QuizNotFound(id)
            } else {
                QuizError::from(e)
            }
        })?;
        tracing::info!("Deleted saved quiz {}", id);
        Ok(())
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

fn read_entry(path: &std::path::Path) -> Result<SavedQuiz> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TEXT: &str = "Q one?\nA. a\nB. b\nA\n\nQ two?\nA. a\nB. b\nB\n";

    fn store() -> (tempfile::TempDir, QuizStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = QuizStore::new(dir.path().join("quizzes")).unwrap();
        (dir, store)
    }

    #[test]
    fn save_records_question_count_and_settings() {
        let (_dir, store) = store();
        let config = QuizConfig {
            num_questions: 2,
            minutes: 15,
        };
        let entry = store.save("weekly", TEXT, &config).unwrap();
        assert_eq!(entry.question_count, 2);
        assert_eq!(entry.num_questions, Some(2));
        assert_eq!(entry.minutes, Some(15));
    }

    #[test]
    fn saved_quiz_loads_back_verbatim() {
        let (_dir, store) = store();
        let entry = store.save("weekly", TEXT, &QuizConfig::default()).unwrap();
        let loaded = store.load(entry.id).unwrap();
        assert_eq!(loaded, entry);
        assert_eq!(parser::parse(&loaded.text).questions.len(), 2);
    }

    #[test]
    fn load_unknown_id_is_not_found() {
        let (_dir, store) = store();
        let missing = Uuid::new_v4();
        assert!(matches!(
            store.load(missing),
            Err(QuizError::QuizNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn list_returns_newest_first_and_skips_garbage() {
        let (_dir, store) = store();
        let first = store.save("first", TEXT, &QuizConfig::default()).unwrap();
        let second = store.save("second", TEXT, &QuizConfig::default()).unwrap();
        fs::write(store.path_for(Uuid::new_v4()), "not json").unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 2);
        let mut ids: Vec<Uuid> = listed.iter().map(|e| e.id).collect();
        ids.sort();
        let mut expected = vec![first.id, second.id];
        expected.sort();
        assert_eq!(ids, expected);
        assert!(listed[0].saved_at >= listed[1].saved_at);
    }

    #[test]
    fn delete_removes_the_entry() {
        let (_dir, store) = store();
        let entry = store.save("gone", TEXT, &QuizConfig::default()).unwrap();
        store.delete(entry.id).unwrap();
        assert!(matches!(
            store.delete(entry.id),
            Err(QuizError::QuizNotFound(_))
        ));
        assert!(store.list().unwrap().is_empty());
    }
}
