use include_dir::{include_dir, Dir};
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::LoadError;

static BANK_DIR: Dir = include_dir!("src/banks");

/// Name of the bank compiled into the binary.
pub const BUNDLED_BANK: &str = "general.json";

/// Smallest bank we agree to play with.
pub const MIN_QUESTIONS: usize = 5;

/// Number of options every question offers.
pub const ANSWER_COUNT: usize = 4;

pub const DEFAULT_CATEGORY: &str = "General";

/// A single multiple-choice question. Immutable once it is in a bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub answers: [String; ANSWER_COUNT],
    pub correct_index: usize,
    pub category: String,
    pub difficulty: u32,
    /// Illustration reference, passed through to the shell untouched.
    pub image: Option<String>,
}

impl Question {
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }

    pub fn correct_answer(&self) -> &str {
        &self.answers[self.correct_index]
    }
}

/// On-disk shape of one question record.
#[derive(Deserialize, Debug)]
struct QuestionRecord {
    question: String,
    answers: Vec<String>,
    correct: i64,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    difficulty: Option<u32>,
    #[serde(default)]
    image: Option<String>,
}

fn check_fields(
    index: usize,
    text: &str,
    answers: &[String],
    correct: i64,
    difficulty: u32,
) -> Result<(), LoadError> {
    if text.trim().is_empty() {
        return Err(LoadError::EmptyQuestion { index });
    }
    if answers.len() != ANSWER_COUNT {
        return Err(LoadError::WrongAnswerCount {
            index,
            found: answers.len(),
        });
    }
    if !answers.iter().all_unique() {
        return Err(LoadError::DuplicateAnswer { index });
    }
    if !(0..ANSWER_COUNT as i64).contains(&correct) {
        return Err(LoadError::CorrectOutOfRange { index, correct });
    }
    if difficulty < 1 {
        return Err(LoadError::InvalidDifficulty { index });
    }
    Ok(())
}

impl QuestionRecord {
    fn into_question(self, index: usize) -> Result<Question, LoadError> {
        let difficulty = self.difficulty.unwrap_or(1);
        check_fields(
            index,
            &self.question,
            &self.answers,
            self.correct,
            difficulty,
        )?;

        let answers: [String; ANSWER_COUNT] =
            self.answers
                .try_into()
                .map_err(|found: Vec<String>| LoadError::WrongAnswerCount {
                    index,
                    found: found.len(),
                })?;

        Ok(Question {
            text: self.question,
            answers,
            correct_index: self.correct as usize,
            category: self
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            difficulty,
            image: self.image,
        })
    }
}

/// The validated question set plus the indices already drawn this session.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
    used: HashSet<usize>,
}

impl QuestionBank {
    /// Validate and take ownership of a question list. All or nothing.
    pub fn load(questions: Vec<Question>) -> Result<Self, LoadError> {
        for (index, q) in questions.iter().enumerate() {
            check_fields(
                index,
                &q.text,
                &q.answers,
                i64::try_from(q.correct_index).unwrap_or(i64::MAX),
                q.difficulty,
            )?;
        }

        if questions.len() < MIN_QUESTIONS {
            return Err(LoadError::InsufficientQuestions {
                found: questions.len(),
                required: MIN_QUESTIONS,
            });
        }

        Ok(Self {
            questions,
            used: HashSet::new(),
        })
    }

    pub fn from_value(value: Value) -> Result<Self, LoadError> {
        let Value::Array(records) = value else {
            return Err(LoadError::NotASequence);
        };

        let questions = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                if !record.is_object() {
                    return Err(LoadError::RecordNotAnObject { index });
                }
                serde_json::from_value::<QuestionRecord>(record)
                    .map_err(|e| LoadError::InvalidRecord {
                        index,
                        reason: e.to_string(),
                    })?
                    .into_question(index)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::load(questions)
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let bank = Self::from_json_str(&contents)?;
        tracing::info!(path = %path.display(), questions = bank.len(), "loaded question bank");
        Ok(bank)
    }

    /// The general-knowledge bank shipped inside the binary.
    pub fn bundled() -> Result<Self, LoadError> {
        let contents = BANK_DIR
            .get_file(BUNDLED_BANK)
            .and_then(|f| f.contents_utf8())
            .ok_or_else(|| LoadError::Io {
                path: BUNDLED_BANK.into(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })?;
        Self::from_json_str(contents)
    }

    /// A fresh bank holding only the questions of one category.
    pub fn with_category(&self, category: &str) -> Result<Self, LoadError> {
        let questions = self
            .questions
            .iter()
            .filter(|q| q.category.eq_ignore_ascii_case(category))
            .cloned()
            .collect();
        Self::load(questions)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn categories(&self) -> Vec<&str> {
        self.questions
            .iter()
            .map(|q| q.category.as_str())
            .unique()
            .sorted()
            .collect()
    }

    pub fn used(&self) -> &HashSet<usize> {
        &self.used
    }

    pub fn remaining(&self) -> usize {
        self.questions.len() - self.used.len()
    }

    /// Pick uniformly among indices not in `excluding`. `None` once every index is excluded.
    pub fn draw_random_excluding<R: Rng + ?Sized>(
        &self,
        excluding: &HashSet<usize>,
        rng: &mut R,
    ) -> Option<(usize, &Question)> {
        let candidates = (0..self.questions.len())
            .filter(|i| !excluding.contains(i))
            .collect::<Vec<_>>();
        let index = *candidates.choose(rng)?;
        Some((index, &self.questions[index]))
    }

    /// Draw against this session's history and record the result in it.
    pub fn draw_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<(usize, &Question)> {
        let (index, _) = self.draw_random_excluding(&self.used, rng)?;
        self.used.insert(index);
        Some((index, &self.questions[index]))
    }

    /// Forget the draw history for a new session. The questions stay loaded.
    pub fn reset(&mut self) {
        self.used.clear();
    }
}
