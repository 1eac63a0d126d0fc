use serde::{Deserialize, Serialize};

use crate::error::ContentError;

pub const OPTION_COUNT: usize = 4;

/// A validated multiple-choice question. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub title: String,
    pub prompt: String,
    pub options: [String; OPTION_COUNT],
    pub correct: usize,
}

impl Question {
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct]
    }
}

/// Question as a person writes it, in a TOML pack or a share link.
///
/// Serializes with the short keys share links use (`t`, `q`, `o`, `c`) and
/// accepts the long names too.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawQuestion {
    #[serde(rename = "t", alias = "title")]
    pub title: String,
    #[serde(rename = "q", alias = "question", alias = "prompt")]
    pub question: String,
    #[serde(rename = "o", alias = "options")]
    pub options: Vec<String>,
    #[serde(rename = "c", alias = "correct")]
    pub correct: i64,
}

impl RawQuestion {
    pub fn validate(self, index: usize) -> Result<Question, ContentError> {
        if self.title.trim().is_empty() {
            return Err(ContentError::EmptyField { index, field: "title" });
        }
        if self.question.trim().is_empty() {
            return Err(ContentError::EmptyField { index, field: "question" });
        }
        if self.options.iter().any(|o| o.trim().is_empty()) {
            return Err(ContentError::EmptyField { index, field: "option" });
        }

        let found = self.options.len();
        let options: [String; OPTION_COUNT] = self
            .options
            .try_into()
            .map_err(|_| ContentError::OptionCount { index, found })?;

        let correct = usize::try_from(self.correct)
            .ok()
            .filter(|c| *c < OPTION_COUNT)
            .ok_or(ContentError::CorrectIndex {
                index,
                correct: self.correct,
            })?;

        Ok(Question {
            title: self.title,
            prompt: self.question,
            options,
            correct,
        })
    }
}

impl From<&Question> for RawQuestion {
    fn from(q: &Question) -> Self {
        RawQuestion {
            title: q.title.clone(),
            question: q.prompt.clone(),
            options: q.options.to_vec(),
            correct: q.correct as i64,
        }
    }
}

/// On-disk question pack: a TOML file of `[[question]]` tables.
#[derive(Debug, Deserialize, Default)]
pub struct QuestionPack {
    #[serde(rename = "question", default)]
    pub questions: Vec<RawQuestion>,
}

/// Validates every entry; the first bad one fails the whole pool.
pub fn validate_pool(raw: Vec<RawQuestion>) -> Result<Vec<Question>, ContentError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, q)| q.validate(index))
        .collect()
}
