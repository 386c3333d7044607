use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

/// Every question carries exactly this many answer options.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text must not be empty")]
    EmptyText,

    #[error("expected {OPTION_COUNT} options, got {len}")]
    WrongOptionCount { len: usize },

    #[error("option {index} must not be empty")]
    EmptyOption { index: usize },

    #[error("correct option index {index} is out of range")]
    CorrectOutOfRange { index: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    correct: usize,
}

impl Question {
    /// Create a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` if the prompt is blank,
    /// `QuestionError::WrongOptionCount` unless exactly [`OPTION_COUNT`]
    /// options are given, `QuestionError::EmptyOption` if any option is blank,
    /// and `QuestionError::CorrectOutOfRange` if `correct` does not index an
    /// option.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<String>,
        correct: usize,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.len() != OPTION_COUNT {
            return Err(QuestionError::WrongOptionCount { len: options.len() });
        }
        if let Some(index) = options.iter().position(|opt| opt.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { index });
        }
        if correct >= options.len() {
            return Err(QuestionError::CorrectOutOfRange { index: correct });
        }

        Ok(Self {
            id,
            text,
            options,
            correct,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    /// Whether the given option index is the correct answer.
    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct
    }
}

//
// ─── SAMPLE BANK ───────────────────────────────────────────────────────────────
//

/// The compiled-in question bank used by the demo app and smoke tests.
///
/// # Panics
///
/// Panics only if the hardcoded data is malformed, which is a programming
/// error caught by the unit tests below.
#[must_use]
pub fn sample_questions() -> Vec<Question> {
    let raw: [(u64, &str, [&str; OPTION_COUNT], usize); 3] = [
        (
            1,
            "What is React Native?",
            ["Library", "Framework", "Language", "IDE"],
            1,
        ),
        (
            2,
            "What does JSX stand for?",
            [
                "Java Syntax XML",
                "JavaScript XML",
                "JavaScript Extension",
                "None",
            ],
            1,
        ),
        (
            3,
            "Which company developed React Native?",
            ["Google", "Microsoft", "Facebook", "Apple"],
            2,
        ),
    ];

    raw.into_iter()
        .map(|(id, text, options, correct)| {
            Question::new(
                QuestionId::new(id),
                text,
                options.into_iter().map(str::to_string).collect(),
                correct,
            )
            .expect("sample question data should be valid")
        })
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
