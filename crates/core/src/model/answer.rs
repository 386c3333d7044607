use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;

/// How a single question ended.
///
/// `TimedOut` scores the same as `Incorrect` (no point); it is kept distinct
/// so the final summary can report unanswered questions separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerOutcome {
    /// The locked option matched the correct index.
    Correct,
    /// The locked option did not match the correct index.
    Incorrect,
    /// The countdown expired with no option locked.
    TimedOut,
}

impl AnswerOutcome {
    /// Whether this outcome contributes a point to the score.
    #[must_use]
    pub fn scores(self) -> bool {
        matches!(self, AnswerOutcome::Correct)
    }
}

/// Record of one finished question within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    /// The locked option, if any. `None` only for `TimedOut`.
    pub selected: Option<usize>,
    pub outcome: AnswerOutcome,
    pub answered_at: DateTime<Utc>,
}

impl AnswerRecord {
    #[must_use]
    pub fn new(
        question_id: QuestionId,
        selected: Option<usize>,
        outcome: AnswerOutcome,
        answered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            question_id,
            selected,
            outcome,
            answered_at,
        }
    }
}
