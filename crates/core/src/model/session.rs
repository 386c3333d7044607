use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{AnswerOutcome, AnswerRecord};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("too many records for a single session: {len}")]
    TooManyRecords { len: usize },

    #[error("total answers ({total}) does not match outcome counts ({sum})")]
    CountMismatch { total: u32, sum: u32 },
}

/// Final report for a completed interview session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    total: u32,
    correct: u32,
    incorrect: u32,
    timed_out: u32,
}

impl SessionSummary {
    /// Build a summary from pre-counted outcomes.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError::InvalidTimeRange` if `completed_at` is
    /// before `started_at`, and `SessionSummaryError::CountMismatch` if the
    /// outcome counts do not add up to `total`.
    pub fn from_parts(
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        total: u32,
        correct: u32,
        incorrect: u32,
        timed_out: u32,
    ) -> Result<Self, SessionSummaryError> {
        if completed_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }
        let sum = correct + incorrect + timed_out;
        if sum != total {
            return Err(SessionSummaryError::CountMismatch { total, sum });
        }

        Ok(Self {
            started_at,
            completed_at,
            total,
            correct,
            incorrect,
            timed_out,
        })
    }

    /// Build a summary from the session's answer records.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError::InvalidTimeRange` if `completed_at` is
    /// before `started_at`. Returns `SessionSummaryError::TooManyRecords` if
    /// the record count cannot fit in `u32`.
    pub fn from_records(
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        records: &[AnswerRecord],
    ) -> Result<Self, SessionSummaryError> {
        if completed_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }
        let mut correct = 0_u32;
        let mut incorrect = 0_u32;
        let mut timed_out = 0_u32;

        for record in records {
            match record.outcome {
                AnswerOutcome::Correct => correct = correct.saturating_add(1),
                AnswerOutcome::Incorrect => incorrect = incorrect.saturating_add(1),
                AnswerOutcome::TimedOut => timed_out = timed_out.saturating_add(1),
            }
        }

        let total = u32::try_from(records.len())
            .map_err(|_| SessionSummaryError::TooManyRecords { len: records.len() })?;

        Self::from_parts(started_at, completed_at, total, correct, incorrect, timed_out)
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Number of questions in the session.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Points earned, one per correct answer.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn timed_out(&self) -> u32 {
        self.timed_out
    }
}
