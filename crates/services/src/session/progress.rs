use interview_core::model::{AnswerOutcome, AnswerRecord};

/// How far through the question list a session has moved.
///
/// Derived from the finished-question records, so the running counts match
/// what the final summary will report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub questions_total: usize,
    pub questions_finished: usize,
    pub questions_left: usize,
    pub correct_so_far: usize,
    pub timed_out_so_far: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    pub(crate) fn from_records(
        total: usize,
        records: &[AnswerRecord],
        is_complete: bool,
    ) -> Self {
        let finished = records.len();
        let correct = records
            .iter()
            .filter(|record| record.outcome == AnswerOutcome::Correct)
            .count();
        let timed_out = records
            .iter()
            .filter(|record| record.outcome == AnswerOutcome::TimedOut)
            .count();

        Self {
            questions_total: total,
            questions_finished: finished,
            questions_left: total.saturating_sub(finished),
            correct_so_far: correct,
            timed_out_so_far: timed_out,
            is_complete,
        }
    }
}
