use chrono::{DateTime, Utc};
use std::fmt;

use interview_core::model::{
    AnswerOutcome, AnswerRecord, Question, SessionSummary, UtteranceId,
};
use speech::SpeechEvent;

use crate::error::SessionError;
use super::progress::SessionProgress;

/// Countdown granted per question, in seconds.
pub const QUESTION_SECONDS: u32 = 30;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Where the state machine stands for the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No option locked yet; selection is open.
    AwaitingAnswer,
    /// An option is locked; only advancing (or timeout) moves on.
    AnswerLocked,
    /// Past the last question. Terminal.
    Completed,
}

/// Result of a `select_answer` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The option was recorded as this question's answer.
    Locked { correct: bool },
    /// An answer was already locked; the input was dropped, not queued.
    Ignored,
}

/// Result of advancing past the current question.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// Moved to the question at `index`.
    Next { index: usize },
    /// That was the last question; the session is over.
    Completed(SessionSummary),
}

/// Result of one countdown tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Still counting down.
    Counting { remaining: u32 },
    /// The countdown hit zero and the advance was forced.
    Expired(AdvanceOutcome),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state machine for one interview practice session.
///
/// Steps through a fixed ordered question list: first answer locks, a correct
/// lock scores one point, the countdown forces the advance at zero, and the
/// `speaking` flag mirrors the speech backend's lifecycle for the most recent
/// utterance only. All mutation goes through this type; callers observe it
/// read-only.
pub struct InterviewSession {
    questions: Vec<Question>,
    current: usize,
    selected: Option<usize>,
    remaining_seconds: u32,
    score: u32,
    speaking: bool,
    current_utterance: Option<UtteranceId>,
    utterance_seq: u64,
    records: Vec<AnswerRecord>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl InterviewSession {
    /// Create a session over the given question list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no questions are provided.
    pub fn new(
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        Ok(Self {
            questions,
            current: 0,
            selected: None,
            remaining_seconds: QUESTION_SECONDS,
            score: 0,
            speaking: false,
            current_utterance: None,
            utterance_seq: 0,
            records: Vec::new(),
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Total number of questions in this session.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Zero-based index of the question currently presented.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_complete() {
            None
        } else {
            self.questions.get(self.current)
        }
    }

    /// The locked option for the current question, if any.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn speaking(&self) -> bool {
        self.speaking
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.is_complete() {
            SessionPhase::Completed
        } else if self.selected.is_some() {
            SessionPhase::AnswerLocked
        } else {
            SessionPhase::AwaitingAnswer
        }
    }

    /// Records of every finished question so far, in order.
    #[must_use]
    pub fn records(&self) -> &[AnswerRecord] {
        &self.records
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress::from_records(self.questions.len(), &self.records, self.is_complete())
    }

    //
    // ─── INTENTS ───────────────────────────────────────────────────────────────
    //

    /// Lock an answer for the current question.
    ///
    /// The first selection locks; anything after that is dropped with
    /// `SelectOutcome::Ignored`. A correct lock scores exactly one point.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after the session ended and
    /// `SessionError::OptionOutOfRange` if `index` does not name an option.
    pub fn select_answer(&mut self, index: usize) -> Result<SelectOutcome, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        let question = &self.questions[self.current];
        if index >= question.options().len() {
            return Err(SessionError::OptionOutOfRange {
                index,
                len: question.options().len(),
            });
        }
        if self.selected.is_some() {
            return Ok(SelectOutcome::Ignored);
        }

        self.selected = Some(index);
        let correct = question.is_correct(index);
        if correct {
            self.score += 1;
        }
        debug_assert!(self.score as usize <= self.current + 1);

        Ok(SelectOutcome::Locked { correct })
    }

    /// Move past the current question after an answer has been locked.
    ///
    /// The timeout path goes through [`tick`](Self::tick) instead and does not
    /// require a lock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after the session ended and
    /// `SessionError::NotAnswered` if nothing is locked yet.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<AdvanceOutcome, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        if self.selected.is_none() {
            return Err(SessionError::NotAnswered);
        }
        self.finish_question(now)
    }

    /// Count one elapsed second; at zero the advance is forced whether or not
    /// an answer is locked (an unanswered question records `TimedOut`).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after the session ended.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<TickOutcome, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return Ok(TickOutcome::Counting {
                remaining: self.remaining_seconds,
            });
        }

        self.finish_question(now).map(TickOutcome::Expired)
    }

    fn finish_question(&mut self, now: DateTime<Utc>) -> Result<AdvanceOutcome, SessionError> {
        let question = &self.questions[self.current];
        let outcome = match self.selected {
            Some(index) if question.is_correct(index) => AnswerOutcome::Correct,
            Some(_) => AnswerOutcome::Incorrect,
            None => AnswerOutcome::TimedOut,
        };
        self.records.push(AnswerRecord::new(
            question.id(),
            self.selected,
            outcome,
            now,
        ));

        // Any in-progress utterance belongs to the finished question; its
        // remaining callbacks are stale from here on.
        self.current_utterance = None;
        self.speaking = false;

        if self.current + 1 >= self.questions.len() {
            self.completed_at = Some(now);
            let summary = SessionSummary::from_records(self.started_at, now, &self.records)?;
            return Ok(AdvanceOutcome::Completed(summary));
        }

        self.current += 1;
        self.selected = None;
        self.remaining_seconds = QUESTION_SECONDS;
        Ok(AdvanceOutcome::Next {
            index: self.current,
        })
    }

    //
    // ─── SPEECH LIFECYCLE ──────────────────────────────────────────────────────
    //

    /// Stamp a fresh utterance and optimistically raise `speaking`.
    ///
    /// The stamp supersedes any outstanding utterance: its callbacks no longer
    /// affect this session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after the session ended.
    pub fn begin_utterance(&mut self) -> Result<UtteranceId, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        self.utterance_seq += 1;
        let id = UtteranceId::new(self.utterance_seq);
        self.current_utterance = Some(id);
        self.speaking = true;
        Ok(id)
    }

    /// Apply a speech lifecycle event.
    ///
    /// Only events stamped with the most recent utterance are applied; stale
    /// callbacks from superseded utterances return `false` and change
    /// nothing. Terminal events (`Done`, `Stopped`, `Error`) clear `speaking`.
    pub fn on_speech_event(&mut self, event: &SpeechEvent) -> bool {
        if self.current_utterance != Some(event.utterance()) {
            return false;
        }
        if event.is_terminal() {
            self.speaking = false;
            self.current_utterance = None;
        } else {
            self.speaking = true;
        }
        true
    }
}

impl fmt::Debug for InterviewSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterviewSession")
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("selected", &self.selected)
            .field("remaining_seconds", &self.remaining_seconds)
            .field("score", &self.score)
            .field("speaking", &self.speaking)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use interview_core::fixed_now;
    use interview_core::model::sample_questions;

    fn session() -> InterviewSession {
        InterviewSession::new(sample_questions(), fixed_now()).unwrap()
    }

    #[test]
    fn empty_question_list_is_rejected() {
        let err = InterviewSession::new(Vec::new(), fixed_now()).unwrap_err();
        assert!(matches!(err, SessionError::Empty));
    }

    #[test]
    fn first_selection_locks_and_scores() {
        let mut session = session();
        let outcome = session.select_answer(1).unwrap();
        assert_eq!(outcome, SelectOutcome::Locked { correct: true });
        assert_eq!(session.score(), 1);
        assert_eq!(session.phase(), SessionPhase::AnswerLocked);
    }

    #[test]
    fn reselect_after_lock_keeps_first_answer_and_score() {
        let mut session = session();
        session.select_answer(1).unwrap();
        let second = session.select_answer(3).unwrap();
        assert_eq!(second, SelectOutcome::Ignored);
        assert_eq!(session.selected(), Some(1));
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn wrong_answer_locks_without_scoring() {
        let mut session = session();
        let outcome = session.select_answer(0).unwrap();
        assert_eq!(outcome, SelectOutcome::Locked { correct: false });
        assert_eq!(session.score(), 0);
        assert_eq!(session.phase(), SessionPhase::AnswerLocked);
    }

    #[test]
    fn out_of_range_option_is_an_error() {
        let mut session = session();
        let err = session.select_answer(4).unwrap_err();
        assert!(matches!(
            err,
            SessionError::OptionOutOfRange { index: 4, len: 4 }
        ));
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn manual_advance_requires_a_lock() {
        let mut session = session();
        let err = session.advance(fixed_now()).unwrap_err();
        assert!(matches!(err, SessionError::NotAnswered));
    }

    #[test]
    fn advance_resets_selection_and_countdown() {
        let mut session = session();
        for _ in 0..5 {
            session.tick(fixed_now()).unwrap();
        }
        session.select_answer(1).unwrap();
        let outcome = session.advance(fixed_now()).unwrap();

        assert_eq!(outcome, AdvanceOutcome::Next { index: 1 });
        assert_eq!(session.selected(), None);
        assert_eq!(session.remaining_seconds(), QUESTION_SECONDS);
        assert_eq!(session.phase(), SessionPhase::AwaitingAnswer);
    }

    #[test]
    fn countdown_counts_strictly_down() {
        let mut session = session();
        let outcome = session.tick(fixed_now()).unwrap();
        assert_eq!(
            outcome,
            TickOutcome::Counting {
                remaining: QUESTION_SECONDS - 1
            }
        );
    }

    #[test]
    fn timeout_forces_advance_without_scoring() {
        let mut session = session();
        let mut last = None;
        for _ in 0..QUESTION_SECONDS {
            last = Some(session.tick(fixed_now()).unwrap());
        }

        assert_eq!(
            last,
            Some(TickOutcome::Expired(AdvanceOutcome::Next { index: 1 }))
        );
        assert_eq!(session.score(), 0);
        assert_eq!(session.records().len(), 1);
        assert_eq!(session.records()[0].outcome, AnswerOutcome::TimedOut);
        assert_eq!(session.records()[0].selected, None);
    }

    #[test]
    fn timeout_with_locked_answer_keeps_its_outcome() {
        let mut session = session();
        session.select_answer(1).unwrap();
        let mut last = None;
        for _ in 0..QUESTION_SECONDS {
            last = Some(session.tick(fixed_now()).unwrap());
        }

        assert!(matches!(
            last,
            Some(TickOutcome::Expired(AdvanceOutcome::Next { index: 1 }))
        ));
        assert_eq!(session.score(), 1);
        assert_eq!(session.records()[0].outcome, AnswerOutcome::Correct);
    }

    #[test]
    fn score_never_exceeds_questions_seen() {
        let mut session = session();
        loop {
            session.select_answer(1).ok();
            assert!(session.score() as usize <= session.current_index() + 1);
            match session.advance(fixed_now()).unwrap() {
                AdvanceOutcome::Next { .. } => {}
                AdvanceOutcome::Completed(_) => break,
            }
        }
    }

    #[test]
    fn all_correct_answers_complete_with_full_score() {
        let mut session = session();
        for answer in [1, 1, 2] {
            session.select_answer(answer).unwrap();
            let outcome = session.advance(fixed_now()).unwrap();
            if let AdvanceOutcome::Completed(summary) = outcome {
                assert_eq!(summary.score(), 3);
                assert_eq!(summary.total(), 3);
            }
        }
        assert!(session.is_complete());
        assert_eq!(session.phase(), SessionPhase::Completed);
        assert!(session.current_question().is_none());
    }

    #[test]
    fn two_correct_then_timeout_yields_two_of_three() {
        let mut session = session();
        session.select_answer(1).unwrap();
        session.advance(fixed_now()).unwrap();
        session.select_answer(1).unwrap();
        session.advance(fixed_now()).unwrap();

        let mut last = None;
        for _ in 0..QUESTION_SECONDS {
            last = Some(session.tick(fixed_now()).unwrap());
        }

        let Some(TickOutcome::Expired(AdvanceOutcome::Completed(summary))) = last else {
            panic!("session should have completed on timeout");
        };
        assert_eq!(summary.score(), 2);
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.timed_out(), 1);
    }

    #[test]
    fn intents_after_completion_are_rejected() {
        let mut session = session();
        for answer in [1, 1, 2] {
            session.select_answer(answer).unwrap();
            session.advance(fixed_now()).unwrap();
        }

        assert!(matches!(
            session.select_answer(0).unwrap_err(),
            SessionError::Completed
        ));
        assert!(matches!(
            session.advance(fixed_now()).unwrap_err(),
            SessionError::Completed
        ));
        assert!(matches!(
            session.tick(fixed_now()).unwrap_err(),
            SessionError::Completed
        ));
        assert!(matches!(
            session.begin_utterance().unwrap_err(),
            SessionError::Completed
        ));
    }

    #[test]
    fn stale_callback_from_superseded_utterance_is_ignored() {
        let mut session = session();
        let first = session.begin_utterance().unwrap();
        let second = session.begin_utterance().unwrap();
        assert!(first < second);

        assert!(!session.on_speech_event(&SpeechEvent::Done(first)));
        assert!(session.speaking());

        assert!(session.on_speech_event(&SpeechEvent::Done(second)));
        assert!(!session.speaking());
    }

    #[test]
    fn speech_error_clears_speaking_without_ending_session() {
        let mut session = session();
        let id = session.begin_utterance().unwrap();
        assert!(session.on_speech_event(&SpeechEvent::Error {
            utterance: id,
            message: "synthesis failed".into(),
        }));
        assert!(!session.speaking());
        assert!(!session.is_complete());
        assert!(session.select_answer(1).is_ok());
    }

    #[test]
    fn advance_invalidates_outstanding_utterance() {
        let mut session = session();
        let id = session.begin_utterance().unwrap();
        session.select_answer(1).unwrap();
        session.advance(fixed_now()).unwrap();

        assert!(!session.speaking());
        // The stop echo for the old utterance arrives late and must not
        // disturb the next question's state.
        assert!(!session.on_speech_event(&SpeechEvent::Stopped(id)));
        assert!(!session.speaking());
    }

    #[test]
    fn progress_tracks_finished_questions() {
        let mut session = session();
        session.select_answer(1).unwrap();
        session.advance(fixed_now()).unwrap();
        for _ in 0..QUESTION_SECONDS {
            session.tick(fixed_now()).unwrap();
        }

        let progress = session.progress();
        assert_eq!(progress.questions_total, 3);
        assert_eq!(progress.questions_finished, 2);
        assert_eq!(progress.questions_left, 1);
        assert_eq!(progress.correct_so_far, 1);
        assert_eq!(progress.timed_out_so_far, 1);
        assert!(!progress.is_complete);
    }
}
