use interview_core::model::QuestionId;

use super::service::{InterviewSession, SessionPhase};

/// Below this many remaining seconds the timer display turns into a warning.
pub const LOW_TIME_WARNING_SECONDS: u32 = 10;

/// One answer option as presented, with its selection state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub index: usize,
    pub label: String,
    pub selected: bool,
}

/// The current question as presented (1-based numbering for display).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub id: QuestionId,
    pub number: usize,
    pub total: usize,
    pub text: String,
    pub options: Vec<OptionView>,
}

/// Avatar animation state, driven entirely by the speaking flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarState {
    Idle,
    Speaking,
}

/// Read-only projection of the session for a presentation layer.
///
/// This is intentionally **not** a UI view-model:
/// - no styling or layout assumptions
/// - no localization
///
/// The label helpers below exist for plain-text frontends; richer UIs should
/// format the raw fields themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub question: Option<QuestionView>,
    pub phase: SessionPhase,
    pub remaining_seconds: u32,
    pub low_time: bool,
    pub score: u32,
    pub total: u32,
    pub speaking: bool,
    pub avatar: AvatarState,
}

impl SessionSnapshot {
    #[must_use]
    pub fn of(session: &InterviewSession) -> Self {
        let question = session.current_question().map(|q| QuestionView {
            id: q.id(),
            number: session.current_index() + 1,
            total: session.total(),
            text: q.text().to_string(),
            options: q
                .options()
                .iter()
                .enumerate()
                .map(|(index, label)| OptionView {
                    index,
                    label: label.clone(),
                    selected: session.selected() == Some(index),
                })
                .collect(),
        });

        let remaining_seconds = session.remaining_seconds();
        Self {
            question,
            phase: session.phase(),
            remaining_seconds,
            low_time: remaining_seconds < LOW_TIME_WARNING_SECONDS,
            score: session.score(),
            total: session.total() as u32,
            speaking: session.speaking(),
            avatar: if session.speaking() {
                AvatarState::Speaking
            } else {
                AvatarState::Idle
            },
        }
    }

    /// "Score: 2/3"
    #[must_use]
    pub fn score_label(&self) -> String {
        format!("Score: {}/{}", self.score, self.total)
    }

    /// "Time Left: 28s"
    #[must_use]
    pub fn timer_label(&self) -> String {
        format!("Time Left: {}s", self.remaining_seconds)
    }
}
