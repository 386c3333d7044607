mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::{
    AdvanceOutcome, InterviewSession, QUESTION_SECONDS, SelectOutcome, SessionPhase, TickOutcome,
};
pub use view::{AvatarState, LOW_TIME_WARNING_SECONDS, OptionView, QuestionView, SessionSnapshot};
pub use workflow::{SessionCommand, SessionHandle, SessionRunner, SessionUpdate};
