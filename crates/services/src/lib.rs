#![forbid(unsafe_code)]

pub mod error;
pub mod session;

pub use interview_core::Clock;

pub use error::SessionError;
pub use session::{
    AdvanceOutcome, AvatarState, InterviewSession, LOW_TIME_WARNING_SECONDS, OptionView,
    QUESTION_SECONDS, QuestionView, SelectOutcome, SessionCommand, SessionHandle, SessionPhase,
    SessionProgress, SessionRunner, SessionSnapshot, SessionUpdate, TickOutcome,
};
