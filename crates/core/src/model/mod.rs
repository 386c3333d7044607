mod answer;
mod ids;
pub mod question;
pub mod session;

pub use answer::{AnswerOutcome, AnswerRecord};
pub use ids::{ParseIdError, QuestionId, UtteranceId};
pub use question::{OPTION_COUNT, Question, QuestionError, sample_questions};
pub use session::{SessionSummary, SessionSummaryError};
