//! The speech service seam consumed by the session controller.
//!
//! The controller submits stamped requests and never looks past the lifecycle
//! events: an utterance starts, then ends exactly once with `Done`, `Stopped`
//! or `Error`. Engine internals stay behind the trait.

use thiserror::Error;

use interview_core::model::UtteranceId;

/// Default synthesis language.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Default speech rate (0.5 reads question prompts at a deliberate pace).
pub const DEFAULT_RATE: f32 = 0.5;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SpeechError {
    #[error("speech event channel is closed")]
    Closed,

    #[error("synthesis failed: {0}")]
    Synthesis(String),
}

/// Voice parameters for one utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakOptions {
    pub language: String,
    pub rate: f32,
}

impl Default for SpeakOptions {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            rate: DEFAULT_RATE,
        }
    }
}

impl SpeakOptions {
    /// Set the synthesis language tag.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the speech rate. Clamped to a small positive floor so a zero rate
    /// cannot stall duration estimates.
    #[must_use]
    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate.max(0.1);
        self
    }
}

/// One stamped text-to-speech request.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakRequest {
    pub utterance: UtteranceId,
    pub text: String,
    pub options: SpeakOptions,
}

impl SpeakRequest {
    #[must_use]
    pub fn new(utterance: UtteranceId, text: impl Into<String>, options: SpeakOptions) -> Self {
        Self {
            utterance,
            text: text.into(),
            options,
        }
    }
}

/// Lifecycle notification for a submitted utterance.
///
/// Events arrive asynchronously and may interleave with newer submissions;
/// consumers must compare the carried stamp against their most recent one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// Synthesis started playing.
    Started(UtteranceId),
    /// Playback ran to the end of the text.
    Done(UtteranceId),
    /// Playback was cut short by an explicit stop.
    Stopped(UtteranceId),
    /// Synthesis or playback failed. Non-fatal for the session.
    Error {
        utterance: UtteranceId,
        message: String,
    },
}

impl SpeechEvent {
    /// The utterance this event belongs to.
    #[must_use]
    pub fn utterance(&self) -> UtteranceId {
        match self {
            SpeechEvent::Started(id) | SpeechEvent::Done(id) | SpeechEvent::Stopped(id) => *id,
            SpeechEvent::Error { utterance, .. } => *utterance,
        }
    }

    /// Whether this event ends the utterance's lifecycle.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SpeechEvent::Started(_))
    }
}

/// Contract for a speech synthesis backend.
///
/// `speak` is fire-and-forget: the result of playback is reported later via
/// [`SpeechEvent`]s on the channel the backend was built with. `stop` cuts any
/// in-progress utterance; the backend acknowledges with `Stopped`.
pub trait SpeechService: Send + Sync {
    /// Submit an utterance for synthesis.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if the request cannot be accepted. Playback
    /// failures after acceptance arrive as `SpeechEvent::Error` instead.
    fn speak(&self, request: SpeakRequest) -> Result<(), SpeechError>;

    /// Stop any in-progress utterance. No-op when idle.
    fn stop(&self);
}
