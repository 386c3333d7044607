//! Recording speech double for tests.
//!
//! `ScriptedSpeech` accepts every request and never emits lifecycle events on
//! its own; tests drive the lifecycle by sending [`SpeechEvent`]s over their
//! own channel, which is exactly what lets them script out-of-order and stale
//! callbacks.
//!
//! [`SpeechEvent`]: crate::service::SpeechEvent

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use interview_core::model::UtteranceId;

use crate::service::{SpeakRequest, SpeechError, SpeechService};

#[derive(Default)]
pub struct ScriptedSpeech {
    requests: Mutex<Vec<SpeakRequest>>,
    stops: AtomicUsize,
}

impl ScriptedSpeech {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request submitted so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<SpeakRequest> {
        self.requests.lock().clone()
    }

    /// Stamp of the most recent request, if any.
    #[must_use]
    pub fn last_utterance(&self) -> Option<UtteranceId> {
        self.requests.lock().last().map(|request| request.utterance)
    }

    /// How many times `stop` was called.
    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl SpeechService for ScriptedSpeech {
    fn speak(&self, request: SpeakRequest) -> Result<(), SpeechError> {
        self.requests.lock().push(request);
        Ok(())
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}
