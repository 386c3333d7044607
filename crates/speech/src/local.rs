//! Timing-simulated speech backend for the demo binary.
//!
//! There is no audio device here: `LocalSpeech` estimates how long an
//! utterance would take to read aloud and plays the lifecycle over that
//! window. That is enough to exercise the session controller's speaking state
//! and stale-callback handling end to end.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use interview_core::model::UtteranceId;

use crate::service::{SpeakRequest, SpeechError, SpeechEvent, SpeechService};

/// Reading pace at rate 1.0, in words per second.
const BASE_WORDS_PER_SECOND: f32 = 3.0;

/// Shortest simulated playback, so tiny prompts still have a visible window.
const MIN_PLAYBACK: Duration = Duration::from_millis(200);

struct Playback {
    utterance: UtteranceId,
    handle: JoinHandle<()>,
}

/// Speech backend that simulates playback timing on the tokio runtime.
pub struct LocalSpeech {
    events: mpsc::UnboundedSender<SpeechEvent>,
    current: Mutex<Option<Playback>>,
}

impl LocalSpeech {
    /// Create the backend and the event channel its lifecycle flows over.
    #[must_use]
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<SpeechEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                events,
                current: Mutex::new(None),
            }),
            rx,
        )
    }

    fn cut_current(&self) {
        let mut current = self.current.lock();
        if let Some(playback) = current.take() {
            playback.handle.abort();
            debug!(utterance = %playback.utterance, "stopping utterance");
            let _ = self.events.send(SpeechEvent::Stopped(playback.utterance));
        }
    }
}

impl SpeechService for LocalSpeech {
    fn speak(&self, request: SpeakRequest) -> Result<(), SpeechError> {
        if self.events.is_closed() {
            return Err(SpeechError::Closed);
        }
        self.cut_current();

        let duration = estimated_playback(&request.text, request.options.rate);
        debug!(
            utterance = %request.utterance,
            ms = duration.as_millis() as u64,
            "starting utterance"
        );

        let tx = self.events.clone();
        let id = request.utterance;
        let handle = tokio::spawn(async move {
            let _ = tx.send(SpeechEvent::Started(id));
            tokio::time::sleep(duration).await;
            let _ = tx.send(SpeechEvent::Done(id));
        });

        *self.current.lock() = Some(Playback {
            utterance: id,
            handle,
        });
        Ok(())
    }

    fn stop(&self) {
        self.cut_current();
    }
}

/// Estimate how long reading `text` aloud takes at the given rate.
fn estimated_playback(text: &str, rate: f32) -> Duration {
    let words = text.split_whitespace().count() as f32;
    let seconds = words / (BASE_WORDS_PER_SECOND * rate.max(0.1));
    Duration::from_secs_f32(seconds).max(MIN_PLAYBACK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::SpeakOptions;

    #[test]
    fn slower_rate_means_longer_playback() {
        let slow = estimated_playback("one two three four", 0.5);
        let fast = estimated_playback("one two three four", 1.0);
        assert!(slow > fast);
    }

    #[test]
    fn empty_text_still_has_a_window() {
        assert_eq!(estimated_playback("", 0.5), MIN_PLAYBACK);
    }

    #[tokio::test(start_paused = true)]
    async fn utterance_runs_started_then_done() {
        let (speech, mut rx) = LocalSpeech::new();
        let id = UtteranceId::new(1);
        speech
            .speak(SpeakRequest::new(id, "hello there", SpeakOptions::default()))
            .unwrap();

        assert_eq!(rx.recv().await, Some(SpeechEvent::Started(id)));
        assert_eq!(rx.recv().await, Some(SpeechEvent::Done(id)));
    }

    #[tokio::test(start_paused = true)]
    async fn new_request_stops_the_previous_one() {
        let (speech, mut rx) = LocalSpeech::new();
        let first = UtteranceId::new(1);
        let second = UtteranceId::new(2);

        speech
            .speak(SpeakRequest::new(first, "a long first prompt", SpeakOptions::default()))
            .unwrap();
        assert_eq!(rx.recv().await, Some(SpeechEvent::Started(first)));

        speech
            .speak(SpeakRequest::new(second, "second", SpeakOptions::default()))
            .unwrap();

        assert_eq!(rx.recv().await, Some(SpeechEvent::Stopped(first)));
        assert_eq!(rx.recv().await, Some(SpeechEvent::Started(second)));
        assert_eq!(rx.recv().await, Some(SpeechEvent::Done(second)));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_when_idle_is_a_no_op() {
        let (speech, mut rx) = LocalSpeech::new();
        speech.stop();
        assert!(rx.try_recv().is_err());
    }
}
