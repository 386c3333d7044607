use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

use interview_core::Clock;
use interview_core::model::{Question, SessionSummary};
use speech::{SpeakOptions, SpeakRequest, SpeechEvent, SpeechService, normalize_for_speech};

use crate::error::SessionError;
use super::service::{AdvanceOutcome, InterviewSession, SelectOutcome, TickOutcome};
use super::view::{LOW_TIME_WARNING_SECONDS, SessionSnapshot};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// User intent forwarded from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    SelectAnswer(usize),
    Advance,
    /// Read the current question aloud (again).
    Speak,
    /// Abandon the session.
    Quit,
}

/// Notification emitted for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    /// A (new) question is being presented. Also sent once at startup.
    Question(SessionSnapshot),
    Tick { remaining: u32, low_time: bool },
    AnswerLocked { option: usize, correct: bool },
    Speaking { speaking: bool },
    Completed(SessionSummary),
}

/// The presentation layer's ends of the runner's channels.
pub struct SessionHandle {
    pub commands: mpsc::UnboundedSender<SessionCommand>,
    pub updates: mpsc::UnboundedReceiver<SessionUpdate>,
}

enum Flow {
    Continue,
    /// The countdown was consumed (tick or question change); schedule the
    /// next single-shot.
    RearmTimer,
    Finished(Option<SessionSummary>),
}

/// Drives one [`InterviewSession`] on a single task.
///
/// The runner is the session's only writer: it serializes user intents,
/// speech lifecycle events and the one-second countdown, so no locking is
/// needed anywhere in the session state. The countdown is a cancellable
/// single-shot that is re-armed after every tick and on every question
/// change, which rules out drift and double firing across transitions.
pub struct SessionRunner {
    session: InterviewSession,
    speech: Arc<dyn SpeechService>,
    speech_events: mpsc::UnboundedReceiver<SpeechEvent>,
    commands: mpsc::UnboundedReceiver<SessionCommand>,
    updates: mpsc::UnboundedSender<SessionUpdate>,
    clock: Clock,
    voice: SpeakOptions,
    speaking_sent: bool,
}

impl SessionRunner {
    /// Build a runner and the handle a presentation layer talks to it with.
    ///
    /// `speech_events` must be the receiving end of the channel `speech`
    /// reports its lifecycle on.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if `questions` is empty.
    pub fn new(
        questions: Vec<Question>,
        speech: Arc<dyn SpeechService>,
        speech_events: mpsc::UnboundedReceiver<SpeechEvent>,
        clock: Clock,
        voice: SpeakOptions,
    ) -> Result<(Self, SessionHandle), SessionError> {
        let session = InterviewSession::new(questions, clock.now())?;
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        Ok((
            Self {
                session,
                speech,
                speech_events,
                commands: command_rx,
                updates: update_tx,
                clock,
                voice,
                speaking_sent: false,
            },
            SessionHandle {
                commands: command_tx,
                updates: update_rx,
            },
        ))
    }

    /// Run the session to completion (or until `Quit`).
    ///
    /// Returns the final summary, or `None` when the session was abandoned.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` only for internal inconsistencies; user input
    /// problems are logged and dropped instead.
    pub async fn run(mut self) -> Result<Option<SessionSummary>, SessionError> {
        self.emit(SessionUpdate::Question(SessionSnapshot::of(&self.session)));

        let mut commands_open = true;
        let mut speech_open = true;
        let mut tick = pin!(sleep(TICK_INTERVAL));

        loop {
            let flow = tokio::select! {
                command = self.commands.recv(), if commands_open => match command {
                    Some(command) => self.handle_command(command)?,
                    None => {
                        // Presentation layer went away; the countdown still
                        // runs the session to its end.
                        commands_open = false;
                        Flow::Continue
                    }
                },
                event = self.speech_events.recv(), if speech_open => match event {
                    Some(event) => self.handle_speech_event(&event),
                    None => {
                        speech_open = false;
                        Flow::Continue
                    }
                },
                () = tick.as_mut() => self.handle_tick()?,
            };

            match flow {
                Flow::Continue => {}
                Flow::RearmTimer => tick.as_mut().reset(Instant::now() + TICK_INTERVAL),
                Flow::Finished(summary) => return Ok(summary),
            }
        }
    }

    fn handle_command(&mut self, command: SessionCommand) -> Result<Flow, SessionError> {
        match command {
            SessionCommand::SelectAnswer(index) => {
                match self.session.select_answer(index) {
                    Ok(SelectOutcome::Locked { correct }) => {
                        debug!(index, correct, "answer locked");
                        self.emit(SessionUpdate::AnswerLocked {
                            option: index,
                            correct,
                        });
                    }
                    Ok(SelectOutcome::Ignored) => {
                        debug!(index, "selection ignored, answer already locked");
                    }
                    Err(SessionError::OptionOutOfRange { index, len }) => {
                        warn!(index, len, "selection out of range");
                    }
                    Err(err) => return Err(err),
                }
                Ok(Flow::Continue)
            }
            SessionCommand::Advance => match self.session.advance(self.clock.now()) {
                Ok(outcome) => {
                    self.speech.stop();
                    self.apply_advance(outcome)
                }
                Err(SessionError::NotAnswered) => {
                    debug!("advance ignored, no answer locked");
                    Ok(Flow::Continue)
                }
                Err(err) => Err(err),
            },
            SessionCommand::Speak => {
                self.speak_current()?;
                Ok(Flow::Continue)
            }
            SessionCommand::Quit => {
                self.speech.stop();
                Ok(Flow::Finished(None))
            }
        }
    }

    fn handle_speech_event(&mut self, event: &SpeechEvent) -> Flow {
        if self.session.on_speech_event(event) {
            self.sync_speaking();
        } else {
            debug!(utterance = %event.utterance(), "ignoring stale speech callback");
        }
        Flow::Continue
    }

    fn handle_tick(&mut self) -> Result<Flow, SessionError> {
        match self.session.tick(self.clock.now())? {
            TickOutcome::Counting { remaining } => {
                self.emit(SessionUpdate::Tick {
                    remaining,
                    low_time: remaining < LOW_TIME_WARNING_SECONDS,
                });
                Ok(Flow::RearmTimer)
            }
            TickOutcome::Expired(outcome) => {
                debug!("countdown expired, forcing advance");
                self.speech.stop();
                self.apply_advance(outcome)
            }
        }
    }

    fn apply_advance(&mut self, outcome: AdvanceOutcome) -> Result<Flow, SessionError> {
        // Finishing a question superseded any outstanding utterance.
        self.sync_speaking();
        match outcome {
            AdvanceOutcome::Next { index } => {
                debug!(index, "advanced to next question");
                self.emit(SessionUpdate::Question(SessionSnapshot::of(&self.session)));
                Ok(Flow::RearmTimer)
            }
            AdvanceOutcome::Completed(summary) => {
                debug!(score = summary.score(), total = summary.total(), "session completed");
                self.emit(SessionUpdate::Completed(summary.clone()));
                Ok(Flow::Finished(Some(summary)))
            }
        }
    }

    fn speak_current(&mut self) -> Result<(), SessionError> {
        let id = self.session.begin_utterance()?;
        // Stop before speaking so no two utterances are audible at once. The
        // old utterance is already superseded by the new stamp, so its stop
        // echo arrives stale and is discarded.
        self.speech.stop();

        let Some(question) = self.session.current_question() else {
            return Ok(());
        };
        let text = normalize_for_speech(question.text());
        let request = SpeakRequest::new(id, text, self.voice.clone());
        if let Err(err) = self.speech.speak(request) {
            // Non-fatal: the quiz continues without audio.
            warn!(%err, "speech submission failed");
            self.session.on_speech_event(&SpeechEvent::Error {
                utterance: id,
                message: err.to_string(),
            });
        }
        self.sync_speaking();
        Ok(())
    }

    fn sync_speaking(&mut self) {
        let speaking = self.session.speaking();
        if speaking != self.speaking_sent {
            self.speaking_sent = speaking;
            self.emit(SessionUpdate::Speaking { speaking });
        }
    }

    fn emit(&self, update: SessionUpdate) {
        // A dropped updates receiver is fine; the session keeps running.
        let _ = self.updates.send(update);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
