#![forbid(unsafe_code)]

pub mod local;
pub mod normalize;
pub mod scripted;
pub mod service;

pub use local::LocalSpeech;
pub use normalize::normalize_for_speech;
pub use scripted::ScriptedSpeech;
pub use service::{SpeakOptions, SpeakRequest, SpeechError, SpeechEvent, SpeechService};
