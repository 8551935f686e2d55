//! Speech capabilities.
//!
//! Recognition and synthesis are injected behind traits so reading sessions
//! can run without a microphone or speaker.

use std::collections::VecDeque;
use std::sync::Mutex;

use thiserror::Error;

use crate::model::Language;

/// Errors surfaced by speech capabilities and reading sessions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    /// No recognition engine is available.
    #[error("speech recognition not supported")]
    RecognitionUnsupported,

    /// The recognition engine reported an error.
    #[error("speech recognition error: {0}")]
    RecognitionError(String),

    /// Recognition ended without producing any transcript.
    #[error("no speech was recognized")]
    NoResult,

    /// No synthesis engine is available.
    #[error("speech synthesis not available")]
    SynthesisUnavailable,
}

/// An event delivered by a recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// A partial (`is_final == false`) or final transcript.
    Transcript { text: String, is_final: bool },
    /// The engine failed.
    Error(String),
    /// The engine stopped delivering results.
    Ended,
}

impl SpeechEvent {
    pub fn interim(text: impl Into<String>) -> Self {
        SpeechEvent::Transcript {
            text: text.into(),
            is_final: false,
        }
    }

    pub fn final_result(text: impl Into<String>) -> Self {
        SpeechEvent::Transcript {
            text: text.into(),
            is_final: true,
        }
    }
}

/// A continuous speech recognizer with interim results.
pub trait SpeechRecognizer: Send {
    /// Whether the engine can be used at all.
    fn is_supported(&self) -> bool;

    /// Begin recognition in the given BCP-47 locale (e.g. `hi-IN`).
    fn start(&mut self, locale: &str) -> Result<(), SpeechError>;

    /// Stop recognition. Idempotent.
    fn stop(&mut self);

    /// Next pending event, if any.
    fn poll(&mut self) -> Option<SpeechEvent>;
}

/// Text-to-speech output.
pub trait SpeechSynthesizer: Send + Sync {
    /// Speak an utterance, cancelling anything already being spoken.
    fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError>;

    /// Cancel any ongoing speech.
    fn cancel(&self);
}

/// A piece of text to be spoken.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub locale: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Utterance {
    /// Slightly slowed speech suitable for classroom read-alouds.
    pub fn new(text: impl Into<String>, language: Language) -> Self {
        Self {
            text: text.into(),
            locale: language.speech_locale().to_string(),
            rate: 0.8,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

/// Recognizer that replays a fixed list of events once started.
#[derive(Debug, Default)]
pub struct ScriptedRecognizer {
    script: Vec<SpeechEvent>,
    pending: VecDeque<SpeechEvent>,
    supported: bool,
    active: bool,
    locale: Option<String>,
}

impl ScriptedRecognizer {
    pub fn new(script: Vec<SpeechEvent>) -> Self {
        Self {
            script,
            pending: VecDeque::new(),
            supported: true,
            active: false,
            locale: None,
        }
    }

    /// A recognizer that reports itself as unavailable.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::default()
        }
    }

    /// Script a single utterance: interim prefixes of the words, then the
    /// full text as a final result.
    pub fn from_transcript(text: &str) -> Self {
        let words: Vec<&str> = text.split_whitespace().collect();
        let mut script: Vec<SpeechEvent> = (1..words.len())
            .map(|n| SpeechEvent::interim(words[..n].join(" ")))
            .collect();
        script.push(SpeechEvent::final_result(words.join(" ")));
        Self::new(script)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Locale passed to the last `start` call.
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn start(&mut self, locale: &str) -> Result<(), SpeechError> {
        if !self.supported {
            return Err(SpeechError::RecognitionUnsupported);
        }
        if self.active {
            self.stop();
        }
        self.locale = Some(locale.to_string());
        self.pending = self.script.iter().cloned().collect();
        self.active = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.active = false;
        self.pending.clear();
    }

    fn poll(&mut self) -> Option<SpeechEvent> {
        if !self.active {
            return None;
        }
        let event = self.pending.pop_front();
        if event.is_none() {
            self.active = false;
        }
        event
    }
}

/// Synthesizer that records what it was asked to say.
#[derive(Debug, Default)]
pub struct RecordingSynthesizer {
    spoken: Mutex<Vec<Utterance>>,
    cancellations: Mutex<u32>,
}

impl RecordingSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spoken(&self) -> Vec<Utterance> {
        self.spoken.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn cancellations(&self) -> u32 {
        *self.cancellations.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SpeechSynthesizer for RecordingSynthesizer {
    fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        self.cancel();
        self.spoken
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(utterance.clone());
        Ok(())
    }

    fn cancel(&self) {
        *self.cancellations.lock().unwrap_or_else(|e| e.into_inner()) += 1;
    }
}
