//! Reading-assessment recording sessions.
//!
//! A session owns one recognizer, tracks the latest transcript and invokes
//! the scorer exactly once per recording: on the first final result, or on
//! a manual stop when a transcript is available.

use crate::fluency::{AssessmentResult, FluencyScorer};
use crate::model::Language;
use crate::speech::{SpeechError, SpeechEvent, SpeechRecognizer};

/// Where a session currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Recording,
    Completed(AssessmentResult),
    Failed(SpeechError),
}

/// One reader's attempt at reading `expected_text` aloud.
pub struct ReadingSession<R> {
    recognizer: R,
    scorer: FluencyScorer,
    expected_text: String,
    language: Language,
    transcript: String,
    state: SessionState,
}

impl<R: SpeechRecognizer> ReadingSession<R> {
    pub fn new(recognizer: R, expected_text: impl Into<String>, language: Language) -> Self {
        Self {
            recognizer,
            scorer: FluencyScorer::default(),
            expected_text: expected_text.into(),
            language,
            transcript: String::new(),
            state: SessionState::Idle,
        }
    }

    pub fn with_scorer(mut self, scorer: FluencyScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Latest transcript, interim or final.
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn expected_text(&self) -> &str {
        &self.expected_text
    }

    pub fn result(&self) -> Option<&AssessmentResult> {
        match &self.state {
            SessionState::Completed(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    /// Start a fresh recording, discarding any previous transcript and result.
    pub fn start(&mut self) -> Result<(), SpeechError> {
        self.transcript.clear();

        if !self.recognizer.is_supported() {
            return Err(self.fail(SpeechError::RecognitionUnsupported));
        }
        if let Err(e) = self.recognizer.start(self.language.speech_locale()) {
            return Err(self.fail(e));
        }

        tracing::debug!(locale = self.language.speech_locale(), "recording started");
        self.state = SessionState::Recording;
        Ok(())
    }

    /// Apply one recognizer event.
    pub fn handle(&mut self, event: SpeechEvent) {
        if !self.is_recording() {
            return;
        }

        match event {
            SpeechEvent::Transcript { text, is_final } => {
                self.transcript = text;
                if is_final {
                    self.recognizer.stop();
                    self.complete();
                }
            }
            SpeechEvent::Error(message) => {
                self.recognizer.stop();
                self.fail(SpeechError::RecognitionError(message));
            }
            // A transcript heard before the engine went quiet waits for stop()
            SpeechEvent::Ended => {
                if self.transcript.is_empty() {
                    self.fail(SpeechError::NoResult);
                }
            }
        }
    }

    /// Drain every pending event from the recognizer. Returns the state
    /// reached once the recognizer has nothing more to say.
    pub fn pump(&mut self) -> &SessionState {
        while self.is_recording() {
            match self.recognizer.poll() {
                Some(event) => self.handle(event),
                None => break,
            }
        }
        &self.state
    }

    /// Manual stop. Scores the transcript heard so far, if any.
    pub fn stop(&mut self) -> Option<&AssessmentResult> {
        self.recognizer.stop();
        if self.is_recording() {
            if self.transcript.is_empty() {
                self.state = SessionState::Idle;
            } else {
                self.complete();
            }
        }
        self.result()
    }

    fn complete(&mut self) {
        let result = self.scorer.score(&self.transcript, &self.expected_text);
        tracing::debug!(
            fluency = result.fluency,
            struggled = result.struggled_words.len(),
            "reading assessed"
        );
        self.state = SessionState::Completed(result);
    }

    fn fail(&mut self, error: SpeechError) -> SpeechError {
        tracing::warn!("reading session failed: {error}");
        self.state = SessionState::Failed(error.clone());
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::ScriptedRecognizer;

    const SAMPLE: &str = "The quick brown fox jumps over the lazy dog";

    fn session(script: Vec<SpeechEvent>) -> ReadingSession<ScriptedRecognizer> {
        ReadingSession::new(ScriptedRecognizer::new(script), SAMPLE, Language::English)
    }

    #[test]
    fn final_result_completes_session() {
        let mut s = ReadingSession::new(
            ScriptedRecognizer::from_transcript("the quick brown fox jumps over the lazy cat"),
            SAMPLE,
            Language::English,
        );
        s.start().unwrap();
        let state = s.pump().clone();

        let SessionState::Completed(result) = state else {
            panic!("expected completion, got {state:?}");
        };
        assert_eq!(result.fluency, 89);
        assert_eq!(result.struggled_words, vec!["dog"]);
    }

    #[test]
    fn stop_after_final_does_not_rescore() {
        let mut s = session(vec![
            SpeechEvent::final_result("the quick"),
            SpeechEvent::interim("ignored"),
        ]);
        s.start().unwrap();
        s.pump();
        let first = s.result().cloned();
        let after_stop = s.stop().cloned();
        assert_eq!(first, after_stop);
        assert_eq!(s.transcript(), "the quick");
    }

    #[test]
    fn manual_stop_scores_interim_transcript() {
        let mut s = session(vec![SpeechEvent::interim("the quick brown")]);
        s.start().unwrap();
        s.pump();
        assert!(s.is_recording());

        let result = s.stop().cloned().expect("stop should score the transcript");
        assert_eq!(result.fluency, 33);
    }

    #[test]
    fn manual_stop_without_transcript_returns_to_idle() {
        let mut s = session(vec![]);
        s.start().unwrap();
        assert!(s.stop().is_none());
        assert_eq!(s.state(), &SessionState::Idle);
    }

    #[test]
    fn recognition_error_fails_without_scoring() {
        let mut s = session(vec![
            SpeechEvent::interim("the"),
            SpeechEvent::Error("network".into()),
        ]);
        s.start().unwrap();
        assert_eq!(
            s.pump(),
            &SessionState::Failed(SpeechError::RecognitionError("network".into()))
        );
        assert!(s.result().is_none());
    }

    #[test]
    fn ended_without_speech_is_no_result() {
        let mut s = session(vec![SpeechEvent::Ended]);
        s.start().unwrap();
        assert_eq!(s.pump(), &SessionState::Failed(SpeechError::NoResult));
    }

    #[test]
    fn ended_with_interim_transcript_waits_for_stop() {
        let mut s = session(vec![SpeechEvent::interim("the quick"), SpeechEvent::Ended]);
        s.start().unwrap();
        assert_eq!(s.pump(), &SessionState::Recording);
        assert!(s.result().is_none());

        let result = s.stop().unwrap();
        assert!(result.fluency > 0);
        assert!(matches!(s.state(), SessionState::Completed(_)));
    }

    #[test]
    fn unsupported_recognizer_fails_start() {
        let mut s = ReadingSession::new(ScriptedRecognizer::unsupported(), SAMPLE, Language::Hindi);
        assert_eq!(s.start(), Err(SpeechError::RecognitionUnsupported));
        assert_eq!(
            s.state(),
            &SessionState::Failed(SpeechError::RecognitionUnsupported)
        );
    }

    #[test]
    fn restart_clears_previous_result() {
        let mut s = ReadingSession::new(
            ScriptedRecognizer::from_transcript(SAMPLE),
            SAMPLE,
            Language::English,
        );
        s.start().unwrap();
        s.pump();
        assert_eq!(s.result().map(|r| r.fluency), Some(100));

        s.start().unwrap();
        assert!(s.result().is_none());
        assert_eq!(s.transcript(), "");
    }

    #[test]
    fn events_after_completion_are_ignored() {
        let mut s = session(vec![]);
        s.start().unwrap();
        s.handle(SpeechEvent::final_result(SAMPLE));
        s.handle(SpeechEvent::Error("late".into()));
        assert_eq!(s.result().map(|r| r.fluency), Some(100));
    }
}
