//! Voice I/O controller.
//!
//! Wraps a [`SpeechRecognizer`] and a [`SpeechSynthesizer`] in one state
//! machine so capture and playback never overlap:
//!
//! ```text
//! Idle ──start_capture──▶ Capturing ──terminal event──▶ Idle
//! Idle ──speak──────────▶ Speaking  ──playback end────▶ Idle
//! ```
//!
//! `Capturing → Speaking` is never taken directly, and starting a capture
//! while speaking cancels playback and passes through `Idle` first.
//!
//! Every cycle gets a generation number. A terminal event only moves the
//! state if its generation is still current, so the end of a superseded
//! utterance cannot end the newer one.

mod capability;
mod messages;
mod unsupported;

pub use capability::{
    CaptureErrorKind, CaptureEvent, PermissionStatus, PlaybackEnd, SpeechRecognizer,
    SpeechSynthesizer, Utterance, Voice, select_voice,
};
pub use messages::{capture_error, permission_denied, unsupported_message};
pub use unsupported::{NoRecognizer, NoSynthesizer};

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{broadcast, oneshot};
use tracing::{debug, info, warn};

use crate::config::VoiceConfig;
use crate::error::{AdvisoryError, Capability, Result};
use crate::language::Language;

const STATE_CHANNEL_CAPACITY: usize = 32;

/// What the voice session is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceSessionState {
    Idle,
    Capturing,
    Speaking,
}

impl fmt::Display for VoiceSessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Capturing => write!(f, "capturing"),
            Self::Speaking => write!(f, "speaking"),
        }
    }
}

/// How a capture cycle ended, ready for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Recognized text to use as the next query.
    Query(String),
    /// Localized error text to show as an assistant message.
    Failed {
        message: String,
        /// Language the front-end should switch to, if any.
        switch_to: Option<Language>,
    },
    /// User cancelled; show nothing.
    Cancelled,
}

/// A capture in progress. Resolves when its terminal event arrives.
#[derive(Debug)]
pub struct PendingCapture {
    rx: oneshot::Receiver<CaptureOutcome>,
}

impl PendingCapture {
    pub async fn finish(self) -> CaptureOutcome {
        self.rx.await.unwrap_or(CaptureOutcome::Cancelled)
    }
}

#[derive(Debug)]
struct Inner {
    state: VoiceSessionState,
    generation: u64,
}

/// Serializes speech capture and playback.
#[derive(Clone)]
pub struct VoiceController {
    recognizer: Arc<dyn SpeechRecognizer>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    settings: VoiceConfig,
    inner: Arc<Mutex<Inner>>,
    events: broadcast::Sender<VoiceSessionState>,
}

impl fmt::Debug for VoiceController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceController")
            .field("state", &self.state())
            .field("settings", &self.settings)
            .finish()
    }
}

impl VoiceController {
    pub fn new(
        recognizer: Arc<dyn SpeechRecognizer>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        settings: VoiceConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(STATE_CHANNEL_CAPACITY);
        Self {
            recognizer,
            synthesizer,
            settings,
            inner: Arc::new(Mutex::new(Inner {
                state: VoiceSessionState::Idle,
                generation: 0,
            })),
            events,
        }
    }

    /// A controller whose capabilities are both missing.
    pub fn unsupported(settings: VoiceConfig) -> Self {
        Self::new(Arc::new(NoRecognizer), Arc::new(NoSynthesizer), settings)
    }

    pub fn state(&self) -> VoiceSessionState {
        self.lock().state
    }

    /// Receive every state transition from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<VoiceSessionState> {
        self.events.subscribe()
    }

    pub fn can_capture(&self) -> bool {
        self.recognizer.is_available()
    }

    pub fn can_speak(&self) -> bool {
        self.synthesizer.is_available()
    }

    /// Start capturing speech in `language`.
    ///
    /// # Errors
    ///
    /// - [`AdvisoryError::UnsupportedCapability`] if there is no recognizer.
    /// - [`AdvisoryError::VoiceBusy`] if a capture is already running.
    /// - [`AdvisoryError::PermissionDenied`] if microphone access is refused.
    pub async fn start_capture(&self, language: Language) -> Result<PendingCapture> {
        if !self.recognizer.is_available() {
            return Err(AdvisoryError::UnsupportedCapability(
                Capability::SpeechRecognition,
            ));
        }

        {
            let mut inner = self.lock();
            match inner.state {
                VoiceSessionState::Capturing => {
                    return Err(AdvisoryError::VoiceBusy("capture already running".into()));
                }
                VoiceSessionState::Speaking => {
                    debug!("cancelling playback to start capture");
                    self.synthesizer.cancel();
                    inner.generation += 1;
                    self.transition(&mut inner, VoiceSessionState::Idle);
                }
                VoiceSessionState::Idle => {}
            }
        }

        if self.recognizer.request_permission().await == PermissionStatus::Denied {
            warn!("microphone permission denied");
            return Err(AdvisoryError::PermissionDenied);
        }

        let locale = language.locale();
        let (generation, events) = {
            let mut inner = self.lock();
            if inner.state != VoiceSessionState::Idle {
                return Err(AdvisoryError::VoiceBusy(format!(
                    "voice session became {} while waiting for permission",
                    inner.state
                )));
            }
            let events = self.recognizer.start(locale)?;
            inner.generation += 1;
            self.transition(&mut inner, VoiceSessionState::Capturing);
            (inner.generation, events)
        };
        info!(locale, "voice capture started");

        let (tx, rx) = oneshot::channel();
        let controller = self.clone();
        tokio::spawn(async move {
            let event = events.await.unwrap_or(CaptureEvent::Aborted);
            controller.finish_cycle(generation, VoiceSessionState::Capturing);
            let _ = tx.send(capture_outcome(event, language));
        });

        Ok(PendingCapture { rx })
    }

    /// Stop listening gracefully. The final transcript still arrives.
    ///
    /// # Errors
    ///
    /// [`AdvisoryError::InvalidState`] unless capturing.
    pub fn stop_capture(&self) -> Result<()> {
        self.require_capturing()?;
        self.recognizer.stop();
        Ok(())
    }

    /// Abort the capture without a message.
    ///
    /// # Errors
    ///
    /// [`AdvisoryError::InvalidState`] unless capturing.
    pub fn cancel_capture(&self) -> Result<()> {
        self.require_capturing()?;
        self.recognizer.cancel();
        Ok(())
    }

    /// Speak `text` in `language`, replacing anything already playing.
    ///
    /// # Errors
    ///
    /// - [`AdvisoryError::UnsupportedCapability`] if there is no synthesizer.
    /// - [`AdvisoryError::InvalidInput`] for blank text.
    /// - [`AdvisoryError::VoiceBusy`] while capturing.
    pub fn speak(&self, text: &str, language: Language) -> Result<()> {
        if !self.synthesizer.is_available() {
            return Err(AdvisoryError::UnsupportedCapability(
                Capability::SpeechSynthesis,
            ));
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(AdvisoryError::InvalidInput("nothing to speak".into()));
        }

        let mut inner = self.lock();
        match inner.state {
            VoiceSessionState::Capturing => {
                return Err(AdvisoryError::VoiceBusy(
                    "cannot speak while capturing".into(),
                ));
            }
            VoiceSessionState::Speaking => {
                debug!("replacing current utterance");
                self.synthesizer.cancel();
            }
            VoiceSessionState::Idle => {}
        }

        let locale = language.locale();
        let utterance = Utterance {
            text: text.to_owned(),
            locale: locale.to_owned(),
            voice: select_voice(&self.synthesizer.voices(), locale),
            rate: self.settings.rate,
            pitch: self.settings.pitch,
        };
        inner.generation += 1;
        let generation = inner.generation;

        let ended = match self.synthesizer.speak(utterance) {
            Ok(rx) => rx,
            Err(e) => {
                self.transition(&mut inner, VoiceSessionState::Idle);
                return Err(e);
            }
        };
        self.transition(&mut inner, VoiceSessionState::Speaking);
        drop(inner);

        let controller = self.clone();
        tokio::spawn(async move {
            match ended.await.unwrap_or(PlaybackEnd::Interrupted) {
                PlaybackEnd::Finished => debug!(generation, "utterance finished"),
                PlaybackEnd::Interrupted => debug!(generation, "utterance interrupted"),
                PlaybackEnd::Error(e) => warn!(generation, error = %e, "playback failed"),
            }
            controller.finish_cycle(generation, VoiceSessionState::Speaking);
        });
        Ok(())
    }

    /// Cancel playback. No-op unless speaking.
    pub fn stop_speaking(&self) {
        let mut inner = self.lock();
        if inner.state == VoiceSessionState::Speaking {
            self.synthesizer.cancel();
            inner.generation += 1;
            self.transition(&mut inner, VoiceSessionState::Idle);
        }
    }

    /// Whether `text` is short enough to be spoken without being asked.
    pub fn should_auto_speak(&self, text: &str) -> bool {
        let text = text.trim();
        self.synthesizer.is_available()
            && !text.is_empty()
            && text.chars().count() <= self.settings.auto_speak_max_chars
    }

    /// Speak `text` if [`should_auto_speak`](Self::should_auto_speak)
    /// allows it and nothing is being captured. Returns whether playback
    /// started.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`speak`](Self::speak) other than a capture
    /// in progress.
    pub fn auto_speak(&self, text: &str, language: Language) -> Result<bool> {
        if !self.should_auto_speak(text) {
            return Ok(false);
        }
        match self.speak(text, language) {
            Ok(()) => Ok(true),
            Err(AdvisoryError::VoiceBusy(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn require_capturing(&self) -> Result<()> {
        let state = self.state();
        if state != VoiceSessionState::Capturing {
            return Err(AdvisoryError::InvalidState(format!(
                "not capturing (state: {state})"
            )));
        }
        Ok(())
    }

    /// Return to `Idle` if cycle `generation` in state `from` is current.
    fn finish_cycle(&self, generation: u64, from: VoiceSessionState) {
        let mut inner = self.lock();
        if inner.generation == generation && inner.state == from {
            self.transition(&mut inner, VoiceSessionState::Idle);
        } else {
            debug!(generation, current = inner.generation, "stale voice event ignored");
        }
    }

    fn transition(&self, inner: &mut Inner, next: VoiceSessionState) {
        if inner.state == next {
            return;
        }
        debug!(from = %inner.state, to = %next, "voice state");
        inner.state = next;
        let _ = self.events.send(next);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn capture_outcome(event: CaptureEvent, language: Language) -> CaptureOutcome {
    match event {
        CaptureEvent::Transcript(text) if !text.trim().is_empty() => {
            CaptureOutcome::Query(text.trim().to_owned())
        }
        CaptureEvent::Transcript(_) => CaptureOutcome::Failed {
            message: capture_error(&CaptureErrorKind::NoSpeech, language),
            switch_to: None,
        },
        CaptureEvent::Aborted => CaptureOutcome::Cancelled,
        CaptureEvent::Error(CaptureErrorKind::Other(code)) if code == "aborted" => {
            CaptureOutcome::Cancelled
        }
        CaptureEvent::Error(kind) => {
            warn!(?kind, "voice capture failed");
            let switch_to = (kind == CaptureErrorKind::LanguageNotSupported
                && language != Language::English)
                .then_some(Language::English);
            CaptureOutcome::Failed {
                message: capture_error(&kind, language),
                switch_to,
            }
        }
    }
}
