//! Platform speech capabilities.
//!
//! Capture and playback are platform services. The controller talks to
//! them through [`SpeechRecognizer`] and [`SpeechSynthesizer`]; each capture
//! or playback cycle ends with exactly one terminal event delivered on a
//! oneshot channel.

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::error::Result;

/// Outcome of a microphone permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Why a capture cycle failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureErrorKind {
    NoSpeech,
    /// Microphone missing or not accessible.
    AudioCapture,
    /// Permission revoked mid-capture.
    NotAllowed,
    Network,
    LanguageNotSupported,
    Other(String),
}

impl CaptureErrorKind {
    /// Map a platform error string (`"no-speech"`, `"audio-capture"`, ...).
    pub fn from_platform(code: &str) -> Self {
        match code {
            "no-speech" => Self::NoSpeech,
            "audio-capture" => Self::AudioCapture,
            "not-allowed" => Self::NotAllowed,
            "network" => Self::Network,
            "language-not-supported" => Self::LanguageNotSupported,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// Terminal event of one capture cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// Final recognized text.
    Transcript(String),
    Error(CaptureErrorKind),
    /// The user cancelled the capture.
    Aborted,
}

impl CaptureEvent {
    /// Terminal event for a platform error string. `"aborted"` is how the
    /// platform reports a user cancel, so it ends the cycle silently.
    pub fn from_platform_error(code: &str) -> Self {
        match code {
            "aborted" => Self::Aborted,
            other => Self::Error(CaptureErrorKind::from_platform(other)),
        }
    }
}

/// Speech-to-text service.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Whether recognition exists on this platform at all.
    fn is_available(&self) -> bool;

    /// Ask for microphone access.
    async fn request_permission(&self) -> PermissionStatus;

    /// Begin capturing in `locale` (e.g. `hi-IN`).
    fn start(&self, locale: &str) -> Result<oneshot::Receiver<CaptureEvent>>;

    /// Stop listening; the final transcript still arrives as the terminal
    /// event.
    fn stop(&self);

    /// Abort; the terminal event is [`CaptureEvent::Aborted`].
    fn cancel(&self);
}

/// A voice offered by the synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    /// BCP 47 tag, e.g. `en-US`.
    pub locale: String,
}

impl Voice {
    pub fn new(name: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locale: locale.into(),
        }
    }
}

/// One thing to say.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub locale: String,
    /// `None` leaves the choice to the platform.
    pub voice: Option<Voice>,
    pub rate: f32,
    pub pitch: f32,
}

/// How a playback cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEnd {
    Finished,
    /// Cancelled or replaced by a newer utterance.
    Interrupted,
    Error(String),
}

/// Text-to-speech service.
pub trait SpeechSynthesizer: Send + Sync {
    fn is_available(&self) -> bool;

    /// Voices installed on the platform.
    fn voices(&self) -> Vec<Voice>;

    /// Start speaking `utterance`.
    fn speak(&self, utterance: Utterance) -> Result<oneshot::Receiver<PlaybackEnd>>;

    /// Stop whatever is playing.
    fn cancel(&self);
}

/// Pick a voice for `locale`: exact tag, then same language, else `None`.
pub fn select_voice(voices: &[Voice], locale: &str) -> Option<Voice> {
    let wanted = normalize_tag(locale);
    let language = primary_subtag(&wanted);
    voices
        .iter()
        .find(|v| normalize_tag(&v.locale) == wanted)
        .or_else(|| {
            voices
                .iter()
                .find(|v| primary_subtag(&normalize_tag(&v.locale)) == language)
        })
        .cloned()
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().replace('_', "-").to_ascii_lowercase()
}

fn primary_subtag(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    fn voices() -> Vec<Voice> {
        vec![
            Voice::new("Daniel", "en-GB"),
            Voice::new("Samantha", "en_US"),
            Voice::new("Lekha", "hi-IN"),
        ]
    }

    #[test]
    fn exact_locale_preferred() {
        assert_eq!(select_voice(&voices(), "en-US").unwrap().name, "Samantha");
        assert_eq!(select_voice(&voices(), "hi-IN").unwrap().name, "Lekha");
    }

    #[test]
    fn language_prefix_is_second_choice() {
        let only_gb = vec![Voice::new("Daniel", "en-GB")];
        assert_eq!(select_voice(&only_gb, "en-US").unwrap().name, "Daniel");
    }

    #[test]
    fn no_match_leaves_platform_default() {
        assert!(select_voice(&[Voice::new("Daniel", "en-GB")], "hi-IN").is_none());
        assert!(select_voice(&[], "en-US").is_none());
    }

    #[test]
    fn platform_error_codes_map() {
        assert_eq!(
            CaptureErrorKind::from_platform("no-speech"),
            CaptureErrorKind::NoSpeech
        );
        assert_eq!(
            CaptureErrorKind::from_platform("language-not-supported"),
            CaptureErrorKind::LanguageNotSupported
        );
        assert_eq!(
            CaptureErrorKind::from_platform("service-not-allowed"),
            CaptureErrorKind::Other("service-not-allowed".into())
        );
    }

    #[test]
    fn platform_abort_is_a_cancel_not_an_error() {
        assert_eq!(CaptureEvent::from_platform_error("aborted"), CaptureEvent::Aborted);
        assert_eq!(
            CaptureEvent::from_platform_error("network"),
            CaptureEvent::Error(CaptureErrorKind::Network)
        );
        assert_eq!(
            CaptureEvent::from_platform_error("bad-grammar"),
            CaptureEvent::Error(CaptureErrorKind::Other("bad-grammar".into()))
        );
    }
}
