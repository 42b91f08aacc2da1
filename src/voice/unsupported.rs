//! Null capabilities for platforms without speech services.

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::capability::{
    CaptureEvent, PermissionStatus, PlaybackEnd, SpeechRecognizer, SpeechSynthesizer, Utterance,
    Voice,
};
use crate::error::{AdvisoryError, Capability, Result};

/// A recognizer that reports itself unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRecognizer;

#[async_trait]
impl SpeechRecognizer for NoRecognizer {
    fn is_available(&self) -> bool {
        false
    }

    async fn request_permission(&self) -> PermissionStatus {
        PermissionStatus::Denied
    }

    fn start(&self, _locale: &str) -> Result<oneshot::Receiver<CaptureEvent>> {
        Err(AdvisoryError::UnsupportedCapability(
            Capability::SpeechRecognition,
        ))
    }

    fn stop(&self) {}

    fn cancel(&self) {}
}

/// A synthesizer that reports itself unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSynthesizer;

impl SpeechSynthesizer for NoSynthesizer {
    fn is_available(&self) -> bool {
        false
    }

    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    fn speak(&self, _utterance: Utterance) -> Result<oneshot::Receiver<PlaybackEnd>> {
        Err(AdvisoryError::UnsupportedCapability(
            Capability::SpeechSynthesis,
        ))
    }

    fn cancel(&self) {}
}
