//! AgriSakha: agricultural advisory client core.
//!
//! Farmers ask questions by text, voice or plant photo. The core answers
//! them from a remote AI backend when one is reachable and from built-in
//! demo content when it is not, so every question gets exactly one answer.
//!
//! # Architecture
//!
//! - **Health monitor** ([`health`]): probes a prioritized endpoint list in
//!   the background and publishes [`ConnectivityState`].
//! - **Dispatcher** ([`advisory`]): sends each [`Query`] to the bound
//!   endpoint, normalizes the reply, or falls back to [`fallback`] content.
//! - **Fallback responder** ([`fallback`]): keyword-classified canned
//!   advice in English and Hindi.
//! - **Voice controller** ([`voice`]): keeps speech capture and playback
//!   from overlapping.

pub mod advisory;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod fallback;
pub mod health;
pub mod language;
pub mod voice;

pub use advisory::{
    AdvisoryBackend, AdvisoryMessage, DiagnosisResult, Dispatcher, HttpBackend, ImagePayload,
    Query, Role, Transcript,
};
pub use config::AgriConfig;
pub use connectivity::{ConnectivityState, ConnectivityWatch};
pub use error::{AdvisoryError, Result};
pub use health::{HealthMonitor, MonitorHandle};
pub use language::Language;
pub use voice::{VoiceController, VoiceSessionState};
