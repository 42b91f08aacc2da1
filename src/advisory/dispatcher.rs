//! Advisory dispatcher: remote call or local fallback, one message each.
//!
//! # Settling a submission
//!
//! The remote call runs in its own task. When it succeeds it tries to
//! settle the submission id through the [`SubmissionGate`]; when `submit`
//! gives up on it (error or deadline) the fallback path tries to settle the
//! same id. Whichever settles first appends to the transcript. A remote
//! reply that arrives after the fallback settled is dropped with a log line.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, oneshot};
use tracing::{debug, error, info, warn};

use super::backend::{AdvisoryBackend, AdvisoryRequest};
use super::gate::SubmissionGate;
use super::transcript::Transcript;
use super::types::{AdvisoryMessage, Query};
use crate::config::{AgriConfig, DispatchConfig};
use crate::connectivity::ConnectivityState;
use crate::error::{AdvisoryError, Result};
use crate::fallback;
use crate::health::MonitorHandle;

/// What the remote task reports back to `submit`.
#[derive(Debug)]
enum RemoteOutcome {
    /// Settled and appended by the remote task.
    Delivered(AdvisoryMessage),
    /// The call failed; nothing was settled.
    Failed(AdvisoryError),
}

struct Shared {
    backend: Arc<dyn AdvisoryBackend>,
    monitor: MonitorHandle,
    transcript: Transcript,
    gate: SubmissionGate,
    settings: DispatchConfig,
}

/// Routes each [`Query`] to the bound backend or the fallback responder and
/// appends exactly one assistant message per submission.
///
/// Cheap to clone; clones share the same gate, transcript and queue.
#[derive(Clone)]
pub struct Dispatcher {
    shared: Arc<Shared>,
    /// Serializes submissions so the transcript keeps submission order.
    queue: Arc<Mutex<()>>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("backend", &self.shared.backend.name())
            .field("settings", &self.shared.settings)
            .finish()
    }
}

impl Dispatcher {
    pub fn new(
        config: &AgriConfig,
        backend: Arc<dyn AdvisoryBackend>,
        monitor: MonitorHandle,
        transcript: Transcript,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                backend,
                monitor,
                transcript,
                gate: SubmissionGate::new(),
                settings: config.dispatch.clone(),
            }),
            queue: Arc::new(Mutex::new(())),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.shared.transcript
    }

    pub fn monitor(&self) -> &MonitorHandle {
        &self.shared.monitor
    }

    /// Answer `query` and append the answer to the transcript.
    ///
    /// Remote failures never surface here; they turn into a degraded
    /// fallback message.
    ///
    /// # Errors
    ///
    /// [`AdvisoryError::InvalidInput`] if the query is empty or its image
    /// is unacceptable. Nothing is appended in that case.
    pub async fn submit(&self, query: Query) -> Result<AdvisoryMessage> {
        query.validate(self.shared.settings.max_image_bytes)?;

        let _turn = self.queue.lock().await;
        let id = self.shared.gate.begin();

        match self.shared.monitor.current() {
            ConnectivityState::Connected { endpoint } => {
                self.dispatch_remote(id, endpoint, query).await
            }
            state => {
                debug!(id, %state, "not connected, answering locally");
                self.fallback(id, &query, None).await
            }
        }
    }

    async fn dispatch_remote(
        &self,
        id: u64,
        endpoint: String,
        query: Query,
    ) -> Result<AdvisoryMessage> {
        let deadline = self.deadline_for(&query);
        let (tx, mut rx) = oneshot::channel();
        let shared = Arc::clone(&self.shared);
        let task_endpoint = endpoint.clone();
        let task_query = query.clone();
        tokio::spawn(async move {
            let outcome = run_remote(&shared, id, &task_endpoint, &task_query).await;
            // `submit` may have stopped listening after its deadline.
            let _ = tx.send(outcome);
        });

        let failure = match tokio::time::timeout(deadline, &mut rx).await {
            Ok(Ok(RemoteOutcome::Delivered(message))) => return Ok(message),
            Ok(Ok(RemoteOutcome::Failed(err))) => err,
            Ok(Err(_)) => AdvisoryError::InvalidState("remote task ended without a reply".into()),
            Err(_) => AdvisoryError::NetworkUnavailable(format!(
                "no reply from {endpoint} within {}ms",
                deadline.as_millis()
            )),
        };

        if failure.triggers_fallback() {
            warn!(id, endpoint = %endpoint, error = %failure, "remote advisory failed, using fallback");
        } else {
            error!(id, endpoint = %endpoint, error = %failure, "remote advisory task failed unexpectedly, using fallback");
        }
        if self.loses_connection(id, &failure) {
            self.shared.monitor.report_connection_lost(&endpoint);
        }
        self.fallback(id, &query, Some(rx)).await
    }

    /// A transport failure only counts against the endpoint while the
    /// submission is still open. A reply that settled at the deadline means
    /// the endpoint answered.
    fn loses_connection(&self, id: u64, failure: &AdvisoryError) -> bool {
        failure.is_connection_loss() && !self.shared.gate.is_settled(id)
    }

    /// Settle `id` with a degraded message. If the remote task settled
    /// first, wait for and return its message instead.
    async fn fallback(
        &self,
        id: u64,
        query: &Query,
        remote: Option<oneshot::Receiver<RemoteOutcome>>,
    ) -> Result<AdvisoryMessage> {
        if self.shared.gate.settle(id) {
            let message = AdvisoryMessage::degraded(fallback::generate(query, query.language()));
            self.shared.transcript.append(message.clone());
            return Ok(message);
        }

        // Lost the race: the remote task is about to hand over its message.
        match remote {
            Some(rx) => match rx.await {
                Ok(RemoteOutcome::Delivered(message)) => Ok(message),
                _ => Err(AdvisoryError::InvalidState(format!(
                    "submission {id} settled without a message"
                ))),
            },
            None => Err(AdvisoryError::InvalidState(format!(
                "submission {id} already settled"
            ))),
        }
    }

    fn deadline_for(&self, query: &Query) -> Duration {
        if query.has_image() {
            self.shared.settings.image_timeout()
        } else {
            self.shared.settings.text_timeout()
        }
    }
}

async fn run_remote(shared: &Shared, id: u64, endpoint: &str, query: &Query) -> RemoteOutcome {
    let language = query.language();
    let result = match query.image() {
        Some(image) => {
            debug!(id, endpoint, filename = %image.filename, "uploading image");
            shared.backend.analyze_image(endpoint, image, language).await
        }
        None => {
            let request = AdvisoryRequest {
                query: query.text().to_owned(),
                location: shared.settings.location.clone(),
                language,
            };
            debug!(id, endpoint, "requesting advisory");
            shared.backend.advise(endpoint, &request).await
        }
    };

    match result {
        Ok(reply) => {
            if !shared.gate.settle(id) {
                info!(id, endpoint, "late remote reply discarded");
                return RemoteOutcome::Failed(AdvisoryError::InvalidState(format!(
                    "submission {id} already settled"
                )));
            }
            let message = AdvisoryMessage::live(reply.text, reply.diagnosis);
            shared.transcript.append(message.clone());
            RemoteOutcome::Delivered(message)
        }
        Err(err) => RemoteOutcome::Failed(err),
    }
}
