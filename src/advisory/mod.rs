//! Advisory requests: query types, the remote backend, response
//! normalization and the dispatcher that ties them to the transcript.

mod backend;
mod dispatcher;
mod gate;
mod normalize;
mod transcript;
mod types;

pub use backend::{AdvisoryBackend, AdvisoryRequest, HttpBackend};
pub use dispatcher::Dispatcher;
pub use gate::SubmissionGate;
pub use normalize::{RemoteReply, ReplyKind, normalize};
pub use transcript::Transcript;
pub use types::{AdvisoryMessage, DiagnosisResult, ImagePayload, Query, Role};
