//! Assistant client trait.
//!
//! The remote assistant is an opaque, stateless service: every call carries
//! the full ordered history. How it produces replies is not this crate's
//! concern; implementations live in `folio-interaction`.

use crate::transcript::Turn;
use async_trait::async_trait;
use thiserror::Error;

/// Reply substituted for any failed assistant round trip.
///
/// A failed turn yields this text as if it were a valid assistant reply;
/// no automatic retry is performed, the visitor re-enters their message to
/// try again.
pub const FALLBACK_REPLY: &str = "Une erreur est survenue, veuillez réessayer.";

/// Errors an assistant client can report.
///
/// These never reach the transcript: the conversation controller maps every
/// variant to [`FALLBACK_REPLY`]. They exist so implementations can log the
/// underlying cause and so tests can drive the failure path.
#[derive(Error, Debug)]
pub enum AssistantError {
    /// Transport-level failure (connect, timeout, abort).
    #[error("Assistant request failed: {0}")]
    Network(String),

    /// The endpoint answered with a non-2xx status.
    #[error("Assistant endpoint returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not carry the expected reply field.
    #[error("Malformed assistant response: {0}")]
    MalformedResponse(String),
}

/// A client for one assistant round trip.
///
/// The operation is cancelable by abandonment: dropping the returned future
/// abandons the request, and an abandoned request can never mutate a
/// transcript.
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Asks the assistant for a reply to `message`.
    ///
    /// # Arguments
    ///
    /// * `message` - The new user message
    /// * `history` - The complete ordered history up to and including the
    ///   turn carrying `message` (the service is stateless)
    ///
    /// # Returns
    ///
    /// The assistant's reply text, or a typed error the caller substitutes
    /// with [`FALLBACK_REPLY`].
    async fn ask(&self, message: &str, history: &[Turn]) -> Result<String, AssistantError>;
}
