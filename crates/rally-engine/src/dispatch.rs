//! The push-delivery capability.
//!
//! Delivery is per-message: one failed send carries no implication for any
//! other.  The real delivery service lives outside this system, so the
//! trait ships with a logging implementation for the server binary and a
//! recording fake for tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use rally_shared::PushPayload;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Push delivery failed: {0}")]
    Delivery(String),
}

/// Delivers one push payload to one device token.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn send(&self, token: &str, payload: &PushPayload) -> Result<(), DispatchError>;
}

// ---------------------------------------------------------------------------
// Logging dispatcher
// ---------------------------------------------------------------------------

/// Logs each send instead of delivering it.  Used by the server binary
/// when no real push backend is wired up.
#[derive(Debug, Default, Clone)]
pub struct LoggingDispatcher;

#[async_trait]
impl Dispatcher for LoggingDispatcher {
    async fn send(&self, token: &str, payload: &PushPayload) -> Result<(), DispatchError> {
        info!(
            token = %token_prefix(token),
            title = %payload.title,
            "Push dispatched (logging only)"
        );
        Ok(())
    }
}

/// First few characters of a device token, enough to correlate logs
/// without recording the full credential.
fn token_prefix(token: &str) -> &str {
    let end = token.char_indices().nth(8).map_or(token.len(), |(i, _)| i);
    &token[..end]
}

// ---------------------------------------------------------------------------
// Recording dispatcher (test fake)
// ---------------------------------------------------------------------------

/// A send captured by [`RecordingDispatcher`].
#[derive(Debug, Clone, PartialEq)]
pub struct SentPush {
    pub token: String,
    pub payload: PushPayload,
}

/// Captures every send for assertions; individual tokens can be told to
/// fail so tests can exercise partial-delivery paths.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<SentPush>>,
    failing_tokens: Mutex<HashSet<String>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send to this token will fail.
    pub fn fail_token(&self, token: &str) {
        self.failing_tokens
            .lock()
            .expect("failing_tokens lock")
            .insert(token.to_string());
    }

    /// All successful sends so far, in dispatch-completion order.
    pub fn sent(&self) -> Vec<SentPush> {
        self.sent.lock().expect("sent lock").clone()
    }
}

#[async_trait]
impl Dispatcher for RecordingDispatcher {
    async fn send(&self, token: &str, payload: &PushPayload) -> Result<(), DispatchError> {
        let failing = self
            .failing_tokens
            .lock()
            .expect("failing_tokens lock")
            .contains(token);
        if failing {
            return Err(DispatchError::Delivery(format!(
                "token {} rejected",
                token_prefix(token)
            )));
        }
        self.sent.lock().expect("sent lock").push(SentPush {
            token: token.to_string(),
            payload: payload.clone(),
        });
        Ok(())
    }
}
