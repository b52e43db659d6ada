//! ConnectionManager: timeout-bounded connect, settle, and scoped release.
//!
//! # Lifecycle of one tool call
//!
//! ```text
//! acquire ──► connect (bounded by target.timeout)
//!         └─► settle: poll connected() every 50 ms while it reports
//!             Some(false), until the timeout elapses
//! body    ──► the caller's primitives
//! release ──► disconnect, on every exit path of the body
//! ```
//!
//! A session whose readiness flag is unknown (`None`) or already true is
//! considered settled at once; the loop never blocks on it.  A session still
//! reporting `Some(false)` when the timeout elapses is used anyway.  The
//! settle wait never exceeds [`MAX_TIMEOUT`], whatever the target says.
//!
//! There are no retries.  A failed or timed-out connect is returned to the
//! caller as a transport error.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use remote_macos_core::target::MAX_TIMEOUT;
use remote_macos_core::Target;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};

use super::error::ToolError;
use super::session::{Connector, RemoteSession, SessionError};

/// Interval between readiness polls during settle.
pub const SETTLE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Opens, settles and releases sessions.
pub struct ConnectionManager {
    connector: Arc<dyn Connector>,
}

impl ConnectionManager {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self { connector }
    }

    /// Connects to `target` and waits for the session to settle.
    ///
    /// # Errors
    ///
    /// The connector's error, or [`SessionError::Timeout`] when connecting
    /// takes longer than `target.timeout`.
    pub async fn acquire(&self, target: &Target) -> Result<Box<dyn RemoteSession>, SessionError> {
        info!(target = %target.display_name(), "Connecting to VNC server");
        let session = timeout(target.timeout, self.connector.connect(target))
            .await
            .map_err(|_| SessionError::Timeout(target.timeout))??;

        // An unrepresentable deadline counts as already passed.
        let deadline = Instant::now().checked_add(target.timeout.min(MAX_TIMEOUT));
        let mut polls = 0u32;
        let mut ready = session.connected();
        while ready == Some(false) && deadline.is_some_and(|d| Instant::now() < d) {
            sleep(SETTLE_POLL_INTERVAL).await;
            polls += 1;
            ready = session.connected();
        }
        debug!(polls, ?ready, "Session settled");
        Ok(session)
    }

    /// Disconnects `session`.
    pub async fn release(&self, mut session: Box<dyn RemoteSession>) -> Result<(), SessionError> {
        let result = session.disconnect().await;
        info!(ok = result.is_ok(), "Disconnected from VNC server");
        result
    }

    /// Runs `body` against a fresh session and releases it afterwards.
    ///
    /// The release runs whether `body` succeeds or fails.  When both fail,
    /// the body's error is returned and the release error is logged.  When
    /// only the release fails, its error is returned as a transport error.
    ///
    /// `body` borrows the session for the duration of the returned future:
    ///
    /// ```ignore
    /// let frame = manager
    ///     .with_session(&target, |session| {
    ///         Box::pin(async move { Ok(session.capture_screen().await?) })
    ///     })
    ///     .await?;
    /// ```
    pub async fn with_session<T, F>(&self, target: &Target, body: F) -> Result<T, ToolError>
    where
        F: for<'s> FnOnce(&'s mut dyn RemoteSession) -> BoxFuture<'s, Result<T, ToolError>>,
    {
        let mut session = self.acquire(target).await?;
        let outcome = body(&mut *session).await;
        let released = self.release(session).await;

        match (outcome, released) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(ToolError::Transport(e)),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(release_err)) => {
                warn!(error = %release_err, "Disconnect failed after tool error");
                Err(e)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
