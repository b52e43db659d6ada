//! Recording session doubles for tests.
//!
//! [`RecordingConnector`] hands out [`RecordingSession`]s that perform no
//! network I/O.  Every primitive is appended to a shared [`CallLog`] so tests
//! can assert exactly what reached the session, in order, including the
//! final disconnect.
//!
//! Failures are scripted up front:
//!
//! ```ignore
//! let connector = RecordingConnector::new()
//!     .failing_on(SessionCall::KeyDown("shift".into()))
//!     .with_frame(Framebuffer::blank(4, 5));
//! let log = connector.log();
//! // ... run a use case ...
//! assert_eq!(log.disconnects(), 1);
//! ```
//!
//! A failing call is recorded before it fails, so the log shows every
//! attempt.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use remote_macos_core::{KeyToken, MouseButton, Target};

use crate::application::session::{Connector, Framebuffer, RemoteSession, SessionError};

/// One primitive as seen by a [`RecordingSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
    KeyPress(String),
    KeyDown(String),
    KeyUp(String),
    MouseMove(i32, i32),
    MousePress(MouseButton),
    MouseDown(MouseButton),
    MouseUp(MouseButton),
    CaptureScreen,
    Disconnect,
}

/// Shared, ordered record of session calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<SessionCall>>>);

impl CallLog {
    fn push(&self, call: SessionCall) {
        if let Ok(mut calls) = self.0.lock() {
            calls.push(call);
        }
    }

    /// Snapshot of every recorded call.
    pub fn calls(&self) -> Vec<SessionCall> {
        self.0.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Recorded calls other than [`SessionCall::Disconnect`].
    pub fn primitives(&self) -> Vec<SessionCall> {
        self.calls()
            .into_iter()
            .filter(|call| *call != SessionCall::Disconnect)
            .collect()
    }

    pub fn count(&self, call: &SessionCall) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn disconnects(&self) -> usize {
        self.count(&SessionCall::Disconnect)
    }

    pub fn is_empty(&self) -> bool {
        self.calls().is_empty()
    }
}

/// What a session's readiness flag reports to the settle loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// `connected()` returns `None`.
    Unknown,
    /// Always `Some(true)`.
    Ready,
    /// Always `Some(false)`.
    Never,
    /// `Some(false)` for the first `n` polls, then `Some(true)`.
    AfterPolls(usize),
}

/// Scripted behaviour shared by every session a connector opens.
#[derive(Debug, Clone)]
struct Script {
    frame: Framebuffer,
    failing: Vec<SessionCall>,
    readiness: Readiness,
    fail_disconnect: bool,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            frame: Framebuffer::blank(1, 1),
            failing: Vec::new(),
            readiness: Readiness::Unknown,
            fail_disconnect: false,
        }
    }
}

/// A session that records calls instead of talking to a VNC server.
pub struct RecordingSession {
    log: CallLog,
    script: Script,
    polls: AtomicUsize,
    shared_polls: Arc<AtomicUsize>,
}

impl RecordingSession {
    fn record(&self, call: SessionCall) -> Result<(), SessionError> {
        let fails = self.script.failing.contains(&call);
        let description = format!("{call:?}");
        self.log.push(call);
        if fails {
            return Err(SessionError::Protocol(format!(
                "injected failure on {description}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteSession for RecordingSession {
    async fn key_press(&mut self, key: &KeyToken) -> Result<(), SessionError> {
        self.record(SessionCall::KeyPress(key.to_string()))
    }

    async fn key_down(&mut self, key: &KeyToken) -> Result<(), SessionError> {
        self.record(SessionCall::KeyDown(key.to_string()))
    }

    async fn key_up(&mut self, key: &KeyToken) -> Result<(), SessionError> {
        self.record(SessionCall::KeyUp(key.to_string()))
    }

    async fn mouse_move(&mut self, x: i32, y: i32) -> Result<(), SessionError> {
        self.record(SessionCall::MouseMove(x, y))
    }

    async fn mouse_press(&mut self, button: MouseButton) -> Result<(), SessionError> {
        self.record(SessionCall::MousePress(button))
    }

    async fn mouse_down(&mut self, button: MouseButton) -> Result<(), SessionError> {
        self.record(SessionCall::MouseDown(button))
    }

    async fn mouse_up(&mut self, button: MouseButton) -> Result<(), SessionError> {
        self.record(SessionCall::MouseUp(button))
    }

    async fn capture_screen(&mut self) -> Result<Framebuffer, SessionError> {
        self.record(SessionCall::CaptureScreen)?;
        Ok(self.script.frame.clone())
    }

    fn connected(&self) -> Option<bool> {
        self.shared_polls.fetch_add(1, Ordering::SeqCst);
        match self.script.readiness {
            Readiness::Unknown => None,
            Readiness::Ready => Some(true),
            Readiness::Never => Some(false),
            Readiness::AfterPolls(n) => Some(self.polls.fetch_add(1, Ordering::SeqCst) >= n),
        }
    }

    async fn disconnect(&mut self) -> Result<(), SessionError> {
        self.log.push(SessionCall::Disconnect);
        if self.script.fail_disconnect {
            return Err(SessionError::Protocol("injected disconnect failure".into()));
        }
        Ok(())
    }
}

/// A connector whose sessions share one [`CallLog`].
#[derive(Debug, Default)]
pub struct RecordingConnector {
    log: CallLog,
    script: Script,
    refuse: bool,
    connect_delay: Option<Duration>,
    connects: AtomicUsize,
    polls: Arc<AtomicUsize>,
}

impl RecordingConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame returned by `capture_screen`.
    pub fn with_frame(mut self, frame: Framebuffer) -> Self {
        self.script.frame = frame;
        self
    }

    /// Makes every occurrence of `call` fail after being recorded.
    pub fn failing_on(mut self, call: SessionCall) -> Self {
        self.script.failing.push(call);
        self
    }

    pub fn with_readiness(mut self, readiness: Readiness) -> Self {
        self.script.readiness = readiness;
        self
    }

    pub fn failing_disconnect(mut self) -> Self {
        self.script.fail_disconnect = true;
        self
    }

    /// Every `connect` fails with a refused TCP connection.
    pub fn refusing(mut self) -> Self {
        self.refuse = true;
        self
    }

    /// Sleeps this long inside `connect` before succeeding.
    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = Some(delay);
        self
    }

    /// A session recording into this connector's log, without connecting.
    pub fn session(&self) -> RecordingSession {
        RecordingSession {
            log: self.log.clone(),
            script: self.script.clone(),
            polls: AtomicUsize::new(0),
            shared_polls: Arc::clone(&self.polls),
        }
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    /// Number of `connect` calls, successful or not.
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Number of readiness polls made on sessions from this connector.
    pub fn readiness_polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for RecordingConnector {
    async fn connect(&self, target: &Target) -> Result<Box<dyn RemoteSession>, SessionError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.connect_delay {
            tokio::time::sleep(delay).await;
        }
        if self.refuse {
            return Err(SessionError::Connect {
                address: target.socket_address(),
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            });
        }
        Ok(Box::new(self.session()))
    }
}
