//! The remote-control session seam.
//!
//! [`RemoteSession`] is the set of primitives the use cases are built from:
//! key press/down/up, pointer move, button press/down/up, screen capture and
//! disconnect.  [`Connector`] opens one.  The VNC binding lives in
//! `infrastructure::vnc`; tests use `infrastructure::recording`.

use std::time::Duration;

use async_trait::async_trait;
use remote_macos_core::{KeyToken, MouseButton, Target};
use thiserror::Error;

/// Transport failures from the session library.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("VNC protocol error: {0}")]
    Protocol(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("session is closed")]
    Closed,
    /// The token names no key the session can send.
    #[error("key {0:?} has no keysym")]
    UnknownKey(String),
}

/// A captured frame, row-major RGBA, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Framebuffer {
    /// A black, fully opaque frame.
    pub fn blank(width: u32, height: u32) -> Self {
        let mut rgba = vec![0u8; width as usize * height as usize * 4];
        for pixel in rgba.chunks_exact_mut(4) {
            pixel[3] = 0xFF;
        }
        Self {
            width,
            height,
            rgba,
        }
    }
}

/// An open connection to one target.
///
/// Owned exclusively by the call that opened it and disconnected before
/// that call returns.
#[async_trait]
pub trait RemoteSession: Send {
    /// Key down immediately followed by key up.
    async fn key_press(&mut self, key: &KeyToken) -> Result<(), SessionError>;

    async fn key_down(&mut self, key: &KeyToken) -> Result<(), SessionError>;

    async fn key_up(&mut self, key: &KeyToken) -> Result<(), SessionError>;

    /// Moves the pointer to an absolute framebuffer position.
    async fn mouse_move(&mut self, x: i32, y: i32) -> Result<(), SessionError>;

    /// Button down immediately followed by button up.
    async fn mouse_press(&mut self, button: MouseButton) -> Result<(), SessionError>;

    async fn mouse_down(&mut self, button: MouseButton) -> Result<(), SessionError>;

    async fn mouse_up(&mut self, button: MouseButton) -> Result<(), SessionError>;

    /// Captures the whole remote screen.
    async fn capture_screen(&mut self) -> Result<Framebuffer, SessionError>;

    /// Readiness flag polled by the settle loop.
    ///
    /// `None` means the session cannot tell, and is treated as ready.
    fn connected(&self) -> Option<bool> {
        None
    }

    async fn disconnect(&mut self) -> Result<(), SessionError>;
}

/// Opens sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connects and authenticates to `target`.
    ///
    /// The caller bounds this with `target.timeout`.
    async fn connect(&self, target: &Target) -> Result<Box<dyn RemoteSession>, SessionError>;
}
