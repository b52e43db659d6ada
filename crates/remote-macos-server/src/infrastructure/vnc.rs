//! VNC binding over the `vnc-rs` client.
//!
//! [`VncConnector`] dials the target over TCP and runs the RFB handshake
//! with classic VNC password authentication.  [`VncSession`] maps the
//! session primitives onto RFB key and pointer events:
//!
//! - keys are sent as X11 KeySyms resolved from each [`KeyToken`];
//! - the pointer message carries the absolute position together with the
//!   full button mask, so the session tracks both and re-sends them on every
//!   move, press and release;
//! - a screen capture asks for a full refresh and paints raw rectangles into
//!   a canvas until every pixel of the announced resolution is covered.
//!
//! `vnc-rs` negotiates only the VNC password security type, so
//! `MACOS_USERNAME` is accepted but not sent.

use std::time::Duration;

use async_trait::async_trait;
use remote_macos_core::{KeyToken, MouseButton, Target};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use vnc::{
    ClientKeyEvent, ClientMouseEvent, PixelFormat, Rect, VncClient, VncConnector as RfbConnector,
    VncEncoding, VncError, VncEvent, X11Event,
};

use crate::application::session::{Connector, Framebuffer, RemoteSession, SessionError};

fn protocol(err: VncError) -> SessionError {
    SessionError::Protocol(err.to_string())
}

// ── Connector ─────────────────────────────────────────────────────────────────

/// Opens [`VncSession`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct VncConnector;

#[async_trait]
impl Connector for VncConnector {
    async fn connect(&self, target: &Target) -> Result<Box<dyn RemoteSession>, SessionError> {
        let address = target.socket_address();
        let tcp = TcpStream::connect(&address)
            .await
            .map_err(|source| SessionError::Connect {
                address: address.clone(),
                source,
            })?;
        debug!(%address, "TCP connection established");

        if let Some(username) = &target.username {
            warn!(%username, "VNC password authentication only; username not sent");
        }

        let password = target.password.clone();
        let client = RfbConnector::new(tcp)
            .set_auth_method(async move { Ok(password) })
            .add_encoding(VncEncoding::Raw)
            .allow_shared(true)
            .set_pixel_format(PixelFormat::bgra())
            .build()
            .map_err(protocol)?
            .try_start()
            .await
            .map_err(protocol)?
            .finish()
            .map_err(protocol)?;

        info!(target = %target.display_name(), "VNC handshake complete");
        Ok(Box::new(VncSession::new(client, target.timeout)))
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Pointer position and held buttons, as last sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PointerState {
    x: u16,
    y: u16,
    mask: u8,
}

impl PointerState {
    fn moved_to(self, x: i32, y: i32) -> Self {
        Self {
            x: clamp_coordinate(x),
            y: clamp_coordinate(y),
            ..self
        }
    }

    fn pressed(self, button: MouseButton) -> Self {
        Self {
            mask: self.mask | button.mask(),
            ..self
        }
    }

    fn released(self, button: MouseButton) -> Self {
        Self {
            mask: self.mask & !button.mask(),
            ..self
        }
    }

    fn event(self) -> X11Event {
        X11Event::PointerEvent(ClientMouseEvent {
            position_x: self.x,
            position_y: self.y,
            bottons: self.mask,
        })
    }
}

/// RFB positions are unsigned 16-bit.
fn clamp_coordinate(value: i32) -> u16 {
    value.clamp(0, i32::from(u16::MAX)) as u16
}

/// A live VNC connection.
pub struct VncSession {
    client: Option<VncClient>,
    pointer: PointerState,
    capture_timeout: Duration,
}

impl VncSession {
    fn new(client: VncClient, capture_timeout: Duration) -> Self {
        Self {
            client: Some(client),
            pointer: PointerState::default(),
            capture_timeout,
        }
    }

    fn client(&self) -> Result<&VncClient, SessionError> {
        self.client.as_ref().ok_or(SessionError::Closed)
    }

    async fn send(&self, event: X11Event) -> Result<(), SessionError> {
        self.client()?.input(event).await.map_err(protocol)
    }

    async fn key(&self, key: &KeyToken, down: bool) -> Result<(), SessionError> {
        let keycode = key
            .keysym()
            .ok_or_else(|| SessionError::UnknownKey(key.to_string()))?;
        self.send(X11Event::KeyEvent(ClientKeyEvent { keycode, down }))
            .await
    }

    async fn update_pointer(&mut self, next: PointerState) -> Result<(), SessionError> {
        self.send(next.event()).await?;
        self.pointer = next;
        Ok(())
    }

    /// Reads events until a full frame has been painted.
    async fn collect_frame(&self) -> Result<Framebuffer, SessionError> {
        let client = self.client()?;
        let mut canvas: Option<Canvas> = None;
        loop {
            match client.recv_event().await.map_err(protocol)? {
                VncEvent::SetResolution(screen) => {
                    debug!(width = screen.width, height = screen.height, "Remote resolution");
                    canvas = Some(Canvas::new(screen.width, screen.height));
                }
                VncEvent::RawImage(rect, data) => {
                    let Some(canvas) = canvas.as_mut() else {
                        continue;
                    };
                    canvas.paint(&rect, &data);
                    if canvas.is_complete() {
                        return Ok(canvas.to_framebuffer());
                    }
                }
                _ => {}
            }
        }
    }
}

#[async_trait]
impl RemoteSession for VncSession {
    async fn key_press(&mut self, key: &KeyToken) -> Result<(), SessionError> {
        self.key(key, true).await?;
        self.key(key, false).await
    }

    async fn key_down(&mut self, key: &KeyToken) -> Result<(), SessionError> {
        self.key(key, true).await
    }

    async fn key_up(&mut self, key: &KeyToken) -> Result<(), SessionError> {
        self.key(key, false).await
    }

    async fn mouse_move(&mut self, x: i32, y: i32) -> Result<(), SessionError> {
        let next = self.pointer.moved_to(x, y);
        self.update_pointer(next).await
    }

    async fn mouse_press(&mut self, button: MouseButton) -> Result<(), SessionError> {
        self.mouse_down(button).await?;
        self.mouse_up(button).await
    }

    async fn mouse_down(&mut self, button: MouseButton) -> Result<(), SessionError> {
        let next = self.pointer.pressed(button);
        self.update_pointer(next).await
    }

    async fn mouse_up(&mut self, button: MouseButton) -> Result<(), SessionError> {
        let next = self.pointer.released(button);
        self.update_pointer(next).await
    }

    async fn capture_screen(&mut self) -> Result<Framebuffer, SessionError> {
        self.send(X11Event::Refresh).await?;
        timeout(self.capture_timeout, self.collect_frame())
            .await
            .map_err(|_| SessionError::Timeout(self.capture_timeout))?
    }

    async fn disconnect(&mut self) -> Result<(), SessionError> {
        match self.client.take() {
            Some(client) => client.close().await.map_err(protocol),
            None => Ok(()),
        }
    }
}

// ── Frame assembly ────────────────────────────────────────────────────────────

/// BGRA pixels received so far, plus how many of them have been painted.
#[derive(Debug)]
struct Canvas {
    width: u32,
    height: u32,
    bgra: Vec<u8>,
    painted: u64,
}

impl Canvas {
    fn new(width: u16, height: u16) -> Self {
        let (width, height) = (u32::from(width), u32::from(height));
        Self {
            width,
            height,
            bgra: vec![0; width as usize * height as usize * 4],
            painted: 0,
        }
    }

    /// Copies `data`, a `rect`-sized BGRA block, clipping to the canvas.
    fn paint(&mut self, rect: &Rect, data: &[u8]) {
        let (x, y) = (u32::from(rect.x), u32::from(rect.y));
        let (w, h) = (u32::from(rect.width), u32::from(rect.height));
        if x >= self.width || y >= self.height {
            return;
        }
        let visible_w = w.min(self.width - x) as usize;
        let visible_h = h.min(self.height - y);
        let src_stride = w as usize * 4;

        for row in 0..visible_h {
            let src = row as usize * src_stride;
            let Some(src_row) = data.get(src..src + visible_w * 4) else {
                break;
            };
            let dst = ((y + row) as usize * self.width as usize + x as usize) * 4;
            self.bgra[dst..dst + visible_w * 4].copy_from_slice(src_row);
            self.painted += visible_w as u64;
        }
    }

    fn is_complete(&self) -> bool {
        self.painted >= u64::from(self.width) * u64::from(self.height)
    }

    fn to_framebuffer(&self) -> Framebuffer {
        Framebuffer {
            width: self.width,
            height: self.height,
            rgba: bgra_to_rgba(&self.bgra),
        }
    }
}

/// Swaps the blue and red channels and forces full opacity; the server's
/// fourth byte is padding, not alpha.
fn bgra_to_rgba(bgra: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(bgra.len());
    for pixel in bgra.chunks_exact(4) {
        rgba.extend_from_slice(&[pixel[2], pixel[1], pixel[0], 0xFF]);
    }
    rgba
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: u16, y: u16, width: u16, height: u16) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    // ── Pointer state ─────────────────────────────────────────────────────────

    #[test]
    fn test_coordinates_clamp_to_u16() {
        assert_eq!(clamp_coordinate(-5), 0);
        assert_eq!(clamp_coordinate(1440), 1440);
        assert_eq!(clamp_coordinate(70_000), u16::MAX);
    }

    #[test]
    fn test_pointer_mask_tracks_held_buttons() {
        // Arrange
        let pointer = PointerState::default().moved_to(10, 20);

        // Act
        let both = pointer.pressed(MouseButton::Left).pressed(MouseButton::Right);
        let right_only = both.released(MouseButton::Left);

        // Assert
        assert_eq!(both.mask, 0b101);
        assert_eq!(right_only.mask, 0b100);
        assert_eq!((right_only.x, right_only.y), (10, 20));
    }

    #[test]
    fn test_move_keeps_held_buttons() {
        let dragging = PointerState::default().pressed(MouseButton::Left);

        let moved = dragging.moved_to(300, 400);

        assert_eq!(moved.mask, MouseButton::Left.mask());
    }

    // ── Frame assembly ────────────────────────────────────────────────────────

    #[test]
    fn test_bgra_to_rgba_swaps_channels_and_sets_alpha() {
        let rgba = bgra_to_rgba(&[0x10, 0x20, 0x30, 0x00]);
        assert_eq!(rgba, vec![0x30, 0x20, 0x10, 0xFF]);
    }

    #[test]
    fn test_canvas_completes_after_full_coverage() {
        // Arrange: a 2x2 screen sent as two 2x1 strips
        let mut canvas = Canvas::new(2, 2);
        let blue = [0xFF, 0x00, 0x00, 0x00, 0xFF, 0x00, 0x00, 0x00];

        // Act
        canvas.paint(&rect(0, 0, 2, 1), &blue);
        let after_first = canvas.is_complete();
        canvas.paint(&rect(0, 1, 2, 1), &blue);

        // Assert
        assert!(!after_first);
        assert!(canvas.is_complete());
        let frame = canvas.to_framebuffer();
        assert_eq!((frame.width, frame.height), (2, 2));
        assert!(frame.rgba.chunks_exact(4).all(|p| p == [0x00, 0x00, 0xFF, 0xFF]));
    }

    #[test]
    fn test_canvas_clips_rect_past_edge() {
        // Arrange: a 2x1 rect whose second column is off-screen
        let mut canvas = Canvas::new(1, 1);

        // Act
        canvas.paint(&rect(0, 0, 2, 1), &[1, 2, 3, 0, 9, 9, 9, 0]);

        // Assert
        assert!(canvas.is_complete());
        assert_eq!(canvas.to_framebuffer().rgba, vec![3, 2, 1, 0xFF]);
    }

    #[test]
    fn test_canvas_ignores_short_rect_data() {
        let mut canvas = Canvas::new(2, 2);

        canvas.paint(&rect(0, 0, 2, 2), &[0; 8]);

        assert!(!canvas.is_complete());
        assert_eq!(canvas.painted, 2);
    }
}
