//! RemoteControl: one method per tool.
//!
//! Every input tool follows the same shape:
//!
//! 1. Validate arguments and plan the event sequence (no I/O).
//! 2. Resolve the [`Target`] from configuration, fresh on every call.
//! 3. Acquire a session, replay the plan, release the session.
//!
//! `send_keys` is the exception to step 1: it checks only that some input
//! was given and that the delay is non-negative before connecting; the
//! special key and combination are normalized inside the session, before
//! any key is sent.

use std::sync::Arc;

use remote_macos_core::input::plan::{self, ScrollDirection};
use remote_macos_core::keymap::{normalize_special_key, parse_combination};
use remote_macos_core::{ConfigError, EventSequence, InputError, InputEvent, MouseButton, Target};
use tracing::info;

use super::connection::ConnectionManager;
use super::error::ToolError;
use super::replay::replay;
use super::responses::{
    ClickResponse, DragResponse, EchoResponse, KeyAction, MoveResponse, OpenApplicationResponse,
    Point, ScreenCapture, ScrollResponse, SendKeysResponse,
};
use super::screen::encode_png;
use super::session::{Connector, RemoteSession};

/// Supplies the connection target for each call.
pub trait TargetProvider: Send + Sync {
    fn target(&self) -> Result<Target, ConfigError>;
}

/// A fixed target, or a fixed configuration error.
impl TargetProvider for Result<Target, ConfigError> {
    fn target(&self) -> Result<Target, ConfigError> {
        self.clone()
    }
}

/// Arguments for [`RemoteControl::mouse_drag_n_drop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragRequest {
    pub from: (i32, i32),
    pub to: (i32, i32),
    pub duration_ms: i64,
    pub button: String,
    pub steps: Option<i64>,
}

/// Arguments for [`RemoteControl::send_keys`].  Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendKeysRequest {
    pub text: Option<String>,
    pub special_key: Option<String>,
    pub key_combination: Option<String>,
    pub delay_ms: i64,
}

/// The remote-control use cases.
pub struct RemoteControl {
    targets: Arc<dyn TargetProvider>,
    connections: ConnectionManager,
}

impl RemoteControl {
    pub fn new(targets: Arc<dyn TargetProvider>, connector: Arc<dyn Connector>) -> Self {
        Self {
            targets,
            connections: ConnectionManager::new(connector),
        }
    }

    // ── Health ────────────────────────────────────────────────────────────────

    pub fn ping(&self) -> &'static str {
        "pong"
    }

    pub fn echo(&self, message: String, tag: Option<String>) -> EchoResponse {
        EchoResponse {
            message,
            tag: tag.unwrap_or_else(|| "none".to_string()),
        }
    }

    /// Connects, settles and disconnects; returns the target's `host::port`.
    pub async fn probe(&self) -> Result<String, ToolError> {
        let target = self.targets.target()?;
        let session = self.connections.acquire(&target).await?;
        self.connections.release(session).await?;
        Ok(target.display_name())
    }

    // ── Screen ────────────────────────────────────────────────────────────────

    pub async fn get_screen(&self) -> Result<ScreenCapture, ToolError> {
        let target = self.targets.target()?;
        info!(tool = "get_screen", "Capturing remote screen");
        self.connections
            .with_session(&target, |session| Box::pin(capture(session)))
            .await
    }

    // ── Mouse ─────────────────────────────────────────────────────────────────

    pub async fn mouse_move(&self, x: i32, y: i32) -> Result<MoveResponse, ToolError> {
        let mut events = EventSequence::new();
        events.push(InputEvent::MouseMove { x, y });
        info!(tool = "mouse_move", x, y, "Moving pointer");
        self.perform(events).await?;
        Ok(MoveResponse { ok: true, x, y })
    }

    pub async fn mouse_click(
        &self,
        x: i32,
        y: i32,
        button: &str,
        double: bool,
    ) -> Result<ClickResponse, ToolError> {
        let button = MouseButton::parse(button)?;
        let events = plan::click(x, y, button, double);
        info!(tool = "mouse_click", x, y, %button, double, "Clicking");
        self.perform(events).await?;
        Ok(ClickResponse {
            ok: true,
            x,
            y,
            button: button.to_string(),
            clicks: if double { 2 } else { 1 },
        })
    }

    pub async fn mouse_double_click(
        &self,
        x: i32,
        y: i32,
        button: &str,
    ) -> Result<ClickResponse, ToolError> {
        self.mouse_click(x, y, button, true).await
    }

    /// Scrolls with Page Up / Page Down.  `position` is `Some` only when
    /// both coordinates were given.
    pub async fn mouse_scroll(
        &self,
        direction: ScrollDirection,
        amount: i64,
        position: Option<(i32, i32)>,
        delay_ms: i64,
    ) -> Result<ScrollResponse, ToolError> {
        let events = plan::scroll(direction, amount, position, delay_ms)?;
        info!(tool = "mouse_scroll", direction = direction.as_str(), amount, "Scrolling");
        self.perform(events).await?;
        Ok(ScrollResponse {
            ok: true,
            direction: direction.as_str().to_string(),
            amount,
        })
    }

    pub async fn mouse_drag_n_drop(&self, request: DragRequest) -> Result<DragResponse, ToolError> {
        let button = MouseButton::parse(&request.button)?;
        let drag = plan::drag(
            request.from,
            request.to,
            request.duration_ms,
            button,
            request.steps,
        )?;
        info!(
            tool = "mouse_drag_n_drop",
            from = ?request.from,
            to = ?request.to,
            steps = drag.steps,
            "Dragging"
        );
        self.perform(drag.events).await?;
        Ok(DragResponse {
            ok: true,
            start: Point {
                x: request.from.0,
                y: request.from.1,
            },
            end: Point {
                x: request.to.0,
                y: request.to.1,
            },
            steps: drag.steps,
            duration_ms: request.duration_ms,
            button: button.to_string(),
        })
    }

    // ── Keyboard ──────────────────────────────────────────────────────────────

    pub async fn send_keys(&self, request: SendKeysRequest) -> Result<SendKeysResponse, ToolError> {
        let inputs = KeyInputs {
            text: request.text.filter(|s| !s.is_empty()),
            special_key: request.special_key.filter(|s| !s.is_empty()),
            key_combination: request.key_combination.filter(|s| !s.is_empty()),
        };
        if inputs.is_empty() {
            return Err(InputError::NothingToSend.into());
        }
        let delay = plan::non_negative_millis("delay_ms", request.delay_ms)?;

        let target = self.targets.target()?;
        info!(tool = "send_keys", "Sending keys");
        let actions = self
            .connections
            .with_session(&target, move |session| {
                Box::pin(send_key_inputs(session, inputs, delay))
            })
            .await?;
        Ok(SendKeysResponse { ok: true, actions })
    }

    pub async fn open_application(
        &self,
        name: &str,
        wait_ms: i64,
    ) -> Result<OpenApplicationResponse, ToolError> {
        let events = plan::open_application(name, wait_ms)?;
        info!(tool = "open_application", application = name, "Opening application");
        self.perform(events).await?;
        Ok(OpenApplicationResponse {
            ok: true,
            application: name.to_string(),
        })
    }

    /// Resolves the target and replays `events` in a scoped session.
    async fn perform(&self, events: EventSequence) -> Result<(), ToolError> {
        let target = self.targets.target()?;
        self.connections
            .with_session(&target, move |session| Box::pin(replay_owned(session, events)))
            .await
    }
}

// ── Session bodies ────────────────────────────────────────────────────────────

async fn capture(session: &mut dyn RemoteSession) -> Result<ScreenCapture, ToolError> {
    let frame = session.capture_screen().await?;
    encode_png(frame)
}

async fn replay_owned(
    session: &mut dyn RemoteSession,
    events: EventSequence,
) -> Result<(), ToolError> {
    Ok(replay(session, &events).await?)
}

/// The non-empty `send_keys` inputs.
struct KeyInputs {
    text: Option<String>,
    special_key: Option<String>,
    key_combination: Option<String>,
}

impl KeyInputs {
    fn is_empty(&self) -> bool {
        self.text.is_none() && self.special_key.is_none() && self.key_combination.is_none()
    }
}

/// Normalizes and plans every input group, then replays them as one
/// sequence: text, then the special key, then the combination.
async fn send_key_inputs(
    session: &mut dyn RemoteSession,
    inputs: KeyInputs,
    delay: std::time::Duration,
) -> Result<Vec<KeyAction>, ToolError> {
    let mut events = EventSequence::new();
    let mut actions = Vec::new();

    if let Some(text) = &inputs.text {
        events.append(plan::type_text(text, delay));
        actions.push(KeyAction::Text {
            characters: text.chars().count(),
        });
    }
    if let Some(name) = &inputs.special_key {
        let key = normalize_special_key(name)?;
        events.append(plan::press_key(key.clone()));
        actions.push(KeyAction::Special { key });
    }
    if let Some(combination) = &inputs.key_combination {
        let keys = parse_combination(combination)?;
        events.append(plan::press_combination(&keys, delay));
        actions.push(KeyAction::Combination { keys });
    }

    replay(session, &events).await?;
    Ok(actions)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::infrastructure::recording::{RecordingConnector, SessionCall};

    fn target() -> Target {
        Target {
            host: "mac.local".to_string(),
            port: 5900,
            username: None,
            password: "secret".to_string(),
            timeout: Duration::from_secs(1),
        }
    }

    fn control(connector: &Arc<RecordingConnector>) -> RemoteControl {
        RemoteControl::new(
            Arc::new(Ok::<_, ConfigError>(target())),
            Arc::clone(connector) as Arc<dyn Connector>,
        )
    }

    #[test]
    fn test_ping_and_echo() {
        let control = control(&Arc::new(RecordingConnector::new()));

        assert_eq!(control.ping(), "pong");
        assert_eq!(
            control.echo("hi".into(), None),
            EchoResponse {
                message: "hi".into(),
                tag: "none".into()
            }
        );
        assert_eq!(control.echo("hi".into(), Some("t".into())).tag, "t");
    }

    #[tokio::test]
    async fn test_config_error_is_raised_before_connecting() {
        // Arrange
        let connector = Arc::new(RecordingConnector::new());
        let control = RemoteControl::new(
            Arc::new(Err::<Target, _>(ConfigError::Missing("MACOS_HOST"))),
            Arc::clone(&connector) as Arc<dyn Connector>,
        );

        // Act
        let err = control.mouse_move(1, 1).await.unwrap_err();

        // Assert
        assert!(matches!(err, ToolError::Config(_)));
        assert_eq!(connector.connects(), 0);
    }

    #[tokio::test]
    async fn test_click_reports_canonical_button_name() {
        let connector = Arc::new(RecordingConnector::new());

        let response = control(&connector)
            .mouse_click(3, 4, "R", false)
            .await
            .unwrap();

        assert_eq!(response.button, "right");
        assert_eq!(response.clicks, 1);
    }

    #[tokio::test]
    async fn test_unknown_button_fails_before_connecting() {
        let connector = Arc::new(RecordingConnector::new());

        let err = control(&connector)
            .mouse_click(3, 4, "wheel", false)
            .await
            .unwrap_err();

        assert!(err.is_invalid_argument());
        assert_eq!(connector.connects(), 0);
    }

    #[tokio::test]
    async fn test_send_keys_orders_text_special_then_combination() {
        // Arrange
        let connector = Arc::new(RecordingConnector::new());
        let log = connector.log();
        let request = SendKeysRequest {
            text: Some("hi".into()),
            special_key: Some("Enter".into()),
            key_combination: Some("cmd+a".into()),
            delay_ms: 0,
        };

        // Act
        let response = control(&connector).send_keys(request).await.unwrap();

        // Assert
        assert_eq!(
            log.primitives(),
            vec![
                SessionCall::KeyPress("h".into()),
                SessionCall::KeyPress("i".into()),
                SessionCall::KeyPress("return".into()),
                SessionCall::KeyDown("super".into()),
                SessionCall::KeyDown("a".into()),
                SessionCall::KeyUp("a".into()),
                SessionCall::KeyUp("super".into()),
            ]
        );
        assert_eq!(response.actions.len(), 3);
    }

    #[tokio::test]
    async fn test_send_keys_bad_combination_sends_no_text() {
        // Arrange: valid text followed by an empty combination
        let connector = Arc::new(RecordingConnector::new());
        let log = connector.log();
        let request = SendKeysRequest {
            text: Some("abc".into()),
            key_combination: Some(" + ".into()),
            ..Default::default()
        };

        // Act
        let err = control(&connector).send_keys(request).await.unwrap_err();

        // Assert
        assert!(err.is_invalid_argument());
        assert_eq!(log.calls(), vec![SessionCall::Disconnect]);
    }
}
