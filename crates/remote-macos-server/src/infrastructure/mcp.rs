//! MCP tool surface.
//!
//! Registers one tool per [`RemoteControl`] operation with the `rmcp` tool
//! router.  Parameter records carry the documented defaults; results are
//! returned as structured JSON.  Invalid arguments map to JSON-RPC
//! `invalid_params`, everything else to `internal_error`, with the error's
//! display text as the message.

use std::sync::Arc;

use remote_macos_core::input::plan::ScrollDirection;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::ErrorData as McpError;
use rmcp::{tool, tool_router};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::application::error::ToolError;
use crate::application::remote_control::{DragRequest, RemoteControl, SendKeysRequest};

// ── Parameters ────────────────────────────────────────────────────────────────

fn default_button() -> String {
    "left".to_string()
}

fn default_scroll_amount() -> i64 {
    1
}

fn default_scroll_delay_ms() -> i64 {
    80
}

fn default_drag_ms() -> i64 {
    400
}

fn default_key_delay_ms() -> i64 {
    10
}

fn default_wait_ms() -> i64 {
    400
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct EchoInput {
    /// Text to echo back.
    pub message: String,
    /// Optional tag; "none" when omitted.
    #[serde(default)]
    pub tag: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct MoveInput {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ClickInput {
    pub x: i32,
    pub y: i32,
    /// left, middle or right (also l/m/r, button1..3, 1..3).
    #[serde(default = "default_button")]
    pub button: String,
    #[serde(default)]
    pub double: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DoubleClickInput {
    pub x: i32,
    pub y: i32,
    #[serde(default = "default_button")]
    pub button: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    #[default]
    Down,
}

impl From<Direction> for ScrollDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => ScrollDirection::Up,
            Direction::Down => ScrollDirection::Down,
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ScrollInput {
    #[serde(default)]
    pub direction: Direction,
    /// Page presses, at least 1.
    #[serde(default = "default_scroll_amount")]
    pub amount: i64,
    /// Pointer position before scrolling; used only when `y` is also given.
    #[serde(default)]
    pub x: Option<i32>,
    #[serde(default)]
    pub y: Option<i32>,
    /// Pause between presses.
    #[serde(default = "default_scroll_delay_ms")]
    pub delay_ms: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DragInput {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
    /// Total drag duration in milliseconds.
    #[serde(default = "default_drag_ms")]
    pub ms: i64,
    #[serde(default = "default_button")]
    pub button: String,
    /// Interpolation steps, at most 10000; derived from the duration when
    /// omitted.
    #[serde(default)]
    pub steps: Option<i64>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SendKeysInput {
    /// Literal text, typed one character at a time.
    #[serde(default)]
    pub text: Option<String>,
    /// A named key such as "enter", "tab" or "page_down".
    #[serde(default)]
    pub special_key: Option<String>,
    /// Keys joined with "+", e.g. "cmd+shift+t".
    #[serde(default)]
    pub key_combination: Option<String>,
    /// Pause after each typed character and each combination key.
    #[serde(default = "default_key_delay_ms")]
    pub delay_ms: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct OpenApplicationInput {
    /// Application name as typed into the launcher.
    pub name: String,
    /// Wait after typing before pressing return.
    #[serde(default = "default_wait_ms")]
    pub wait_ms: i64,
}

// ── Server ────────────────────────────────────────────────────────────────────

/// MCP server exposing the remote-control tools.
#[derive(Clone)]
pub struct RemoteMacosServer {
    control: Arc<RemoteControl>,
    tool_router: ToolRouter<Self>,
}

fn structured_output<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    serde_json::to_value(value)
        .map(CallToolResult::structured)
        .map_err(|e| McpError::internal_error(format!("Error serializing output: {e}"), None))
}

fn to_mcp_error(err: &ToolError) -> McpError {
    if err.is_invalid_argument() {
        McpError::invalid_params(err.to_string(), None)
    } else {
        McpError::internal_error(err.to_string(), None)
    }
}

/// Converts a use-case result into a tool result, logging failures.
fn respond<T: Serialize>(
    tool: &'static str,
    result: Result<T, ToolError>,
) -> Result<CallToolResult, McpError> {
    match result {
        Ok(value) => structured_output(&value),
        Err(err) => {
            warn!(tool, error = %err, "Tool call failed");
            Err(to_mcp_error(&err))
        }
    }
}

#[tool_router]
impl RemoteMacosServer {
    pub fn new(control: RemoteControl) -> Self {
        Self {
            control: Arc::new(control),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(name = "ping", description = "Health check; returns \"pong\".")]
    async fn ping(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(self.control.ping())]))
    }

    #[tool(
        name = "echo",
        description = "Returns the message and tag it was given. Returns JSON: {message, tag}."
    )]
    async fn echo(
        &self,
        Parameters(input): Parameters<EchoInput>,
    ) -> Result<CallToolResult, McpError> {
        structured_output(&self.control.echo(input.message, input.tag))
    }

    #[tool(
        name = "remote_macos_get_screen",
        description = "Capture the remote macOS screen as a base64 PNG. Returns JSON: {image_base64, width, height}."
    )]
    async fn remote_macos_get_screen(&self) -> Result<CallToolResult, McpError> {
        respond("remote_macos_get_screen", self.control.get_screen().await)
    }

    #[tool(
        name = "remote_macos_mouse_move",
        description = "Move the pointer to absolute screen coordinates. Returns JSON: {ok, x, y}."
    )]
    async fn remote_macos_mouse_move(
        &self,
        Parameters(input): Parameters<MoveInput>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            "remote_macos_mouse_move",
            self.control.mouse_move(input.x, input.y).await,
        )
    }

    #[tool(
        name = "remote_macos_mouse_click",
        description = "Move to (x, y) and click a mouse button, optionally twice. Returns JSON: {ok, x, y, button, clicks}."
    )]
    async fn remote_macos_mouse_click(
        &self,
        Parameters(input): Parameters<ClickInput>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            "remote_macos_mouse_click",
            self.control
                .mouse_click(input.x, input.y, &input.button, input.double)
                .await,
        )
    }

    #[tool(
        name = "remote_macos_mouse_double_click",
        description = "Move to (x, y) and double-click. Returns JSON: {ok, x, y, button, clicks}."
    )]
    async fn remote_macos_mouse_double_click(
        &self,
        Parameters(input): Parameters<DoubleClickInput>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            "remote_macos_mouse_double_click",
            self.control
                .mouse_double_click(input.x, input.y, &input.button)
                .await,
        )
    }

    #[tool(
        name = "remote_macos_mouse_scroll",
        description = "Scroll with Page Up / Page Down, optionally moving to (x, y) first. Returns JSON: {ok, direction, amount}."
    )]
    async fn remote_macos_mouse_scroll(
        &self,
        Parameters(input): Parameters<ScrollInput>,
    ) -> Result<CallToolResult, McpError> {
        let position = input.x.zip(input.y);
        respond(
            "remote_macos_mouse_scroll",
            self.control
                .mouse_scroll(input.direction.into(), input.amount, position, input.delay_ms)
                .await,
        )
    }

    #[tool(
        name = "remote_macos_mouse_drag_n_drop",
        description = "Press a button at (x0, y0), move in steps to (x1, y1) over ms milliseconds, then release. Returns JSON: {ok, start, end, steps, duration_ms, button}."
    )]
    async fn remote_macos_mouse_drag_n_drop(
        &self,
        Parameters(input): Parameters<DragInput>,
    ) -> Result<CallToolResult, McpError> {
        let request = DragRequest {
            from: (input.x0, input.y0),
            to: (input.x1, input.y1),
            duration_ms: input.ms,
            button: input.button,
            steps: input.steps,
        };
        respond(
            "remote_macos_mouse_drag_n_drop",
            self.control.mouse_drag_n_drop(request).await,
        )
    }

    #[tool(
        name = "remote_macos_send_keys",
        description = "Type text, press a special key and/or a key combination, in that order. At least one input is required. Returns JSON: {ok, actions}."
    )]
    async fn remote_macos_send_keys(
        &self,
        Parameters(input): Parameters<SendKeysInput>,
    ) -> Result<CallToolResult, McpError> {
        let request = SendKeysRequest {
            text: input.text,
            special_key: input.special_key,
            key_combination: input.key_combination,
            delay_ms: input.delay_ms,
        };
        respond(
            "remote_macos_send_keys",
            self.control.send_keys(request).await,
        )
    }

    #[tool(
        name = "remote_macos_open_application",
        description = "Open an application through the Spotlight launcher (Cmd+Space, type the name, Return). Returns JSON: {ok, application}."
    )]
    async fn remote_macos_open_application(
        &self,
        Parameters(input): Parameters<OpenApplicationInput>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            "remote_macos_open_application",
            self.control
                .open_application(&input.name, input.wait_ms)
                .await,
        )
    }
}

#[rmcp::tool_handler]
impl rmcp::ServerHandler for RemoteMacosServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Controls a remote macOS machine over VNC. The target comes from MACOS_HOST, \
                 MACOS_PORT, MACOS_USERNAME, MACOS_PASSWORD and MACOS_VNC_TIMEOUT, read on \
                 every call. Use remote_macos_get_screen to see the screen before acting."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
