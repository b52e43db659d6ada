//! Application layer: the remote-control use cases.
//!
//! Everything here depends on traits ([`session::RemoteSession`],
//! [`session::Connector`], [`remote_control::TargetProvider`]) rather than on
//! the VNC library or the process environment, so each use case runs against
//! recording doubles in tests.
//!
//! # Sub-modules
//!
//! - **`session`** – The primitive operations a remote-control session
//!   offers, the connector that opens one, and the transport error type.
//!
//! - **`connection`** – Timeout-bounded connect, the post-connect settle
//!   loop, and scoped acquisition with guaranteed disconnect.
//!
//! - **`replay`** – Executes a planned event sequence against a session and
//!   releases every key or button still held when it stops, on success and
//!   on failure alike.
//!
//! - **`screen`** – Framebuffer to PNG to base64.
//!
//! - **`remote_control`** – One method per tool: validate, resolve the
//!   target, acquire a session, replay, release.
//!
//! - **`responses`** – The records each tool returns.
//!
//! - **`error`** – [`error::ToolError`], the taxonomy callers see.

pub mod connection;
pub mod error;
pub mod remote_control;
pub mod replay;
pub mod responses;
pub mod screen;
pub mod session;
