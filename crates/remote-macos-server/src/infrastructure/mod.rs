//! Infrastructure layer: adapters around the application layer.
//!
//! - [`vnc`]: the [`Connector`](crate::application::session::Connector) and
//!   session binding over the `vnc-rs` RFB client.
//! - [`env`]: the target provider reading `MACOS_*` variables.
//! - [`mcp`]: the MCP tool server (`rmcp`, stdio transport).
//! - [`recording`]: in-memory test doubles that log every primitive.
//!
//! Dependency rule: infrastructure depends on application, never the other
//! way round.

pub mod env;
pub mod mcp;
pub mod recording;
pub mod vnc;
