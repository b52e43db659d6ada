//! # remote-macos-core
//!
//! Shared, I/O-free logic for the remote-macos control adapter.
//!
//! The adapter drives a macOS machine over a VNC session: it captures the
//! screen and injects synthetic keyboard and mouse input.  Everything in this
//! crate is pure: no sockets, no clocks, no environment reads.  The server
//! crate owns the session and replays what this crate plans.
//!
//! # Modules
//!
//! - **`target`** – Turns raw configuration strings (host, port, credentials,
//!   timeout) into a validated [`Target`].  Handles bracketed IPv6 literals
//!   and the `host:port` / `host::port` embedded-port shapes.
//!
//! - **`keymap`** – Normalizes human-facing key names ("Enter", "cmd",
//!   "Page Down") into the primitive [`KeyToken`] vocabulary, and maps each
//!   token to the X11 KeySym the RFB protocol transmits.
//!
//! - **`input`** – Mouse button parsing and the event planner: text typing,
//!   chorded combinations, clicks, scrolls, drags and the launcher gesture are
//!   all expressed as an ordered [`EventSequence`] of timed primitive events.

pub mod input;
pub mod keymap;
pub mod target;

pub use input::{
    button::MouseButton,
    event::{EventSequence, InputEvent, TimedEvent},
    InputError,
};
pub use keymap::KeyToken;
pub use target::{ConfigError, Target};
