//! Input vocabulary and event planning.
//!
//! - **`button`** – [`MouseButton`](button::MouseButton) and its name parser.
//! - **`event`** – the primitive events a session understands and the
//!   ordered [`EventSequence`](event::EventSequence) they are replayed from.
//! - **`plan`** – builds sequences for each gesture (typing, chords, clicks,
//!   scrolling, dragging, the launcher gesture).  Planning is where argument
//!   validation happens, so a bad request fails before any session exists.

pub mod button;
pub mod event;
pub mod plan;

use thiserror::Error;

/// Invalid-argument errors raised while normalizing or planning input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("button must be 'left'|'middle'|'right', got {0:?}")]
    UnknownButton(String),
    #[error("special_key must be non-empty")]
    EmptyKeyName,
    #[error("empty key in combination")]
    EmptyCombinationPart,
    #[error("key_combination must contain at least one key")]
    EmptyCombination,
    #[error("{0} must be non-empty")]
    Empty(&'static str),
    #[error("provide text, special_key, or key_combination")]
    NothingToSend,
    #[error("{name} must be {requirement}, got {value}")]
    OutOfRange {
        name: &'static str,
        requirement: &'static str,
        value: i64,
    },
    #[error("key {0:?} has no keysym")]
    UnknownKey(String),
}
