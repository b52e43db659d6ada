//! Key name normalization and KeySym translation.
//!
//! The canonical representation is the [`KeyToken`]: a short lower-case name
//! for one physical key ("return", "pgdn", "super", "f5") or a single literal
//! character ("a", "A", "é").  Human input is normalized to tokens in
//! [`names`]; tokens are translated to X11 KeySyms for the RFB wire in
//! [`keysym`].

pub mod keysym;
pub mod names;

use std::fmt;

use serde::Serialize;

pub use keysym::token_to_keysym;
pub use names::{normalize_combo_part, normalize_special_key, parse_combination, text_key};

/// A normalized identifier for a single physical key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct KeyToken(String);

impl KeyToken {
    /// Wraps an already-normalized token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The X11 KeySym for this token, if it names a known key or a single
    /// character.
    pub fn keysym(&self) -> Option<u32> {
        token_to_keysym(&self.0)
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KeyToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl PartialEq<&str> for KeyToken {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
