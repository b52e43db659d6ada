//! Mouse button names.

use std::fmt;
use std::str::FromStr;

use super::InputError;

/// A mouse button, numbered the way VNC tooling numbers them (1, 2, 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left = 1,
    Middle = 2,
    Right = 3,
}

impl MouseButton {
    /// Parses a button name, case-insensitively.
    ///
    /// | Accepted names                   | Button |
    /// |----------------------------------|--------|
    /// | `left`, `l`, `button1`, `1`      | Left   |
    /// | `middle`, `m`, `button2`, `2`    | Middle |
    /// | `right`, `r`, `button3`, `3`     | Right  |
    ///
    /// # Errors
    ///
    /// [`InputError::UnknownButton`] for anything else.
    pub fn parse(name: &str) -> Result<Self, InputError> {
        match name.trim().to_lowercase().as_str() {
            "left" | "l" | "button1" | "1" => Ok(Self::Left),
            "middle" | "m" | "button2" | "2" => Ok(Self::Middle),
            "right" | "r" | "button3" | "3" => Ok(Self::Right),
            _ => Err(InputError::UnknownButton(name.to_string())),
        }
    }

    /// Sequential button number: 1, 2 or 3.
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Bit in the RFB `PointerEvent` button mask: 1, 2 or 4.
    pub fn mask(self) -> u8 {
        1 << (self.number() - 1)
    }
}

impl FromStr for MouseButton {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Left => "left",
            Self::Middle => "middle",
            Self::Right => "right",
        };
        f.write_str(name)
    }
}
