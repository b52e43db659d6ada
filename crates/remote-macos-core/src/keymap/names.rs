//! Human-facing key names to [`KeyToken`]s.
//!
//! Three inputs reach this module:
//!
//! - **Literal text** (`send_keys(text=...)`): each character becomes one
//!   token.  Whitespace and control characters that have a dedicated key are
//!   mapped to it; everything else is typed as itself.
//! - **A special key** (`send_keys(special_key=...)`): a free-form key name
//!   such as "Enter", "page down" or "ESC".
//! - **A combination** (`send_keys(key_combination=...)`): `+`-separated parts
//!   such as "cmd+shift+T", where modifiers are recognised by any of their
//!   common names.
//!
//! All lookup tables are keyed by the lower-case, underscore-joined form of
//! the name.

use super::KeyToken;
use crate::input::InputError;

/// Maps a normalized special-key name to its token.
fn special_key(normalized: &str) -> Option<&'static str> {
    let token = match normalized {
        "enter" | "return" => "return",
        "backspace" => "bsp",
        "delete" | "del" => "delete",
        "tab" => "tab",
        "escape" | "esc" => "esc",
        "space" | "spacebar" => "space",
        "home" => "home",
        "end" => "end",
        "page_up" | "pageup" => "pgup",
        "page-down" | "page_down" | "pagedown" => "pgdn",
        "left" => "left",
        "up" => "up",
        "right" => "right",
        "down" => "down",
        _ => return None,
    };
    Some(token)
}

/// Maps a normalized modifier name to its token.
///
/// On macOS the Command key arrives as `super` and Option as `alt`.
fn modifier_key(normalized: &str) -> Option<&'static str> {
    let token = match normalized {
        "ctrl" | "control" => "ctrl",
        "shift" => "shift",
        "alt" | "option" => "alt",
        "cmd" | "command" | "meta" | "super" => "super",
        _ => return None,
    };
    Some(token)
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Token for one character of literal text.
pub fn text_key(ch: char) -> KeyToken {
    match ch {
        '\n' | '\r' => KeyToken::from("return"),
        '\t' => KeyToken::from("tab"),
        '\u{8}' => KeyToken::from("bsp"),
        ' ' => KeyToken::from("space"),
        other => KeyToken::new(other.to_string()),
    }
}

/// Normalizes a free-form special key name.
///
/// Unrecognised names pass through in normalized form, so "F5" becomes
/// "f5" and "q" stays "q".
///
/// # Errors
///
/// [`InputError::EmptyKeyName`] when the name is blank.
pub fn normalize_special_key(name: &str) -> Result<KeyToken, InputError> {
    let normalized = normalize_name(name);
    if normalized.is_empty() {
        return Err(InputError::EmptyKeyName);
    }
    Ok(match special_key(&normalized) {
        Some(token) => KeyToken::from(token),
        None => KeyToken::new(normalized),
    })
}

/// Normalizes one `+`-separated part of a key combination.
///
/// Lookup order: modifier names, special-key names, single characters (kept
/// in their original case so "T" types a capital), function keys `fN`, and
/// finally the trimmed part verbatim.
///
/// # Errors
///
/// [`InputError::EmptyCombinationPart`] when the part is blank.
pub fn normalize_combo_part(part: &str) -> Result<KeyToken, InputError> {
    let part = part.trim();
    if part.is_empty() {
        return Err(InputError::EmptyCombinationPart);
    }
    let lowered = part.to_lowercase().replace(' ', "_");

    if let Some(token) = modifier_key(&lowered).or_else(|| special_key(&lowered)) {
        return Ok(KeyToken::from(token));
    }
    if lowered.chars().count() == 1 {
        return Ok(KeyToken::from(part));
    }
    if is_function_key(&lowered) {
        return Ok(KeyToken::new(lowered));
    }
    Ok(KeyToken::from(part))
}

fn is_function_key(lowered: &str) -> bool {
    lowered
        .strip_prefix('f')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Splits a combination such as `"cmd + shift + t"` into ordered tokens.
///
/// Blank parts are dropped, so `"ctrl++c"` is `[ctrl, c]`.
///
/// # Errors
///
/// [`InputError::EmptyCombination`] when no non-blank part remains.
pub fn parse_combination(combination: &str) -> Result<Vec<KeyToken>, InputError> {
    let keys = combination
        .split('+')
        .filter(|part| !part.trim().is_empty())
        .map(normalize_combo_part)
        .collect::<Result<Vec<_>, _>>()?;
    if keys.is_empty() {
        return Err(InputError::EmptyCombination);
    }
    Ok(keys)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
