//! [`KeyToken`](super::KeyToken) to X11 KeySym translation.
//!
//! The RFB `KeyEvent` message carries an X11 KeySym, as defined in
//! X11/keysymdef.h.
//! Reference: https://gitlab.freedesktop.org/xorg/proto/xorgproto/-/blob/master/include/X11/keysymdef.h
//!
//! # Characters versus named keys
//!
//! Printable Latin-1 characters are their own KeySym (`'a'` = 0x0061,
//! `'A'` = 0x0041), so literal text needs no table.  Characters outside
//! Latin-1 use the Unicode KeySym range `0x0100_0000 + code point`.
//!
//! Named tokens ("return", "pgdn", "super") use the function-key block
//! 0xFFxx.  On a macOS VNC server `super` arrives as Command and `alt` as
//! Option.

/// First function-key KeySym (`XK_F1`); `XK_Fn` = `XK_F1 + n - 1`.
const XK_F1: u32 = 0xFFBE;

/// Highest function key with a KeySym (`XK_F35`).
const MAX_FUNCTION_KEY: u32 = 35;

/// Offset for Unicode KeySyms outside Latin-1.
const UNICODE_KEYSYM_OFFSET: u32 = 0x0100_0000;

/// Translates a key token to an X11 KeySym.
///
/// Returns `None` for multi-character tokens that name no known key.
pub fn token_to_keysym(token: &str) -> Option<u32> {
    if let Some(keysym) = named_keysym(token) {
        return Some(keysym);
    }
    if let Some(keysym) = function_keysym(token) {
        return Some(keysym);
    }
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(char_keysym(ch)),
        _ => None,
    }
}

fn named_keysym(token: &str) -> Option<u32> {
    let keysym = match token {
        // Editing and navigation
        "bsp" => 0xFF08,                // XK_BackSpace
        "tab" => 0xFF09,                // XK_Tab
        "return" | "enter" => 0xFF0D,   // XK_Return
        "esc" => 0xFF1B,                // XK_Escape
        "ins" => 0xFF63,                // XK_Insert
        "delete" | "del" => 0xFFFF,     // XK_Delete
        "home" => 0xFF50,               // XK_Home
        "end" => 0xFF57,                // XK_End
        "pgup" => 0xFF55,               // XK_Page_Up
        "pgdn" => 0xFF56,               // XK_Page_Down
        "left" => 0xFF51,               // XK_Left
        "up" => 0xFF52,                 // XK_Up
        "right" => 0xFF53,              // XK_Right
        "down" => 0xFF54,               // XK_Down
        "space" | "spacebar" | "sb" => 0x0020, // XK_space
        "slash" | "fslash" => 0x002F,   // XK_slash
        "bslash" => 0x005C,             // XK_backslash
        "menu" => 0xFF67,               // XK_Menu
        "prtscr" | "sysrq" => 0xFF61,   // XK_Print
        "pause" => 0xFF13,              // XK_Pause

        // Locks
        "caplk" => 0xFFE5, // XK_Caps_Lock
        "numlk" => 0xFF7F, // XK_Num_Lock
        "scrlk" => 0xFF14, // XK_Scroll_Lock

        // Modifiers
        "shift" | "lshift" => 0xFFE1, // XK_Shift_L
        "rshift" => 0xFFE2,           // XK_Shift_R
        "ctrl" | "lctrl" => 0xFFE3,   // XK_Control_L
        "rctrl" => 0xFFE4,            // XK_Control_R
        "meta" | "lmeta" => 0xFFE7,   // XK_Meta_L
        "rmeta" => 0xFFE8,            // XK_Meta_R
        "alt" | "lalt" => 0xFFE9,     // XK_Alt_L
        "ralt" => 0xFFEA,             // XK_Alt_R
        "super" | "lsuper" => 0xFFEB, // XK_Super_L
        "rsuper" => 0xFFEC,           // XK_Super_R
        "hyper" | "lhyper" => 0xFFED, // XK_Hyper_L
        "rhyper" => 0xFFEE,           // XK_Hyper_R

        // Keypad
        "kp0" => 0xFFB0,
        "kp1" => 0xFFB1,
        "kp2" => 0xFFB2,
        "kp3" => 0xFFB3,
        "kp4" => 0xFFB4,
        "kp5" => 0xFFB5,
        "kp6" => 0xFFB6,
        "kp7" => 0xFFB7,
        "kp8" => 0xFFB8,
        "kp9" => 0xFFB9,
        "kpenter" => 0xFF8D, // XK_KP_Enter

        _ => return None,
    };
    Some(keysym)
}

/// `f1`..`f35`.
fn function_keysym(token: &str) -> Option<u32> {
    let n: u32 = token.strip_prefix('f')?.parse().ok()?;
    (1..=MAX_FUNCTION_KEY)
        .contains(&n)
        .then(|| XK_F1 + n - 1)
}

fn char_keysym(ch: char) -> u32 {
    let code = u32::from(ch);
    if code <= 0xFF {
        code
    } else {
        UNICODE_KEYSYM_OFFSET + code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_editing_keys() {
        assert_eq!(token_to_keysym("return"), Some(0xFF0D));
        assert_eq!(token_to_keysym("bsp"), Some(0xFF08));
        assert_eq!(token_to_keysym("esc"), Some(0xFF1B));
        assert_eq!(token_to_keysym("delete"), Some(0xFFFF));
        assert_eq!(token_to_keysym("space"), Some(0x0020));
    }

    #[test]
    fn test_every_normalizer_output_has_a_keysym() {
        for token in [
            "return", "bsp", "delete", "tab", "esc", "space", "home", "end", "pgup", "pgdn",
            "left", "up", "right", "down", "ctrl", "shift", "alt", "super",
        ] {
            assert!(
                token_to_keysym(token).is_some(),
                "{token:?} should have an X11 keysym"
            );
        }
    }

    #[test]
    fn test_arrow_keys_have_correct_x11_keysyms() {
        assert_eq!(token_to_keysym("left"), Some(0xFF51));
        assert_eq!(token_to_keysym("up"), Some(0xFF52));
        assert_eq!(token_to_keysym("right"), Some(0xFF53));
        assert_eq!(token_to_keysym("down"), Some(0xFF54));
    }

    #[test]
    fn test_function_keys() {
        assert_eq!(token_to_keysym("f1"), Some(0xFFBE));
        assert_eq!(token_to_keysym("f12"), Some(0xFFC9));
        assert_eq!(token_to_keysym("f35"), Some(0xFFE0));
        assert_eq!(token_to_keysym("f0"), None);
        assert_eq!(token_to_keysym("f36"), None);
    }

    #[test]
    fn test_latin1_characters_are_their_own_keysym() {
        assert_eq!(token_to_keysym("a"), Some(0x0061));
        assert_eq!(token_to_keysym("A"), Some(0x0041));
        assert_eq!(token_to_keysym("f"), Some(0x0066));
        assert_eq!(token_to_keysym("é"), Some(0x00E9));
    }

    #[test]
    fn test_non_latin1_characters_use_unicode_keysyms() {
        assert_eq!(token_to_keysym("€"), Some(0x0100_20AC));
    }

    #[test]
    fn test_unknown_multi_character_token_returns_none() {
        assert_eq!(token_to_keysym("caps_lock"), None);
        assert_eq!(token_to_keysym("Fn"), None);
        assert_eq!(token_to_keysym(""), None);
    }
}
