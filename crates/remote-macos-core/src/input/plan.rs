//! Event planners: one function per gesture.
//!
//! Each planner validates its arguments and returns the [`EventSequence`]
//! the session replays.  Nothing here sleeps or talks to a socket; pauses
//! are recorded on the events and honoured by the replayer.
//!
//! # Timing constants
//!
//! | Gesture             | Pause                                   |
//! |---------------------|-----------------------------------------|
//! | Double-click        | 60 ms between the two presses           |
//! | Launcher open       | 250 ms after releasing `super`          |
//! | Launcher typing     | 10 ms after every character             |
//! | Drag                | `duration / steps` after every step     |

use std::time::Duration;

use super::button::MouseButton;
use super::event::{EventSequence, InputEvent};
use super::InputError;
use crate::keymap::{text_key, KeyToken};

/// Pause between the two presses of a double-click.
pub const DOUBLE_CLICK_PAUSE: Duration = Duration::from_millis(60);

/// Pause after the launcher shortcut, before typing the application name.
pub const LAUNCHER_SETTLE: Duration = Duration::from_millis(250);

/// Per-character delay when typing into the launcher.
pub const LAUNCHER_TYPING_DELAY: Duration = Duration::from_millis(10);

/// Fewest interpolation steps a drag may use.
pub const MIN_DRAG_STEPS: u32 = 2;

/// Default step count floor when the caller does not choose one.
pub const DEFAULT_DRAG_STEPS: u32 = 8;

/// One default drag step per this many milliseconds of duration.
pub const DRAG_FRAME_MS: u64 = 16;

/// Upper bound on drag steps and scroll repeats.
pub const MAX_REPEAT: u32 = 10_000;

// ── Keyboard ──────────────────────────────────────────────────────────────────

/// Types `text` one key press per character, pausing `per_char` after each.
pub fn type_text(text: &str, per_char: Duration) -> EventSequence {
    let mut seq = EventSequence::new();
    for ch in text.chars() {
        seq.push(InputEvent::KeyPress(text_key(ch))).pause(per_char);
    }
    seq
}

/// A single atomic key press.
pub fn press_key(key: KeyToken) -> EventSequence {
    let mut seq = EventSequence::new();
    seq.push(InputEvent::KeyPress(key));
    seq
}

/// Holds every key in order, pauses once for `hold`, then releases them in
/// reverse order.
pub fn press_combination(keys: &[KeyToken], hold: Duration) -> EventSequence {
    let mut seq = EventSequence::new();
    for key in keys {
        seq.push(InputEvent::KeyDown(key.clone()));
    }
    seq.pause(hold);
    for key in keys.iter().rev() {
        seq.push(InputEvent::KeyUp(key.clone()));
    }
    seq
}

// ── Mouse ─────────────────────────────────────────────────────────────────────

/// Moves to `(x, y)` and clicks once, or twice with
/// [`DOUBLE_CLICK_PAUSE`] between the presses.
pub fn click(x: i32, y: i32, button: MouseButton, double: bool) -> EventSequence {
    let mut seq = EventSequence::new();
    seq.push(InputEvent::MouseMove { x, y })
        .push(InputEvent::MousePress(button));
    if double {
        seq.pause(DOUBLE_CLICK_PAUSE)
            .push(InputEvent::MousePress(button));
    }
    seq
}

/// Scroll direction, emulated with Page Up / Page Down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    pub fn key(self) -> KeyToken {
        match self {
            Self::Up => KeyToken::from("pgup"),
            Self::Down => KeyToken::from("pgdn"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// Presses Page Up / Page Down `amount` times, optionally moving the cursor
/// to `position` first.
///
/// `delay_ms` is paused between repeats, not after the last one.
///
/// # Errors
///
/// [`InputError::OutOfRange`] when `amount` is not in `1..=MAX_REPEAT` or
/// `delay_ms` is negative.
pub fn scroll(
    direction: ScrollDirection,
    amount: i64,
    position: Option<(i32, i32)>,
    delay_ms: i64,
) -> Result<EventSequence, InputError> {
    if !(1..=i64::from(MAX_REPEAT)).contains(&amount) {
        return Err(InputError::OutOfRange {
            name: "amount",
            requirement: "between 1 and 10000",
            value: amount,
        });
    }
    let delay = non_negative_millis("delay_ms", delay_ms)?;

    let mut seq = EventSequence::new();
    if let Some((x, y)) = position {
        seq.push(InputEvent::MouseMove { x, y });
    }
    let key = direction.key();
    for i in 0..amount {
        seq.push(InputEvent::KeyPress(key.clone()));
        if i < amount - 1 {
            seq.pause(delay);
        }
    }
    Ok(seq)
}

/// Number of interpolation steps for a drag of `duration_ms`.
///
/// An explicit request wins and is floored at [`MIN_DRAG_STEPS`].
/// Otherwise one step per [`DRAG_FRAME_MS`] with a floor of
/// [`DEFAULT_DRAG_STEPS`], capped at [`MAX_REPEAT`].
///
/// # Errors
///
/// [`InputError::OutOfRange`] when an explicit request exceeds
/// [`MAX_REPEAT`].
pub fn drag_steps(duration_ms: u64, requested: Option<i64>) -> Result<u32, InputError> {
    match requested {
        Some(steps) if steps > i64::from(MAX_REPEAT) => Err(InputError::OutOfRange {
            name: "steps",
            requirement: "at most 10000",
            value: steps,
        }),
        Some(steps) => Ok(steps.max(i64::from(MIN_DRAG_STEPS)) as u32),
        None => Ok((duration_ms / DRAG_FRAME_MS)
            .clamp(u64::from(DEFAULT_DRAG_STEPS), u64::from(MAX_REPEAT))
            as u32),
    }
}

/// A planned drag and the step count it uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPlan {
    pub events: EventSequence,
    pub steps: u32,
}

/// Presses `button` at `from`, moves to `to` in [`drag_steps`] linear steps
/// spread over `duration_ms`, then releases.
///
/// Intermediate positions truncate toward zero; the last step lands exactly
/// on `to`.
///
/// # Errors
///
/// [`InputError::OutOfRange`] when `duration_ms` is negative or an explicit
/// `steps` exceeds [`MAX_REPEAT`].
pub fn drag(
    from: (i32, i32),
    to: (i32, i32),
    duration_ms: i64,
    button: MouseButton,
    steps: Option<i64>,
) -> Result<DragPlan, InputError> {
    let duration = non_negative_millis("ms", duration_ms)?;
    let steps = drag_steps(duration_ms as u64, steps)?;
    let step_pause = duration / steps;

    let mut events = EventSequence::new();
    events
        .push(InputEvent::MouseMove {
            x: from.0,
            y: from.1,
        })
        .push(InputEvent::MouseDown(button));
    for i in 1..=steps {
        let x = interpolate(from.0, to.0, i, steps);
        let y = interpolate(from.1, to.1, i, steps);
        events.push(InputEvent::MouseMove { x, y }).pause(step_pause);
    }
    events.push(InputEvent::MouseUp(button));

    Ok(DragPlan { events, steps })
}

/// `start + (end - start) * step / steps`, truncated toward zero.
fn interpolate(start: i32, end: i32, step: u32, steps: u32) -> i32 {
    let (start, end) = (i64::from(start), i64::from(end));
    let scaled = start * i64::from(steps) + (end - start) * i64::from(step);
    (scaled / i64::from(steps)) as i32
}

// ── Launcher ──────────────────────────────────────────────────────────────────

/// The launcher gesture: `super`+`space`, pause, type `name`, wait
/// `wait_ms`, then `return`.
///
/// # Errors
///
/// [`InputError::Empty`] for a blank name, [`InputError::OutOfRange`] for a
/// negative wait.
pub fn open_application(name: &str, wait_ms: i64) -> Result<EventSequence, InputError> {
    if name.trim().is_empty() {
        return Err(InputError::Empty("name"));
    }
    let wait = non_negative_millis("wait_ms", wait_ms)?;

    let launcher = KeyToken::from("super");
    let mut seq = EventSequence::new();
    seq.push(InputEvent::KeyDown(launcher.clone()))
        .push(InputEvent::KeyPress(KeyToken::from("space")))
        .push(InputEvent::KeyUp(launcher))
        .pause(LAUNCHER_SETTLE);
    seq.append(type_text(name, LAUNCHER_TYPING_DELAY));
    seq.pause(wait)
        .push(InputEvent::KeyPress(KeyToken::from("return")));
    Ok(seq)
}

/// Converts a millisecond argument to a [`Duration`], rejecting negatives.
///
/// # Errors
///
/// [`InputError::OutOfRange`] naming `name` when `ms < 0`.
pub fn non_negative_millis(name: &'static str, ms: i64) -> Result<Duration, InputError> {
    u64::try_from(ms)
        .map(Duration::from_millis)
        .map_err(|_| InputError::OutOfRange {
            name,
            requirement: ">= 0",
            value: ms,
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn events(seq: &EventSequence) -> Vec<InputEvent> {
        seq.events().cloned().collect()
    }

    fn key(token: &str) -> KeyToken {
        KeyToken::from(token)
    }

    fn count<F: Fn(&InputEvent) -> bool>(seq: &EventSequence, pred: F) -> usize {
        seq.events().filter(|e| pred(e)).count()
    }

    // ── Typing ────────────────────────────────────────────────────────────────

    #[test]
    fn test_type_text_presses_each_character_in_order() {
        // Arrange / Act
        let seq = type_text("a b\n", Duration::from_millis(10));

        // Assert
        assert_eq!(
            events(&seq),
            vec![
                InputEvent::KeyPress(key("a")),
                InputEvent::KeyPress(key("space")),
                InputEvent::KeyPress(key("b")),
                InputEvent::KeyPress(key("return")),
            ]
        );
        assert!(seq
            .iter()
            .all(|e| e.pause == Some(Duration::from_millis(10))));
    }

    #[test]
    fn test_type_text_zero_delay_has_no_pauses() {
        let seq = type_text("hi", Duration::ZERO);
        assert_eq!(seq.total_pause(), Duration::ZERO);
    }

    #[test]
    fn test_type_text_counts_characters_not_bytes() {
        assert_eq!(type_text("héllo", Duration::ZERO).len(), 5);
    }

    // ── Combinations ──────────────────────────────────────────────────────────

    #[test]
    fn test_combination_releases_in_reverse_order() {
        // Arrange
        let keys = [key("super"), key("shift"), key("T")];

        // Act
        let seq = press_combination(&keys, Duration::from_millis(10));

        // Assert
        assert_eq!(
            events(&seq),
            vec![
                InputEvent::KeyDown(key("super")),
                InputEvent::KeyDown(key("shift")),
                InputEvent::KeyDown(key("T")),
                InputEvent::KeyUp(key("T")),
                InputEvent::KeyUp(key("shift")),
                InputEvent::KeyUp(key("super")),
            ]
        );
    }

    #[test]
    fn test_combination_pauses_once_after_last_down() {
        let seq = press_combination(&[key("ctrl"), key("c")], Duration::from_millis(25));

        let pauses: Vec<_> = seq.iter().map(|e| e.pause).collect();
        assert_eq!(
            pauses,
            vec![None, Some(Duration::from_millis(25)), None, None]
        );
    }

    // ── Clicks ────────────────────────────────────────────────────────────────

    #[test]
    fn test_single_click_moves_then_presses_once() {
        let seq = click(10, 20, MouseButton::Left, false);
        assert_eq!(
            events(&seq),
            vec![
                InputEvent::MouseMove { x: 10, y: 20 },
                InputEvent::MousePress(MouseButton::Left),
            ]
        );
        assert_eq!(seq.total_pause(), Duration::ZERO);
    }

    #[test]
    fn test_double_click_presses_twice_with_one_pause() {
        let seq = click(10, 20, MouseButton::Right, true);

        assert_eq!(
            count(&seq, |e| matches!(e, InputEvent::MousePress(MouseButton::Right))),
            2
        );
        assert_eq!(seq.iter().filter(|e| e.pause.is_some()).count(), 1);
        assert_eq!(seq.total_pause(), DOUBLE_CLICK_PAUSE);
    }

    // ── Scroll ────────────────────────────────────────────────────────────────

    #[test]
    fn test_scroll_presses_amount_times_with_pauses_between() {
        // Act
        let seq = scroll(ScrollDirection::Down, 3, None, 80).unwrap();

        // Assert
        assert_eq!(count(&seq, |e| *e == InputEvent::KeyPress(key("pgdn"))), 3);
        assert_eq!(seq.iter().filter(|e| e.pause.is_some()).count(), 2);
        assert_eq!(seq.iter().last().unwrap().pause, None);
        assert_eq!(seq.total_pause(), Duration::from_millis(160));
    }

    #[test]
    fn test_scroll_up_uses_page_up_and_moves_first() {
        let seq = scroll(ScrollDirection::Up, 1, Some((5, 6)), 0).unwrap();
        assert_eq!(
            events(&seq),
            vec![
                InputEvent::MouseMove { x: 5, y: 6 },
                InputEvent::KeyPress(key("pgup")),
            ]
        );
    }

    #[test]
    fn test_scroll_rejects_zero_amount() {
        let err = scroll(ScrollDirection::Down, 0, None, 80).unwrap_err();
        assert!(matches!(err, InputError::OutOfRange { name: "amount", .. }));
    }

    #[test]
    fn test_scroll_rejects_negative_delay() {
        let err = scroll(ScrollDirection::Down, 1, None, -1).unwrap_err();
        assert!(matches!(err, InputError::OutOfRange { name: "delay_ms", .. }));
    }

    // ── Drag ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_drag_step_count_rules() {
        assert_eq!(drag_steps(400, None), Ok(25));
        assert_eq!(drag_steps(50, None), Ok(8));
        assert_eq!(drag_steps(0, None), Ok(8));
        assert_eq!(drag_steps(400, Some(4)), Ok(4));
        assert_eq!(drag_steps(400, Some(1)), Ok(MIN_DRAG_STEPS));
        assert_eq!(drag_steps(400, Some(-3)), Ok(MIN_DRAG_STEPS));
        assert_eq!(drag_steps(400, Some(10_000)), Ok(MAX_REPEAT));
    }

    #[test]
    fn test_derived_drag_steps_cap_at_max_repeat() {
        assert_eq!(drag_steps(u64::MAX, None), Ok(MAX_REPEAT));
    }

    #[test]
    fn test_drag_rejects_steps_above_cap() {
        // Arrange
        let oversized = [10_001, i64::MAX];

        for steps in oversized {
            // Act
            let err = drag((0, 0), (10, 10), 160, MouseButton::Left, Some(steps)).unwrap_err();

            // Assert
            assert_eq!(
                err,
                InputError::OutOfRange {
                    name: "steps",
                    requirement: "at most 10000",
                    value: steps,
                }
            );
        }
    }

    #[test]
    fn test_drag_four_steps_shape() {
        // Act
        let plan = drag((0, 0), (10, 10), 160, MouseButton::Left, Some(4)).unwrap();

        // Assert
        assert_eq!(plan.steps, 4);
        assert_eq!(
            events(&plan.events),
            vec![
                InputEvent::MouseMove { x: 0, y: 0 },
                InputEvent::MouseDown(MouseButton::Left),
                InputEvent::MouseMove { x: 2, y: 2 },
                InputEvent::MouseMove { x: 5, y: 5 },
                InputEvent::MouseMove { x: 7, y: 7 },
                InputEvent::MouseMove { x: 10, y: 10 },
                InputEvent::MouseUp(MouseButton::Left),
            ]
        );
        assert_eq!(plan.events.total_pause(), Duration::from_millis(160));
    }

    #[test]
    fn test_drag_interpolation_truncates_toward_zero_for_negative_deltas() {
        let plan = drag((10, 0), (0, -10), 0, MouseButton::Left, Some(4)).unwrap();
        let moves: Vec<_> = events(&plan.events)
            .into_iter()
            .filter_map(|e| match e {
                InputEvent::MouseMove { x, y } => Some((x, y)),
                _ => None,
            })
            .collect();
        assert_eq!(moves, vec![(10, 0), (7, -2), (5, -5), (2, -7), (0, -10)]);
    }

    #[test]
    fn test_drag_zero_duration_has_no_pauses() {
        let plan = drag((0, 0), (100, 0), 0, MouseButton::Middle, None).unwrap();
        assert_eq!(plan.steps, DEFAULT_DRAG_STEPS);
        assert_eq!(plan.events.total_pause(), Duration::ZERO);
    }

    #[test]
    fn test_drag_rejects_negative_duration() {
        let err = drag((0, 0), (1, 1), -1, MouseButton::Left, None).unwrap_err();
        assert!(matches!(err, InputError::OutOfRange { name: "ms", .. }));
    }

    // ── Launcher ──────────────────────────────────────────────────────────────

    #[test]
    fn test_open_application_gesture() {
        // Act
        let seq = open_application("Safari", 400).unwrap();
        let all = events(&seq);

        // Assert
        assert_eq!(
            &all[..3],
            &[
                InputEvent::KeyDown(key("super")),
                InputEvent::KeyPress(key("space")),
                InputEvent::KeyUp(key("super")),
            ]
        );
        assert_eq!(all.last(), Some(&InputEvent::KeyPress(key("return"))));
        assert_eq!(all.len(), 3 + "Safari".len() + 1);
        // 250 ms settle + 6 × 10 ms typing + 400 ms wait
        assert_eq!(seq.total_pause(), Duration::from_millis(250 + 60 + 400));
    }

    #[test]
    fn test_open_application_rejects_blank_name() {
        assert_eq!(open_application("  ", 0), Err(InputError::Empty("name")));
    }

    #[test]
    fn test_open_application_rejects_negative_wait() {
        let err = open_application("Mail", -5).unwrap_err();
        assert!(matches!(err, InputError::OutOfRange { name: "wait_ms", .. }));
    }
}
