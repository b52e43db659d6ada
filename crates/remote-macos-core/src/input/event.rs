//! Primitive input events and the sequences they are replayed from.

use std::time::Duration;

use super::button::MouseButton;
use crate::keymap::KeyToken;

/// One primitive operation on a remote-control session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Key down immediately followed by key up.
    KeyPress(KeyToken),
    KeyDown(KeyToken),
    KeyUp(KeyToken),
    /// Absolute pointer position in framebuffer pixels.
    MouseMove { x: i32, y: i32 },
    /// Button down immediately followed by button up.
    MousePress(MouseButton),
    MouseDown(MouseButton),
    MouseUp(MouseButton),
}

/// An event plus the pause to observe after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedEvent {
    pub event: InputEvent,
    pub pause: Option<Duration>,
}

/// An ordered list of timed events.
///
/// Built with [`push`](Self::push) and [`pause`](Self::pause):
///
/// ```rust
/// use std::time::Duration;
/// use remote_macos_core::{EventSequence, InputEvent, KeyToken};
///
/// let mut seq = EventSequence::new();
/// seq.push(InputEvent::KeyPress(KeyToken::from("a")))
///     .pause(Duration::from_millis(10))
///     .push(InputEvent::KeyPress(KeyToken::from("b")));
/// assert_eq!(seq.len(), 2);
/// assert_eq!(seq.total_pause(), Duration::from_millis(10));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSequence {
    events: Vec<TimedEvent>,
}

impl EventSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event with no pause after it.
    pub fn push(&mut self, event: InputEvent) -> &mut Self {
        self.events.push(TimedEvent { event, pause: None });
        self
    }

    /// Adds `duration` to the pause after the most recent event.
    ///
    /// Zero durations and pauses on an empty sequence are ignored.
    pub fn pause(&mut self, duration: Duration) -> &mut Self {
        if duration.is_zero() {
            return self;
        }
        if let Some(last) = self.events.last_mut() {
            last.pause = Some(last.pause.unwrap_or_default() + duration);
        }
        self
    }

    /// Appends every event of `other`, keeping its pauses.
    pub fn append(&mut self, other: EventSequence) -> &mut Self {
        self.events.extend(other.events);
        self
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimedEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Sum of every pause in the sequence.
    pub fn total_pause(&self) -> Duration {
        self.events.iter().filter_map(|e| e.pause).sum()
    }

    /// The events without their pauses, in order.
    pub fn events(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter().map(|e| &e.event)
    }
}

impl<'a> IntoIterator for &'a EventSequence {
    type Item = &'a TimedEvent;
    type IntoIter = std::slice::Iter<'a, TimedEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_accumulates_on_last_event() {
        let mut seq = EventSequence::new();
        seq.push(InputEvent::KeyPress(KeyToken::from("a")))
            .pause(Duration::from_millis(10))
            .pause(Duration::from_millis(400));

        let last = seq.iter().last().unwrap();
        assert_eq!(last.pause, Some(Duration::from_millis(410)));
    }

    #[test]
    fn test_zero_pause_is_not_recorded() {
        let mut seq = EventSequence::new();
        seq.push(InputEvent::MousePress(MouseButton::Left))
            .pause(Duration::ZERO);
        assert_eq!(seq.iter().next().unwrap().pause, None);
    }

    #[test]
    fn test_pause_on_empty_sequence_is_ignored() {
        let mut seq = EventSequence::new();
        seq.pause(Duration::from_secs(1));
        assert!(seq.is_empty());
        assert_eq!(seq.total_pause(), Duration::ZERO);
    }

    #[test]
    fn test_append_keeps_order_and_pauses() {
        let mut first = EventSequence::new();
        first
            .push(InputEvent::KeyDown(KeyToken::from("super")))
            .pause(Duration::from_millis(5));
        let mut second = EventSequence::new();
        second.push(InputEvent::KeyUp(KeyToken::from("super")));

        first.append(second);

        let events: Vec<_> = first.events().cloned().collect();
        assert_eq!(
            events,
            vec![
                InputEvent::KeyDown(KeyToken::from("super")),
                InputEvent::KeyUp(KeyToken::from("super")),
            ]
        );
        assert_eq!(first.total_pause(), Duration::from_millis(5));
    }
}
