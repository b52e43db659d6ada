//! Replays planned event sequences against a session.
//!
//! # Held keys and buttons
//!
//! Every successful `KeyDown` / `MouseDown` is remembered until the matching
//! up event.  When replay stops, on success or after a failed primitive,
//! whatever is still held is released in reverse press order.  A planned
//! chord whose third key-down fails therefore releases exactly the first two
//! keys, last pressed first, and a drag interrupted mid-motion still sends
//! its button-up.
//!
//! Release keeps going past a failed release; the first error is reported
//! unless the replay itself already failed.
//!
//! # Keys without a KeySym
//!
//! The sequence is checked before anything is sent: a token that names no
//! key fails the whole replay with [`SessionError::UnknownKey`] and no
//! primitive reaches the session.

use remote_macos_core::{EventSequence, InputEvent, KeyToken, MouseButton};
use tokio::time::sleep;
use tracing::{debug, warn};

use super::session::{RemoteSession, SessionError};

/// Something pressed and not yet released.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Held {
    Key(KeyToken),
    Button(MouseButton),
}

/// Fails with the first token in `events` that has no KeySym.
pub fn check_keys(events: &EventSequence) -> Result<(), SessionError> {
    for event in events.events() {
        if let InputEvent::KeyPress(key) | InputEvent::KeyDown(key) | InputEvent::KeyUp(key) = event
        {
            if key.keysym().is_none() {
                return Err(SessionError::UnknownKey(key.to_string()));
            }
        }
    }
    Ok(())
}

/// Replays `events` in order, honouring each event's pause.
///
/// # Errors
///
/// [`SessionError::UnknownKey`] before sending anything when a token has no
/// KeySym; otherwise the first failing primitive, or the first failing
/// release when every primitive succeeded.
pub async fn replay(
    session: &mut dyn RemoteSession,
    events: &EventSequence,
) -> Result<(), SessionError> {
    check_keys(events)?;

    let mut held = Vec::new();
    let outcome = run(session, events, &mut held).await;
    let released = release_all(session, held).await;

    match (outcome, released) {
        (Err(e), Err(release_err)) => {
            warn!(error = %release_err, "Release failed after replay error");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), released) => released,
    }
}

async fn run(
    session: &mut dyn RemoteSession,
    events: &EventSequence,
    held: &mut Vec<Held>,
) -> Result<(), SessionError> {
    for timed in events {
        debug!(event = ?timed.event, "Replaying input event");
        match &timed.event {
            InputEvent::KeyPress(key) => session.key_press(key).await?,
            InputEvent::KeyDown(key) => {
                session.key_down(key).await?;
                held.push(Held::Key(key.clone()));
            }
            InputEvent::KeyUp(key) => {
                forget(held, &Held::Key(key.clone()));
                session.key_up(key).await?;
            }
            InputEvent::MouseMove { x, y } => session.mouse_move(*x, *y).await?,
            InputEvent::MousePress(button) => session.mouse_press(*button).await?,
            InputEvent::MouseDown(button) => {
                session.mouse_down(*button).await?;
                held.push(Held::Button(*button));
            }
            InputEvent::MouseUp(button) => {
                forget(held, &Held::Button(*button));
                session.mouse_up(*button).await?;
            }
        }
        if let Some(pause) = timed.pause {
            sleep(pause).await;
        }
    }
    Ok(())
}

/// Removes the most recent matching entry, if any.
fn forget(held: &mut Vec<Held>, item: &Held) {
    if let Some(pos) = held.iter().rposition(|h| h == item) {
        held.remove(pos);
    }
}

async fn release_all(
    session: &mut dyn RemoteSession,
    held: Vec<Held>,
) -> Result<(), SessionError> {
    let mut first_error = None;
    for item in held.into_iter().rev() {
        debug!(?item, "Releasing held input");
        let result = match &item {
            Held::Key(key) => session.key_up(key).await,
            Held::Button(button) => session.mouse_up(*button).await,
        };
        if let Err(e) = result {
            warn!(?item, error = %e, "Failed to release held input");
            first_error.get_or_insert(e);
        }
    }
    first_error.map_or(Ok(()), Err)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
