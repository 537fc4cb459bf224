//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a background reader
//! that forwards them over a channel so the main loop stays non-blocking.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

/// Map a crossterm event, dropping the ones the gallery ignores.
fn translate(ev: CtEvent) -> Option<AppEvent> {
    match ev {
        CtEvent::Key(k) if k.kind != KeyEventKind::Release => Some(AppEvent::Key(k)),
        CtEvent::Mouse(m) => Some(AppEvent::Mouse(m)),
        CtEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        _ => None,
    }
}

/// Spawns a blocking reader that polls the terminal and sends events
/// through the returned channel.  The reader stops once the receiver is
/// dropped.
pub fn spawn_event_reader(poll_timeout: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || {
        while !tx.is_closed() {
            // A bounded poll wakes the loop regularly so a closed channel
            // is noticed even when the terminal is idle.
            match event::poll(poll_timeout) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "terminal poll failed, stopping event reader");
                    break;
                }
            }
            let Ok(ev) = event::read() else {
                continue;
            };
            if let Some(app_event) = translate(ev) {
                if tx.send(app_event).is_err() {
                    break; // receiver dropped
                }
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    #[test]
    fn key_releases_are_dropped() {
        let press = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        assert!(matches!(translate(CtEvent::Key(press)), Some(AppEvent::Key(_))));

        let release = KeyEvent {
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
            ..press
        };
        assert!(translate(CtEvent::Key(release)).is_none());
        assert!(translate(CtEvent::FocusGained).is_none());
        assert!(matches!(translate(CtEvent::Resize(80, 24)), Some(AppEvent::Resize(80, 24))));
    }
}
