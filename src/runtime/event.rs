//! Events and the sending half of the scheduler's queue.

use crate::error::{Error, Result};
use crate::input::{InputEvent, KeyEvent, MouseEvent};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// What happened.
#[derive(Debug, Clone)]
pub enum EventKind {
    /// The terminal changed size.
    TerminalResized {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },
    /// A key was pressed.
    KeyPressed(KeyEvent),
    /// A mouse button went down or up, or the mouse moved.
    Mouse(MouseEvent),
    /// Some component state changed; the tree must be re-rendered.
    StateSet,
    /// The input stream ended; shut down in order.
    InputClosed,
    /// An effect wants a copy of every mouse-move event.
    SubscribeMouseMoves(Sender<MouseEvent>),
}

impl From<InputEvent> for EventKind {
    fn from(event: InputEvent) -> Self {
        match event {
            InputEvent::Key(key) => Self::KeyPressed(key),
            InputEvent::Mouse(mouse) => Self::Mouse(mouse),
        }
    }
}

/// A timestamped event.
#[derive(Debug, Clone)]
pub struct Event {
    /// Payload.
    pub kind: EventKind,
    /// Creation time.
    pub at: Instant,
}

impl Event {
    /// Stamp `kind` with the current time.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            at: Instant::now(),
        }
    }
}

/// Cloneable handle for pushing events to the scheduler.
///
/// Besides the queue it carries a shared dirty flag. State setters raise
/// the flag before trying to enqueue [`EventKind::StateSet`], so a full
/// queue can delay a re-render but never lose one.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<Event>,
    dirty: Arc<AtomicBool>,
}

impl EventSender {
    /// Create a bounded queue.
    pub fn channel(capacity: usize) -> (Self, Receiver<Event>) {
        let (tx, rx) = bounded(capacity);
        let sender = Self {
            tx,
            dirty: Arc::new(AtomicBool::new(false)),
        };
        (sender, rx)
    }

    /// Enqueue an event, blocking while the queue is full.
    pub fn send(&self, kind: EventKind) -> Result<()> {
        self.tx
            .send(Event::new(kind))
            .map_err(|_| Error::QueueDisconnected)
    }

    /// Report a terminal resize.
    ///
    /// This is the hook for signal handlers living outside the crate.
    pub fn notify_resize(&self, width: u16, height: u16) -> Result<()> {
        self.send(EventKind::TerminalResized { width, height })
    }

    /// The raw sending half of the queue.
    pub(crate) const fn queue(&self) -> &Sender<Event> {
        &self.tx
    }

    /// Mark the application dirty and wake the scheduler.
    pub(crate) fn state_set(&self) {
        self.dirty.store(true, Ordering::Release);
        if self.tx.try_send(Event::new(EventKind::StateSet)).is_err() {
            tracing::trace!("event queue full, state change carried by dirty flag");
        }
    }

    /// Read and clear the dirty flag.
    pub(crate) fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;

    #[test]
    fn test_state_set_raises_flag_and_enqueues() {
        let (events, rx) = EventSender::channel(4);
        events.state_set();
        assert!(matches!(rx.try_recv().map(|e| e.kind), Ok(EventKind::StateSet)));
        assert!(events.take_dirty());
        assert!(!events.take_dirty());
    }

    #[test]
    fn test_full_queue_keeps_dirty_flag() {
        let (events, rx) = EventSender::channel(1);
        events.notify_resize(10, 5).unwrap();
        events.state_set();
        assert_eq!(rx.len(), 1);
        assert!(events.take_dirty());
    }

    #[test]
    fn test_input_conversion_and_disconnect() {
        let kind = EventKind::from(InputEvent::Key(KeyEvent::plain(KeyCode::Enter)));
        assert!(matches!(kind, EventKind::KeyPressed(k) if k.code == KeyCode::Enter));

        let (events, rx) = EventSender::channel(1);
        drop(rx);
        assert!(matches!(events.send(EventKind::InputClosed), Err(Error::QueueDisconnected)));
    }
}
