//! Effect tasks: background work started by `use_effect`.
//!
//! Each task runs on its own named thread and is cancelled cooperatively.
//! Cancelling raises a flag and drops the task's wake-up channel, so every
//! suspension point in [`EffectContext`] returns [`Cancelled`] at once; the
//! canceller then joins the thread before the render cycle continues.

use super::event::{Event, EventKind, EventSender};
use crate::error::{Error, Result};
use crate::hooks::NodeId;
use crate::input::MouseEvent;
use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;

/// Returned from a suspension point once the task has been cancelled.
///
/// Effect bodies should propagate it with `?`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("effect cancelled")]
pub struct Cancelled;

/// Result of an effect body.
pub type EffectResult = std::result::Result<(), Cancelled>;

/// Boxed effect body.
pub(crate) type EffectFn = Box<dyn FnOnce(EffectContext) -> EffectResult + Send>;

/// Handle given to a running effect body.
pub struct EffectContext {
    cancel: Arc<AtomicBool>,
    observed: Arc<AtomicBool>,
    wake: Receiver<()>,
    events: EventSender,
}

impl EffectContext {
    /// True once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    fn cancelled(&self) -> Cancelled {
        self.observed.store(true, Ordering::Release);
        Cancelled
    }

    /// Return `Err(Cancelled)` if cancellation has been requested.
    pub fn checkpoint(&self) -> EffectResult {
        if self.is_cancelled() {
            Err(self.cancelled())
        } else {
            Ok(())
        }
    }

    /// Sleep for `duration`, waking early on cancellation.
    pub fn sleep(&self, duration: Duration) -> EffectResult {
        self.checkpoint()?;
        select! {
            recv(self.wake) -> _ => Err(self.cancelled()),
            default(duration) => self.checkpoint(),
        }
    }

    /// Wait for the next message on `rx`.
    ///
    /// Returns `Ok(None)` when every sender of `rx` is gone.
    pub fn recv<T>(&self, rx: &Receiver<T>) -> std::result::Result<Option<T>, Cancelled> {
        self.checkpoint()?;
        select! {
            recv(self.wake) -> _ => Err(self.cancelled()),
            recv(rx) -> msg => Ok(msg.ok()),
        }
    }

    /// Enqueue an event for the scheduler.
    ///
    /// Waits while the queue is full, but returns [`Cancelled`] as soon as
    /// cancellation is requested, so a full queue never blocks the join.
    pub fn send(&self, kind: EventKind) -> EffectResult {
        self.checkpoint()?;
        select! {
            send(self.events.queue(), Event::new(kind)) -> sent => match sent {
                Ok(()) => Ok(()),
                Err(_) => {
                    tracing::debug!("event from effect after scheduler shutdown");
                    Err(self.cancelled())
                }
            },
            recv(self.wake) -> _ => Err(self.cancelled()),
        }
    }

    /// Subscribe to mouse-move events.
    ///
    /// The scheduler tees every move to the returned receiver until it is
    /// dropped.
    pub fn mouse_moves(&self) -> std::result::Result<Receiver<MouseEvent>, Cancelled> {
        let (tx, rx) = unbounded();
        self.send(EventKind::SubscribeMouseMoves(tx))?;
        Ok(rx)
    }
}

/// A running effect.
pub(crate) struct EffectTask {
    node: NodeId,
    slot: usize,
    cancel: Arc<AtomicBool>,
    observed: Arc<AtomicBool>,
    wake: Option<Sender<()>>,
    handle: Option<JoinHandle<EffectResult>>,
}

impl EffectTask {
    /// Start `body` on a new thread.
    pub(crate) fn spawn(
        node: NodeId,
        slot: usize,
        body: EffectFn,
        events: &EventSender,
    ) -> Result<Self> {
        let cancel = Arc::new(AtomicBool::new(false));
        let observed = Arc::new(AtomicBool::new(false));
        let (wake_tx, wake_rx) = bounded(0);
        let ctx = EffectContext {
            cancel: Arc::clone(&cancel),
            observed: Arc::clone(&observed),
            wake: wake_rx,
            events: events.clone(),
        };
        let handle = thread::Builder::new()
            .name(format!("trellis-effect-{}-{slot}", node.get()))
            .spawn(move || body(ctx))?;
        tracing::trace!(%node, slot, "effect started");
        Ok(Self {
            node,
            slot,
            cancel,
            observed,
            wake: Some(wake_tx),
            handle: Some(handle),
        })
    }

    /// Request cancellation and wait for the body to unwind.
    ///
    /// A body that saw [`Cancelled`] and still returned `Ok(())` is an
    /// error. Panics inside the body are logged and otherwise ignored.
    pub(crate) fn cancel(mut self) -> Result<()> {
        self.cancel.store(true, Ordering::Release);
        self.wake = None;
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        match handle.join() {
            Ok(Ok(())) if self.observed.load(Ordering::Acquire) => {
                tracing::error!(node = %self.node, slot = self.slot, "effect swallowed cancellation");
                Err(Error::EffectSwallowedCancellation {
                    node: self.node,
                    slot: self.slot,
                })
            }
            Ok(_) => {
                tracing::trace!(node = %self.node, slot = self.slot, "effect cancelled");
                Ok(())
            }
            Err(_) => {
                tracing::warn!(node = %self.node, slot = self.slot, "effect panicked");
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for EffectTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectTask")
            .field("node", &self.node)
            .field("slot", &self.slot)
            .field("cancelled", &self.cancel.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Instant;

    fn sender() -> EventSender {
        EventSender::channel(16).0
    }

    #[test]
    fn test_cancel_wakes_sleep() {
        let events = sender();
        let task = EffectTask::spawn(
            NodeId::new(1),
            0,
            Box::new(|ctx| loop {
                ctx.sleep(Duration::from_secs(60))?;
            }),
            &events,
        )
        .unwrap();
        let start = Instant::now();
        task.cancel().unwrap();
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_swallowed_cancellation_is_an_error() {
        let events = sender();
        let task = EffectTask::spawn(
            NodeId::new(7),
            2,
            Box::new(|ctx| {
                while ctx.sleep(Duration::from_secs(60)).is_ok() {}
                Ok(())
            }),
            &events,
        )
        .unwrap();
        let err = task.cancel().unwrap_err();
        assert!(matches!(
            err,
            Error::EffectSwallowedCancellation { node, slot: 2 } if node == NodeId::new(7)
        ));
    }

    #[test]
    fn test_finished_task_cancels_cleanly() {
        let events = sender();
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let task = EffectTask::spawn(
            NodeId::new(1),
            0,
            Box::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
            &events,
        )
        .unwrap();
        task.cancel().unwrap();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_recv_and_mouse_subscription() {
        let (events, queue) = EventSender::channel(16);
        let (tx, rx) = unbounded::<u32>();
        let (done_tx, done_rx) = unbounded();
        let task = EffectTask::spawn(
            NodeId::new(3),
            0,
            Box::new(move |ctx| {
                let _moves = ctx.mouse_moves()?;
                while let Some(n) = ctx.recv(&rx)? {
                    let _ = done_tx.send(n);
                }
                Ok(())
            }),
            &events,
        )
        .unwrap();
        tx.send(5).unwrap();
        assert_eq!(done_rx.recv_timeout(Duration::from_secs(10)), Ok(5));
        let subscribed = queue.recv_timeout(Duration::from_secs(10)).unwrap();
        assert!(matches!(subscribed.kind, EventKind::SubscribeMouseMoves(_)));
        task.cancel().unwrap();
    }

    #[test]
    fn test_cancel_interrupts_send_on_full_queue() {
        let (events, queue) = EventSender::channel(1);
        let (sent_tx, sent_rx) = unbounded();
        let task = EffectTask::spawn(
            NodeId::new(4),
            0,
            Box::new(move |ctx| loop {
                ctx.send(EventKind::StateSet)?;
                let _ = sent_tx.send(());
            }),
            &events,
        )
        .unwrap();
        // The first event fills the queue; nobody drains it.
        assert!(sent_rx.recv_timeout(Duration::from_secs(10)).is_ok());
        assert!(sent_rx.recv_timeout(Duration::from_millis(100)).is_err());
        let start = Instant::now();
        task.cancel().unwrap();
        assert!(start.elapsed() < Duration::from_secs(10));
        assert_eq!(queue.len(), 1);
    }
}
