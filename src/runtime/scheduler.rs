//! Scheduler: the single-threaded render cycle.
//!
//! ```text
//! loop {
//!     if dirty: reconcile → layout → paint → heal → diff → emit, sync effects
//!     apply requests from the last batch (quit, bell, toggle, screenshot)
//!     block for one event, drain the rest, dispatch them in order
//! }
//! ```
//!
//! Handlers only ever see the layout of the last emitted frame, and
//! requests they return take effect at the start of the next cycle, after
//! every event of the current batch has been dispatched.

use super::config::RuntimeConfig;
use super::event::{Event, EventKind, EventSender};
use crate::buffer::{diff_frames, Frame};
use crate::element::{Node, Response};
use crate::error::{Error, Result};
use crate::input::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use crate::layout::{BoxId, LayoutTree, Rect};
use crate::paint::{paint, Healer};
use crate::reconcile::Reconciler;
use crate::screenshot::{FrameDocument, ScreenshotSink};
use crate::terminal::{OutputBuffer, TerminalControl};
use crossbeam_channel::{Receiver, Sender};
use std::io::Write;
use std::time::{Duration, Instant};

/// Render statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderStats {
    /// Frames rendered.
    pub frames: u64,
    /// Cells written across all frames.
    pub cells_changed: u64,
    /// Bytes written to the output.
    pub bytes_written: u64,
    /// Events dispatched.
    pub events: u64,
    /// Duration of the last render.
    pub last_render: Duration,
}

/// Drives the render cycle for one root node.
pub struct Scheduler<T: TerminalControl, W: Write> {
    config: RuntimeConfig,
    terminal: T,
    output: W,
    events: EventSender,
    queue: Receiver<Event>,
    reconciler: Reconciler,
    layout: LayoutTree,
    healer: Healer,
    healing: bool,
    /// The frame currently on screen.
    previous: Frame,
    size: (u16, u16),
    dirty: bool,
    full_redraw: bool,
    requests: Vec<Response>,
    /// Button and click-target path of the last press.
    pressed: Option<(MouseButton, Vec<usize>)>,
    mouse_subscribers: Vec<Sender<MouseEvent>>,
    screenshot: Option<Box<dyn ScreenshotSink>>,
    out: OutputBuffer,
    stats: RenderStats,
}

impl<T: TerminalControl, W: Write> Scheduler<T, W> {
    /// Create a scheduler writing frames to `output`.
    pub fn new(terminal: T, output: W, config: RuntimeConfig) -> Self {
        let (events, queue) = EventSender::channel(config.queue_capacity.max(1));
        Self {
            healing: config.border_healing,
            config,
            terminal,
            output,
            events,
            queue,
            reconciler: Reconciler::new(),
            layout: LayoutTree::default(),
            healer: Healer::new(),
            previous: Frame::new(0, 0),
            size: (0, 0),
            dirty: true,
            full_redraw: true,
            requests: Vec::new(),
            pressed: None,
            mouse_subscribers: Vec::new(),
            screenshot: None,
            out: OutputBuffer::with_capacity(16 * 1024),
            stats: RenderStats::default(),
        }
    }

    /// Install a screenshot sink.
    #[must_use]
    pub fn with_screenshot_sink(mut self, sink: impl ScreenshotSink + 'static) -> Self {
        self.screenshot = Some(Box::new(sink));
        self
    }

    /// A handle for pushing events (input, resizes) into the queue.
    pub fn events(&self) -> EventSender {
        self.events.clone()
    }

    /// The terminal collaborator.
    pub const fn terminal(&self) -> &T {
        &self.terminal
    }

    /// The output stream.
    pub const fn output(&self) -> &W {
        &self.output
    }

    /// Statistics so far.
    pub const fn stats(&self) -> RenderStats {
        self.stats
    }

    /// The frame currently on screen.
    pub const fn frame(&self) -> &Frame {
        &self.previous
    }

    /// Whether border healing is on.
    pub const fn border_healing(&self) -> bool {
        self.healing
    }

    /// Run until a quit request or the end of input.
    ///
    /// The terminal is restored and every effect cancelled on all exit
    /// paths; the first error wins.
    pub fn run(&mut self, root: &Node) -> Result<()> {
        self.terminal.enter(&self.config)?;
        let result = self.run_loop(root);
        if let Err(e) = &result {
            tracing::error!(error = %e, "render loop failed");
        }
        let shutdown = self.reconciler.shutdown();
        let leave = self.terminal.leave(&self.config).map_err(Error::from);
        tracing::debug!(stats = ?self.stats, "scheduler stopped");
        result.and(shutdown).and(leave)
    }

    fn run_loop(&mut self, root: &Node) -> Result<()> {
        self.size = self.terminal.size()?;
        loop {
            if self.dirty {
                self.render(root)?;
            }
            if self.apply_requests()? {
                return Ok(());
            }
            if self.dirty {
                // A healing toggle asked for a redraw.
                continue;
            }
            self.dispatch_batch()?;
        }
    }

    /// Apply handler requests. Returns `true` on quit.
    fn apply_requests(&mut self) -> Result<bool> {
        let mut quit = false;
        let mut bell = false;
        for request in std::mem::take(&mut self.requests) {
            match request {
                Response::Quit => quit = true,
                Response::Bell => bell = true,
                Response::ToggleBorderHealing => {
                    self.healing = !self.healing;
                    self.dirty = true;
                    tracing::debug!(enabled = self.healing, "border healing toggled");
                }
                Response::Screenshot => {
                    if let Some(sink) = self.screenshot.as_mut() {
                        sink.capture(FrameDocument::from_frame(&self.previous));
                    } else {
                        tracing::debug!("screenshot requested without a sink");
                    }
                }
                Response::Continue | Response::Consumed => {}
            }
        }
        if bell {
            self.out.clear();
            self.out.bell();
            self.out.flush_to(&mut self.output)?;
        }
        Ok(quit)
    }

    /// Block for an event, then dispatch it and everything queued behind it.
    fn dispatch_batch(&mut self) -> Result<()> {
        let first = self.queue.recv().map_err(|_| Error::QueueDisconnected)?;
        let rest: Vec<Event> = self.queue.try_iter().collect();
        for event in std::iter::once(first).chain(rest) {
            self.stats.events += 1;
            self.dispatch(event);
        }
        if self.events.take_dirty() {
            self.dirty = true;
        }
        Ok(())
    }

    fn dispatch(&mut self, event: Event) {
        tracing::trace!(kind = ?event.kind, latency = ?event.at.elapsed(), "dispatching event");
        match event.kind {
            EventKind::TerminalResized { width, height } => {
                self.size = (width, height);
                self.full_redraw = true;
                self.dirty = true;
            }
            EventKind::KeyPressed(key) => self.dispatch_key(key),
            EventKind::Mouse(mouse) => self.dispatch_mouse(mouse),
            EventKind::StateSet => self.dirty = true,
            EventKind::InputClosed => self.requests.push(Response::Quit),
            EventKind::SubscribeMouseMoves(tx) => self.mouse_subscribers.push(tx),
        }
    }

    fn request(&mut self, response: Response) {
        if !matches!(response, Response::Continue | Response::Consumed) {
            self.requests.push(response);
        }
    }

    fn dispatch_key(&mut self, key: KeyEvent) {
        let mut response = Response::Continue;
        for id in self.layout.key_targets() {
            let handler = self
                .layout
                .get(id)
                .and_then(|b| b.handlers())
                .and_then(|h| h.on_key.clone());
            if let Some(handler) = handler {
                response = handler(&key);
                if response != Response::Continue {
                    break;
                }
            }
        }
        if response == Response::Continue && self.config.quit_key == Some(key) {
            response = Response::Quit;
        }
        self.request(response);
    }

    fn dispatch_mouse(&mut self, mouse: MouseEvent) {
        if let MouseEventKind::Moved(_) = mouse.kind {
            self.mouse_subscribers.retain(|tx| tx.send(mouse).is_ok());
        }
        let (x, y) = (i32::from(mouse.x), i32::from(mouse.y));

        let targets: Vec<BoxId> = self.layout.hit_test(x, y).collect();
        for id in &targets {
            let handler = self
                .layout
                .get(*id)
                .and_then(|b| b.handlers())
                .and_then(|h| h.on_mouse.clone());
            if let Some(handler) = handler {
                let response = handler(&mouse);
                if response != Response::Continue {
                    self.request(response);
                    break;
                }
            }
        }

        let click_target = targets.iter().copied().find(|id| {
            self.layout
                .get(*id)
                .and_then(|b| b.handlers())
                .is_some_and(|h| h.on_click.is_some())
        });
        match mouse.kind {
            MouseEventKind::Down(button) => {
                self.pressed = click_target
                    .and_then(|id| self.layout.get(id))
                    .map(|b| (button, b.path.clone()));
            }
            MouseEventKind::Up(button) => {
                let pressed = self.pressed.take();
                let Some(target) = click_target.and_then(|id| self.layout.get(id)) else {
                    return;
                };
                if pressed.is_some_and(|(b, path)| b == button && path == target.path) {
                    if let Some(handler) = target.handlers().and_then(|h| h.on_click.clone()) {
                        tracing::trace!(path = ?target.path, "click");
                        let response = handler();
                        self.request(response);
                    }
                }
            }
            MouseEventKind::Moved(_) => {}
        }
    }

    /// Run the full pipeline once and emit the changes.
    fn render(&mut self, root: &Node) -> Result<()> {
        let start = Instant::now();
        let (width, height) = self.size;

        let element = self.reconciler.render(root, &self.events)?;
        self.layout = LayoutTree::compute(&element, Rect::from_size(width, height))?;
        let mut frame = Frame::new(width, height);
        paint(&self.layout, &mut frame);
        if self.healing {
            self.healer.heal(&mut frame, &self.layout);
        }

        self.out.clear();
        if self.full_redraw || self.previous.width() != width || self.previous.height() != height {
            self.out.reset_attrs();
            self.out.clear_screen();
            self.previous = Frame::new(width, height);
            self.full_redraw = false;
        }
        let changes = diff_frames(&self.previous, &frame);
        let diff = changes.encode(&mut self.out);
        self.out.flush_to(&mut self.output)?;
        self.previous = frame;
        self.dirty = false;

        self.stats.frames += 1;
        self.stats.cells_changed += diff.cells_changed as u64;
        self.stats.bytes_written += self.out.len() as u64;
        self.stats.last_render = start.elapsed();
        tracing::debug!(
            frame = self.stats.frames,
            cells = diff.cells_changed,
            bytes = self.out.len(),
            elapsed = ?self.stats.last_render,
            "frame emitted"
        );

        self.reconciler.sync_effects(&self.events)
    }
}

impl<T: TerminalControl, W: Write> std::fmt::Debug for Scheduler<T, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("size", &self.size)
            .field("dirty", &self.dirty)
            .field("healing", &self.healing)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
