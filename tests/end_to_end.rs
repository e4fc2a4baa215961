//! Full runs through `run_with`: raw bytes in, ANSI out.

use parking_lot::Mutex;
use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use trellis::runtime::EventKind;
use trellis::terminal::HeadlessTerminal;
use trellis::{
    run_with, BorderKind, Component, Deps, Element, Hooks, KeyCode, Node, Response,
    RuntimeConfig, Size, StyleFragment,
};

#[derive(Clone, Default)]
struct SharedOutput(Arc<Mutex<Vec<u8>>>);

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl SharedOutput {
    fn screen(&self, width: u16, height: u16) -> String {
        let mut parser = vt100::Parser::new(height, width, 0);
        parser.process(&self.0.lock());
        parser.screen().contents()
    }
}

fn input(bytes: &[u8]) -> Cursor<Vec<u8>> {
    Cursor::new(bytes.to_vec())
}

fn counter(hooks: &mut Hooks<'_>, label: &String) -> trellis::Result<Node> {
    let (count, set_count) = hooks.use_state(0u32)?;
    Ok(Element::container(StyleFragment::new())
        .child(Element::text(format!("{label} {count}")))
        .on_key(move |key| match key.code {
            KeyCode::Char('+') => {
                set_count.update(|n| n + 1);
                Response::Consumed
            }
            _ => Response::Continue,
        })
        .into())
}

#[test]
fn test_keys_update_state_until_ctrl_c() {
    let output = SharedOutput::default();
    let result = run_with(
        Component::new(counter, "clicks".to_string()),
        input(b"+++\x03"),
        output.clone(),
        HeadlessTerminal::new(20, 3),
        RuntimeConfig::default(),
    );
    assert!(result.is_ok());
    assert!(output.screen(20, 3).starts_with("clicks 3"));
}

#[test]
fn test_click_on_border_of_one_cell_box_fires_once() {
    let clicks = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&clicks);
    let root: Node = Element::container(
        StyleFragment::new()
            .with_width(Size::Cells(1))
            .with_height(Size::Cells(1))
            .with_border(BorderKind::Rounded),
    )
    .on_click(move || {
        seen.fetch_add(1, Ordering::SeqCst);
        Response::Consumed
    })
    .into();

    let output = SharedOutput::default();
    let result = run_with(
        root,
        input(b"\x1b[<0;1;1M\x1b[<0;1;1m\x03"),
        output.clone(),
        HeadlessTerminal::new(10, 4),
        RuntimeConfig::default(),
    );
    assert!(result.is_ok());
    assert_eq!(clicks.load(Ordering::SeqCst), 1);
    let screen = output.screen(10, 4);
    let rows: Vec<&str> = screen.lines().map(str::trim_end).collect();
    assert_eq!(rows[0], "╭─╮");
    assert_eq!(rows[1].matches('│').count(), 2);
    assert_eq!(rows[2], "╰─╯");
}

#[test]
fn test_end_of_input_stops_the_run() {
    let output = SharedOutput::default();
    let result = run_with(
        Component::new(counter, "eof".to_string()),
        input(b"+"),
        output.clone(),
        HeadlessTerminal::new(10, 1),
        RuntimeConfig::default().with_quit_key(None),
    );
    assert!(result.is_ok());
    assert_eq!(output.screen(10, 1).trim_end(), "eof 1");
}

fn chatty(hooks: &mut Hooks<'_>, _: &()) -> trellis::Result<Node> {
    let (restarts, set_restarts) = hooks.use_state(0u32)?;
    hooks.use_effect(Deps::Values(restarts), |ctx| {
        for _ in 0..4 {
            ctx.send(EventKind::StateSet)?;
        }
        loop {
            ctx.sleep(Duration::from_secs(60))?;
        }
    })?;
    Ok(Element::container(StyleFragment::new())
        .child(Element::text(format!("restarts {restarts}")))
        .on_key(move |_| {
            set_restarts.update(|n| n + 1);
            Response::Consumed
        })
        .into())
}

#[test]
fn test_restarting_effect_on_tiny_queue_does_not_hang() {
    let (done_tx, done_rx) = crossbeam_channel::bounded(1);
    let output = SharedOutput::default();
    let screen = output.clone();
    std::thread::spawn(move || {
        let result = run_with(
            Component::new(chatty, ()),
            input(b"xyz"),
            output,
            HeadlessTerminal::new(20, 2),
            RuntimeConfig::default().with_queue_capacity(2),
        );
        let _ = done_tx.send(result.is_ok());
    });
    assert_eq!(done_rx.recv_timeout(Duration::from_secs(30)), Ok(true));
    assert!(screen.screen(20, 2).starts_with("restarts 3"));
}
