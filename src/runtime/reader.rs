//! Input reader: dedicated thread turning raw input bytes into events.
//!
//! The thread performs blocking reads on the input stream, decodes each
//! chunk and pushes the resulting events into the scheduler's queue. It
//! exits on end of stream, on a read error, or once the queue is gone,
//! sending [`EventKind::InputClosed`] on the way out.

use super::event::{EventKind, EventSender};
use crate::error::Result;
use crate::input::InputDecoder;
use std::io::{ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Handle to the input thread.
#[derive(Debug)]
pub struct InputReader {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl InputReader {
    /// Spawn the reader thread.
    pub fn spawn<R>(input: R, events: EventSender, chunk_size: usize) -> Result<Self>
    where
        R: Read + Send + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = Arc::clone(&shutdown);
        let handle = thread::Builder::new()
            .name("trellis-input".to_string())
            .spawn(move || Self::run_loop(input, &events, &shutdown_clone, chunk_size.max(1)))?;
        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Ask the thread to stop after its current read.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Stop the thread, joining it if it is not blocked in a read.
    ///
    /// A blocking read cannot be interrupted, so a thread still waiting for
    /// input is detached instead; it exits on its next read.
    pub fn stop(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            if handle.is_finished() {
                let _ = handle.join();
            }
        }
    }

    fn run_loop<R: Read>(mut input: R, events: &EventSender, shutdown: &AtomicBool, chunk_size: usize) {
        let mut decoder = InputDecoder::new();
        let mut buf = vec![0u8; chunk_size];
        loop {
            if shutdown.load(Ordering::Relaxed) {
                return;
            }
            let n = match input.read(&mut buf) {
                Ok(0) => {
                    tracing::debug!("input stream closed");
                    break;
                }
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "input read failed");
                    break;
                }
            };
            for event in decoder.feed(&buf[..n]) {
                tracing::trace!(?event, "decoded input");
                if events.send(event.into()).is_err() {
                    return;
                }
            }
        }
        let _ = events.send(EventKind::InputClosed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyCode, KeyEvent, MouseButton, MouseEventKind};
    use std::io::Cursor;
    use std::time::Duration;

    /// Yields one chunk per read so chunk boundaries are deterministic.
    struct Chunks(Vec<&'static [u8]>);

    impl Read for Chunks {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.0.is_empty() {
                return Ok(0);
            }
            let chunk = self.0.remove(0);
            buf[..chunk.len()].copy_from_slice(chunk);
            Ok(chunk.len())
        }
    }

    fn collect(input: impl Read + Send + 'static) -> Vec<EventKind> {
        let (events, rx) = EventSender::channel(64);
        let reader = InputReader::spawn(input, events, 64).unwrap();
        let mut out = Vec::new();
        while let Ok(event) = rx.recv_timeout(Duration::from_secs(10)) {
            let closed = matches!(event.kind, EventKind::InputClosed);
            out.push(event.kind);
            if closed {
                break;
            }
        }
        reader.stop();
        out
    }

    #[test]
    fn test_reads_until_eof() {
        let out = collect(Cursor::new(b"f\x1b[A".to_vec()));
        assert_eq!(out.len(), 3);
        assert!(matches!(out[0], EventKind::KeyPressed(k) if k == KeyEvent::plain(KeyCode::Char('f'))));
        assert!(matches!(out[1], EventKind::KeyPressed(k) if k == KeyEvent::plain(KeyCode::Up)));
        assert!(matches!(out[2], EventKind::InputClosed));
    }

    #[test]
    fn test_malformed_chunk_is_dropped_and_reading_continues() {
        let out = collect(Chunks(vec![b"\x1b[<0;0;1M", b"\x1b[<0;1;1M"]));
        assert_eq!(out.len(), 2);
        assert!(matches!(
            out[0],
            EventKind::Mouse(m) if m.kind == MouseEventKind::Down(MouseButton::Left) && (m.x, m.y) == (0, 0)
        ));
    }
}
