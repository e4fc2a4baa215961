//! Byte-stream decoder for terminal input.
//!
//! Parses raw stdin bytes into structured events:
//! - control bytes (Tab, Enter, Backspace, Ctrl+letter, Null)
//! - printable ASCII and UTF-8 characters
//! - SS3 sequences (`ESC O P..S` for F1-F4, application cursor keys)
//! - CSI sequences with up to two numeric parameters (arrows, Home/End,
//!   Insert/Delete, PageUp/Down, F5-F12, xterm modifier parameters)
//! - SGR mouse reports (`ESC [ < b ; x ; y M|m`)
//! - Alt+key (`ESC` followed by a printable byte)
//!
//! Each chunk is decoded on its own. A malformed or truncated sequence
//! fails the whole chunk; [`InputDecoder::feed`] logs the failure and drops
//! the chunk so the next read starts clean.

use super::keys::{
    InputEvent, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use thiserror::Error;

const ESC: u8 = 0x1b;

/// SGR button-code bit flagging pointer motion.
const MOUSE_MOTION: u16 = 32;
/// SGR button-code bit flagging a wheel event.
const MOUSE_WHEEL: u16 = 64;

/// Why a chunk could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The chunk ended in the middle of an escape sequence.
    #[error("escape sequence starting at byte {at} is truncated")]
    Incomplete {
        /// Offset of the sequence start.
        at: usize,
    },
    /// A well-formed escape sequence with no known meaning.
    #[error("unknown escape sequence {sequence:?}")]
    UnknownSequence {
        /// The sequence, lossily decoded.
        sequence: String,
    },
    /// An SGR mouse report that does not follow the grammar.
    #[error("malformed mouse report {sequence:?}: {reason}")]
    MalformedMouse {
        /// The sequence, lossily decoded.
        sequence: String,
        /// What was wrong with it.
        reason: &'static str,
    },
    /// Bytes at `at` are not valid UTF-8.
    #[error("invalid UTF-8 at byte {at}")]
    InvalidUtf8 {
        /// Offset of the offending byte.
        at: usize,
    },
}

/// Stateless escape-sequence decoder with a dropped-chunk counter.
#[derive(Debug, Default)]
pub struct InputDecoder {
    dropped_chunks: u64,
}

impl InputDecoder {
    /// Create a decoder.
    pub const fn new() -> Self {
        Self { dropped_chunks: 0 }
    }

    /// Decode one chunk, dropping it (with a warning) if it is malformed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<InputEvent> {
        match Self::decode(chunk) {
            Ok(events) => events,
            Err(error) => {
                self.dropped_chunks += 1;
                tracing::warn!(%error, bytes = chunk.len(), "dropping malformed input chunk");
                Vec::new()
            }
        }
    }

    /// Number of chunks dropped by [`feed`](Self::feed) so far.
    pub const fn dropped_chunks(&self) -> u64 {
        self.dropped_chunks
    }

    /// Decode one chunk into events.
    ///
    /// # Errors
    ///
    /// Returns the first [`DecodeError`] found; no events from the chunk are
    /// returned in that case.
    pub fn decode(chunk: &[u8]) -> Result<Vec<InputEvent>, DecodeError> {
        let mut events = Vec::new();
        let mut pos = 0;
        while pos < chunk.len() {
            let (event, consumed) = decode_one(chunk, pos)?;
            events.extend(event);
            pos += consumed;
        }
        Ok(events)
    }
}

type Decoded = Result<(Option<InputEvent>, usize), DecodeError>;

fn key(code: KeyCode, modifiers: KeyModifiers) -> Option<InputEvent> {
    Some(InputEvent::Key(KeyEvent::new(code, modifiers)))
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn decode_one(bytes: &[u8], pos: usize) -> Decoded {
    let byte = bytes[pos];
    let plain = KeyModifiers::NONE;
    match byte {
        ESC => decode_escape(bytes, pos),
        0x00 => Ok((key(KeyCode::Null, plain), 1)),
        0x09 => Ok((key(KeyCode::Tab, plain), 1)),
        0x0a | 0x0d => Ok((key(KeyCode::Enter, plain), 1)),
        0x08 | 0x7f => Ok((key(KeyCode::Backspace, plain), 1)),
        0x01..=0x1a => {
            let ch = char::from(byte - 1 + b'a');
            Ok((key(KeyCode::Char(ch), KeyModifiers::CONTROL), 1))
        }
        0x1c..=0x1f => {
            let ch = char::from(byte + 0x40);
            Ok((key(KeyCode::Char(ch), KeyModifiers::CONTROL), 1))
        }
        0x20..=0x7e => Ok((key(KeyCode::Char(char::from(byte)), plain), 1)),
        _ => decode_utf8(bytes, pos),
    }
}

fn decode_utf8(bytes: &[u8], pos: usize) -> Decoded {
    let len = match bytes[pos] {
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => return Err(DecodeError::InvalidUtf8 { at: pos }),
    };
    let end = pos + len;
    if end > bytes.len() {
        return Err(DecodeError::InvalidUtf8 { at: pos });
    }
    let text = std::str::from_utf8(&bytes[pos..end]).map_err(|_| DecodeError::InvalidUtf8 { at: pos })?;
    let ch = text.chars().next().ok_or(DecodeError::InvalidUtf8 { at: pos })?;
    Ok((key(KeyCode::Char(ch), KeyModifiers::NONE), len))
}

fn decode_escape(bytes: &[u8], pos: usize) -> Decoded {
    let Some(&next) = bytes.get(pos + 1) else {
        // A lone ESC at the end of a read is the Escape key itself.
        return Ok((key(KeyCode::Esc, KeyModifiers::NONE), 1));
    };
    match next {
        b'[' => decode_csi(bytes, pos),
        b'O' => decode_ss3(bytes, pos),
        0x20..=0x7e => Ok((key(KeyCode::Char(char::from(next)), KeyModifiers::ALT), 2)),
        _ => Ok((key(KeyCode::Esc, KeyModifiers::NONE), 1)),
    }
}

fn decode_ss3(bytes: &[u8], pos: usize) -> Decoded {
    let Some(&final_byte) = bytes.get(pos + 2) else {
        return Err(DecodeError::Incomplete { at: pos });
    };
    let code = match final_byte {
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        _ => {
            return Err(DecodeError::UnknownSequence {
                sequence: lossy(&bytes[pos..pos + 3]),
            })
        }
    };
    Ok((key(code, KeyModifiers::NONE), 3))
}

fn decode_csi(bytes: &[u8], pos: usize) -> Decoded {
    let start = pos + 2;
    match bytes.get(start) {
        None => return Err(DecodeError::Incomplete { at: pos }),
        Some(b'<') => return decode_sgr_mouse(bytes, pos),
        Some(_) => {}
    }

    // Parameter bytes are digits and ';'; the final byte is 0x40..=0x7e.
    let mut end = start;
    while end < bytes.len() && matches!(bytes[end], b'0'..=b'9' | b';') {
        end += 1;
    }
    let Some(&final_byte) = bytes.get(end) else {
        return Err(DecodeError::Incomplete { at: pos });
    };
    let sequence = &bytes[pos..=end];
    let unknown = || DecodeError::UnknownSequence {
        sequence: lossy(sequence),
    };
    if !(0x40..=0x7e).contains(&final_byte) {
        return Err(unknown());
    }

    let params = parse_params(&bytes[start..end]).ok_or_else(unknown)?;
    if params.len() > 2 {
        return Err(unknown());
    }
    let first = params.first().copied().flatten();
    let modifiers = params
        .get(1)
        .copied()
        .flatten()
        .map_or(KeyModifiers::NONE, KeyModifiers::from_xterm_param);

    let code = match final_byte {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        b'Z' => return Ok((key(KeyCode::BackTab, KeyModifiers::SHIFT), sequence.len())),
        b'~' => match first {
            Some(1 | 7) => KeyCode::Home,
            Some(2) => KeyCode::Insert,
            Some(3) => KeyCode::Delete,
            Some(4 | 8) => KeyCode::End,
            Some(5) => KeyCode::PageUp,
            Some(6) => KeyCode::PageDown,
            Some(n @ 15) => KeyCode::F((n - 10) as u8),
            Some(n @ 17..=21) => KeyCode::F((n - 11) as u8),
            Some(n @ 23..=24) => KeyCode::F((n - 12) as u8),
            _ => return Err(unknown()),
        },
        _ => return Err(unknown()),
    };
    Ok((key(code, modifiers), sequence.len()))
}

/// Split `;`-separated decimal parameters. Empty parameters are `None`.
fn parse_params(raw: &[u8]) -> Option<Vec<Option<u32>>> {
    if raw.is_empty() {
        return Some(Vec::new());
    }
    raw.split(|b| *b == b';')
        .map(|part| {
            if part.is_empty() {
                return Some(None);
            }
            std::str::from_utf8(part).ok()?.parse().ok().map(Some)
        })
        .collect()
}

fn decode_sgr_mouse(bytes: &[u8], pos: usize) -> Decoded {
    let start = pos + 3;
    let mut end = start;
    while end < bytes.len() && matches!(bytes[end], b'0'..=b'9' | b';') {
        end += 1;
    }
    let Some(&terminator) = bytes.get(end) else {
        return Err(DecodeError::Incomplete { at: pos });
    };
    let sequence = &bytes[pos..=end];
    let malformed = |reason| DecodeError::MalformedMouse {
        sequence: lossy(sequence),
        reason,
    };
    if terminator != b'M' && terminator != b'm' {
        return Err(malformed("expected M or m terminator"));
    }

    let fields: Vec<u16> = bytes[start..end]
        .split(|b| *b == b';')
        .map(|part| std::str::from_utf8(part).ok()?.parse().ok())
        .collect::<Option<_>>()
        .ok_or_else(|| malformed("non-numeric field"))?;
    let [code, x, y] = fields[..] else {
        return Err(malformed("expected three fields"));
    };
    if x == 0 || y == 0 {
        return Err(malformed("coordinates are 1-based"));
    }
    let (x, y) = (x - 1, y - 1);

    if code & MOUSE_WHEEL != 0 {
        tracing::trace!(code, x, y, "ignoring mouse wheel report");
        return Ok((None, sequence.len()));
    }

    let button = match code & 0b11 {
        0 => Some(MouseButton::Left),
        1 => Some(MouseButton::Middle),
        2 => Some(MouseButton::Right),
        _ => None,
    };
    let kind = match (button, code & MOUSE_MOTION != 0, terminator) {
        (None, _, _) => MouseEventKind::Moved(None),
        (Some(button), true, _) => MouseEventKind::Moved(Some(button)),
        (Some(button), false, b'M') => MouseEventKind::Down(button),
        (Some(button), false, _) => MouseEventKind::Up(button),
    };

    Ok((Some(InputEvent::Mouse(MouseEvent { kind, x, y })), sequence.len()))
}
