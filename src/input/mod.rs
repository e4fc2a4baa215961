//! Input: structured key/mouse events and the raw byte decoder.

mod decoder;
mod keys;

pub use decoder::{DecodeError, InputDecoder};
pub use keys::{
    InputEvent, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
