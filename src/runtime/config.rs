//! Runtime configuration.

use crate::input::KeyEvent;

/// Configuration for the terminal session and the render loop.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Use the alternate screen buffer.
    pub alternate_screen: bool,
    /// Enable any-event mouse reporting.
    pub enable_mouse: bool,
    /// Join adjacent borders after painting.
    pub border_healing: bool,
    /// Key that quits when no handler consumes it.
    pub quit_key: Option<KeyEvent>,
    /// Capacity of the bounded event queue.
    pub queue_capacity: usize,
    /// Bytes requested per raw input read.
    pub read_chunk_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            alternate_screen: true,
            enable_mouse: true,
            border_healing: true,
            quit_key: Some(KeyEvent::ctrl('c')),
            queue_capacity: 1024,
            read_chunk_size: 1024,
        }
    }
}

impl RuntimeConfig {
    /// Set whether the alternate screen is used.
    #[must_use]
    pub const fn with_alternate_screen(mut self, enabled: bool) -> Self {
        self.alternate_screen = enabled;
        self
    }

    /// Set whether mouse reporting is enabled.
    #[must_use]
    pub const fn with_mouse(mut self, enabled: bool) -> Self {
        self.enable_mouse = enabled;
        self
    }

    /// Set the initial state of border healing.
    #[must_use]
    pub const fn with_border_healing(mut self, enabled: bool) -> Self {
        self.border_healing = enabled;
        self
    }

    /// Set the fallback quit key (`None` disables it).
    #[must_use]
    pub const fn with_quit_key(mut self, key: Option<KeyEvent>) -> Self {
        self.quit_key = key;
        self
    }

    /// Set the event queue capacity.
    #[must_use]
    pub const fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Set the raw input read size.
    #[must_use]
    pub const fn with_read_chunk_size(mut self, size: usize) -> Self {
        self.read_chunk_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_quit_on_ctrl_c() {
        let config = RuntimeConfig::default();
        assert_eq!(config.quit_key, Some(KeyEvent::ctrl('c')));
        assert!(config.border_healing);
        assert_eq!(config.queue_capacity, 1024);
    }

    #[test]
    fn test_builders_override_fields() {
        let config = RuntimeConfig::default()
            .with_quit_key(None)
            .with_mouse(false)
            .with_read_chunk_size(16);
        assert_eq!(config.quit_key, None);
        assert!(!config.enable_mouse);
        assert_eq!(config.read_chunk_size, 16);
        assert!(config.alternate_screen);
    }
}
