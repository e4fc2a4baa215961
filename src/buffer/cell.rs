//! Cell: The atomic unit of terminal display.
//!
//! A cell is one character plus the style it is drawn with. Colors are
//! optional: an unset color leaves the terminal's default in place.

use bitflags::bitflags;

/// True-color RGB representation.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black (0, 0, 0)
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (255, 255, 255)
    pub const WHITE: Self = Self::new(255, 255, 255);
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

bitflags! {
    /// Text attributes.
    ///
    /// # Example
    /// ```
    /// use trellis::Modifiers;
    /// let style = Modifiers::BOLD | Modifiers::ITALIC;
    /// assert!(style.contains(Modifiers::BOLD));
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Bold text
        const BOLD = 0b0000_0001;
        /// Dim/faint text
        const DIM = 0b0000_0010;
        /// Italic text
        const ITALIC = 0b0000_0100;
        /// Underlined text
        const UNDERLINE = 0b0000_1000;
        /// Strikethrough text
        const STRIKETHROUGH = 0b0001_0000;
    }
}

impl std::fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

impl Modifiers {
    /// SGR parameter for each attribute, in emission order.
    pub(crate) const SGR_CODES: [(Self, u8); 5] = [
        (Self::BOLD, 1),
        (Self::DIM, 2),
        (Self::ITALIC, 3),
        (Self::UNDERLINE, 4),
        (Self::STRIKETHROUGH, 9),
    ];
}

/// Colors and attributes of a painted cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct CellStyle {
    /// Foreground color (`None` = terminal default).
    pub fg: Option<Rgb>,
    /// Background color (`None` = terminal default).
    pub bg: Option<Rgb>,
    /// Text attributes.
    pub modifiers: Modifiers,
}

impl CellStyle {
    /// The terminal's default style.
    pub const DEFAULT: Self = Self {
        fg: None,
        bg: None,
        modifiers: Modifiers::empty(),
    };

    /// True when nothing needs to be emitted to draw this style.
    #[inline]
    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }
}

/// A single terminal cell.
///
/// Cells are `Copy` and compared by value. The second column of a wide
/// (CJK) character is a *continuation* cell that the differ never emits.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    ch: char,
    style: CellStyle,
    continuation: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Cell {
    /// An empty cell (space with the default style).
    pub const EMPTY: Self = Self {
        ch: ' ',
        style: CellStyle::DEFAULT,
        continuation: false,
    };

    /// Create a cell holding `ch` with the default style.
    #[inline]
    pub const fn new(ch: char) -> Self {
        Self {
            ch,
            style: CellStyle::DEFAULT,
            continuation: false,
        }
    }

    /// Create a wide-character continuation cell.
    #[inline]
    pub const fn wide_continuation(style: CellStyle) -> Self {
        Self {
            ch: ' ',
            style,
            continuation: true,
        }
    }

    /// The character drawn in this cell.
    #[inline]
    pub const fn ch(&self) -> char {
        self.ch
    }

    /// The style of this cell.
    #[inline]
    pub const fn style(&self) -> CellStyle {
        self.style
    }

    /// Check if this is a wide-character continuation.
    #[inline]
    pub const fn is_wide_continuation(&self) -> bool {
        self.continuation
    }

    /// Display width of the character (0 for continuations).
    pub fn display_width(&self) -> usize {
        if self.continuation {
            0
        } else {
            unicode_width::UnicodeWidthChar::width(self.ch).unwrap_or(0)
        }
    }

    /// Replace the character, keeping the style.
    #[inline]
    pub const fn set_ch(&mut self, ch: char) -> &mut Self {
        self.ch = ch;
        self.continuation = false;
        self
    }

    /// Replace the style.
    #[inline]
    pub const fn set_style(&mut self, style: CellStyle) -> &mut Self {
        self.style = style;
        self
    }

    /// Set the foreground color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: Rgb) -> Self {
        self.style.fg = Some(fg);
        self
    }

    /// Set the background color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: Rgb) -> Self {
        self.style.bg = Some(bg);
        self
    }

    /// Set the modifiers (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.style.modifiers = modifiers;
        self
    }

    /// Set the whole style (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_style(mut self, style: CellStyle) -> Self {
        self.style = style;
        self
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("ch", &self.ch)
            .field("style", &self.style)
            .field("continuation", &self.continuation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_equality() {
        let a = Cell::new('A').with_fg(Rgb::new(255, 0, 0));
        let b = Cell::new('A').with_fg(Rgb::new(255, 0, 0));
        let c = Cell::new('A').with_fg(Rgb::new(0, 255, 0));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_cell_builder_pattern() {
        let cell = Cell::new('X')
            .with_fg(Rgb::new(255, 0, 0))
            .with_bg(Rgb::new(0, 0, 255))
            .with_modifiers(Modifiers::BOLD | Modifiers::ITALIC);

        assert_eq!(cell.style().fg, Some(Rgb::new(255, 0, 0)));
        assert_eq!(cell.style().bg, Some(Rgb::new(0, 0, 255)));
        assert!(cell.style().modifiers.contains(Modifiers::BOLD));
        assert!(!cell.style().modifiers.contains(Modifiers::DIM));
    }

    #[test]
    fn test_display_width() {
        assert_eq!(Cell::new('a').display_width(), 1);
        assert_eq!(Cell::new('日').display_width(), 2);
        assert_eq!(Cell::wide_continuation(CellStyle::DEFAULT).display_width(), 0);
    }

    #[test]
    fn test_set_ch_clears_continuation() {
        let mut cell = Cell::wide_continuation(CellStyle::DEFAULT);
        cell.set_ch('x');
        assert!(!cell.is_wide_continuation());
        assert_eq!(cell.ch(), 'x');
    }
}
