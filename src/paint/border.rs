//! Border glyph sets and their connectivity.
//!
//! Every glyph of a set has *arms*: the directions in which its line leaves
//! the cell. `─` has left and right arms, `┌` has down and right arms, and
//! so on. Arms are expressed with [`BorderSides`]: `TOP` is up, `BOTTOM`
//! is down.

use crate::style::{BorderKind, BorderSides};

/// The glyphs of one border kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderGlyphs {
    /// `─`
    pub horizontal: char,
    /// `│`
    pub vertical: char,
    /// `┌`
    pub top_left: char,
    /// `┐`
    pub top_right: char,
    /// `└`
    pub bottom_left: char,
    /// `┘`
    pub bottom_right: char,
    /// `┬`
    pub tee_down: char,
    /// `┴`
    pub tee_up: char,
    /// `├`
    pub tee_right: char,
    /// `┤`
    pub tee_left: char,
    /// `┼`
    pub cross: char,
}

const LIGHT: BorderGlyphs = BorderGlyphs {
    horizontal: '─',
    vertical: '│',
    top_left: '┌',
    top_right: '┐',
    bottom_left: '└',
    bottom_right: '┘',
    tee_down: '┬',
    tee_up: '┴',
    tee_right: '├',
    tee_left: '┤',
    cross: '┼',
};

const HEAVY: BorderGlyphs = BorderGlyphs {
    horizontal: '━',
    vertical: '┃',
    top_left: '┏',
    top_right: '┓',
    bottom_left: '┗',
    bottom_right: '┛',
    tee_down: '┳',
    tee_up: '┻',
    tee_right: '┣',
    tee_left: '┫',
    cross: '╋',
};

const DOUBLE: BorderGlyphs = BorderGlyphs {
    horizontal: '═',
    vertical: '║',
    top_left: '╔',
    top_right: '╗',
    bottom_left: '╚',
    bottom_right: '╝',
    tee_down: '╦',
    tee_up: '╩',
    tee_right: '╠',
    tee_left: '╣',
    cross: '╬',
};

const ROUNDED: BorderGlyphs = BorderGlyphs {
    top_left: '╭',
    top_right: '╮',
    bottom_left: '╰',
    bottom_right: '╯',
    ..LIGHT
};

const ASCII: BorderGlyphs = BorderGlyphs {
    horizontal: '-',
    vertical: '|',
    top_left: '+',
    top_right: '+',
    bottom_left: '+',
    bottom_right: '+',
    tee_down: '+',
    tee_up: '+',
    tee_right: '+',
    tee_left: '+',
    cross: '+',
};

const UP: u8 = BorderSides::TOP.bits();
const DOWN: u8 = BorderSides::BOTTOM.bits();
const LEFT: u8 = BorderSides::LEFT.bits();
const RIGHT: u8 = BorderSides::RIGHT.bits();

impl BorderGlyphs {
    /// The glyph set for `kind`.
    pub const fn for_kind(kind: BorderKind) -> &'static Self {
        match kind {
            BorderKind::Light => &LIGHT,
            BorderKind::Heavy => &HEAVY,
            BorderKind::Double => &DOUBLE,
            BorderKind::Rounded => &ROUNDED,
            BorderKind::Ascii => &ASCII,
        }
    }

    /// Arms of `ch`, or `None` if it is not in this set.
    ///
    /// The cross is checked first so that sets reusing one glyph for every
    /// junction (ASCII `+`) treat it as connecting everywhere.
    pub fn arms(&self, ch: char) -> Option<BorderSides> {
        let bits = if ch == self.cross {
            UP | DOWN | LEFT | RIGHT
        } else if ch == self.horizontal {
            LEFT | RIGHT
        } else if ch == self.vertical {
            UP | DOWN
        } else if ch == self.top_left {
            DOWN | RIGHT
        } else if ch == self.top_right {
            DOWN | LEFT
        } else if ch == self.bottom_left {
            UP | RIGHT
        } else if ch == self.bottom_right {
            UP | LEFT
        } else if ch == self.tee_down {
            LEFT | RIGHT | DOWN
        } else if ch == self.tee_up {
            LEFT | RIGHT | UP
        } else if ch == self.tee_right {
            UP | DOWN | RIGHT
        } else if ch == self.tee_left {
            UP | DOWN | LEFT
        } else {
            return None;
        };
        Some(BorderSides::from_bits_truncate(bits))
    }

    /// True if `ch` belongs to this set.
    pub fn contains(&self, ch: char) -> bool {
        self.arms(ch).is_some()
    }

    /// The glyph whose arms are exactly `arms` (a single arm extends to a
    /// straight line). `None` for no arms.
    pub const fn junction(&self, arms: BorderSides) -> Option<char> {
        const LR: u8 = LEFT | RIGHT;
        const UD: u8 = UP | DOWN;
        const DR: u8 = DOWN | RIGHT;
        const DL: u8 = DOWN | LEFT;
        const UR: u8 = UP | RIGHT;
        const UL: u8 = UP | LEFT;
        const LRD: u8 = LEFT | RIGHT | DOWN;
        const LRU: u8 = LEFT | RIGHT | UP;
        const UDR: u8 = UP | DOWN | RIGHT;
        const UDL: u8 = UP | DOWN | LEFT;
        const ALL: u8 = UP | DOWN | LEFT | RIGHT;
        Some(match arms.bits() {
            LR | LEFT | RIGHT => self.horizontal,
            UD | UP | DOWN => self.vertical,
            DR => self.top_left,
            DL => self.top_right,
            UR => self.bottom_left,
            UL => self.bottom_right,
            LRD => self.tee_down,
            LRU => self.tee_up,
            UDR => self.tee_right,
            UDL => self.tee_left,
            ALL => self.cross,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arms_round_trip_through_junction() {
        for kind in [
            BorderKind::Light,
            BorderKind::Heavy,
            BorderKind::Double,
            BorderKind::Rounded,
        ] {
            let g = BorderGlyphs::for_kind(kind);
            for ch in [g.top_left, g.tee_up, g.cross, g.vertical, g.bottom_right] {
                let arms = g.arms(ch).unwrap();
                assert_eq!(g.junction(arms), Some(ch), "{kind:?} {ch}");
            }
        }
    }

    #[test]
    fn test_rounded_uses_light_junctions() {
        let g = BorderGlyphs::for_kind(BorderKind::Rounded);
        assert_eq!(g.junction(BorderSides::ALL), Some('┼'));
        assert_eq!(g.arms('╭'), Some(BorderSides::BOTTOM | BorderSides::RIGHT));
        assert_eq!(g.arms('┌'), None);
    }

    #[test]
    fn test_ascii_plus_connects_everywhere() {
        let g = BorderGlyphs::for_kind(BorderKind::Ascii);
        assert_eq!(g.arms('+'), Some(BorderSides::ALL));
        assert_eq!(g.junction(BorderSides::TOP | BorderSides::RIGHT), Some('+'));
        assert!(!g.contains('x'));
    }

    #[test]
    fn test_single_arm_extends() {
        let g = BorderGlyphs::for_kind(BorderKind::Light);
        assert_eq!(g.junction(BorderSides::LEFT), Some('─'));
        assert_eq!(g.junction(BorderSides::BOTTOM), Some('│'));
        assert_eq!(g.junction(BorderSides::empty()), None);
    }
}
