// SPDX-License-Identifier: MIT
//
// Terminal colors.
//
// kilo paints with the eight standard ANSI foreground colors and nothing
// else. Every terminal that understands VT100 SGR codes can show them, and
// the compositor only has to remember one small integer per run of text to
// decide whether a new escape is needed.

use std::fmt;

/// One of the eight standard ANSI foreground colors, or the terminal default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// The terminal's own foreground color (SGR 39).
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    /// The SGR parameter selecting this color as the foreground.
    ///
    /// Standard colors map to 30–37; [`Default`](Color::Default) maps to 39.
    #[inline]
    #[must_use]
    pub const fn fg_code(self) -> u8 {
        match self {
            Self::Black => 30,
            Self::Red => 31,
            Self::Green => 32,
            Self::Yellow => 33,
            Self::Blue => 34,
            Self::Magenta => 35,
            Self::Cyan => 36,
            Self::White => 37,
            Self::Default => 39,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Default => "default",
            Self::Black => "black",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::White => "white",
        };
        f.write_str(name)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_codes_are_contiguous() {
        let colors = [
            Color::Black,
            Color::Red,
            Color::Green,
            Color::Yellow,
            Color::Blue,
            Color::Magenta,
            Color::Cyan,
            Color::White,
        ];
        for (i, color) in colors.iter().enumerate() {
            assert_eq!(usize::from(color.fg_code()), 30 + i);
        }
    }

    #[test]
    fn default_color_code() {
        assert_eq!(Color::Default.fg_code(), 39);
        assert_eq!(Color::default(), Color::Default);
    }

    #[test]
    fn display_names() {
        assert_eq!(Color::Cyan.to_string(), "cyan");
        assert_eq!(Color::Default.to_string(), "default");
    }
}
