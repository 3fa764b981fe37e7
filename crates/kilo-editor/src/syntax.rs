//! Syntax definitions and highlight tags.
//!
//! A [`Syntax`] is static data: which files it applies to, its keywords,
//! its comment markers, and which lexical features (numbers, strings) to
//! color. The highlighter in [`highlight`](crate::highlight) interprets it.
//!
//! The built-in database ([`DATABASE`]) has a single entry for C-like
//! files. Keywords ending in `|` are second-class (type names) and get a
//! different color from the first-class control keywords.

use std::path::Path;

use kilo_term::color::Color;

// ---------------------------------------------------------------------------
// Highlight tags
// ---------------------------------------------------------------------------

/// Classification of one render byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Highlight {
    #[default]
    Normal,
    /// Single-line comment, to end of line.
    Comment,
    /// Multi-line comment body, including its markers.
    BlockComment,
    /// First-class keyword (control flow, declarations).
    Keyword1,
    /// Second-class keyword (type names).
    Keyword2,
    String,
    Number,
    /// Current search match.
    Match,
}

impl Highlight {
    /// Foreground color used to draw this tag.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Normal => Color::Default,
            Self::Comment | Self::BlockComment => Color::Cyan,
            Self::Keyword1 => Color::Yellow,
            Self::Keyword2 => Color::Green,
            Self::String => Color::Magenta,
            Self::Number => Color::Red,
            Self::Match => Color::Blue,
        }
    }
}

// ---------------------------------------------------------------------------
// Syntax flags
// ---------------------------------------------------------------------------

bitflags::bitflags! {
    /// Lexical features a syntax wants highlighted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct SyntaxFlags: u8 {
        const HIGHLIGHT_NUMBERS = 1 << 0;
        const HIGHLIGHT_STRINGS = 1 << 1;
    }
}

// ---------------------------------------------------------------------------
// Syntax
// ---------------------------------------------------------------------------

/// A static syntax definition.
#[derive(Debug, PartialEq, Eq)]
pub struct Syntax {
    /// Name shown in the status bar.
    pub filetype: &'static str,
    /// `.ext` patterns match the extension; anything else matches as a
    /// substring of the file name.
    pub filematch: &'static [&'static str],
    /// Keywords; a trailing `|` marks the second class.
    pub keywords: &'static [&'static str],
    pub singleline_comment_start: &'static str,
    pub multiline_comment_start: &'static str,
    pub multiline_comment_end: &'static str,
    pub flags: SyntaxFlags,
}

impl Syntax {
    /// Whether this syntax applies to `file_name`.
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        let ext = file_name.rfind('.').map(|dot| &file_name[dot..]);
        self.filematch.iter().any(|pattern| {
            if pattern.starts_with('.') {
                ext == Some(*pattern)
            } else {
                file_name.contains(pattern)
            }
        })
    }

    #[inline]
    #[must_use]
    pub const fn highlights_numbers(&self) -> bool {
        self.flags.contains(SyntaxFlags::HIGHLIGHT_NUMBERS)
    }

    #[inline]
    #[must_use]
    pub const fn highlights_strings(&self) -> bool {
        self.flags.contains(SyntaxFlags::HIGHLIGHT_STRINGS)
    }
}

/// The C syntax: `.c`, `.h` and `.cpp` files.
pub static C: Syntax = Syntax {
    filetype: "c",
    filematch: &[".c", ".h", ".cpp"],
    keywords: &[
        "switch", "if", "while", "for", "break", "continue", "return", "else", "struct", "union",
        "typedef", "static", "enum", "class", "case", "int|", "long|", "double|", "float|",
        "char|", "unsigned|", "signed|", "void|",
    ],
    singleline_comment_start: "//",
    multiline_comment_start: "/*",
    multiline_comment_end: "*/",
    flags: SyntaxFlags::HIGHLIGHT_NUMBERS.union(SyntaxFlags::HIGHLIGHT_STRINGS),
};

/// Every built-in syntax, in match priority order.
pub static DATABASE: &[&Syntax] = &[&C];

/// Pick the syntax for a file path, matching on its file name.
#[must_use]
pub fn detect(path: &Path) -> Option<&'static Syntax> {
    let name = path.file_name()?.to_str()?;
    DATABASE.iter().copied().find(|syntax| syntax.matches(name))
}

/// Bytes that end a number or keyword.
#[inline]
#[must_use]
pub fn is_separator(byte: u8) -> bool {
    byte == 0 || byte.is_ascii_whitespace() || b",.()+-/*=~%<>[];".contains(&byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Highlight colors ---------------------------------------------------

    #[test]
    fn color_codes_match_terminal_palette() {
        assert_eq!(Highlight::Comment.color().fg_code(), 36);
        assert_eq!(Highlight::BlockComment.color().fg_code(), 36);
        assert_eq!(Highlight::Keyword1.color().fg_code(), 33);
        assert_eq!(Highlight::Keyword2.color().fg_code(), 32);
        assert_eq!(Highlight::String.color().fg_code(), 35);
        assert_eq!(Highlight::Number.color().fg_code(), 31);
        assert_eq!(Highlight::Match.color().fg_code(), 34);
        assert_eq!(Highlight::Normal.color().fg_code(), 39);
    }

    // -- File matching ------------------------------------------------------

    #[test]
    fn detects_c_extensions() {
        for name in ["main.c", "kilo.h", "src/app.cpp"] {
            assert_eq!(detect(Path::new(name)), Some(&C), "{name}");
        }
    }

    #[test]
    fn extension_must_be_last() {
        assert_eq!(detect(Path::new("notes.c.txt")), None);
        assert_eq!(detect(Path::new("file.cc")), None);
    }

    #[test]
    fn no_extension_no_syntax() {
        assert_eq!(detect(Path::new("Makefile")), None);
    }

    #[test]
    fn non_dot_pattern_matches_substring() {
        static MAKE: Syntax = Syntax {
            filetype: "make",
            filematch: &["Makefile"],
            keywords: &[],
            singleline_comment_start: "#",
            multiline_comment_start: "",
            multiline_comment_end: "",
            flags: SyntaxFlags::empty(),
        };
        assert!(MAKE.matches("GNUMakefile"));
        assert!(!MAKE.matches("makefile"));
    }

    #[test]
    fn c_enables_both_features() {
        assert!(C.highlights_numbers());
        assert!(C.highlights_strings());
    }

    // -- Separators ---------------------------------------------------------

    #[test]
    fn separators() {
        for &b in b" \t\n\0,.()+-/*=~%<>[];" {
            assert!(is_separator(b), "{b:#x}");
        }
        for &b in b"az_09\"'{}" {
            assert!(!is_separator(b), "{b:#x}");
        }
    }
}
