//! Syntax highlighting — a per-line state machine with one bit of carry.
//!
//! [`highlight_line`] classifies every render byte of one line. The only
//! state that crosses a line boundary is whether a multi-line comment is
//! still open at the end, so highlighting row `n` needs row `n - 1`'s
//! `comment_open` and nothing else.
//!
//! # Cascade
//!
//! Editing a row can open or close a block comment, which changes how every
//! following row reads. [`refresh`] re-highlights a forced range of rows and
//! then keeps walking downward for as long as the carried comment state keeps
//! changing. Typing `/*` at the top of a file recolors the whole file; typing
//! a letter inside a word recolors one row.
//!
//! # Priority
//!
//! At each position the first rule that applies wins:
//!
//! 1. single-line comment marker (outside strings and block comments)
//! 2. inside a block comment, or its opening marker
//! 3. inside a string, or an opening quote
//! 4. number (digits after a separator, `.` continuing a number)
//! 5. keyword (after a separator, followed by a separator)
//! 6. normal

use crate::row::Row;
use crate::syntax::{is_separator, Highlight, Syntax};

// ---------------------------------------------------------------------------
// Line classifier
// ---------------------------------------------------------------------------

/// Classify one line of rendered bytes.
///
/// `open_in` is whether the previous row ended inside a block comment.
/// Returns the tags (one per byte) and whether this row ends inside one.
/// With no syntax every byte is [`Highlight::Normal`] and nothing carries.
#[must_use]
pub fn highlight_line(
    render: &[u8],
    syntax: Option<&Syntax>,
    open_in: bool,
) -> (Vec<Highlight>, bool) {
    let mut hl = vec![Highlight::Normal; render.len()];
    let Some(syntax) = syntax else {
        return (hl, false);
    };

    let scs = syntax.singleline_comment_start.as_bytes();
    let mcs = syntax.multiline_comment_start.as_bytes();
    let mce = syntax.multiline_comment_end.as_bytes();
    let block_comments = !mcs.is_empty() && !mce.is_empty();

    let mut prev_sep = true;
    let mut quote: Option<u8> = None;
    let mut in_comment = open_in && block_comments;

    let mut i = 0;
    while i < render.len() {
        let c = render[i];
        let rest = &render[i..];
        let prev_hl = if i > 0 { hl[i - 1] } else { Highlight::Normal };

        if !scs.is_empty() && quote.is_none() && !in_comment && rest.starts_with(scs) {
            hl[i..].fill(Highlight::Comment);
            break;
        }

        if block_comments && quote.is_none() {
            if in_comment {
                if rest.starts_with(mce) {
                    hl[i..i + mce.len()].fill(Highlight::BlockComment);
                    i += mce.len();
                    in_comment = false;
                    prev_sep = true;
                } else {
                    hl[i] = Highlight::BlockComment;
                    i += 1;
                }
                continue;
            }
            if rest.starts_with(mcs) {
                hl[i..i + mcs.len()].fill(Highlight::BlockComment);
                i += mcs.len();
                in_comment = true;
                continue;
            }
        }

        if syntax.highlights_strings() {
            if let Some(q) = quote {
                hl[i] = Highlight::String;
                if c == b'\\' && i + 1 < render.len() {
                    hl[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if c == q {
                    quote = None;
                }
                i += 1;
                prev_sep = true;
                continue;
            }
            if c == b'"' || c == b'\'' {
                quote = Some(c);
                hl[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        if syntax.highlights_numbers() {
            let continues = prev_hl == Highlight::Number;
            if (c.is_ascii_digit() && (prev_sep || continues)) || (c == b'.' && continues) {
                hl[i] = Highlight::Number;
                i += 1;
                prev_sep = false;
                continue;
            }
        }

        if prev_sep {
            if let Some((len, tag)) = match_keyword(rest, syntax.keywords) {
                hl[i..i + len].fill(tag);
                i += len;
                prev_sep = false;
                continue;
            }
        }

        prev_sep = is_separator(c);
        i += 1;
    }

    (hl, in_comment)
}

/// Longest keyword at the start of `text` that is followed by a separator
/// or the end of the line. Returns its length and tag.
fn match_keyword(text: &[u8], keywords: &[&str]) -> Option<(usize, Highlight)> {
    keywords
        .iter()
        .filter_map(|kw| {
            let (word, tag) = kw
                .strip_suffix('|')
                .map_or((*kw, Highlight::Keyword1), |w| (w, Highlight::Keyword2));
            let word = word.as_bytes();
            let bounded = text.get(word.len()).is_none_or(|&b| is_separator(b));
            (!word.is_empty() && text.starts_with(word) && bounded).then_some((word.len(), tag))
        })
        .max_by_key(|&(len, _)| len)
}

// ---------------------------------------------------------------------------
// Cascade
// ---------------------------------------------------------------------------

/// Re-highlight `rows[from..=through]`, then continue downward while the
/// carried comment state keeps changing.
///
/// Indices past the end are clamped. Returns how many rows were
/// re-highlighted.
pub fn refresh(rows: &mut [Row], syntax: Option<&Syntax>, from: usize, through: usize) -> usize {
    let mut y = from;
    let mut touched = 0;
    while y < rows.len() {
        let open_in = y > 0 && rows[y - 1].comment_open();
        let (hl, open_out) = highlight_line(rows[y].render(), syntax, open_in);
        let changed = rows[y].set_highlight(hl, open_out);
        touched += 1;
        if y >= through && !changed {
            break;
        }
        y += 1;
    }
    touched
}

/// Re-highlight every row from the top.
pub fn refresh_all(rows: &mut [Row], syntax: Option<&Syntax>) -> usize {
    refresh(rows, syntax, 0, rows.len())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::syntax::C;

    use crate::syntax::Highlight::{BlockComment, Comment, Keyword1, Keyword2, Normal, Number};

    fn line(text: &str) -> Vec<Highlight> {
        highlight_line(text.as_bytes(), Some(&C), false).0
    }

    fn rows(lines: &[&str]) -> Vec<Row> {
        let mut rows: Vec<Row> = lines.iter().map(|l| Row::new(*l)).collect();
        refresh_all(&mut rows, Some(&C));
        rows
    }

    // -- No syntax ----------------------------------------------------------

    #[test]
    fn no_syntax_is_all_normal() {
        let (hl, open) = highlight_line(b"/* int 42 \"s\"", None, true);
        assert!(hl.iter().all(|&h| h == Normal));
        assert!(!open);
    }

    // -- Comments -----------------------------------------------------------

    #[test]
    fn single_line_comment_runs_to_end() {
        let hl = line("x = 1; // note");
        assert_eq!(&hl[7..], &[Comment; 7]);
        assert_eq!(hl[0], Normal);
    }

    #[test]
    fn comment_marker_inside_string_is_string() {
        let hl = line("\"//\" x");
        assert_eq!(&hl[..4], &[Highlight::String; 4]);
        assert_eq!(hl[5], Normal);
    }

    #[test]
    fn block_comment_within_line() {
        let (hl, open) = highlight_line(b"a /* b */ c", Some(&C), false);
        assert_eq!(&hl[2..9], &[BlockComment; 7]);
        assert_eq!(hl[10], Normal);
        assert!(!open);
    }

    #[test]
    fn unterminated_block_comment_carries() {
        let (hl, open) = highlight_line(b"x /* open", Some(&C), false);
        assert!(open);
        assert_eq!(hl[0], Normal);
        assert_eq!(hl[8], BlockComment);
    }

    #[test]
    fn carried_comment_colors_from_start() {
        let (hl, open) = highlight_line(b"still */ 1", Some(&C), true);
        assert_eq!(&hl[..8], &[BlockComment; 8]);
        assert_eq!(hl[9], Number);
        assert!(!open);
    }

    #[test]
    fn multi_row_block_comment() {
        let rows = rows(&["/* start", "still in comment", "end */", "code"]);
        for row in &rows[..3] {
            assert!(row.highlight().iter().all(|&h| h == BlockComment));
        }
        assert!(rows[3].highlight().iter().all(|&h| h == Normal));
        assert!(rows[0].comment_open());
        assert!(rows[1].comment_open());
        assert!(!rows[2].comment_open());
    }

    // -- Strings ------------------------------------------------------------

    #[test]
    fn string_with_escaped_quote() {
        let hl = line(r#""a\"b" x"#);
        assert_eq!(&hl[..6], &[Highlight::String; 6]);
        assert_eq!(hl[7], Normal);
    }

    #[test]
    fn single_quoted_char() {
        let hl = line("c = 'x';");
        assert_eq!(&hl[4..7], &[Highlight::String; 3]);
    }

    #[test]
    fn closing_quote_counts_as_separator() {
        let hl = line("\"a\"int");
        assert_eq!(&hl[3..], &[Keyword2; 3]);
    }

    // -- Numbers ------------------------------------------------------------

    #[test]
    fn numbers_after_separator() {
        let hl = line("x = 42;");
        assert_eq!(&hl[4..6], &[Number; 2]);
        assert_eq!(hl[6], Normal);
    }

    #[test]
    fn decimal_point_continues_number() {
        let hl = line("3.14");
        assert_eq!(hl, vec![Number; 4]);
    }

    #[test]
    fn lone_dot_is_not_number() {
        let hl = line("a.b");
        assert!(hl.iter().all(|&h| h == Normal));
    }

    #[test]
    fn digits_inside_identifier_are_normal() {
        let hl = line("x1 = v2");
        assert!(hl.iter().all(|&h| h == Normal));
    }

    // -- Keywords -----------------------------------------------------------

    #[test]
    fn keyword_needs_trailing_separator() {
        assert!(line("intx = 1;")[..3].iter().all(|&h| h == Normal));
        assert_eq!(&line("int x = 1;")[..3], &[Keyword2; 3]);
    }

    #[test]
    fn keyword_at_end_of_line() {
        assert_eq!(line("return"), vec![Keyword1; 6]);
    }

    #[test]
    fn keyword_needs_leading_separator() {
        assert!(line("xif (a)")[..3].iter().all(|&h| h == Normal));
    }

    #[test]
    fn keyword_classes() {
        let hl = line("static char c;");
        assert_eq!(&hl[..6], &[Keyword1; 6]);
        assert_eq!(&hl[7..11], &[Keyword2; 4]);
    }

    #[test]
    fn longest_keyword_wins() {
        static SYN: Syntax = Syntax {
            filetype: "test",
            filematch: &[],
            keywords: &["do", "double|"],
            singleline_comment_start: "",
            multiline_comment_start: "",
            multiline_comment_end: "",
            flags: crate::syntax::SyntaxFlags::empty(),
        };
        let (hl, _) = highlight_line(b"double d", Some(&SYN), false);
        assert_eq!(&hl[..6], &[Keyword2; 6]);
    }

    // -- Idempotence --------------------------------------------------------

    #[test]
    fn highlighting_is_idempotent() {
        let text = b"int main() { /* x */ return 0; } // end";
        let first = highlight_line(text, Some(&C), false);
        let second = highlight_line(text, Some(&C), false);
        assert_eq!(first, second);
    }

    // -- Cascade ------------------------------------------------------------

    #[test]
    fn refresh_stops_when_state_settles() {
        let mut rows = rows(&["a", "b", "c", "d"]);
        assert_eq!(refresh(&mut rows, Some(&C), 1, 1), 1);
    }

    #[test]
    fn refresh_honors_forced_range() {
        let mut rows = rows(&["a", "b", "c", "d"]);
        assert_eq!(refresh(&mut rows, Some(&C), 0, 2), 3);
    }

    #[test]
    fn opening_comment_cascades_to_end() {
        let mut rows = rows(&["x", "a", "b", "c"]);
        rows[0].insert(0, b'*');
        rows[0].insert(0, b'/');
        assert_eq!(refresh(&mut rows, Some(&C), 0, 0), 4);
        assert!(rows[3].highlight().iter().all(|&h| h == BlockComment));
    }

    #[test]
    fn closing_comment_cascades_back_to_normal() {
        let mut rows = rows(&["/*", "a", "b"]);
        assert_eq!(rows[2].highlight(), &[BlockComment]);
        rows[0].append(b"*/");
        refresh(&mut rows, Some(&C), 0, 0);
        assert_eq!(rows[1].highlight(), &[Normal]);
        assert_eq!(rows[2].highlight(), &[Normal]);
    }

    #[test]
    fn refresh_past_end_is_noop() {
        let mut rows = rows(&["a"]);
        assert_eq!(refresh(&mut rows, Some(&C), 5, 9), 0);
    }
}
