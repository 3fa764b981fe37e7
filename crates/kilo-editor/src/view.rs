//! View — the bridge from document to terminal bytes.
//!
//! A `View` holds the viewport (scroll offsets and text-area size) and
//! knows how to turn a [`Document`] plus a [`Cursor`] into one complete
//! frame of escape sequences. It doesn't own the document or cursor; those
//! are passed to [`scroll`](View::scroll) and [`render`](View::render) as
//! parameters.
//!
//! The frame layout:
//!
//! ```text
//! ┌───────────────────────────────────┐
//! │ int main() {                      │ ← screen_rows text rows
//! │     return 0;                     │
//! │ }                                 │
//! │ ~                                 │ ← past the end of the file
//! ├───────────────────────────────────┤
//! │ main.c - 3 lines      c | 1/3     │ ← status bar (inverse video)
//! │ HELP: Ctrl-S = save | ...         │ ← message bar
//! └───────────────────────────────────┘
//! ```
//!
//! Every text row ends with erase-to-end-of-line, so nothing from the
//! previous frame survives and the screen is never cleared as a whole.

use std::io::{self, Write};
use std::time::Instant;

use kilo_term::ansi;
use kilo_term::color::Color;
use kilo_term::terminal::Size;

use crate::cursor::Cursor;
use crate::document::Document;
use crate::options::{self, MESSAGE_TIMEOUT};
use crate::row::Row;
use crate::syntax::Highlight;

/// Rows reserved below the text area: status bar and message bar.
const CHROME_ROWS: usize = 2;

/// Longest file name shown in the status bar.
const STATUS_NAME_MAX: usize = 20;

// ---------------------------------------------------------------------------
// Status message
// ---------------------------------------------------------------------------

/// Text for the message bar, stamped with when it was set.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    text: String,
    set_at: Instant,
}

impl StatusMessage {
    /// A message set now.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self::at(text, Instant::now())
    }

    /// A message set at `set_at`.
    #[must_use]
    pub fn at(text: impl Into<String>, set_at: Instant) -> Self {
        Self {
            text: text.into(),
            set_at,
        }
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the message is still young enough to show at `now`.
    #[must_use]
    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.set_at) < MESSAGE_TIMEOUT
    }
}

/// What the bars at the bottom of the frame show besides the document.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusInfo<'a> {
    /// File name, or `None` for an unnamed document.
    pub file_name: Option<&'a str>,
    /// Message bar text, already filtered for visibility.
    pub message: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// The viewport onto a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    /// First visible document row.
    row_offset: usize,
    /// First visible render column.
    col_offset: usize,
    /// Height of the text area (terminal rows minus the two bars).
    screen_rows: usize,
    /// Width of the text area.
    screen_cols: usize,
    /// Cursor render column, derived by the last [`scroll`](Self::scroll).
    render_x: usize,
}

impl View {
    /// Create a view with a text area of `screen_rows × screen_cols`.
    #[must_use]
    pub const fn new(screen_rows: usize, screen_cols: usize) -> Self {
        Self {
            row_offset: 0,
            col_offset: 0,
            screen_rows,
            screen_cols,
            render_x: 0,
        }
    }

    /// Create a view filling a terminal of `size`, leaving room for the bars.
    #[must_use]
    pub fn for_terminal(size: Size) -> Self {
        let mut view = Self::default();
        view.resize(size);
        view
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn row_offset(&self) -> usize {
        self.row_offset
    }

    #[inline]
    #[must_use]
    pub const fn col_offset(&self) -> usize {
        self.col_offset
    }

    /// `(row_offset, col_offset)`.
    #[inline]
    #[must_use]
    pub const fn offsets(&self) -> (usize, usize) {
        (self.row_offset, self.col_offset)
    }

    #[inline]
    #[must_use]
    pub const fn screen_rows(&self) -> usize {
        self.screen_rows
    }

    #[inline]
    #[must_use]
    pub const fn screen_cols(&self) -> usize {
        self.screen_cols
    }

    #[inline]
    #[must_use]
    pub const fn render_x(&self) -> usize {
        self.render_x
    }

    // -- Configuration ------------------------------------------------------

    /// Restore saved offsets (search cancel).
    pub const fn set_offsets(&mut self, (row_offset, col_offset): (usize, usize)) {
        self.row_offset = row_offset;
        self.col_offset = col_offset;
    }

    /// Make row `y` the first visible row (search match placement).
    pub const fn place_row_at_top(&mut self, y: usize) {
        self.row_offset = y;
    }

    /// Adopt a new terminal size.
    pub fn resize(&mut self, size: Size) {
        self.screen_rows = usize::from(size.rows).saturating_sub(CHROME_ROWS);
        self.screen_cols = usize::from(size.cols);
    }

    // -- Scrolling ----------------------------------------------------------

    /// Derive the cursor's render column and adjust the offsets so the
    /// cursor lies inside the viewport.
    pub fn scroll(&mut self, doc: &Document, cursor: &Cursor) {
        let y = cursor.y();
        self.render_x = doc.row(y).map_or(0, |row| row.cx_to_rx(cursor.x()));

        let rows = self.screen_rows.max(1);
        let cols = self.screen_cols.max(1);

        if y < self.row_offset {
            self.row_offset = y;
        }
        if y >= self.row_offset + rows {
            self.row_offset = y + 1 - rows;
        }
        if self.render_x < self.col_offset {
            self.col_offset = self.render_x;
        }
        if self.render_x >= self.col_offset + cols {
            self.col_offset = self.render_x + 1 - cols;
        }
    }

    // -- Rendering ----------------------------------------------------------

    /// Write one complete frame: text rows, status bar, message bar, and
    /// the final cursor position.
    ///
    /// Call [`scroll`](Self::scroll) first so the offsets and render column
    /// are current.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn render(
        &self,
        out: &mut impl Write,
        doc: &Document,
        cursor: &Cursor,
        status: &StatusInfo<'_>,
    ) -> io::Result<()> {
        ansi::cursor_hide(out)?;
        ansi::cursor_home(out)?;

        self.draw_rows(out, doc)?;
        self.draw_status_bar(out, doc, cursor, status.file_name)?;
        self.draw_message_bar(out, status.message)?;

        ansi::cursor_to(
            out,
            self.render_x.saturating_sub(self.col_offset),
            cursor.y().saturating_sub(self.row_offset),
        )?;
        ansi::cursor_show(out)
    }

    fn draw_rows(&self, out: &mut impl Write, doc: &Document) -> io::Result<()> {
        for screen_y in 0..self.screen_rows {
            match doc.row(screen_y + self.row_offset) {
                Some(row) => self.draw_row(out, row)?,
                None if doc.is_empty() && screen_y == self.screen_rows / 3 => {
                    self.draw_banner(out)?;
                }
                None => out.write_all(b"~")?,
            }
            ansi::clear_line(out)?;
            out.write_all(b"\r\n")?;
        }
        Ok(())
    }

    /// The centered welcome line, with the `~` marker kept when it fits.
    fn draw_banner(&self, out: &mut impl Write) -> io::Result<()> {
        let banner = options::banner();
        let len = banner.len().min(self.screen_cols);
        let mut padding = (self.screen_cols - len) / 2;
        if padding > 0 {
            out.write_all(b"~")?;
            padding -= 1;
        }
        write!(out, "{:padding$}", "")?;
        out.write_all(&banner.as_bytes()[..len])
    }

    /// The visible slice of one row, with a color escape only where the
    /// color changes.
    fn draw_row(&self, out: &mut impl Write, row: &Row) -> io::Result<()> {
        let render = row.render();
        let highlight = row.highlight();
        let start = self.col_offset.min(render.len());
        let end = (self.col_offset + self.screen_cols).min(render.len());

        let mut current: Option<Color> = None;
        for (&byte, &hl) in render[start..end].iter().zip(&highlight[start..end]) {
            if byte.is_ascii_control() {
                let symbol = if byte <= 26 { b'@' + byte } else { b'?' };
                ansi::inverse(out)?;
                out.write_all(&[symbol])?;
                ansi::reset(out)?;
                if let Some(color) = current {
                    ansi::fg(out, color)?;
                }
            } else if hl == Highlight::Normal {
                if current.take().is_some() {
                    ansi::fg(out, Color::Default)?;
                }
                out.write_all(&[byte])?;
            } else {
                let color = hl.color();
                if current != Some(color) {
                    current = Some(color);
                    ansi::fg(out, color)?;
                }
                out.write_all(&[byte])?;
            }
        }
        ansi::fg(out, Color::Default)
    }

    fn draw_status_bar(
        &self,
        out: &mut impl Write,
        doc: &Document,
        cursor: &Cursor,
        file_name: Option<&str>,
    ) -> io::Result<()> {
        let name = file_name.unwrap_or("[No Name]");
        let left = format!(
            "{name:.max$} - {} lines {}",
            doc.num_rows(),
            if doc.is_dirty() { "(modified)" } else { "" },
            max = STATUS_NAME_MAX,
        );
        let right = format!(
            "{} | {}/{}",
            doc.syntax().map_or("no ft", |s| s.filetype),
            cursor.y() + 1,
            doc.num_rows()
        );

        ansi::inverse(out)?;
        let mut len = left.len().min(self.screen_cols);
        out.write_all(&left.as_bytes()[..len])?;
        while len < self.screen_cols {
            if self.screen_cols - len == right.len() {
                out.write_all(right.as_bytes())?;
                break;
            }
            out.write_all(b" ")?;
            len += 1;
        }
        ansi::reset(out)?;
        out.write_all(b"\r\n")
    }

    fn draw_message_bar(&self, out: &mut impl Write, message: Option<&str>) -> io::Result<()> {
        ansi::clear_line(out)?;
        if let Some(message) = message {
            let bytes = message.as_bytes();
            out.write_all(&bytes[..bytes.len().min(self.screen_cols)])?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
