//! Cursor — position tracking and movement.
//!
//! The `Cursor` is a plain `(x, y)` pair: `x` is a raw byte offset in row
//! `y`, and `y` may equal `num_rows()` (the empty line past the end).
//! It does not own or reference the document; the document is passed to
//! movement methods as a parameter.
//!
//! The render column shown on screen is never stored here. The view
//! derives it from `x` on every frame via [`Row::cx_to_rx`].
//!
//! # Wrapping
//!
//! Left at column 0 moves to the end of the previous line, and right at the
//! end of a line moves to the start of the next one. After every move `x`
//! is clamped to the length of the row the cursor landed on.
//!
//! [`Row::cx_to_rx`]: crate::row::Row::cx_to_rx

use crate::document::Document;

/// A cursor in a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    x: usize,
    y: usize,
}

impl Cursor {
    /// Create a cursor at the origin.
    #[must_use]
    pub const fn new() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Create a cursor at `(x, y)` without clamping.
    #[must_use]
    pub const fn at(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    // -- Accessors ----------------------------------------------------------

    /// Byte offset in the current row.
    #[inline]
    #[must_use]
    pub const fn x(&self) -> usize {
        self.x
    }

    /// Current row index.
    #[inline]
    #[must_use]
    pub const fn y(&self) -> usize {
        self.y
    }

    // -- Direct positioning -------------------------------------------------

    /// Move to `(x, y)`, clamped to the document.
    pub fn set_position(&mut self, x: usize, y: usize, doc: &Document) {
        self.y = y.min(doc.num_rows());
        self.x = x;
        self.clamp(doc);
    }

    // -- Arrow movement -----------------------------------------------------

    /// One byte left, wrapping to the end of the previous line.
    pub fn move_left(&mut self, doc: &Document) {
        if self.x > 0 {
            self.x -= 1;
        } else if self.y > 0 {
            self.y -= 1;
            self.x = doc.row_len(self.y);
        }
        self.clamp(doc);
    }

    /// One byte right, wrapping to the start of the next line. Does nothing
    /// on the line past the end.
    pub fn move_right(&mut self, doc: &Document) {
        if let Some(row) = doc.row(self.y) {
            if self.x < row.len() {
                self.x += 1;
            } else {
                self.y += 1;
                self.x = 0;
            }
        }
        self.clamp(doc);
    }

    /// One line up.
    pub fn move_up(&mut self, doc: &Document) {
        self.y = self.y.saturating_sub(1);
        self.clamp(doc);
    }

    /// One line down, stopping at the line past the end.
    pub fn move_down(&mut self, doc: &Document) {
        if self.y < doc.num_rows() {
            self.y += 1;
        }
        self.clamp(doc);
    }

    // -- Line start/end -----------------------------------------------------

    /// Column 0.
    pub const fn move_to_line_start(&mut self) {
        self.x = 0;
    }

    /// Just past the last byte of the current row.
    pub fn move_to_line_end(&mut self, doc: &Document) {
        self.x = doc.row_len(self.y);
    }

    // -- Paging -------------------------------------------------------------

    /// Jump to the top of the screen, then up one screen height.
    pub fn page_up(&mut self, doc: &Document, row_offset: usize, screen_rows: usize) {
        self.y = row_offset.min(doc.num_rows());
        for _ in 0..screen_rows {
            self.move_up(doc);
        }
    }

    /// Jump to the bottom of the screen, then down one screen height.
    pub fn page_down(&mut self, doc: &Document, row_offset: usize, screen_rows: usize) {
        let bottom = (row_offset + screen_rows).saturating_sub(1);
        self.y = bottom.min(doc.num_rows());
        for _ in 0..screen_rows {
            self.move_down(doc);
        }
    }

    // -- Clamping -----------------------------------------------------------

    /// Clamp `x` to the length of the current row. Call after any edit or
    /// vertical move.
    pub fn clamp(&mut self, doc: &Document) {
        self.x = self.x.min(doc.row_len(self.y));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
