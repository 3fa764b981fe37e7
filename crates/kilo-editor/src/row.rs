//! Row — one line of the document with its derived projections.
//!
//! A row stores three parallel views of the same line:
//!
//! - **raw** — the bytes as they appear in the file, no newline.
//! - **render** — what the terminal shows: tabs expanded with spaces up to
//!   the next multiple of [`TAB_STOP`], everything else unchanged.
//! - **highlight** — one [`Highlight`] tag per render byte.
//!
//! Plus `comment_open`, the single piece of highlighter state that crosses
//! line boundaries.
//!
//! `render` is rebuilt by every mutator in this module. `highlight` depends
//! on the previous row, so the [`Document`](crate::document::Document)
//! refreshes it after each mutation through the highlighter's cascade. Rows
//! never store their own line number; a row's index is its position in the
//! document.

use crate::options::TAB_STOP;
use crate::syntax::Highlight;

/// One line of text plus its render and highlight projections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    raw: Vec<u8>,
    render: Vec<u8>,
    highlight: Vec<Highlight>,
    comment_open: bool,
}

impl Row {
    /// Create a row from raw bytes. The highlight starts all-`Normal`.
    #[must_use]
    pub fn new(raw: impl Into<Vec<u8>>) -> Self {
        let mut row = Self {
            raw: raw.into(),
            ..Self::default()
        };
        row.update_render();
        row
    }

    // -- Accessors ----------------------------------------------------------

    /// Length of the raw content in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether the row has no content.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The raw bytes.
    #[inline]
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// The tab-expanded bytes shown on screen.
    #[inline]
    #[must_use]
    pub fn render(&self) -> &[u8] {
        &self.render
    }

    /// One highlight tag per render byte.
    #[inline]
    #[must_use]
    pub fn highlight(&self) -> &[Highlight] {
        &self.highlight
    }

    /// Whether the row ends inside an unterminated multi-line comment.
    #[inline]
    #[must_use]
    pub const fn comment_open(&self) -> bool {
        self.comment_open
    }

    // -- Column conversion --------------------------------------------------

    /// Convert a raw byte offset to a render column.
    ///
    /// Offsets past the end are treated as the end of the row.
    #[must_use]
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        self.raw
            .iter()
            .take(cx)
            .fold(0, |rx, &b| if b == b'\t' { next_tab_stop(rx) } else { rx + 1 })
    }

    /// Convert a render column back to a raw byte offset.
    ///
    /// A column inside a tab's expansion maps to the tab itself. Columns past
    /// the end map to [`len`](Self::len).
    #[must_use]
    pub fn rx_to_cx(&self, rx: usize) -> usize {
        let mut cur_rx = 0;
        for (cx, &b) in self.raw.iter().enumerate() {
            cur_rx = if b == b'\t' { next_tab_stop(cur_rx) } else { cur_rx + 1 };
            if cur_rx > rx {
                return cx;
            }
        }
        self.raw.len()
    }

    // -- Mutation (crate-internal, callers re-highlight) --------------------

    /// Insert `byte` at `at`; offsets past the end append.
    pub(crate) fn insert(&mut self, at: usize, byte: u8) {
        let at = at.min(self.raw.len());
        self.raw.insert(at, byte);
        self.update_render();
    }

    /// Remove the byte at `at`. Returns `false` (and changes nothing) when
    /// `at` is out of range.
    pub(crate) fn remove(&mut self, at: usize) -> bool {
        if at >= self.raw.len() {
            return false;
        }
        self.raw.remove(at);
        self.update_render();
        true
    }

    /// Append bytes to the end of the row.
    pub(crate) fn append(&mut self, bytes: &[u8]) {
        self.raw.extend_from_slice(bytes);
        self.update_render();
    }

    /// Drop everything from `at` onward; offsets past the end do nothing.
    pub(crate) fn truncate(&mut self, at: usize) {
        if at < self.raw.len() {
            self.raw.truncate(at);
            self.update_render();
        }
    }

    /// Split the row at `at`, keeping `[0, at)` and returning `[at, end)`.
    pub(crate) fn split_off(&mut self, at: usize) -> Vec<u8> {
        let at = at.min(self.raw.len());
        let tail = self.raw[at..].to_vec();
        self.truncate(at);
        tail
    }

    /// Replace the highlight projection and the carried comment state.
    ///
    /// Returns whether `comment_open` changed.
    pub(crate) fn set_highlight(&mut self, highlight: Vec<Highlight>, comment_open: bool) -> bool {
        debug_assert_eq!(highlight.len(), self.render.len());
        self.highlight = highlight;
        let changed = self.comment_open != comment_open;
        self.comment_open = comment_open;
        changed
    }

    /// Mutable access to the highlight tags (search match painting).
    pub(crate) fn highlight_mut(&mut self) -> &mut [Highlight] {
        &mut self.highlight
    }

    /// Rebuild `render` from `raw`, resetting the highlight to `Normal`.
    fn update_render(&mut self) {
        self.render.clear();
        for &b in &self.raw {
            if b == b'\t' {
                let target = next_tab_stop(self.render.len());
                self.render.resize(target, b' ');
            } else {
                self.render.push(b);
            }
        }
        self.highlight.clear();
        self.highlight.resize(self.render.len(), Highlight::Normal);
    }
}

/// The render column a tab at `rx` advances to.
#[inline]
const fn next_tab_stop(rx: usize) -> usize {
    rx + TAB_STOP - rx % TAB_STOP
}
