//! Search — incremental search with match highlighting.
//!
//! Searches are literal substring matches against each row's rendered
//! bytes, one match per row, wrapping around the document.
//!
//! # Search flow
//!
//! 1. Ctrl-F → the controller creates a [`SearchState`], saving the cursor
//!    and scroll offsets.
//! 2. Every key typed into the prompt is turned into a [`SearchEvent`] and
//!    fed to [`SearchState::step`] together with the current query.
//! 3. Arrow keys step to the next or previous match; editing the query
//!    starts over from the top.
//! 4. Enter keeps the cursor on the match, Escape restores the saved
//!    cursor and offsets.
//!
//! # Match highlighting
//!
//! The current match is painted [`Highlight::Match`] directly into its
//! row's highlight. The row's previous highlight is kept in a snapshot and
//! put back at the start of the next step, so at most one row is ever
//! repainted.

use crate::cursor::Cursor;
use crate::document::Document;
use crate::syntax::Highlight;

// ---------------------------------------------------------------------------
// Direction and events
// ---------------------------------------------------------------------------

/// Search direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SearchDirection {
    #[default]
    Forward,
    Backward,
}

/// What the prompt key means for the search.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SearchEvent {
    /// Enter with a non-empty query.
    Confirm,
    /// Escape.
    Cancel,
    /// Right or Down arrow.
    Next,
    /// Left or Up arrow.
    Previous,
    /// The query text changed (or any other key).
    Edited,
}

// ---------------------------------------------------------------------------
// SearchState
// ---------------------------------------------------------------------------

/// Highlight of one row before a match was painted over it.
#[derive(Debug)]
struct Snapshot {
    line: usize,
    highlight: Vec<Highlight>,
}

/// Transient state for an active search prompt.
#[derive(Debug)]
pub struct SearchState {
    last_match: Option<usize>,
    direction: SearchDirection,
    snapshot: Option<Snapshot>,
    saved_cursor: Cursor,
    saved_offsets: (usize, usize),
}

impl SearchState {
    /// Start a search, remembering where to go back to on cancel.
    ///
    /// `offsets` is the view's `(row_offset, col_offset)`.
    #[must_use]
    pub const fn begin(cursor: Cursor, offsets: (usize, usize)) -> Self {
        Self {
            last_match: None,
            direction: SearchDirection::Forward,
            snapshot: None,
            saved_cursor: cursor,
            saved_offsets: offsets,
        }
    }

    /// Row of the current match, if any.
    #[inline]
    #[must_use]
    pub const fn last_match(&self) -> Option<usize> {
        self.last_match
    }

    /// Direction of the next step.
    #[inline]
    #[must_use]
    pub const fn direction(&self) -> SearchDirection {
        self.direction
    }

    /// The cursor at search entry.
    #[inline]
    #[must_use]
    pub const fn saved_cursor(&self) -> Cursor {
        self.saved_cursor
    }

    /// The view offsets at search entry.
    #[inline]
    #[must_use]
    pub const fn saved_offsets(&self) -> (usize, usize) {
        self.saved_offsets
    }

    /// Advance the search by one prompt key.
    ///
    /// Returns the cursor position of the new match, or `None` if nothing
    /// matched (or the event ended the search).
    pub fn step(&mut self, doc: &mut Document, query: &[u8], event: SearchEvent) -> Option<Cursor> {
        self.restore_highlight(doc);

        match event {
            SearchEvent::Confirm | SearchEvent::Cancel => {
                self.last_match = None;
                self.direction = SearchDirection::Forward;
                return None;
            }
            SearchEvent::Next => self.direction = SearchDirection::Forward,
            SearchEvent::Previous => self.direction = SearchDirection::Backward,
            SearchEvent::Edited => {
                self.last_match = None;
                self.direction = SearchDirection::Forward;
            }
        }

        let num_rows = doc.num_rows();
        if query.is_empty() || num_rows == 0 {
            return None;
        }

        // Seed so the first step lands on row 0 (forward) or the last row
        // (backward) when there is no previous match.
        let mut current = match (self.last_match, self.direction) {
            (Some(line), _) => line.min(num_rows - 1),
            (None, SearchDirection::Forward) => num_rows - 1,
            (None, SearchDirection::Backward) => 0,
        };

        for _ in 0..num_rows {
            current = match self.direction {
                SearchDirection::Forward => (current + 1) % num_rows,
                SearchDirection::Backward => current.checked_sub(1).unwrap_or(num_rows - 1),
            };

            let row = doc.row_mut(current)?;
            let Some(rx) = find(row.render(), query) else {
                continue;
            };

            self.last_match = Some(current);
            self.snapshot = Some(Snapshot {
                line: current,
                highlight: row.highlight().to_vec(),
            });
            row.highlight_mut()[rx..rx + query.len()].fill(Highlight::Match);
            tracing::trace!(line = current, col = rx, "search_match");
            return Some(Cursor::at(row.rx_to_cx(rx), current));
        }

        None
    }

    /// Put back the highlight the last match painted over.
    fn restore_highlight(&mut self, doc: &mut Document) {
        let Some(snapshot) = self.snapshot.take() else {
            return;
        };
        if let Some(row) = doc.row_mut(snapshot.line) {
            let hl = row.highlight_mut();
            if hl.len() == snapshot.highlight.len() {
                hl.copy_from_slice(&snapshot.highlight);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Search functions
// ---------------------------------------------------------------------------

/// First occurrence of `pattern` in `haystack`. An empty pattern never
/// matches.
#[must_use]
pub fn find(haystack: &[u8], pattern: &[u8]) -> Option<usize> {
    if pattern.is_empty() || pattern.len() > haystack.len() {
        return None;
    }
    haystack.windows(pattern.len()).position(|window| window == pattern)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
