//! Document — the ordered rows of the file being edited.
//!
//! A `Document` owns a `Vec<Row>`, the syntax selected for the file (if
//! any), and a dirty counter. It is the only thing that mutates rows, and
//! every mutation re-derives render and highlight for the affected rows
//! before returning, so callers never see a stale projection.
//!
//! # Coordinates
//!
//! `y` is a row index, `x` a raw byte offset inside that row. The row at
//! `y == num_rows()` is the implicit empty line past the end of the file.
//! The cursor may sit there but the document never stores it; the
//! controller appends a real row before inserting into it.
//!
//! # Dirty tracking
//!
//! `dirty` counts content mutations since the last load or successful
//! save. It only matters whether it is zero.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::highlight;
use crate::row::Row;
use crate::syntax::{self, Syntax};

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// The rows of one file plus its syntax and dirty counter.
#[derive(Default)]
pub struct Document {
    rows: Vec<Row>,
    syntax: Option<&'static Syntax>,
    dirty: usize,
}

impl Document {
    // -- Construction -------------------------------------------------------

    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from file contents.
    ///
    /// Lines are split on `\n` with trailing `\r` stripped. A final newline
    /// does not produce an extra empty row.
    #[must_use]
    pub fn from_text(text: &[u8]) -> Self {
        let mut lines: Vec<&[u8]> = text.split(|&b| b == b'\n').collect();
        if lines.last().is_some_and(|last| last.is_empty()) {
            lines.pop();
        }
        let rows = lines.into_iter().map(|line| Row::new(strip_cr(line))).collect();
        Self {
            rows,
            syntax: None,
            dirty: 0,
        }
    }

    /// Load a document from disk and pick its syntax from the file name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Load`] if the file cannot be read.
    pub fn open(path: &Path) -> Result<Self> {
        let text = fs::read(path).map_err(|source| Error::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let mut doc = Self::from_text(&text);
        doc.select_syntax(path);
        tracing::debug!(
            target: "io",
            file = %path.display(),
            size_bytes = text.len(),
            line_count = doc.num_rows(),
            "file_read_ok"
        );
        Ok(doc)
    }

    // -- Row access ---------------------------------------------------------

    /// Number of stored rows (excluding the implicit row past the end).
    #[inline]
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// True if the document has no rows at all.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row at `y`, or `None` past the end.
    #[inline]
    #[must_use]
    pub fn row(&self, y: usize) -> Option<&Row> {
        self.rows.get(y)
    }

    /// All rows.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Length of row `y`; zero for the row past the end.
    #[inline]
    #[must_use]
    pub fn row_len(&self, y: usize) -> usize {
        self.rows.get(y).map_or(0, Row::len)
    }

    /// Mutable row access for match painting. Does not touch `dirty`.
    pub(crate) fn row_mut(&mut self, y: usize) -> Option<&mut Row> {
        self.rows.get_mut(y)
    }

    // -- Structural edits ---------------------------------------------------

    /// Insert a new row at `at`, clamped to `[0, num_rows]`.
    pub fn insert_row(&mut self, at: usize, text: &[u8]) {
        let at = at.min(self.rows.len());
        self.rows.insert(at, Row::new(text));
        self.refresh(at, at + 1);
        self.dirty += 1;
    }

    /// Remove row `at`. Out of range does nothing.
    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.refresh(at, at);
        self.dirty += 1;
    }

    /// Split row `y` at byte `x`: row `y` keeps `[0, x)` and a new row
    /// `y + 1` receives `[x, end)`. Out of range `y` does nothing.
    pub fn split_row(&mut self, y: usize, x: usize) {
        let Some(row) = self.rows.get_mut(y) else {
            return;
        };
        let tail = row.split_off(x);
        self.rows.insert(y + 1, Row::new(tail));
        self.refresh(y, y + 2);
        self.dirty += 1;
    }

    /// Append row `y` onto row `y - 1` and remove row `y`.
    ///
    /// Returns the byte offset in the merged row where the joined text
    /// starts, or `None` when `y` is zero or past the end.
    pub fn join_row(&mut self, y: usize) -> Option<usize> {
        if y == 0 || y >= self.rows.len() {
            return None;
        }
        let moved = self.rows.remove(y);
        let prev = &mut self.rows[y - 1];
        let at = prev.len();
        prev.append(moved.raw());
        self.refresh(y - 1, y);
        self.dirty += 1;
        Some(at)
    }

    // -- Byte edits ---------------------------------------------------------

    /// Insert `byte` into row `y` at `x` (clamped to the row length).
    /// Out of range `y` does nothing.
    pub fn insert_char(&mut self, y: usize, x: usize, byte: u8) {
        let Some(row) = self.rows.get_mut(y) else {
            return;
        };
        row.insert(x, byte);
        self.refresh(y, y);
        self.dirty += 1;
    }

    /// Delete the byte at `x` in row `y`. Returns `false` and changes
    /// nothing when either coordinate is out of range.
    pub fn delete_char(&mut self, y: usize, x: usize) -> bool {
        let Some(row) = self.rows.get_mut(y) else {
            return false;
        };
        if !row.remove(x) {
            return false;
        }
        self.refresh(y, y);
        self.dirty += 1;
        true
    }

    /// Append bytes to the end of row `y`. Out of range `y` does nothing.
    pub fn append_row_bytes(&mut self, y: usize, bytes: &[u8]) {
        let Some(row) = self.rows.get_mut(y) else {
            return;
        };
        row.append(bytes);
        self.refresh(y, y);
        self.dirty += 1;
    }

    // -- Syntax -------------------------------------------------------------

    /// The selected syntax, if any.
    #[inline]
    #[must_use]
    pub const fn syntax(&self) -> Option<&'static Syntax> {
        self.syntax
    }

    /// Replace the syntax and re-highlight every row.
    pub fn set_syntax(&mut self, syntax: Option<&'static Syntax>) {
        self.syntax = syntax;
        highlight::refresh_all(&mut self.rows, syntax);
    }

    /// Select the syntax matching `path`'s file name (or none).
    pub fn select_syntax(&mut self, path: &Path) {
        let syntax = syntax::detect(path);
        tracing::debug!(
            file = %path.display(),
            filetype = syntax.map_or("none", |s| s.filetype),
            "syntax_selected"
        );
        self.set_syntax(syntax);
    }

    // -- Metadata -----------------------------------------------------------

    /// Content mutations since the last load or save.
    #[inline]
    #[must_use]
    pub const fn dirty(&self) -> usize {
        self.dirty
    }

    /// True if there are unsaved changes.
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    // -- File I/O -----------------------------------------------------------

    /// The exact bytes written on save: every row followed by `\n`.
    #[must_use]
    pub fn to_text(&self) -> Vec<u8> {
        let len = self.rows.iter().map(|row| row.len() + 1).sum();
        let mut text = Vec::with_capacity(len);
        for row in &self.rows {
            text.extend_from_slice(row.raw());
            text.push(b'\n');
        }
        text
    }

    /// Write the document to `path`, truncating the file to exactly the
    /// payload length. Resets the dirty counter on success.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Save`] if the file cannot be opened, resized, or
    /// written. The document is unchanged in that case.
    pub fn save(&mut self, path: &Path) -> Result<usize> {
        let payload = self.to_text();
        let written = open_for_save(path)
            .and_then(|mut file| {
                file.set_len(payload.len() as u64)?;
                file.write_all(&payload)
            })
            .map_err(|source| Error::Save {
                path: path.to_path_buf(),
                source,
            });

        match written {
            Ok(()) => {
                self.dirty = 0;
                tracing::info!(target: "io", file = %path.display(), bytes = payload.len(), "file_saved");
                Ok(payload.len())
            }
            Err(err) => {
                tracing::warn!(target: "io", file = %path.display(), error = %err, "file_save_failed");
                Err(err)
            }
        }
    }

    /// Re-highlight after an edit, cascading through comment changes.
    fn refresh(&mut self, from: usize, through: usize) {
        highlight::refresh(&mut self.rows, self.syntax, from, through);
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("rows", &self.rows.len())
            .field("dirty", &self.dirty)
            .field("filetype", &self.syntax.map(|s| s.filetype))
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Strip trailing carriage returns from a line.
fn strip_cr(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., b'\r'] = line {
        line = rest;
    }
    line
}

/// Open for writing without truncating, creating with mode 0644.
#[cfg(unix)]
fn open_for_save(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .mode(0o644)
        .open(path)
}

#[cfg(not(unix))]
fn open_for_save(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::syntax::{Highlight, C};

    fn doc(text: &str) -> Document {
        Document::from_text(text.as_bytes())
    }

    fn raw_lines(doc: &Document) -> Vec<String> {
        doc.rows()
            .iter()
            .map(|r| String::from_utf8_lossy(r.raw()).into_owned())
            .collect()
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn from_text_splits_lines() {
        let d = doc("one\ntwo\nthree");
        assert_eq!(raw_lines(&d), vec!["one", "two", "three"]);
        assert_eq!(d.dirty(), 0);
    }

    #[test]
    fn trailing_newline_adds_no_row() {
        assert_eq!(doc("a\nb\n").num_rows(), 2);
    }

    #[test]
    fn blank_lines_are_kept() {
        assert_eq!(raw_lines(&doc("a\n\n\n")), vec!["a", "", ""]);
    }

    #[test]
    fn crlf_is_stripped() {
        assert_eq!(raw_lines(&doc("a\r\nb\r\n")), vec!["a", "b"]);
    }

    #[test]
    fn empty_text_has_no_rows() {
        let d = doc("");
        assert!(d.is_empty());
        assert_eq!(d.row_len(0), 0);
        assert!(d.row(0).is_none());
    }

    // -- Structural edits ---------------------------------------------------

    #[test]
    fn insert_row_clamps_index() {
        let mut d = doc("a");
        d.insert_row(99, b"z");
        assert_eq!(raw_lines(&d), vec!["a", "z"]);
        assert_eq!(d.dirty(), 1);
    }

    #[test]
    fn delete_row_out_of_range_is_noop() {
        let mut d = doc("a");
        d.delete_row(1);
        assert_eq!(d.num_rows(), 1);
        assert_eq!(d.dirty(), 0);
    }

    #[test]
    fn split_then_join_restores_raw() {
        let mut d = doc("hello world\nnext");
        d.split_row(0, 5);
        assert_eq!(raw_lines(&d), vec!["hello", " world", "next"]);
        assert_eq!(d.join_row(1), Some(5));
        assert_eq!(raw_lines(&d), vec!["hello world", "next"]);
    }

    #[test]
    fn split_at_end_makes_empty_row() {
        let mut d = doc("abc");
        d.split_row(0, 3);
        assert_eq!(raw_lines(&d), vec!["abc", ""]);
    }

    #[test]
    fn join_first_row_is_noop() {
        let mut d = doc("a\nb");
        assert_eq!(d.join_row(0), None);
        assert_eq!(d.join_row(2), None);
        assert_eq!(d.dirty(), 0);
    }

    // -- Byte edits ---------------------------------------------------------

    #[test]
    fn insert_and_delete_char() {
        let mut d = doc("ac");
        d.insert_char(0, 1, b'b');
        assert_eq!(raw_lines(&d), vec!["abc"]);
        assert!(d.delete_char(0, 0));
        assert_eq!(raw_lines(&d), vec!["bc"]);
        assert_eq!(d.dirty(), 2);
    }

    #[test]
    fn delete_char_out_of_range_is_noop() {
        let mut d = doc("abc");
        assert!(!d.delete_char(0, 3));
        assert!(!d.delete_char(5, 0));
        assert_eq!(raw_lines(&d), vec!["abc"]);
        assert_eq!(d.dirty(), 0);
    }

    #[test]
    fn insert_char_past_end_row_is_noop() {
        let mut d = doc("abc");
        d.insert_char(1, 0, b'x');
        assert_eq!(d.num_rows(), 1);
    }

    #[test]
    fn append_row_bytes_extends_row() {
        let mut d = doc("ab\ncd");
        d.append_row_bytes(0, b"\tx");
        assert_eq!(d.row(0).unwrap().render(), b"ab      x");
    }

    // -- Highlight maintenance ----------------------------------------------

    #[test]
    fn set_syntax_highlights_everything() {
        let mut d = doc("int x;\n/* a\nb */");
        d.set_syntax(Some(&C));
        assert_eq!(&d.row(0).unwrap().highlight()[..3], &[Highlight::Keyword2; 3]);
        assert!(d.row(1).unwrap().comment_open());
        assert_eq!(d.row(2).unwrap().highlight()[0], Highlight::BlockComment);
    }

    #[test]
    fn insert_row_rehighlights_following_row() {
        let mut d = doc("/*\nx");
        d.set_syntax(Some(&C));
        d.insert_row(1, b"*/");
        assert_eq!(d.row(2).unwrap().highlight(), &[Highlight::Normal]);
    }

    #[test]
    fn delete_row_rehighlights_row_sliding_up() {
        let mut d = doc("/*\nx\n*/\ny");
        d.set_syntax(Some(&C));
        assert_eq!(d.row(1).unwrap().highlight(), &[Highlight::BlockComment]);
        d.delete_row(0);
        assert_eq!(d.row(0).unwrap().highlight(), &[Highlight::Normal]);
        assert_eq!(d.row(2).unwrap().highlight(), &[Highlight::Normal]);
    }

    #[test]
    fn split_row_inside_comment_opener_cascades() {
        let mut d = doc("a/*b\nc\nd");
        d.set_syntax(Some(&C));
        assert!(d.row(2).unwrap().highlight().iter().all(|&h| h == Highlight::BlockComment));
        // Breaking "/*" apart closes nothing and opens nothing.
        d.split_row(0, 2);
        assert!(!d.row(0).unwrap().comment_open());
        assert!(!d.row(1).unwrap().comment_open());
        assert_eq!(d.row(3).unwrap().highlight(), &[Highlight::Normal]);
    }

    #[test]
    fn join_row_rehighlights_following_row() {
        let mut d = doc("/\n*\nx");
        d.set_syntax(Some(&C));
        assert_eq!(d.row(2).unwrap().highlight(), &[Highlight::Normal]);
        d.join_row(1);
        assert_eq!(d.row(1).unwrap().highlight(), &[Highlight::BlockComment]);
    }

    // -- File I/O -----------------------------------------------------------

    #[test]
    fn to_text_terminates_every_row() {
        assert_eq!(doc("a\nb").to_text(), b"a\nb\n");
        assert_eq!(doc("").to_text(), b"");
    }

    #[test]
    fn save_and_open_roundtrip() {
        let dir = std::env::temp_dir().join("kilo_editor_test");
        let _ = fs::create_dir_all(&dir);
        let path = dir.join("roundtrip.c");

        let mut d = doc("int main() {\n\treturn 0;\n}\n");
        d.insert_char(0, 0, b' ');
        assert!(d.is_dirty());
        let written = d.save(&path).unwrap();
        assert_eq!(written, 27);
        assert_eq!(d.dirty(), 0);

        let loaded = Document::open(&path).unwrap();
        assert_eq!(loaded.to_text(), d.to_text());
        assert_eq!(loaded.dirty(), 0);
        assert_eq!(loaded.syntax().map(|s| s.filetype), Some("c"));

        let _ = fs::remove_file(&path);
        let _ = fs::remove_dir(&dir);
    }

    #[test]
    fn save_truncates_longer_file() {
        let dir = std::env::temp_dir().join("kilo_editor_test_trunc");
        let _ = fs::create_dir_all(&dir);
        let path = dir.join("shrink.txt");
        fs::write(&path, "a much longer previous content\n").unwrap();

        let mut d = doc("short");
        d.save(&path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"short\n");

        let _ = fs::remove_file(&path);
        let _ = fs::remove_dir(&dir);
    }

    #[test]
    fn failed_save_keeps_dirty() {
        let mut d = doc("x");
        d.insert_char(0, 0, b'y');
        let path = Path::new("/nonexistent-kilo-dir/file.txt");
        let err = d.save(path).unwrap_err();
        assert!(matches!(err, Error::Save { .. }));
        assert_eq!(d.dirty(), 1);
    }

    #[test]
    fn open_missing_file_is_load_error() {
        let err = Document::open(Path::new("/nonexistent-kilo-dir/missing.c")).unwrap_err();
        assert!(matches!(err, Error::Load { .. }));
    }
}
