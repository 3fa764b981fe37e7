// SPDX-License-Identifier: MIT
//
// kilo — a small terminal text editor.
//
// This is the main binary that wires together the two crates:
//
//   kilo-term   → raw mode, key decoding, output buffering, event loop
//   kilo-editor → rows, highlighting, search, cursor, view compositor
//
// The Editor struct implements kilo-term's App trait, connecting the event
// loop to the editor's state. Each keypress flows through:
//
//   stdin → key decoder → on_key → prompt or command dispatch → document
//   paint → view.scroll → view.render → output buffer → one write
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ text area                    │  ← h - 2 rows
//   ├──────────────────────────────┤
//   │ status bar (INVERSE)         │  ← 1 row
//   ├──────────────────────────────┤
//   │ message / prompt line        │  ← 1 row
//   └──────────────────────────────┘

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use kilo_editor::cursor::Cursor;
use kilo_editor::document::Document;
use kilo_editor::error;
use kilo_editor::options::QUIT_TIMES;
use kilo_editor::search::{SearchEvent, SearchState};
use kilo_editor::view::{StatusInfo, StatusMessage, View};

use kilo_term::event_loop::{Action, App, EventLoop};
use kilo_term::input::Key;
use kilo_term::output::OutputBuffer;
use kilo_term::terminal::Size;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const HELP_MESSAGE: &str = "HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find";

// ─── Prompt ─────────────────────────────────────────────────────────────────

/// What the prompt line is collecting input for.
enum PromptKind {
    /// Incremental search; every key steps the search.
    Search(SearchState),
    /// File name for the first save of an unnamed document.
    SaveAs,
}

/// How a key left the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptOutcome {
    Pending,
    Confirm,
    Cancel,
}

/// An active prompt on the message line.
struct Prompt {
    kind: PromptKind,
    input: Vec<u8>,
}

impl Prompt {
    const fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: Vec::new(),
        }
    }

    /// Apply one key to the input line.
    ///
    /// Enter only confirms a non-empty input. Only printable ASCII is
    /// appended; other keys leave the input unchanged.
    fn edit(&mut self, key: Key) -> PromptOutcome {
        match key {
            Key::Backspace | Key::Delete => {
                self.input.pop();
            }
            k if k.is_ctrl(b'h') => {
                self.input.pop();
            }
            Key::Escape => return PromptOutcome::Cancel,
            Key::ENTER if !self.input.is_empty() => return PromptOutcome::Confirm,
            Key::Byte(b) if b.is_ascii() && !b.is_ascii_control() => self.input.push(b),
            _ => {}
        }
        PromptOutcome::Pending
    }

    /// The message-line text while this prompt is open.
    fn message(&self) -> String {
        let input = String::from_utf8_lossy(&self.input);
        match self.kind {
            PromptKind::Search(_) => format!("Search: {input} (Use ESC/Arrows/Enter)"),
            PromptKind::SaveAs => format!("Save as: {input}"),
        }
    }
}

// ─── Editor ─────────────────────────────────────────────────────────────────

/// The editor state.
///
/// Holds the document, cursor and view, the file it was loaded from, the
/// message line, the quit countdown, and any prompt being typed into.
struct Editor {
    document: Document,
    cursor: Cursor,
    view: View,
    file_name: Option<PathBuf>,
    message: Option<StatusMessage>,

    /// Ctrl-Q presses still required before quitting with unsaved changes.
    /// Reset by any other key.
    quit_times: usize,

    /// When `Some`, keys go to the prompt instead of the document.
    prompt: Option<Prompt>,
}

impl Editor {
    /// Create an editor showing `document` in `view`.
    fn new(document: Document, file_name: Option<PathBuf>, view: View) -> Self {
        Self {
            document,
            cursor: Cursor::new(),
            view,
            file_name,
            message: Some(StatusMessage::new(HELP_MESSAGE)),
            quit_times: QUIT_TIMES,
            prompt: None,
        }
    }

    fn set_message(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage::new(text));
    }

    // ── Command dispatch ───────────────────────────────────────────────

    fn handle_key(&mut self, key: Key) -> Action {
        match key {
            Key::ENTER => self.insert_newline(),
            k if k.is_ctrl(b'q') => {
                if self.document.is_dirty() && self.quit_times > 0 {
                    self.set_message(format!(
                        "WARNING!!! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
                        self.quit_times
                    ));
                    self.quit_times -= 1;
                    return Action::Continue;
                }
                tracing::info!(dirty = self.document.dirty(), "quit");
                return Action::Quit;
            }
            k if k.is_ctrl(b's') => self.save(),
            k if k.is_ctrl(b'f') => self.start_search(),
            k if k.is_ctrl(b'h') => self.delete_char(),
            k if k.is_ctrl(b'l') => {}
            Key::Backspace => self.delete_char(),
            Key::Delete => {
                self.cursor.move_right(&self.document);
                self.delete_char();
            }
            Key::Home => self.cursor.move_to_line_start(),
            Key::End => self.cursor.move_to_line_end(&self.document),
            Key::PageUp => {
                self.cursor
                    .page_up(&self.document, self.view.row_offset(), self.view.screen_rows());
            }
            Key::PageDown => {
                self.cursor
                    .page_down(&self.document, self.view.row_offset(), self.view.screen_rows());
            }
            Key::ArrowUp => self.cursor.move_up(&self.document),
            Key::ArrowDown => self.cursor.move_down(&self.document),
            Key::ArrowLeft => self.cursor.move_left(&self.document),
            Key::ArrowRight => self.cursor.move_right(&self.document),
            Key::Escape => {}
            Key::Byte(b) => self.insert_char(b),
        }

        self.quit_times = QUIT_TIMES;
        Action::Continue
    }

    // ── Editing ────────────────────────────────────────────────────────

    /// Insert a byte at the cursor, creating a row first when the cursor is
    /// on the line past the end.
    fn insert_char(&mut self, byte: u8) {
        let (x, y) = (self.cursor.x(), self.cursor.y());
        if y == self.document.num_rows() {
            self.document.insert_row(y, b"");
        }
        self.document.insert_char(y, x, byte);
        self.cursor = Cursor::at(x + 1, y);
    }

    /// Break the line at the cursor and move to the start of the new line.
    fn insert_newline(&mut self) {
        let (x, y) = (self.cursor.x(), self.cursor.y());
        if x == 0 {
            self.document.insert_row(y, b"");
        } else {
            self.document.split_row(y, x);
        }
        self.cursor = Cursor::at(0, y + 1);
    }

    /// Delete the byte before the cursor, joining with the previous line at
    /// column 0.
    fn delete_char(&mut self) {
        let (x, y) = (self.cursor.x(), self.cursor.y());
        if y == self.document.num_rows() || (x == 0 && y == 0) {
            return;
        }
        if x > 0 {
            self.document.delete_char(y, x - 1);
            self.cursor = Cursor::at(x - 1, y);
        } else if let Some(at) = self.document.join_row(y) {
            self.cursor = Cursor::at(at, y - 1);
        }
    }

    // ── Saving ─────────────────────────────────────────────────────────

    /// Save to the current file, asking for a name first if there is none.
    fn save(&mut self) {
        match self.file_name.clone() {
            Some(path) => self.write_file(&path),
            None => self.open_prompt(PromptKind::SaveAs),
        }
    }

    fn write_file(&mut self, path: &Path) {
        match self.document.save(path) {
            Ok(bytes) => self.set_message(format!("{bytes} bytes written to disk")),
            Err(err) => self.set_message(format!("Can't save! I/O error: {}", err.io())),
        }
    }

    // ── Prompt handling ────────────────────────────────────────────────

    fn open_prompt(&mut self, kind: PromptKind) {
        let prompt = Prompt::new(kind);
        self.set_message(prompt.message());
        self.prompt = Some(prompt);
    }

    fn start_search(&mut self) {
        let state = SearchState::begin(self.cursor, self.view.offsets());
        self.open_prompt(PromptKind::Search(state));
    }

    fn handle_prompt(&mut self, key: Key) {
        let Some(mut prompt) = self.prompt.take() else {
            return;
        };
        let outcome = prompt.edit(key);

        match &mut prompt.kind {
            PromptKind::Search(state) => {
                let event = match (outcome, key) {
                    (PromptOutcome::Confirm, _) => SearchEvent::Confirm,
                    (PromptOutcome::Cancel, _) => SearchEvent::Cancel,
                    (_, Key::ArrowRight | Key::ArrowDown) => SearchEvent::Next,
                    (_, Key::ArrowLeft | Key::ArrowUp) => SearchEvent::Previous,
                    _ => SearchEvent::Edited,
                };
                if let Some(hit) = state.step(&mut self.document, &prompt.input, event) {
                    self.cursor = hit;
                    self.view.place_row_at_top(hit.y());
                }
                match outcome {
                    PromptOutcome::Cancel => {
                        self.cursor = state.saved_cursor();
                        self.view.set_offsets(state.saved_offsets());
                        tracing::debug!("search_cancelled");
                    }
                    PromptOutcome::Confirm => {
                        tracing::debug!(line = self.cursor.y(), "search_confirmed");
                    }
                    PromptOutcome::Pending => {}
                }
            }
            PromptKind::SaveAs => match outcome {
                PromptOutcome::Confirm => {
                    let path = PathBuf::from(String::from_utf8_lossy(&prompt.input).into_owned());
                    self.document.select_syntax(&path);
                    self.file_name = Some(path.clone());
                    self.write_file(&path);
                    return;
                }
                PromptOutcome::Cancel => {
                    self.set_message("Save aborted");
                    return;
                }
                PromptOutcome::Pending => {}
            },
        }

        if outcome == PromptOutcome::Pending {
            self.set_message(prompt.message());
            self.prompt = Some(prompt);
        } else {
            self.set_message("");
        }
    }
}

// ─── App implementation ─────────────────────────────────────────────────────

impl App for Editor {
    fn on_key(&mut self, key: Key) -> Action {
        if self.prompt.is_some() {
            self.handle_prompt(key);
            return Action::Continue;
        }
        self.handle_key(key)
    }

    fn on_resize(&mut self, size: Size) {
        tracing::debug!(cols = size.cols, rows = size.rows, "resize");
        self.view.resize(size);
    }

    fn paint(&mut self, out: &mut OutputBuffer) -> io::Result<()> {
        self.view.scroll(&self.document, &self.cursor);

        let file_name = self.file_name.as_ref().map(|p| p.to_string_lossy());
        let message = self
            .message
            .as_ref()
            .filter(|m| m.is_visible(Instant::now()))
            .map(StatusMessage::text);
        let status = StatusInfo {
            file_name: file_name.as_deref(),
            message,
        };

        self.view.render(out, &self.document, &self.cursor, &status)
    }
}

// ─── Logging ────────────────────────────────────────────────────────────────

/// Send tracing output to a log file when `KILO_LOG` holds a filter.
///
/// The file is `KILO_LOG_FILE`, or `kilo.log` in the working directory.
/// Returns the writer guard, which must live until exit so buffered lines
/// are flushed.
fn init_logging() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_env("KILO_LOG").ok()?;
    let path = env::var_os("KILO_LOG_FILE").map_or_else(|| PathBuf::from("kilo.log"), PathBuf::from);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file = path.file_name()?;

    let appender = tracing_appender::rolling::never(dir, file);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(guard)
}

/// Log panics before the default hook prints them.
fn install_panic_logging() {
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(target: "runtime.panic", ?info, "panic");
        default_panic(info);
    }));
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn run(document: Document, file_name: Option<PathBuf>) -> error::Result<()> {
    let mut event_loop = EventLoop::new()?;
    let size = event_loop.start()?;
    tracing::debug!(cols = size.cols, rows = size.rows, "terminal_ready");

    let mut editor = Editor::new(document, file_name, View::for_terminal(size));
    event_loop.run(&mut editor)?;
    Ok(())
}

fn main() {
    let _log_guard = init_logging();
    install_panic_logging();

    let file_name = env::args_os().nth(1).map(PathBuf::from);
    let document = match file_name.as_deref().map(Document::open).transpose() {
        Ok(document) => document.unwrap_or_default(),
        Err(e) => {
            tracing::error!(error = %e, "open_failed");
            eprintln!("kilo: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = run(document, file_name) {
        tracing::error!(error = %e, "fatal");
        eprintln!("kilo: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
