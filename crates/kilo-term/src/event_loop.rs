// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop — the heartbeat of the editor.
//
// One thread, one loop, three steps:
//
//   1. **Paint**: the application writes a complete frame into an
//      `OutputBuffer`, which goes to the terminal in a single write.
//   2. **Wait**: the key decoder polls stdin with a bounded timeout until
//      one logical key arrives. Between timeouts we check for a resize.
//   3. **Dispatch**: the key goes to the application, which mutates its
//      state and tells us whether to keep going.
//
// Nothing runs in the background. The only place the loop suspends is the
// bounded poll inside the byte source, so a quit or a fatal read error is
// always noticed within one poll interval.
//
// # SIGWINCH Handling
//
// Terminal resize is detected via a SIGWINCH handler that sets an
// `AtomicBool`. The loop checks the flag every time a poll times out and,
// when set, re-queries the window size and repaints.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::input::{ByteSource, Key, KeyDecoder};
use crate::output::OutputBuffer;
use crate::reader::StdinSource;
use crate::terminal::{self, Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

/// Global flag set by the SIGWINCH handler. Checked each poll timeout.
static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Install a signal handler for SIGWINCH (terminal resize).
///
/// The handler simply sets the [`SIGWINCH_RECEIVED`] flag. This is
/// async-signal-safe: writing to an atomic is one of the few operations
/// permitted inside signal handlers.
#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {
    // No-op on non-unix platforms.
}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue running.
    Continue,
    /// Exit the event loop cleanly.
    Quit,
}

/// Application interface for the event loop.
///
/// Each iteration the loop calls [`paint`](App::paint), waits for a key,
/// then calls [`on_key`](App::on_key). [`on_resize`](App::on_resize) runs
/// between keys when the terminal size changes.
pub trait App {
    /// Handle one logical key.
    ///
    /// Return [`Action::Quit`] to exit the event loop.
    fn on_key(&mut self, key: Key) -> Action;

    /// Handle terminal resize. The next paint uses the new size.
    fn on_resize(&mut self, _size: Size) {}

    /// Write a complete frame into `out`.
    ///
    /// The buffer is empty on entry and is flushed to the terminal with a
    /// single write after this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if writing into the buffer fails.
    fn paint(&mut self, out: &mut OutputBuffer) -> io::Result<()>;
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The terminal event loop.
///
/// Owns the terminal and the key decoder. Call [`run`](Self::run) to enter
/// the loop — it returns when the application signals [`Action::Quit`].
///
/// # Example
///
/// ```no_run
/// use std::io;
///
/// use kilo_term::event_loop::{Action, App, EventLoop};
/// use kilo_term::input::Key;
/// use kilo_term::output::OutputBuffer;
///
/// struct MyApp;
///
/// impl App for MyApp {
///     fn on_key(&mut self, key: Key) -> Action {
///         if key == Key::Byte(b'q') { Action::Quit } else { Action::Continue }
///     }
///
///     fn paint(&mut self, out: &mut OutputBuffer) -> io::Result<()> {
///         Ok(())
///     }
/// }
///
/// let mut event_loop = EventLoop::new()?;
/// event_loop.run(&mut MyApp)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop<S = StdinSource> {
    terminal: Terminal,
    keys: KeyDecoder<S>,
    out: OutputBuffer,
}

impl EventLoop {
    /// Create an event loop reading keys from stdin.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized.
    pub fn new() -> io::Result<Self> {
        Self::with_source(StdinSource::new())
    }
}

impl<S: ByteSource> EventLoop<S> {
    /// Create an event loop reading keys from a custom byte source.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized.
    pub fn with_source(source: S) -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new()?,
            keys: KeyDecoder::new(source),
            out: OutputBuffer::new(),
        })
    }

    /// Enter raw mode and query the window size.
    ///
    /// Call before constructing the application so it can size its
    /// viewport. [`run`](Self::run) enters raw mode itself if this was
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be enabled or the window size
    /// cannot be determined.
    pub fn start(&mut self) -> io::Result<Size> {
        self.terminal.enter()?;
        terminal::window_size(self.keys.source_mut())
    }

    /// Run the event loop until the application returns [`Action::Quit`].
    ///
    /// The terminal is restored on exit, even when the loop fails.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup, output, or input fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_sigwinch_handler();

        let result = self.run_inner(app);

        // Always clean up, even if the loop errored.
        self.terminal.leave()?;

        result
    }

    /// The inner loop, separated so cleanup runs regardless of outcome.
    fn run_inner(&mut self, app: &mut impl App) -> io::Result<()> {
        loop {
            // ── Paint ────────────────────────────────────────────
            self.out.clear();
            app.paint(&mut self.out)?;
            self.out.flush_stdout()?;

            // ── Wait for a key, watching for resizes ─────────────
            let key = loop {
                if let Some(key) = self.keys.poll_key()? {
                    break key;
                }
                if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                    let size = terminal::window_size(self.keys.source_mut())?;
                    app.on_resize(size);
                    self.out.clear();
                    app.paint(&mut self.out)?;
                    self.out.flush_stdout()?;
                }
            };

            // ── Dispatch ─────────────────────────────────────────
            if app.on_key(key) == Action::Quit {
                return Ok(());
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    /// Records every key and quits on `q`.
    #[derive(Default)]
    struct Recorder {
        keys: Vec<Key>,
        paints: usize,
        resized: Option<Size>,
    }

    impl App for Recorder {
        fn on_key(&mut self, key: Key) -> Action {
            self.keys.push(key);
            if key == Key::Byte(b'q') {
                Action::Quit
            } else {
                Action::Continue
            }
        }

        fn on_resize(&mut self, size: Size) {
            self.resized = Some(size);
        }

        fn paint(&mut self, out: &mut OutputBuffer) -> io::Result<()> {
            use std::io::Write;
            self.paints += 1;
            out.write_all(b"frame")
        }
    }

    // ── Action ──────────────────────────────────────────────────

    #[test]
    fn action_equality() {
        assert_eq!(Action::Continue, Action::Continue);
        assert_eq!(Action::Quit, Action::Quit);
        assert_ne!(Action::Continue, Action::Quit);
    }

    #[test]
    fn action_debug() {
        let s = format!("{:?}", Action::Continue);
        assert_eq!(s, "Continue");
    }

    // ── SIGWINCH flag ──────────────────────────────────────────

    #[test]
    fn sigwinch_flag_swap() {
        SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
        let was = SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed);
        assert!(was);
        assert!(!SIGWINCH_RECEIVED.load(Ordering::Relaxed));
    }

    // ── App trait ──────────────────────────────────────────────

    #[test]
    fn app_default_on_resize_is_noop() {
        struct Minimal;
        impl App for Minimal {
            fn on_key(&mut self, _key: Key) -> Action {
                Action::Continue
            }
            fn paint(&mut self, _out: &mut OutputBuffer) -> io::Result<()> {
                Ok(())
            }
        }
        Minimal.on_resize(Size { cols: 100, rows: 50 }); // Must not panic.
    }

    #[test]
    fn recorder_paints_into_buffer() {
        let mut app = Recorder::default();
        let mut out = OutputBuffer::new();
        app.paint(&mut out).unwrap();
        assert_eq!(out.as_bytes(), b"frame");
        assert_eq!(app.paints, 1);
    }

    // ── EventLoop construction ─────────────────────────────────

    #[test]
    fn event_loop_with_scripted_source() {
        let source: VecDeque<u8> = b"\x1b[Aq".iter().copied().collect();
        let mut event_loop = EventLoop::with_source(source).unwrap();
        let first = event_loop.keys.poll_key().unwrap();
        assert_eq!(first, Some(Key::ArrowUp));
    }
}
