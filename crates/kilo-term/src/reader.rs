// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Stdin byte source — one byte at a time, never blocking forever.
//
// The editor is single-threaded: the only place it waits is here, for the
// next input byte. Each read polls stdin's file descriptor with a short
// timeout and then reads a single byte if one is ready. A timeout is not an
// error; it lets the key decoder resolve a lone ESC and lets the event loop
// notice a terminal resize between keys.
//
// `EINTR` (a signal such as SIGWINCH landed mid-poll) and `EAGAIN` count as
// timeouts. Anything else is a real I/O failure.

use std::io;

use crate::input::ByteSource;

/// How long a single read waits for a byte (milliseconds).
///
/// 100ms matches the classic `VTIME = 1` raw-mode setting: long enough for
/// the rest of an escape sequence to arrive over ssh, short enough that a
/// bare Escape press feels immediate.
pub const POLL_TIMEOUT_MS: i32 = 100;

/// Reads single bytes from stdin with a bounded wait.
///
/// # Example
///
/// ```no_run
/// use kilo_term::input::KeyDecoder;
/// use kilo_term::reader::StdinSource;
///
/// let mut keys = KeyDecoder::new(StdinSource::new());
/// let key = keys.read_key()?;
/// println!("{key:?}");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct StdinSource {
    timeout_ms: i32,
}

impl StdinSource {
    /// A source using the default [`POLL_TIMEOUT_MS`].
    #[must_use]
    pub const fn new() -> Self {
        Self::with_timeout(POLL_TIMEOUT_MS)
    }

    /// A source with a custom per-read timeout in milliseconds.
    #[must_use]
    pub const fn with_timeout(timeout_ms: i32) -> Self {
        Self { timeout_ms }
    }

    /// The per-read timeout in milliseconds.
    #[inline]
    #[must_use]
    pub const fn timeout_ms(&self) -> i32 {
        self.timeout_ms
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether an OS error just means "try again later".
fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
    )
}

#[cfg(unix)]
impl ByteSource for StdinSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let ready = unsafe {
            let mut pfd = libc::pollfd {
                fd: libc::STDIN_FILENO,
                events: libc::POLLIN,
                revents: 0,
            };
            libc::poll(&raw mut pfd, 1, self.timeout_ms)
        };

        if ready < 0 {
            let err = io::Error::last_os_error();
            return if is_transient(&err) { Ok(None) } else { Err(err) };
        }
        if ready == 0 {
            return Ok(None);
        }

        let mut byte = 0u8;
        let n = unsafe { libc::read(libc::STDIN_FILENO, (&raw mut byte).cast(), 1) };

        match n {
            1 => Ok(Some(byte)),
            // Raw mode with VMIN=0 reports "nothing yet" as a zero-length read.
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                if is_transient(&err) { Ok(None) } else { Err(err) }
            }
        }
    }
}

/// Non-unix fallback: a plain blocking read, no timeout.
#[cfg(not(unix))]
impl ByteSource for StdinSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        use std::io::Read;

        let mut byte = [0u8; 1];
        match io::stdin().lock().read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(err) if is_transient(&err) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
