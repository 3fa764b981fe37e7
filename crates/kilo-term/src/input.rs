// SPDX-License-Identifier: MIT
//
// Key decoder.
//
// Turns raw stdin bytes into logical key events. The terminal sends plain
// bytes for ordinary keys and short escape sequences for the cursor and
// editing keys:
//
// - `ESC [ A` … `ESC [ D`          arrows
// - `ESC [ H` / `ESC [ F`          Home / End
// - `ESC [ <digit> ~`              Home, Delete, End, PageUp, PageDown
//                                  (1/7 and 4/8 are the keypad variants)
// - `ESC O H` / `ESC O F`          alternate Home / End encoding
//
// # Escape vs escape-sequence ambiguity
//
// A bare `ESC` byte could be the Escape key or the start of a sequence.
// Every read goes through a [`ByteSource`] with a bounded wait: if the
// bytes after ESC don't arrive in time, the decoder reports Escape. A
// truncated sequence is indistinguishable from a real Escape press, and
// anything we don't recognize also collapses to Escape. The decoder never
// reports malformed input as an error.

use std::collections::VecDeque;
use std::io;

/// The Escape byte that introduces every multi-byte sequence.
const ESC: u8 = 0x1B;

/// The byte most terminals send for the Backspace key.
const DEL: u8 = 0x7F;

// ─── Key ────────────────────────────────────────────────────────────────────

/// A logical key event.
///
/// Everything the terminal sends as a single byte arrives as
/// [`Byte`](Key::Byte), including Enter (`\r`), Tab and Ctrl chords.
/// The recognized escape sequences (plus DEL, which becomes
/// [`Backspace`](Key::Backspace)) get their own variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable or control byte, passed through verbatim.
    Byte(u8),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,
    Home,
    End,
    Delete,
    Backspace,
    Escape,
}

impl Key {
    /// Enter as sent by a terminal in raw mode (carriage return).
    pub const ENTER: Self = Self::Byte(b'\r');

    /// Whether this key is the Ctrl chord for `letter` (e.g. `b'q'`).
    #[inline]
    #[must_use]
    pub const fn is_ctrl(self, letter: u8) -> bool {
        matches!(self, Self::Byte(b) if b == ctrl(letter))
    }
}

/// The byte a terminal sends for Ctrl + `letter`.
///
/// Ctrl strips bits 5 and 6, so `ctrl(b'q') == 0x11` and
/// `ctrl(b'h') == 0x08`.
#[inline]
#[must_use]
pub const fn ctrl(letter: u8) -> u8 {
    letter & 0x1f
}

// ─── ByteSource ─────────────────────────────────────────────────────────────

/// A source of input bytes with a bounded wait per read.
///
/// `Ok(Some(b))` is a byte, `Ok(None)` means the wait elapsed with nothing
/// to read, and `Err` is a real I/O failure the caller cannot recover from.
pub trait ByteSource {
    /// Read at most one byte, waiting no longer than the source's timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails for a reason other
    /// than the timeout expiring.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

/// Scripted input: bytes are served front to back, an empty queue times out.
impl ByteSource for VecDeque<u8> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.pop_front())
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }
}

// ─── KeyDecoder ─────────────────────────────────────────────────────────────

/// Decodes one logical [`Key`] at a time from a [`ByteSource`].
pub struct KeyDecoder<S> {
    source: S,
}

impl<S: ByteSource> KeyDecoder<S> {
    /// Wrap a byte source.
    #[must_use]
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Mutable access to the underlying source (for out-of-band reads such
    /// as the cursor position report).
    #[inline]
    pub const fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Block until a key arrives and return it.
    ///
    /// Timeouts on the first byte are retried; only a real I/O error ends
    /// the wait.
    ///
    /// # Errors
    ///
    /// Propagates fatal read errors from the source.
    pub fn read_key(&mut self) -> io::Result<Key> {
        loop {
            if let Some(key) = self.poll_key()? {
                return Ok(key);
            }
        }
    }

    /// Decode one key, or return `Ok(None)` if the first read timed out.
    ///
    /// Once a first byte has arrived this always produces a key: incomplete
    /// or unknown sequences become [`Key::Escape`].
    ///
    /// # Errors
    ///
    /// Propagates fatal read errors from the source.
    pub fn poll_key(&mut self) -> io::Result<Option<Key>> {
        let Some(first) = self.source.read_byte()? else {
            return Ok(None);
        };

        let key = match first {
            ESC => self.decode_escape()?,
            DEL => Key::Backspace,
            b => Key::Byte(b),
        };
        Ok(Some(key))
    }

    /// Decode the remainder of a sequence that started with ESC.
    fn decode_escape(&mut self) -> io::Result<Key> {
        let Some(first) = self.source.read_byte()? else {
            return Ok(Key::Escape);
        };
        let Some(second) = self.source.read_byte()? else {
            return Ok(Key::Escape);
        };

        let key = match (first, second) {
            (b'[', digit @ b'0'..=b'9') => {
                let Some(third) = self.source.read_byte()? else {
                    return Ok(Key::Escape);
                };
                if third == b'~' {
                    tilde_key(digit)
                } else {
                    Key::Escape
                }
            }
            (b'[', letter) => csi_letter_key(letter),
            (b'O', letter) => ss3_key(letter),
            _ => Key::Escape,
        };
        Ok(key)
    }
}

/// `ESC [ <digit> ~` — editing keys and their keypad variants.
const fn tilde_key(digit: u8) -> Key {
    match digit {
        b'1' | b'7' => Key::Home,
        b'3' => Key::Delete,
        b'4' | b'8' => Key::End,
        b'5' => Key::PageUp,
        b'6' => Key::PageDown,
        _ => Key::Escape,
    }
}

/// `ESC [ <letter>` — arrows, Home, End.
const fn csi_letter_key(letter: u8) -> Key {
    match letter {
        b'A' => Key::ArrowUp,
        b'B' => Key::ArrowDown,
        b'C' => Key::ArrowRight,
        b'D' => Key::ArrowLeft,
        b'H' => Key::Home,
        b'F' => Key::End,
        _ => Key::Escape,
    }
}

/// `ESC O <letter>` — the alternate Home/End encoding.
const fn ss3_key(letter: u8) -> Key {
    match letter {
        b'H' => Key::Home,
        b'F' => Key::End,
        _ => Key::Escape,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
