// SPDX-License-Identifier: MIT
//
// kilo-term — Terminal layer for kilo.
//
// Everything the editor needs from the host terminal, and nothing else:
// raw mode with guaranteed restore, window-size discovery, a key decoder
// that turns escape sequences into logical keys without ever blocking
// forever, and an output buffer so each frame reaches the screen in one
// write.
//
// This crate avoids external TUI frameworks (ratatui, crossterm) in favor
// of direct terminal control via ANSI escape sequences and raw termios.
// Every byte sent to the terminal is accounted for.

pub mod ansi;
pub mod color;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;
