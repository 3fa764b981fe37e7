//! Editor options — fixed tunables.
//!
//! kilo has no configuration file and no `:set` command. The handful of
//! knobs the editor has are compile-time constants collected here so every
//! module reads the same value.
//!
//! | Constant           | Value   | Used by                                  |
//! |--------------------|---------|------------------------------------------|
//! | [`VERSION`]        | `0.0.1` | welcome banner                           |
//! | [`TAB_STOP`]       | `8`     | tab expansion, render-column conversion  |
//! | [`QUIT_TIMES`]     | `3`     | extra Ctrl-Q presses with unsaved edits  |
//! | [`MESSAGE_TIMEOUT`]| `5 s`   | how long the message bar text is shown   |

use std::time::Duration;

/// Version string shown in the welcome banner.
pub const VERSION: &str = "0.0.1";

/// Tabs expand to the next multiple of this many columns.
pub const TAB_STOP: usize = 8;

/// Extra Ctrl-Q presses required to quit with unsaved changes.
pub const QUIT_TIMES: usize = 3;

/// How long a status message stays visible.
pub const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// The welcome banner drawn on an empty document.
#[must_use]
pub fn banner() -> String {
    format!("Kilo editor -- version {VERSION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_mentions_version() {
        assert_eq!(banner(), "Kilo editor -- version 0.0.1");
    }

    #[test]
    fn tab_stop_is_positive() {
        assert!(TAB_STOP > 0);
    }

    #[test]
    fn message_timeout_is_five_seconds() {
        assert_eq!(MESSAGE_TIMEOUT.as_secs(), 5);
    }
}
