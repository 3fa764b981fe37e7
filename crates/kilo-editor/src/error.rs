//! Error types for the editor core.
//!
//! Three kinds of failure, with three different fates:
//!
//! - [`Error::Load`] — the file named on the command line can't be read.
//!   Fatal: the binary reports it and exits.
//! - [`Error::Save`] — open, truncate, or write failed. Recoverable: the
//!   controller shows it in the message bar and the document (including its
//!   dirty counter) is left untouched.
//! - [`Error::Terminal`] — raw mode, input reads, or the window-size query
//!   failed. Fatal: the terminal is restored and the process exits.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Editor core error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot open {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot save {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

impl Error {
    /// The underlying I/O error, whichever variant this is.
    #[must_use]
    pub const fn io(&self) -> &io::Error {
        match self {
            Self::Load { source, .. } | Self::Save { source, .. } => source,
            Self::Terminal(source) => source,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_message_names_path() {
        let err = Error::Load {
            path: PathBuf::from("missing.c"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("cannot open missing.c: "));
    }

    #[test]
    fn save_exposes_io_kind() {
        let err = Error::Save {
            path: PathBuf::from("/ro/file"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.io().kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn io_error_converts_to_terminal() {
        let err: Error = io::Error::other("tty gone").into();
        assert!(matches!(err, Error::Terminal(_)));
        assert_eq!(err.to_string(), "terminal error: tty gone");
    }
}
