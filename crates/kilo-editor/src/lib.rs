//! # kilo-editor — Editor core for kilo
//!
//! This crate contains the editing model and everything that turns it into
//! a frame on screen:
//!
//! - **[`row`]** — `Row`: raw bytes plus tab-expanded render and highlight
//! - **[`document`]** — `Document`: the ordered rows, dirty counter, file I/O
//! - **[`syntax`]** — highlight tags, syntax definitions, the built-in database
//! - **[`highlight`]** — the per-line classifier and the comment cascade
//! - **[`cursor`]** — cursor movement and clamping
//! - **[`search`]** — incremental search with match painting
//! - **[`view`]** — viewport scrolling and the frame compositor
//! - **[`options`]** — fixed tunables
//! - **[`error`]** — the crate's error type

pub mod cursor;
pub mod document;
pub mod error;
pub mod highlight;
pub mod options;
pub mod row;
pub mod search;
pub mod syntax;
pub mod view;
