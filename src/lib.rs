//! invent-ui - UI utility layer for an inventory web app
//!
//! The client-side behaviour of a server-rendered inventory manager, run
//! headless: notifications, the loading overlay, debounced table search,
//! form validation and submission, CSV export, display formatting, stock
//! classification, key-value storage and chart configuration.
//!
//! # Architecture
//!
//! - [`core`] - Page-independent logic: formatting, stock status, storage, HTTP types, charts
//! - [`app`] - The [`app::Page`] model and the handlers that act on it
//! - [`validators`] - Input checks and text helpers
//! - [`config`] - Configuration persistence
//! - [`utils`] - Utility functions (XDG directories, etc.)
//!
//! The network, key-value store, downloads, charting library, clipboard and
//! confirmation dialogs are reached through traits, so every operation runs
//! without a browser.

// Allow pedantic clippy warnings that are not worth fixing for this codebase
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod app;
pub mod config;
pub mod core;
pub mod utils;
pub mod validators;

// Re-export commonly used types
pub use app::Page;
pub use core::error::{Error, Result};
pub use core::stock::{Severity, StockStatus};
