//! Helper utilities for the app layer
//!
//! Pure row filters and the debouncer used by table search. Nothing here
//! touches the page directly.

pub mod debounce;
pub mod filtering;

pub use debounce::Debouncer;
pub use filtering::{ALL_TYPES, apply_filter, apply_type_filter};
