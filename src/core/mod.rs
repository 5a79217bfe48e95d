//! Core inventory UI functionality
//!
//! Page-independent building blocks. Nothing in here knows about the page
//! model in [`crate::app`].
//!
//! - [`format`]: Currency, number and date display strings
//! - [`stock`]: Stock status classification and severity tags
//! - [`storage`]: JSON key-value storage with failure containment
//! - [`http`]: Request/response types, the transport seam and the API client
//! - [`charts`]: Chart configuration factories over a drawing surface
//! - [`error`]: Error types shared by every layer

pub mod charts;
pub mod error;
pub mod format;
pub mod http;
pub mod stock;
pub mod storage;

#[cfg(test)]
pub mod test_helpers;
