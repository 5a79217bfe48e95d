//! Page event handlers organized by domain
//!
//! Each handler takes the [`crate::app::Page`] plus whatever injected
//! collaborator it needs (transport, download sink, clipboard, dialog).

pub mod export;
pub mod submit;
pub mod ui_state;

#[cfg(test)]
pub mod test_utils;

pub use export::{
    DialogSink, DirectorySink, Download, DownloadSink, ExportRows, MemorySink, csv_line,
    export_table_to_csv, table_to_csv,
};
pub use submit::{SubmitError, submit_form};
pub use ui_state::*;
