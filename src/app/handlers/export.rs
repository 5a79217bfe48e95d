//! CSV export of page tables
//!
//! Handles:
//! - Serializing a table (header plus all or visible rows) as CSV
//! - Delivering the file through a [`DownloadSink`]
//! - Reporting the outcome as a notification

use crate::app::Page;
use crate::app::table::Row;
use crate::core::error::{ElementKind, Error, Result};
use crate::core::stock::Severity;
use crate::validators::truncate;
use std::path::{Path, PathBuf};

pub const CSV_MIME: &str = "text/csv;charset=utf-8";
pub const EXPORT_SUCCESS_MESSAGE: &str = "Table exported successfully!";

/// Longest failure reason shown in the notification
const MAX_REASON_LEN: usize = 47;

/// A file ready to hand to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Delivers a [`Download`] and reports where it went.
///
/// Returns [`Error::Cancelled`] when the user backs out of a save dialog.
#[allow(async_fn_in_trait)]
pub trait DownloadSink {
    async fn save(&mut self, download: Download) -> Result<String>;
}

/// Writes downloads into a fixed directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The user's download directory, if the platform has one
    pub fn downloads() -> Option<Self> {
        crate::utils::get_download_dir().map(Self::new)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    async fn save(&mut self, download: Download) -> Result<String> {
        // Only the final component is honoured; a filename can't escape the directory
        let name = Path::new(&download.filename)
            .file_name()
            .ok_or_else(|| Error::Export(format!("invalid file name: {}", download.filename)))?;
        let path = self.dir.join(name);

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, &download.bytes)
            .await
            .map_err(|e| Error::Export(format!("Failed to write file: {e}")))?;
        Ok(path.display().to_string())
    }
}

/// Asks the user where to save through the native dialog
#[derive(Debug, Clone, Copy, Default)]
pub struct DialogSink;

impl DownloadSink for DialogSink {
    async fn save(&mut self, download: Download) -> Result<String> {
        use rfd::AsyncFileDialog;
        let file = AsyncFileDialog::new()
            .set_file_name(&download.filename)
            .add_filter("CSV", &["csv"])
            .save_file()
            .await;

        if let Some(file) = file {
            tokio::fs::write(file.path(), &download.bytes)
                .await
                .map(|()| file.path().display().to_string())
                .map_err(|e| Error::Export(format!("Failed to write file: {e}")))
        } else {
            Err(Error::Cancelled)
        }
    }
}

/// Keeps downloads in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub saved: Vec<Download>,
}

impl DownloadSink for MemorySink {
    async fn save(&mut self, download: Download) -> Result<String> {
        let location = format!("memory:{}", download.filename);
        self.saved.push(download);
        Ok(location)
    }
}

/// Which body rows go into the export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportRows {
    #[default]
    All,
    Visible,
}

/// Escapes one cell: trims it, doubles quotes and quotes it if it holds a comma
pub fn csv_field(text: &str) -> String {
    let escaped = text.trim().replace('"', "\"\"");
    if escaped.contains(',') {
        format!("\"{escaped}\"")
    } else {
        escaped
    }
}

pub fn csv_line<S: AsRef<str>>(cells: &[S]) -> String {
    cells
        .iter()
        .map(|c| csv_field(c.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Header line (when present) followed by one line per row, joined by `\n`
pub fn table_to_csv<'a>(header: &[String], rows: impl IntoIterator<Item = &'a Row>) -> String {
    let mut lines = Vec::new();
    if !header.is_empty() {
        lines.push(csv_line(header));
    }
    lines.extend(rows.into_iter().map(|row| csv_line(&row.cells)));
    lines.join("\n")
}

/// Exports `table_id` as CSV through `sink` and notifies the user.
///
/// `filename` falls back to the configured export name.
///
/// # Errors
///
/// [`Error::NotFound`] for an unknown table, otherwise whatever the sink
/// reports. A cancelled dialog returns [`Error::Cancelled`] without a
/// notification.
pub async fn export_table_to_csv<D: DownloadSink>(
    page: &mut Page,
    sink: &mut D,
    table_id: &str,
    filename: Option<&str>,
    rows: ExportRows,
) -> Result<String> {
    let Some(table) = page.table(table_id) else {
        let err = Error::NotFound {
            kind: ElementKind::Table,
            id: table_id.to_string(),
        };
        tracing::error!("{}", err);
        page.notify(err.user_message(), Severity::Danger);
        return Err(err);
    };

    let csv = match rows {
        ExportRows::All => table_to_csv(&table.header, &table.rows),
        ExportRows::Visible => table_to_csv(&table.header, table.visible_rows()),
    };
    let download = Download {
        filename: filename.unwrap_or(&page.config.export_filename).to_string(),
        mime: CSV_MIME,
        bytes: csv.into_bytes(),
    };

    let result = sink.save(download).await;
    handle_export_result(page, &result);
    result
}

/// Turns a sink outcome into the matching notification
pub(crate) fn handle_export_result(page: &mut Page, result: &Result<String>) {
    match result {
        Ok(location) => {
            tracing::info!("Exported table to {}", location);
            page.notify(EXPORT_SUCCESS_MESSAGE, Severity::Success);
        }
        Err(Error::Cancelled) => {
            // User cancelled - don't show error
        }
        Err(e) => {
            tracing::error!("Export failed: {}", e);
            let reason = match e {
                Error::Export(reason) => reason.clone(),
                other => other.to_string(),
            };
            let msg = Error::Export(truncate(&reason, MAX_REASON_LEN)).user_message();
            page.notify(msg, Severity::Danger);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::handlers::test_utils::create_test_page;
    use proptest::prelude::*;

    struct FailingSink;

    impl DownloadSink for FailingSink {
        async fn save(&mut self, _download: Download) -> Result<String> {
            Err(Error::Export("disk full".to_string()))
        }
    }

    struct CancelledSink;

    impl DownloadSink for CancelledSink {
        async fn save(&mut self, _download: Download) -> Result<String> {
            Err(Error::Cancelled)
        }
    }

    #[test]
    fn test_csv_field_escaping() {
        assert_eq!(csv_field("  Bolt "), "Bolt");
        assert_eq!(csv_field("Widget, Blue"), "\"Widget, Blue\"");
        assert_eq!(csv_field("Sprocket \"XL\""), "Sprocket \"\"XL\"\"");
        assert_eq!(csv_field("a \"b\", c"), "\"a \"\"b\"\", c\"");
    }

    #[tokio::test]
    async fn test_export_all_rows() {
        let mut page = create_test_page();
        let mut sink = MemorySink::default();

        let location = export_table_to_csv(&mut page, &mut sink, "items", None, ExportRows::All)
            .await
            .unwrap();
        assert_eq!(location, "memory:export.csv");

        let download = &sink.saved[0];
        assert_eq!(download.mime, CSV_MIME);
        let csv = String::from_utf8(download.bytes.clone()).unwrap();
        assert_eq!(
            csv,
            "Name,SKU,Quantity\n\"Widget, Blue\",WID-001,42\nGadget,GAD-002,0\nSprocket \"\"XL\"\",SPR-003,7"
        );
        assert_eq!(
            page.notifications.latest().unwrap().text,
            EXPORT_SUCCESS_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_export_visible_rows_only() {
        let mut page = create_test_page();
        page.search_now("items", "gadget");
        let mut sink = MemorySink::default();

        export_table_to_csv(
            &mut page,
            &mut sink,
            "items",
            Some("gadgets.csv"),
            ExportRows::Visible,
        )
        .await
        .unwrap();

        let download = &sink.saved[0];
        assert_eq!(download.filename, "gadgets.csv");
        assert_eq!(
            String::from_utf8(download.bytes.clone()).unwrap(),
            "Name,SKU,Quantity\nGadget,GAD-002,0"
        );
    }

    #[tokio::test]
    async fn test_unknown_table() {
        let mut page = create_test_page();
        let mut sink = MemorySink::default();

        let err = export_table_to_csv(&mut page, &mut sink, "nope", None, ExportRows::All)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: ElementKind::Table, .. }));
        assert!(sink.saved.is_empty());
        let latest = page.notifications.latest().unwrap();
        assert_eq!(latest.text, "Table not found");
        assert_eq!(latest.severity, Severity::Danger);
    }

    #[tokio::test]
    async fn test_sink_failure_and_cancel() {
        let mut page = create_test_page();

        let result =
            export_table_to_csv(&mut page, &mut FailingSink, "items", None, ExportRows::All).await;
        assert!(result.is_err());
        assert_eq!(
            page.notifications.latest().unwrap().text,
            "Export failed: disk full"
        );

        let before = page.notifications.len();
        let result =
            export_table_to_csv(&mut page, &mut CancelledSink, "items", None, ExportRows::All)
                .await;
        assert!(matches!(result, Err(Error::Cancelled)));
        assert_eq!(page.notifications.len(), before);
    }

    #[tokio::test]
    async fn test_directory_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path().join("exports"));
        let location = sink
            .save(Download {
                filename: "../escape.csv".to_string(),
                mime: CSV_MIME,
                bytes: b"a,b".to_vec(),
            })
            .await
            .unwrap();

        let expected = dir.path().join("exports").join("escape.csv");
        assert_eq!(location, expected.display().to_string());
        assert_eq!(std::fs::read(expected).unwrap(), b"a,b");
    }

    proptest! {
        #[test]
        fn test_csv_field_round_trips_unquoted_content(cell in "[a-zA-Z0-9 ,\"]{0,16}") {
            let field = csv_field(&cell);
            let inner = if field.starts_with('"') && field.ends_with('"') && field.len() >= 2 && cell.trim().contains(',') {
                &field[1..field.len() - 1]
            } else {
                field.as_str()
            };
            prop_assert_eq!(inner.replace("\"\"", "\""), cell.trim());
        }
    }
}
