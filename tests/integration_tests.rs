//! Integration tests for invent-ui
//!
//! These tests drive the public API end to end: a page with tables and
//! forms, a scripted transport standing in for the server, in-memory sinks
//! and surfaces, and a paused Tokio clock for the timed behaviour.
//!
//! ```bash
//! cargo test --test integration_tests
//! ```

#![allow(clippy::uninlined_format_args)]

use invent_ui::app::Page;
use invent_ui::app::forms::{Field, Form, validate_form};
use invent_ui::app::handlers::{
    ExportRows, MemorySink, SubmitError, export_table_to_csv, submit_form,
};
use invent_ui::app::table::{Row, Table};
use invent_ui::core::charts::{self, MemorySurface};
use invent_ui::core::error::TransportError;
use invent_ui::core::http::{ApiClient, Method, Request, Response, Transport};
use invent_ui::core::storage::{FileStore, MemoryStore, Storage};
use invent_ui::{Error, Severity, StockStatus};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Replays canned responses in order
#[derive(Default)]
struct FakeServer {
    responses: Mutex<VecDeque<Result<Response, TransportError>>>,
    seen: Mutex<Vec<Request>>,
}

impl FakeServer {
    fn with(responses: Vec<Result<Response, TransportError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            seen: Mutex::default(),
        }
    }
}

impl Transport for FakeServer {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        self.seen.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(TransportError::Timeout))
    }
}

fn inventory_page() -> Page {
    Page::default()
        .with_path("/items")
        .with_table(
            Table::new("items", ["Name", "SKU", "Qty"])
                .with_row(Row::new(["Widget, Blue", "WID-001", "42"]).with_category("in"))
                .with_row(Row::new(["Gadget", "GAD-002", "0"]).with_category("out"))
                .with_row(Row::new(["Bolt", "BLT-003", "500"]).with_category("in")),
        )
        .with_form(
            Form::new("item-form", "/items/new", Method::Post)
                .with_field(Field::hidden("csrf_token", "t0k3n"))
                .with_field(Field::text("name", "Bolt").required())
                .with_field(Field::text("sku", "BLT-003").required()),
        )
}

#[tokio::test]
async fn test_submit_success_flow() {
    let mut page = inventory_page();
    let server = FakeServer::with(vec![Ok(Response::json(
        200,
        &json!({"success": true, "message": "Item created", "id": 3}),
    ))]);

    assert!(validate_form(&mut page, "item-form"));
    let data = submit_form(&mut page, &server, "item-form", None, None)
        .await
        .unwrap();

    assert_eq!(data["id"], 3);
    assert!(!page.overlay.is_visible());
    let latest = page.notifications.latest().unwrap();
    assert_eq!(latest.text, "Item created");
    assert_eq!(latest.severity, Severity::Success);
    assert_eq!(server.seen.lock().unwrap()[0].url, "/items/new");
}

#[tokio::test]
async fn test_submit_server_error_hides_overlay() {
    let mut page = inventory_page();
    let server = FakeServer::with(vec![Ok(Response::new(500, "boom"))]);

    let err = submit_form(&mut page, &server, "item-form", None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, SubmitError::Rejected { status: 500, .. }));
    assert!(!page.overlay.is_visible());
    assert_eq!(page.overlay.activations(), 1);
    let latest = page.notifications.latest().unwrap();
    assert_eq!(latest.severity, Severity::Danger);
    assert_eq!(latest.text, "An error occurred");
    // No navigation: the page still holds the same form, ready for another try
    assert!(!page.form("item-form").unwrap().submitting);
}

#[tokio::test]
async fn test_submit_network_failure() {
    let mut page = inventory_page();
    let server = FakeServer::with(vec![Err(TransportError::Connection(
        "refused".to_string(),
    ))]);

    let err = submit_form(&mut page, &server, "item-form", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::Transport(_)));
    assert!(!page.overlay.is_visible());
    assert_eq!(
        page.notifications.latest().unwrap().text,
        "Network error. Please try again."
    );
}

#[test]
fn test_validation_blocks_blank_required_field() {
    let mut page = inventory_page();
    page.form_mut("item-form")
        .unwrap()
        .field_mut("sku")
        .unwrap()
        .set_text("  ");

    assert!(!validate_form(&mut page, "item-form"));
    assert!(page.form("item-form").unwrap().field("sku").unwrap().invalid);
    assert_eq!(
        page.notifications.latest().unwrap().text,
        "Please fill in all required fields."
    );
}

#[tokio::test]
async fn test_export_quotes_commas() {
    let mut page = inventory_page();
    let mut sink = MemorySink::default();

    export_table_to_csv(&mut page, &mut sink, "items", None, ExportRows::All)
        .await
        .unwrap();

    let csv = String::from_utf8(sink.saved[0].bytes.clone()).unwrap();
    assert!(csv.contains("\"Widget, Blue\""));
    assert!(csv.starts_with("Name,SKU,Qty\n"));
    assert_eq!(csv.lines().count(), 4);
    assert_eq!(sink.saved[0].filename, "export.csv");
}

#[tokio::test]
async fn test_export_missing_table() {
    let mut page = inventory_page();
    let mut sink = MemorySink::default();

    let err = export_table_to_csv(&mut page, &mut sink, "suppliers", None, ExportRows::All)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert_eq!(page.notifications.latest().unwrap().text, "Table not found");
}

#[tokio::test(start_paused = true)]
async fn test_debounced_search_runs_once_at_quiet_point() {
    let mut page = inventory_page();
    let start = tokio::time::Instant::now();

    page.search_input("items", "b");
    tokio::time::advance(Duration::from_millis(50)).await;
    page.search_input("items", "bo");
    tokio::time::advance(Duration::from_millis(50)).await;
    page.search_input("items", "bolt");

    let report = page.wait_and_tick().await.unwrap();
    assert_eq!(tokio::time::Instant::now() - start, Duration::from_millis(400));
    assert_eq!(report.search_applied, Some(1));

    let visible: Vec<_> = page
        .table("items")
        .unwrap()
        .visible_rows()
        .map(|r| r.cells[0].clone())
        .collect();
    assert_eq!(visible, vec!["Bolt".to_string()]);
    assert!(page.wait_and_tick().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_notification_lifecycle() {
    let mut page = inventory_page();
    let id = page.notify("x", Severity::Danger);
    assert_eq!(page.notifications.len(), 1);
    assert!(page.notifications.get(id).is_some());

    tokio::time::advance(Duration::from_millis(5000)).await;
    let report = page.tick();
    assert_eq!(report.expired_notifications, 1);
    assert!(page.notifications.is_empty());
}

#[test]
fn test_overlay_never_stacks() {
    let mut page = inventory_page();
    page.overlay.show();
    page.overlay.show();
    page.overlay.hide();
    assert!(!page.overlay.is_visible());
    assert_eq!(page.overlay.activations(), 1);
}

#[test]
fn test_storage_round_trip_and_containment() {
    let storage = Storage::new(MemoryStore::new());
    assert!(storage.set("filters", &json!({"a": 1})));
    assert_eq!(storage.get("filters", json!(null)), json!({"a": 1}));

    let full = Storage::new(MemoryStore::with_quota(4));
    assert!(!full.set("filters", &json!({"a": 1})));
    assert_eq!(full.get("filters", 7), 7);
}

#[test]
fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let storage = Storage::new(FileStore::new(&path));
    assert!(storage.set("recent", &vec!["WID-001", "BLT-003"]));

    let reopened = Storage::new(FileStore::new(&path));
    let recent: Vec<String> = reopened.get("recent", Vec::new());
    assert_eq!(recent, vec!["WID-001", "BLT-003"]);
}

#[test]
fn test_stock_status_drives_chart_labels() {
    assert_eq!(StockStatus::classify(0, 5), StockStatus::OutOfStock);
    assert_eq!(StockStatus::classify(5, 5), StockStatus::LowStock);
    assert_eq!(StockStatus::classify(6, 5), StockStatus::InStock);

    let mut surface = MemorySurface::new().with_canvas("statusChart");
    let chart = charts::stock_status_chart(&mut surface, "statusChart", 6, 3, 1).unwrap();
    assert_eq!(
        chart.config.data.labels,
        vec!["In Stock", "Low Stock", "Out of Stock"]
    );
    assert_eq!(
        chart.config.tooltip_text(0).as_deref(),
        Some("In Stock: 6 (60.0%)")
    );
    assert!(charts::category_chart(&mut surface, "missing", &["a"], &[1.0]).is_none());
}

#[tokio::test]
async fn test_api_client_maps_http_errors() {
    let server = FakeServer::with(vec![
        Ok(Response::json(
            200,
            &json!({"total_items": 12, "low_stock_items": 2}),
        )),
        Ok(Response::json(404, &json!({"message": "Item not found"}))),
    ]);
    let client = ApiClient::new(&server, "http://inventory.local/");

    let stats = client.get_stats().await.unwrap();
    assert_eq!(stats.total_items, 12);
    assert_eq!(stats.low_stock_items, 2);

    let err = client.get_item(99).await.unwrap_err();
    assert!(matches!(err, Error::Http { status: 404, .. }));
    assert_eq!(
        server.seen.lock().unwrap()[1].url,
        "http://inventory.local/api/items/99"
    );
}
