//! Shared test utilities for handler modules
//!
//! Provides common test fixtures to avoid duplication across handler test suites.

use crate::app::forms::{Field, FieldKind, Form};
use crate::app::table::{Row, Table};
use crate::app::{NavLink, Page, Tab};
use crate::core::http::Method;

/// Inventory list page with one table, one form, navigation and tabs
#[cfg(test)]
pub fn create_test_page() -> Page {
    let mut page = Page::default()
        .with_path("/items")
        .with_table(create_test_table())
        .with_form(
            Form::new("item-form", "/items/new", Method::Post)
                .with_field(Field::hidden("csrf_token", "token"))
                .with_field(Field::text("name", "Widget").required())
                .with_field(Field::new("email", FieldKind::Email))
                .with_field(Field::new("notes", FieldKind::TextArea)),
        );

    page.nav_links = vec![
        NavLink::new("/"),
        NavLink::new("/items"),
        NavLink::new("/suppliers"),
    ];
    page.tabs = vec![
        Tab::new("All", Some("all")),
        Tab::new("Stock In", Some("in")),
        Tab::new("Stock Out", Some("out")),
    ];
    page
}

#[cfg(test)]
pub fn create_test_table() -> Table {
    Table::new("items", ["Name", "SKU", "Quantity"])
        .with_row(Row::new(["Widget, Blue", "WID-001", "42"]).with_category("in"))
        .with_row(Row::new(["Gadget", "GAD-002", "0"]).with_category("out"))
        .with_row(Row::new(["Sprocket \"XL\"", "SPR-003", "7"]).with_category("in"))
}
