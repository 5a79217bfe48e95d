//! In-memory model of the data tables on a page
//!
//! A [`Table`] has one header row and any number of body rows. Filters only
//! ever flip [`Row::visible`]; they never reorder or drop rows.

use serde::{Deserialize, Serialize};

/// Joins cells in the cached search text so a query cannot match across a
/// cell boundary
pub const CELL_SEPARATOR: char = '\u{1f}';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<String>,
    /// Category used by tab filters; rows without one are never hidden by them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,

    // Cached field for search performance (not serialized)
    #[serde(skip)]
    search_text_lowercase: String,
}

fn default_visible() -> bool {
    true
}

impl Row {
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row = Self {
            cells: cells.into_iter().map(Into::into).collect(),
            category: None,
            visible: true,
            search_text_lowercase: String::new(),
        };
        row.rebuild_caches();
        row
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Replaces the cell texts and refreshes the search cache
    pub fn set_cells(&mut self, cells: Vec<String>) {
        self.cells = cells;
        self.rebuild_caches();
    }

    /// Lowercased cell texts joined by [`CELL_SEPARATOR`]
    pub fn search_text(&self) -> &str {
        &self.search_text_lowercase
    }

    /// Must be called after `cells` is modified directly or after deserialization
    pub fn rebuild_caches(&mut self) {
        let mut joined = String::new();
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                joined.push(CELL_SEPARATOR);
            }
            joined.push_str(cell);
        }
        self.search_text_lowercase = joined.to_lowercase();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: String,
    #[serde(default)]
    pub header: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new<I, S>(id: impl Into<String>, header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| r.visible)
    }

    pub fn visible_count(&self) -> usize {
        self.visible_rows().count()
    }

    /// Refreshes every row's search cache, e.g. after loading from JSON
    pub fn rebuild_caches(&mut self) {
        for row in &mut self.rows {
            row.rebuild_caches();
        }
    }

    /// Parses a table from JSON and prepares it for filtering
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut table: Self = serde_json::from_str(json)?;
        table.rebuild_caches();
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_text_is_lowercased_and_separated() {
        let row = Row::new(["Widget", "SKU-1"]);
        assert_eq!(row.search_text(), "widget\u{1f}sku-1");
    }

    #[test]
    fn test_set_cells_refreshes_cache() {
        let mut row = Row::new(["a"]);
        row.set_cells(vec!["B".to_string()]);
        assert_eq!(row.search_text(), "b");
    }

    #[test]
    fn test_from_json_builds_caches_and_defaults() {
        let table = Table::from_json(
            r#"{"id":"items","header":["Name"],"rows":[{"cells":["Bolt"],"category":"hardware"}]}"#,
        )
        .unwrap();
        assert_eq!(table.rows[0].search_text(), "bolt");
        assert!(table.rows[0].visible);
        assert_eq!(table.rows[0].category.as_deref(), Some("hardware"));
        assert_eq!(table.visible_count(), 1);
    }
}
