//! Text search and category filtering over table rows
//!
//! Both filters only toggle [`Row::visible`]. Row order and the header are
//! never touched.

use crate::app::table::Row;

/// Tab filter value that shows every categorized row
pub const ALL_TYPES: &str = "all";

/// Shows the rows whose cell text contains `query`, case-insensitively.
///
/// An empty query shows every row. Matching runs against each row's cached
/// lowercase search text, so only the query is lowercased per call.
///
/// # Returns
///
/// Number of rows visible afterwards.
pub fn apply_filter(query: &str, rows: &mut [Row]) -> usize {
    let query_lowercase = query.to_lowercase();
    let mut visible = 0;

    for row in rows.iter_mut() {
        row.visible = query_lowercase.is_empty() || row.search_text().contains(&query_lowercase);
        if row.visible {
            visible += 1;
        }
    }

    visible
}

/// Shows categorized rows matching `kind` (or all of them for [`ALL_TYPES`]).
///
/// Rows without a category keep their current visibility.
///
/// # Returns
///
/// Number of categorized rows visible afterwards.
pub fn apply_type_filter(kind: &str, rows: &mut [Row]) -> usize {
    let mut visible = 0;

    for row in rows.iter_mut() {
        let Some(category) = row.category.as_deref() else {
            continue;
        };
        row.visible = kind == ALL_TYPES || category == kind;
        if row.visible {
            visible += 1;
        }
    }

    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn inventory_rows() -> Vec<Row> {
        vec![
            Row::new(["Widget, Blue", "WID-001", "42"]).with_category("hardware"),
            Row::new(["Gadget", "GAD-002", "0"]).with_category("electronics"),
            Row::new(["Sprocket", "SPR-003", "7"]).with_category("hardware"),
            Row::new(["Misc note"]),
        ]
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let mut rows = inventory_rows();
        assert_eq!(apply_filter("wid", &mut rows), 1);
        assert!(rows[0].visible);
        assert!(!rows[1].visible);

        assert_eq!(apply_filter("GAD-002", &mut rows), 1);
        assert!(rows[1].visible);
    }

    #[test]
    fn test_empty_query_shows_all() {
        let mut rows = inventory_rows();
        apply_filter("zzz", &mut rows);
        assert_eq!(apply_filter("", &mut rows), rows.len());
    }

    #[test]
    fn test_query_does_not_span_cells() {
        let mut rows = vec![Row::new(["ab", "cd"])];
        assert_eq!(apply_filter("bc", &mut rows), 0);
        assert_eq!(apply_filter("cd", &mut rows), 1);
    }

    #[test]
    fn test_type_filter_selects_category() {
        let mut rows = inventory_rows();
        rows[3].visible = false;

        assert_eq!(apply_type_filter("hardware", &mut rows), 2);
        assert!(rows[0].visible);
        assert!(!rows[1].visible);
        assert!(rows[2].visible);
        // Uncategorized rows keep their state
        assert!(!rows[3].visible);

        assert_eq!(apply_type_filter(ALL_TYPES, &mut rows), 3);
        assert!(rows[1].visible);
    }

    proptest! {
        #[test]
        fn test_filter_shows_exactly_matching_rows(
            cells in prop::collection::vec(prop::collection::vec("[a-zA-Z0-9 ]{0,8}", 1..4), 0..12),
            query in "[a-zA-Z0-9]{0,3}",
        ) {
            let mut rows: Vec<Row> = cells.iter().map(|c| Row::new(c.clone())).collect();
            let visible = apply_filter(&query, &mut rows);

            let needle = query.to_lowercase();
            let mut expected = 0;
            for (row, row_cells) in rows.iter().zip(&cells) {
                let matches = needle.is_empty()
                    || row_cells.iter().any(|c| c.to_lowercase().contains(&needle));
                prop_assert_eq!(row.visible, matches);
                if matches {
                    expected += 1;
                }
            }
            prop_assert_eq!(visible, expected);
        }
    }
}
