//! Stock status classification
//!
//! Maps an item's current stock and reorder level to the status shown in
//! inventory tables, dashboard badges and the stock-status chart.

use serde::Serialize;

/// Visual severity shared by badges, notifications and chart colours
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
}

/// Stock status category of an inventory item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
pub enum StockStatus {
    #[strum(serialize = "Out of Stock")]
    OutOfStock,
    #[strum(serialize = "Low Stock")]
    LowStock,
    #[strum(serialize = "In Stock")]
    InStock,
}

impl StockStatus {
    /// Classifies an item. Zero stock wins over the reorder comparison.
    pub const fn classify(current_stock: i64, reorder_level: i64) -> Self {
        if current_stock == 0 {
            StockStatus::OutOfStock
        } else if current_stock <= reorder_level {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    pub const fn severity(self) -> Severity {
        match self {
            StockStatus::OutOfStock => Severity::Danger,
            StockStatus::LowStock => Severity::Warning,
            StockStatus::InStock => Severity::Success,
        }
    }

    pub const fn badge_class(self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "badge-danger",
            StockStatus::LowStock => "badge-warning",
            StockStatus::InStock => "badge-success",
        }
    }
}

/// Badge rendering for a stock cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockBadge {
    pub class: &'static str,
    pub text: String,
}

/// Shorthand for [`StockStatus::classify`]
pub const fn classify(current_stock: i64, reorder_level: i64) -> StockStatus {
    StockStatus::classify(current_stock, reorder_level)
}

/// Computes the badge class and label for a stock cell
pub fn stock_badge(current_stock: i64, reorder_level: i64) -> StockBadge {
    let status = classify(current_stock, reorder_level);
    StockBadge {
        class: status.badge_class(),
        text: status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(0, 10), StockStatus::OutOfStock);
        assert_eq!(classify(0, 0), StockStatus::OutOfStock);
        assert_eq!(classify(1, 10), StockStatus::LowStock);
        assert_eq!(classify(10, 10), StockStatus::LowStock);
        assert_eq!(classify(11, 10), StockStatus::InStock);
        assert_eq!(classify(5, 0), StockStatus::InStock);
    }

    #[test]
    fn test_labels_and_severity() {
        assert_eq!(StockStatus::OutOfStock.to_string(), "Out of Stock");
        assert_eq!(StockStatus::LowStock.to_string(), "Low Stock");
        assert_eq!(StockStatus::InStock.to_string(), "In Stock");
        assert_eq!(StockStatus::OutOfStock.severity(), Severity::Danger);
        assert_eq!(StockStatus::LowStock.severity(), Severity::Warning);
        assert_eq!(StockStatus::InStock.severity(), Severity::Success);
    }

    #[test]
    fn test_stock_badge() {
        let badge = stock_badge(3, 5);
        assert_eq!(badge.class, "badge-warning");
        assert_eq!(badge.text, "Low Stock");
    }

    #[test]
    fn test_severity_strings() {
        assert_eq!(Severity::Danger.as_ref(), "danger");
        assert_eq!("success".parse::<Severity>().ok(), Some(Severity::Success));

        use strum::IntoEnumIterator;
        let all: Vec<String> = Severity::iter().map(|s| s.to_string()).collect();
        assert_eq!(all, ["info", "success", "warning", "danger"]);
    }

    proptest! {
        #[test]
        fn test_classify_partition(current in 0i64..10_000, reorder in 0i64..10_000) {
            let status = classify(current, reorder);
            prop_assert_eq!(status == StockStatus::OutOfStock, current == 0);
            prop_assert_eq!(
                status == StockStatus::LowStock,
                current > 0 && current <= reorder
            );
            prop_assert_eq!(status == StockStatus::InStock, current > reorder);
        }
    }
}
