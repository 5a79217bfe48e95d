//! UI state management
//!
//! Handles small page interactions:
//! - Navigation highlight
//! - Tab switching and its category filter
//! - Delete confirmation
//! - Tooltips
//! - Clipboard copy
//! - Notification dismissal

use crate::app::notifications::NotificationId;
use crate::app::{Page, Rect, Tooltip, helpers};
use crate::core::error::ElementKind;
use crate::core::stock::Severity;

pub const COPY_SUCCESS_MESSAGE: &str = "Copied to clipboard!";
pub const COPY_FAILURE_MESSAGE: &str = "Failed to copy to clipboard";

/// Gap between a tooltip and its anchor
const TOOLTIP_OFFSET_PX: f32 = 8.0;

/// Answers yes/no prompts
pub trait ConfirmDialog {
    fn confirm(&mut self, message: &str) -> bool;
}

/// System clipboard access
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), String>;
}

/// Marks the links matching `path`; returns how many are active.
///
/// A link matches on equality, or as a prefix unless it is the root link.
pub fn highlight_active_links(links: &mut [crate::app::NavLink], path: &str) -> usize {
    let mut active = 0;
    for link in links.iter_mut() {
        link.active = link.href == path || (link.href != "/" && path.starts_with(&link.href));
        if link.active {
            active += 1;
        }
    }
    active
}

/// Makes tab `index` the only active tab and applies its category to every table.
///
/// Returns `false` for an index past the last tab.
pub fn handle_tab_selected(page: &mut Page, index: usize) -> bool {
    if index >= page.tabs.len() {
        tracing::error!("{} not found: {}", ElementKind::Tab, index);
        return false;
    }

    for (i, tab) in page.tabs.iter_mut().enumerate() {
        tab.active = i == index;
    }

    if let Some(kind) = page.tabs[index].filter_type.clone() {
        for table in &mut page.tables {
            helpers::apply_type_filter(&kind, &mut table.rows);
        }
    }
    true
}

/// Prompt shown before deleting `name`
pub fn delete_prompt(name: Option<&str>) -> String {
    let name = name.filter(|n| !n.is_empty()).unwrap_or("this item");
    format!("Are you sure you want to delete \"{name}\"? This action cannot be undone.")
}

/// Asks for confirmation; the delete proceeds only on `true`
pub fn handle_delete_requested<C: ConfirmDialog>(dialog: &mut C, name: Option<&str>) -> bool {
    let confirmed = dialog.confirm(&delete_prompt(name));
    if !confirmed {
        tracing::info!("Delete of {} cancelled", name.unwrap_or("item"));
    }
    confirmed
}

/// Top-left corner of a `width` x `height` tooltip centred above `anchor`
pub fn position_tooltip(anchor: Rect, width: f32, height: f32) -> (f32, f32) {
    let top = anchor.top - height - TOOLTIP_OFFSET_PX;
    let left = anchor.left + anchor.width / 2.0 - width / 2.0;
    (top, left)
}

/// Shows the tooltip for `anchor_id`, replacing any other
pub fn handle_tooltip_enter(
    page: &mut Page,
    anchor_id: &str,
    text: &str,
    anchor: Rect,
    width: f32,
    height: f32,
) {
    let (top, left) = position_tooltip(anchor, width, height);
    page.tooltip = Some(Tooltip {
        anchor_id: anchor_id.to_string(),
        text: text.to_string(),
        top,
        left,
    });
}

pub fn handle_tooltip_leave(page: &mut Page, anchor_id: &str) {
    if page
        .tooltip
        .as_ref()
        .is_some_and(|t| t.anchor_id == anchor_id)
    {
        page.tooltip = None;
    }
}

/// Copies `text` and reports the outcome as a notification
pub fn copy_to_clipboard<C: Clipboard>(page: &mut Page, clipboard: &mut C, text: &str) -> bool {
    match clipboard.write_text(text) {
        Ok(()) => {
            page.notify(COPY_SUCCESS_MESSAGE, Severity::Success);
            true
        }
        Err(e) => {
            tracing::error!("Failed to copy: {}", e);
            page.notify(COPY_FAILURE_MESSAGE, Severity::Danger);
            false
        }
    }
}

/// Handles the close button of a notification
pub fn handle_dismiss_notification(page: &mut Page, id: NotificationId) -> bool {
    page.notifications.dismiss(id)
}
