//! Full-page loading overlay
//!
//! At most one overlay exists. `show` while visible and `hide` while hidden
//! are both no-ops, so a page never ends up with stacked spinners.

pub const LOADING_TEXT: &str = "Loading...";

#[derive(Debug, Default)]
pub struct LoadingOverlay {
    visible: bool,
    activations: usize,
}

impl LoadingOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self) {
        if self.visible {
            return;
        }
        self.visible = true;
        self.activations += 1;
        tracing::debug!("Loading overlay shown");
    }

    pub fn hide(&mut self) {
        if !self.visible {
            return;
        }
        self.visible = false;
        tracing::debug!("Loading overlay hidden");
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Number of hidden-to-visible transitions so far
    pub fn activations(&self) -> usize {
        self.activations
    }

    /// Text rendered inside the overlay, if any
    pub fn text(&self) -> Option<&'static str> {
        self.visible.then_some(LOADING_TEXT)
    }
}
