pub mod forms;
pub mod handlers;
pub mod helpers;
pub mod loading;
pub mod notifications;
pub mod table;

use crate::config::UiConfig;
use crate::core::error::ElementKind;
use crate::core::stock::Severity;
use forms::Form;
use helpers::Debouncer;
use loading::LoadingOverlay;
use notifications::{NotificationCenter, NotificationId};
use table::Table;
use tokio::time::Instant;

/// A navigation link and its highlight state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub href: String,
    pub active: bool,
}

impl NavLink {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            active: false,
        }
    }
}

/// A tab button, optionally tied to a row category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub label: String,
    pub filter_type: Option<String>,
    pub active: bool,
}

impl Tab {
    pub fn new(label: impl Into<String>, filter_type: Option<&str>) -> Self {
        Self {
            label: label.into(),
            filter_type: filter_type.map(str::to_string),
            active: false,
        }
    }
}

/// Element box in page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub anchor_id: String,
    pub text: String,
    pub top: f32,
    pub left: f32,
}

/// Field holding keyboard focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTarget {
    pub form_id: String,
    pub field_name: String,
}

/// A typed search waiting for the debounce window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub table_id: String,
    pub text: String,
}

/// What a call to [`Page::tick`] did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub expired_notifications: usize,
    /// Visible row count of the debounced search applied on this tick
    pub search_applied: Option<usize>,
}

/// Everything the UI layer manipulates on one rendered page
#[derive(Debug)]
pub struct Page {
    pub config: UiConfig,
    /// Current location path, used for navigation highlight
    pub path: String,
    pub notifications: NotificationCenter,
    pub overlay: LoadingOverlay,
    pub tables: Vec<Table>,
    pub forms: Vec<Form>,
    pub nav_links: Vec<NavLink>,
    pub tabs: Vec<Tab>,
    pub tooltip: Option<Tooltip>,
    pub focused: Option<FocusTarget>,
    /// Server-rendered flash messages not yet handed to the notification center
    pub flash_messages: Vec<(String, Severity)>,
    pending_search: Debouncer<SearchQuery>,
}

impl Default for Page {
    fn default() -> Self {
        Self::new(UiConfig::default())
    }
}

impl Page {
    pub fn new(config: UiConfig) -> Self {
        Self {
            notifications: NotificationCenter::new(&config),
            pending_search: Debouncer::new(config.search_debounce()),
            config,
            path: "/".to_string(),
            overlay: LoadingOverlay::new(),
            tables: Vec::new(),
            forms: Vec::new(),
            nav_links: Vec::new(),
            tabs: Vec::new(),
            tooltip: None,
            focused: None,
            flash_messages: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    #[must_use]
    pub fn with_form(mut self, form: Form) -> Self {
        self.forms.push(form);
        self
    }

    #[must_use]
    pub fn with_flash(mut self, text: impl Into<String>, severity: Severity) -> Self {
        self.flash_messages.push((text.into(), severity));
        self
    }

    /// Page-load work: navigation highlight, flash auto-dismiss and initial focus
    pub fn initialize(&mut self) {
        let active = handlers::highlight_active_links(&mut self.nav_links, &self.path);
        tracing::debug!("Highlighted {} navigation link(s) for {}", active, self.path);

        for (text, severity) in std::mem::take(&mut self.flash_messages) {
            self.notifications.adopt_flash(text, severity);
        }

        self.focused = self.forms.first().and_then(|form| {
            form.first_focusable().map(|field| FocusTarget {
                form_id: form.id.clone(),
                field_name: field.name.clone(),
            })
        });
    }

    pub fn table(&self, id: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id)
    }

    pub fn table_mut(&mut self, id: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.id == id)
    }

    pub fn form(&self, id: &str) -> Option<&Form> {
        self.forms.iter().find(|f| f.id == id)
    }

    pub fn form_mut(&mut self, id: &str) -> Option<&mut Form> {
        self.forms.iter_mut().find(|f| f.id == id)
    }

    /// Shorthand for `self.notifications.notify`
    pub fn notify(&mut self, text: impl Into<String>, severity: Severity) -> NotificationId {
        self.notifications.notify(text, severity)
    }

    /// Records a keystroke in a table's search box; applied by [`Page::tick`]
    /// once typing pauses
    pub fn search_input(&mut self, table_id: &str, value: &str) {
        self.pending_search.push(SearchQuery {
            table_id: table_id.to_string(),
            text: value.to_string(),
        });
    }

    /// Filters a table right away. `None` if the table does not exist.
    pub fn search_now(&mut self, table_id: &str, value: &str) -> Option<usize> {
        let Some(table) = self.table_mut(table_id) else {
            tracing::error!("{} not found: {}", ElementKind::Table, table_id);
            return None;
        };
        Some(helpers::apply_filter(value, &mut table.rows))
    }

    pub fn has_pending_search(&self) -> bool {
        self.pending_search.is_pending()
    }

    /// Runs whatever deferred work is due: notification expiry and the
    /// debounced search
    pub fn tick(&mut self) -> TickReport {
        let expired_notifications = self.notifications.prune_expired();
        let search_applied = self
            .pending_search
            .poll()
            .and_then(|query| self.search_now(&query.table_id, &query.text));

        TickReport {
            expired_notifications,
            search_applied,
        }
    }

    /// When the host loop should next call [`Page::tick`]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.notifications.next_expiry(), self.pending_search.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Sleeps until the next deadline and ticks. `None` when nothing is scheduled.
    pub async fn wait_and_tick(&mut self) -> Option<TickReport> {
        let deadline = self.next_deadline()?;
        tokio::time::sleep_until(deadline).await;
        Some(self.tick())
    }
}
