use crate::api::models::{Contact, Expense, ExpenseList, Memory, Reminder};
use crate::api::{ApiError, AssistantBackend};

pub const LOAD_ERROR: &str = "Error loading";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Reminders,
    Expenses,
    Memories,
    Contacts,
}

impl Panel {
    /// Refresh order.
    pub const ALL: [Panel; 4] = [Panel::Reminders, Panel::Expenses, Panel::Memories, Panel::Contacts];

    pub fn title(self) -> &'static str {
        match self {
            Panel::Reminders => "⏰ Reminders",
            Panel::Expenses => "💰 Expenses",
            Panel::Memories => "🧠 Memories",
            Panel::Contacts => "📇 Contacts",
        }
    }

    pub fn empty_text(self) -> &'static str {
        match self {
            Panel::Reminders => "No reminders yet",
            Panel::Expenses => "No expenses logged",
            Panel::Memories => "No memories stored",
            Panel::Contacts => "No contacts yet",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelRow {
    pub title: Option<String>,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelView {
    Placeholder(&'static str),
    Rows(Vec<PanelRow>),
}

/// Expense total visibility after a refresh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TotalView {
    Show(f64),
    Hide,
    /// The fetch failed; leave whatever was shown before.
    Keep,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelUpdate {
    pub panel: Panel,
    pub view: PanelView,
    pub total: TotalView,
}

fn or_fallback(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

fn reminder_row(r: &Reminder) -> PanelRow {
    let status = if r.notified { "✔" } else { "⏳" };
    PanelRow {
        title: Some(or_fallback(r.message.as_deref(), "Untitled")),
        detail: format!("{} {}", or_fallback(r.remind_at.as_deref(), "?"), status),
    }
}

fn expense_row(e: &Expense) -> PanelRow {
    PanelRow {
        title: Some(format!("₹{}", e.amount.unwrap_or(0.0))),
        detail: or_fallback(e.category.as_deref(), "Other"),
    }
}

fn memory_row(m: &Memory) -> PanelRow {
    PanelRow { title: None, detail: or_fallback(m.content.as_deref(), "Empty memory") }
}

fn contact_row(c: &Contact) -> PanelRow {
    PanelRow {
        title: Some(or_fallback(c.name.as_deref(), "Unnamed")),
        detail: format!("☎️ {}", or_fallback(c.phone.as_deref(), "No number")),
    }
}

fn rows_or_placeholder<T>(panel: Panel, items: &[T], row: fn(&T) -> PanelRow) -> PanelView {
    if items.is_empty() {
        PanelView::Placeholder(panel.empty_text())
    } else {
        PanelView::Rows(items.iter().map(row).collect())
    }
}

fn failed(panel: Panel, err: &ApiError) -> PanelUpdate {
    log::warn!("failed to load {panel:?}: {err}");
    PanelUpdate { panel, view: PanelView::Placeholder(LOAD_ERROR), total: TotalView::Keep }
}

pub fn reminders_update(result: Result<Vec<Reminder>, ApiError>) -> PanelUpdate {
    let panel = Panel::Reminders;
    match result {
        Ok(items) => PanelUpdate {
            panel,
            view: rows_or_placeholder(panel, &items, reminder_row),
            total: TotalView::Keep,
        },
        Err(e) => failed(panel, &e),
    }
}

pub fn expenses_update(result: Result<ExpenseList, ApiError>) -> PanelUpdate {
    let panel = Panel::Expenses;
    match result {
        Ok(list) => {
            let total = if list.expenses.is_empty() { TotalView::Hide } else { TotalView::Show(list.total) };
            PanelUpdate { panel, view: rows_or_placeholder(panel, &list.expenses, expense_row), total }
        }
        Err(e) => failed(panel, &e),
    }
}

pub fn memories_update(result: Result<Vec<Memory>, ApiError>) -> PanelUpdate {
    let panel = Panel::Memories;
    match result {
        Ok(items) => PanelUpdate {
            panel,
            view: rows_or_placeholder(panel, &items, memory_row),
            total: TotalView::Keep,
        },
        Err(e) => failed(panel, &e),
    }
}

pub fn contacts_update(result: Result<Vec<Contact>, ApiError>) -> PanelUpdate {
    let panel = Panel::Contacts;
    match result {
        Ok(items) => PanelUpdate {
            panel,
            view: rows_or_placeholder(panel, &items, contact_row),
            total: TotalView::Keep,
        },
        Err(e) => failed(panel, &e),
    }
}

/// Fetches the four panels one after another, handing each to `render` as
/// soon as it is ready. A failing panel never stops the ones after it.
pub async fn refresh_sidebar<B, F>(backend: &B, mut render: F)
where
    B: AssistantBackend,
    F: FnMut(PanelUpdate) + Send,
{
    log::debug!("refreshing sidebar");
    render(reminders_update(backend.reminders().await));
    render(expenses_update(backend.expenses().await));
    render(memories_update(backend.memories().await));
    render(contacts_update(backend.contacts().await));
    log::debug!("sidebar refresh complete");
}

pub fn format_total(total: f64) -> String {
    format!("{total:.2}")
}
