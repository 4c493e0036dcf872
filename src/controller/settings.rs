use crate::api::{ApiError, AssistantBackend};

pub const NAME_REQUIRED: &str = "Please enter a name.";
pub const NAME_SAVE_FAILED: &str = "Failed to save name.";
pub const RESET_CONFIRM: &str =
    "⚠️ This will delete ALL reminders, expenses, memories, and contacts. Are you sure?";
pub const RESET_CANCELLED: &str = "Reset cancelled.";
pub const RESET_DONE: &str = "✔️ All data has been cleared! Starting fresh.";
pub const RESET_FAILED: &str = "❌ Failed to reset data. Check the log for details.";

pub fn salutation(hour: u32) -> &'static str {
    if hour < 12 {
        "☀️ Good morning"
    } else if hour < 17 {
        "🌤️ Good afternoon"
    } else {
        "🌙 Good evening"
    }
}

pub fn greeting(hour: u32, name: Option<&str>) -> String {
    let salutation = salutation(hour);
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("{salutation}, {name}!"),
        None => format!("{salutation}! Please set your name in settings."),
    }
}

/// Name lookup at startup; any failure means "no name yet".
pub async fn load_name<B: AssistantBackend>(backend: &B) -> Option<String> {
    match backend.get_name().await {
        Ok(name) => name,
        Err(e) => {
            log::warn!("could not load user name: {e}");
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveNameOutcome {
    /// The backend stored the name, possibly normalized.
    Saved(String),
    /// Shown as a toast; the settings panel stays open.
    Rejected(String),
}

impl SaveNameOutcome {
    pub fn welcome(name: &str) -> String {
        format!("👋 Nice to meet you, {name}!")
    }
}

pub async fn save_name<B: AssistantBackend>(backend: &B, name: &str) -> SaveNameOutcome {
    match backend.set_name(name).await {
        Ok(reply) if reply.success => {
            SaveNameOutcome::Saved(reply.name.unwrap_or_else(|| name.to_string()))
        }
        Ok(reply) => SaveNameOutcome::Rejected(
            reply.error.unwrap_or_else(|| NAME_SAVE_FAILED.to_string()),
        ),
        Err(e) => {
            log::error!("set-name failed: {e}");
            SaveNameOutcome::Rejected(NAME_SAVE_FAILED.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetOutcome {
    pub message: String,
    pub refresh: bool,
}

/// Only call after the user confirmed.
pub async fn reset_all<B: AssistantBackend>(backend: &B) -> ResetOutcome {
    match backend.reset_all().await {
        Ok(_) => ResetOutcome { message: RESET_DONE.to_string(), refresh: true },
        Err(ApiError::Status { status, message }) => {
            log::error!("reset-all rejected with HTTP {status}");
            let detail = message.unwrap_or_else(|| format!("HTTP {status}"));
            ResetOutcome { message: format!("❌ Error resetting data: {detail}"), refresh: false }
        }
        Err(e) => {
            log::error!("reset-all failed: {e}");
            ResetOutcome { message: RESET_FAILED.to_string(), refresh: false }
        }
    }
}
