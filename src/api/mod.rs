pub mod client;
pub mod models;

use std::future::Future;

use models::{ChatReply, Contact, ExpenseList, Memory, Reminder, SetNameReply};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid server url: {0}")]
    Url(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status}")]
    Status { status: u16, message: Option<String> },
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Everything the client asks of the assistant backend.
///
/// Futures are `Send` so the flows built on top can run on the shared runtime.
pub trait AssistantBackend: Send + Sync {
    fn chat(&self, message: &str) -> impl Future<Output = Result<ChatReply, ApiError>> + Send;
    fn get_name(&self) -> impl Future<Output = Result<Option<String>, ApiError>> + Send;
    fn set_name(&self, name: &str) -> impl Future<Output = Result<SetNameReply, ApiError>> + Send;
    fn reminders(&self) -> impl Future<Output = Result<Vec<Reminder>, ApiError>> + Send;
    fn expenses(&self) -> impl Future<Output = Result<ExpenseList, ApiError>> + Send;
    fn memories(&self) -> impl Future<Output = Result<Vec<Memory>, ApiError>> + Send;
    fn contacts(&self) -> impl Future<Output = Result<Vec<Contact>, ApiError>> + Send;
    /// Returns the backend's confirmation message, if any.
    fn reset_all(&self) -> impl Future<Output = Result<Option<String>, ApiError>> + Send;
}
