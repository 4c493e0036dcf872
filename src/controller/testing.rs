use std::sync::Mutex;

use crate::api::models::{ChatReply, Contact, ExpenseList, Memory, Reminder, SetNameReply};
use crate::api::{ApiError, AssistantBackend};

/// Canned backend. A `None` resource answers with an HTTP 503.
#[derive(Default)]
pub struct FakeBackend {
    pub chat: Option<ChatReply>,
    pub name: Option<String>,
    pub set_name: Option<SetNameReply>,
    pub reminders: Option<Vec<Reminder>>,
    pub expenses: Option<ExpenseList>,
    pub memories: Option<Vec<Memory>>,
    pub contacts: Option<Vec<Contact>>,
    pub reset: Option<Result<Option<String>, Option<String>>>,
    pub(crate) calls: Mutex<Vec<&'static str>>,
}

fn unavailable<T>() -> Result<T, ApiError> {
    Err(ApiError::Status { status: 503, message: None })
}

fn answer<T: Clone>(value: &Option<T>) -> Result<T, ApiError> {
    value.clone().map_or_else(unavailable, Ok)
}

impl FakeBackend {
    pub fn replying(response: &str, intent: Option<&str>) -> Self {
        Self {
            chat: Some(ChatReply {
                response: response.to_string(),
                intent: intent.map(str::to_string),
            }),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn chat_calls(&self) -> usize {
        self.calls().iter().filter(|c| **c == "chat").count()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

impl AssistantBackend for FakeBackend {
    async fn chat(&self, _message: &str) -> Result<ChatReply, ApiError> {
        self.record("chat");
        answer(&self.chat)
    }

    async fn get_name(&self) -> Result<Option<String>, ApiError> {
        self.record("get_name");
        Ok(self.name.clone())
    }

    async fn set_name(&self, _name: &str) -> Result<SetNameReply, ApiError> {
        self.record("set_name");
        answer(&self.set_name)
    }

    async fn reminders(&self) -> Result<Vec<Reminder>, ApiError> {
        self.record("reminders");
        answer(&self.reminders)
    }

    async fn expenses(&self) -> Result<ExpenseList, ApiError> {
        self.record("expenses");
        answer(&self.expenses)
    }

    async fn memories(&self) -> Result<Vec<Memory>, ApiError> {
        self.record("memories");
        answer(&self.memories)
    }

    async fn contacts(&self) -> Result<Vec<Contact>, ApiError> {
        self.record("contacts");
        answer(&self.contacts)
    }

    async fn reset_all(&self) -> Result<Option<String>, ApiError> {
        self.record("reset_all");
        match &self.reset {
            Some(Ok(message)) => Ok(message.clone()),
            Some(Err(message)) => Err(ApiError::Status { status: 500, message: message.clone() }),
            None => unavailable(),
        }
    }
}
