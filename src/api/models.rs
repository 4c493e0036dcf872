use serde::{Deserialize, Deserializer, Serialize};

/// Intents after which the backend has written something the sidebar shows.
pub const SIDEBAR_INTENTS: [&str; 3] = ["set_reminder", "log_expense", "store_memory"];

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub intent: Option<String>,
}

impl ChatReply {
    pub fn touches_sidebar(&self) -> bool {
        self.intent
            .as_deref()
            .is_some_and(|intent| SIDEBAR_INTENTS.contains(&intent))
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct NameReply {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SetNameRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SetNameReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Reminder {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub remind_at: Option<String>,
    #[serde(default, deserialize_with = "truthy")]
    pub notified: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Expense {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpenseList {
    pub expenses: Vec<Expense>,
    pub total: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Memory {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Contact {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RemindersEnvelope {
    #[serde(default)]
    pub reminders: Option<Vec<Reminder>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExpensesEnvelope {
    #[serde(default)]
    pub expenses: Option<Vec<Expense>>,
    #[serde(default)]
    pub total: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MemoriesEnvelope {
    #[serde(default)]
    pub memories: Option<Vec<Memory>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContactsEnvelope {
    #[serde(default)]
    pub contacts: Option<Vec<Contact>>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct MessageEnvelope {
    #[serde(default)]
    pub message: Option<String>,
}

// SQLite rows come back with 0/1 integers where a bool is meant.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Null => false,
        _ => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notified_accepts_integers_and_bools() {
        let rows: Vec<Reminder> = serde_json::from_str(
            r#"[{"message":"a","notified":1},{"message":"b","notified":0},{"notified":true},{"notified":null},{}]"#,
        )
        .unwrap();
        let flags: Vec<bool> = rows.iter().map(|r| r.notified).collect();
        assert_eq!(flags, vec![true, false, true, false, false]);
    }

    #[test]
    fn sidebar_intents() {
        let reply = |intent: Option<&str>| ChatReply {
            response: String::new(),
            intent: intent.map(str::to_string),
        };
        assert!(reply(Some("set_reminder")).touches_sidebar());
        assert!(reply(Some("log_expense")).touches_sidebar());
        assert!(reply(Some("store_memory")).touches_sidebar());
        assert!(!reply(Some("add_contact")).touches_sidebar());
        assert!(!reply(Some("tell_time")).touches_sidebar());
        assert!(!reply(None).touches_sidebar());
    }

    #[test]
    fn chat_reply_tolerates_null_intent() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"response":"Please type something.","intent":null}"#).unwrap();
        assert_eq!(reply.intent, None);
    }
}
