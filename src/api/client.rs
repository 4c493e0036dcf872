use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::models::{
    ChatReply, ChatRequest, Contact, ContactsEnvelope, ExpenseList, ExpensesEnvelope, Memory,
    MemoriesEnvelope, MessageEnvelope, NameReply, Reminder, RemindersEnvelope, SetNameReply,
    SetNameRequest,
};
use crate::api::{ApiError, AssistantBackend};

#[derive(Clone)]
pub struct AssistantClient {
    http: HttpClient,
    base_api: String,
}

impl AssistantClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url)?;
        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_api: Self::base_api(parsed.as_str()),
        })
    }

    fn base_api(base_url: &str) -> String {
        let trimmed = base_url.trim_end_matches('/');
        if trimmed.ends_with("/api") { trimmed.to_string() } else { format!("{}/api", trimmed) }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_api, path)
    }

    /// Non-2xx answers become `ApiError::Status`, carrying the body's `message`
    /// when the backend sent one.
    async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
        let status = resp.status();
        let body = resp.bytes().await?;
        if !status.is_success() {
            let message = serde_json::from_slice::<MessageEnvelope>(&body)
                .ok()
                .and_then(|e| e.message);
            return Err(ApiError::Status { status: status.as_u16(), message });
        }
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.http.get(self.endpoint(path)).send().await?;
        Self::read_json(resp).await
    }
}

impl AssistantBackend for AssistantClient {
    async fn chat(&self, message: &str) -> Result<ChatReply, ApiError> {
        let resp = self
            .http
            .post(self.endpoint("chat"))
            .json(&ChatRequest { message })
            .send()
            .await?;
        Self::read_json(resp).await
    }

    async fn get_name(&self) -> Result<Option<String>, ApiError> {
        let reply: NameReply = self.get_json("get-name").await?;
        Ok(reply.name.filter(|n| !n.trim().is_empty()))
    }

    async fn set_name(&self, name: &str) -> Result<SetNameReply, ApiError> {
        let resp = self
            .http
            .post(self.endpoint("set-name"))
            .json(&SetNameRequest { name })
            .send()
            .await?;
        Self::read_json(resp).await
    }

    async fn reminders(&self) -> Result<Vec<Reminder>, ApiError> {
        let env: RemindersEnvelope = self.get_json("reminders").await?;
        Ok(env.reminders.unwrap_or_default())
    }

    async fn expenses(&self) -> Result<ExpenseList, ApiError> {
        let env: ExpensesEnvelope = self.get_json("expenses").await?;
        Ok(ExpenseList {
            expenses: env.expenses.unwrap_or_default(),
            total: env.total.unwrap_or(0.0),
        })
    }

    async fn memories(&self) -> Result<Vec<Memory>, ApiError> {
        let env: MemoriesEnvelope = self.get_json("memories").await?;
        Ok(env.memories.unwrap_or_default())
    }

    async fn contacts(&self) -> Result<Vec<Contact>, ApiError> {
        let env: ContactsEnvelope = self.get_json("contacts").await?;
        Ok(env.contacts.unwrap_or_default())
    }

    async fn reset_all(&self) -> Result<Option<String>, ApiError> {
        let resp = self
            .http
            .post(self.endpoint("reset-all"))
            .header("Content-Type", "application/json")
            .send()
            .await?;
        let env: MessageEnvelope = Self::read_json(resp).await?;
        Ok(env.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> AssistantClient {
        AssistantClient::new(&server.uri(), Duration::from_secs(5)).expect("client")
    }

    fn json_body(value: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(value.to_string(), "application/json")
    }

    #[test]
    fn base_api_appends_api_once() {
        assert_eq!(AssistantClient::base_api("http://h:5000/"), "http://h:5000/api");
        assert_eq!(AssistantClient::base_api("http://h:5000/api"), "http://h:5000/api");
    }

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(matches!(
            AssistantClient::new("not a url", Duration::from_secs(1)),
            Err(ApiError::Url(_))
        ));
    }

    #[tokio::test]
    async fn chat_posts_message_and_reads_intent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_json(serde_json::json!({ "message": "remind me to call mom at 5pm" })))
            .respond_with(json_body(serde_json::json!({
                "response": "Reminder set for 17:00.",
                "intent": "set_reminder"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server).chat("remind me to call mom at 5pm").await.unwrap();
        assert_eq!(reply.response, "Reminder set for 17:00.");
        assert!(reply.touches_sidebar());
    }

    #[tokio::test]
    async fn chat_non_json_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).chat("hi").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn lists_default_when_missing_or_null() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/reminders"))
            .respond_with(json_body(serde_json::json!({ "reminders": null })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/expenses"))
            .respond_with(json_body(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.reminders().await.unwrap().is_empty());
        assert_eq!(client.expenses().await.unwrap(), ExpenseList::default());
    }

    #[tokio::test]
    async fn sidebar_resources_are_parsed_in_backend_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/expenses"))
            .respond_with(json_body(serde_json::json!({
                "expenses": [
                    { "id": 2, "amount": 120.0, "category": "food", "note": "" },
                    { "id": 1, "amount": 40.5, "category": "transport" }
                ],
                "total": 160.5
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/contacts"))
            .respond_with(json_body(serde_json::json!({
                "contacts": [ { "name": "Asha", "phone": "9876543210" }, { "name": "Ravi", "phone": null } ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let expenses = client.expenses().await.unwrap();
        assert_eq!(expenses.total, 160.5);
        assert_eq!(
            expenses.expenses.iter().map(|e| e.category.as_deref()).collect::<Vec<_>>(),
            vec![Some("food"), Some("transport")]
        );
        let contacts = client.contacts().await.unwrap();
        assert_eq!(contacts[1], Contact { name: Some("Ravi".into()), phone: None });
    }

    #[tokio::test]
    async fn get_name_treats_blank_as_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/get-name"))
            .respond_with(json_body(serde_json::json!({ "name": "" })))
            .mount(&server)
            .await;

        assert_eq!(client_for(&server).get_name().await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_name_sends_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/set-name"))
            .and(body_json(serde_json::json!({ "name": "priya" })))
            .respond_with(json_body(serde_json::json!({ "success": true, "name": "Priya" })))
            .mount(&server)
            .await;

        let reply = client_for(&server).set_name("priya").await.unwrap();
        assert!(reply.success);
        assert_eq!(reply.name.as_deref(), Some("Priya"));
    }

    #[tokio::test]
    async fn reset_failure_keeps_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/reset-all"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_raw(r#"{"message":"database is locked"}"#, "application/json"),
            )
            .mount(&server)
            .await;

        match client_for(&server).reset_all().await {
            Err(ApiError::Status { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message.as_deref(), Some("database is locked"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn reset_success_returns_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/reset-all"))
            .respond_with(json_body(serde_json::json!({
                "status": "success",
                "message": "All data has been cleared."
            })))
            .mount(&server)
            .await;

        assert_eq!(
            client_for(&server).reset_all().await.unwrap().as_deref(),
            Some("All data has been cleared.")
        );
    }
}
