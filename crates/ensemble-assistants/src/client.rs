//! OpenAI Assistants API client.
//!
//! Implements [`AssistantsApi`] over HTTPS. Speaks the v1 beta surface,
//! where files are attached to assistants and messages through `file_ids`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};

use crate::api::AssistantsApi;
use crate::error::{ApiError, Result};
use crate::types::{
    Assistant, CreateMessageRequest, CreateRunRequest, FileObject, ListResponse, MessageRole, Run,
    Thread, ThreadMessage,
};

/// Environment variable for the API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable overriding the API base URL.
pub const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Beta header value selecting the assistants surface.
const ASSISTANTS_BETA: &str = "assistants=v1";

/// Page size for list endpoints.
const PAGE_LIMIT: u32 = 100;

/// Assistants API client.
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// Create a new client with the given API key against the default base URL.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create a client from environment variables.
    ///
    /// Uses `OPENAI_API_KEY`, and `OPENAI_BASE_URL` when set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(OPENAI_API_KEY_ENV).map_err(|_| {
            ApiError::Configuration(format!(
                "Missing {} environment variable",
                OPENAI_API_KEY_ENV
            ))
        })?;
        let client = Self::new(api_key);
        Ok(match std::env::var(OPENAI_BASE_URL_ENV) {
            Ok(base_url) => client.with_base_url(base_url),
            Err(_) => client,
        })
    }

    /// Point the client at a different base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Base URL in use.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("OpenAI-Beta", ASSISTANTS_BETA)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Request(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::ResponseParse(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        trace!(path, "GET");
        self.send(self.request(reqwest::Method::GET, path)).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        trace!(path, "POST");
        self.send(self.request(reqwest::Method::POST, path).json(body))
            .await
    }

    /// Follow `has_more` cursors until the listing is complete.
    async fn list_all<T: DeserializeOwned>(&self, path: &str, order: Option<&str>) -> Result<Vec<T>>
    where
        T: HasId,
    {
        let mut items = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let mut query: Vec<(&str, String)> = vec![("limit", PAGE_LIMIT.to_string())];
            if let Some(order) = order {
                query.push(("order", order.to_string()));
            }
            if let Some(cursor) = &after {
                query.push(("after", cursor.clone()));
            }

            trace!(path, ?after, "GET page");
            let page: ListResponse<T> = self
                .send(self.request(reqwest::Method::GET, path).query(&query))
                .await?;

            let has_more = page.has_more;
            let last_id = page
                .last_id
                .or_else(|| page.data.last().map(|item| item.id().to_string()));
            items.extend(page.data);

            match (has_more, last_id) {
                (true, Some(cursor)) => after = Some(cursor),
                _ => break,
            }
        }

        Ok(items)
    }
}

/// List items that can serve as a pagination cursor.
trait HasId {
    fn id(&self) -> &str;
}

impl HasId for Assistant {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HasId for ThreadMessage {
    fn id(&self) -> &str {
        &self.id
    }
}

#[async_trait]
impl AssistantsApi for OpenAiClient {
    async fn list_assistants(&self) -> Result<Vec<Assistant>> {
        let assistants: Vec<Assistant> = self.list_all("assistants", None).await?;
        debug!(count = assistants.len(), "Listed assistants");
        Ok(assistants)
    }

    async fn retrieve_file(&self, file_id: &str) -> Result<FileObject> {
        self.get(&format!("files/{}", file_id)).await
    }

    async fn create_thread(&self) -> Result<Thread> {
        let thread: Thread = self.post("threads", &serde_json::json!({})).await?;
        debug!(thread_id = %thread.id, "Created thread");
        Ok(thread)
    }

    async fn create_message(
        &self,
        thread_id: &str,
        content: &str,
        file_ids: &[String],
    ) -> Result<ThreadMessage> {
        let body = CreateMessageRequest {
            role: MessageRole::User,
            content,
            file_ids,
        };
        self.post(&format!("threads/{}/messages", thread_id), &body)
            .await
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run> {
        let body = CreateRunRequest { assistant_id };
        let run: Run = self
            .post(&format!("threads/{}/runs", thread_id), &body)
            .await?;
        debug!(run_id = %run.id, assistant_id, status = %run.status, "Created run");
        Ok(run)
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.get(&format!("threads/{}/runs/{}", thread_id, run_id))
            .await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>> {
        self.list_all(&format!("threads/{}/messages", thread_id), Some("asc"))
            .await
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.post(
            &format!("threads/{}/runs/{}/cancel", thread_id, run_id),
            &serde_json::json!({}),
        )
        .await
    }
}
