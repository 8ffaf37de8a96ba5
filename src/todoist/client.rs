//! HTTP client for the Todoist REST API

use reqwest::StatusCode;
use std::fmt;
use tracing::debug;

use super::error::{Result, TodoistError};
use super::model::TaskPage;
use super::TaskService;

pub const DEFAULT_BASE_URL: &str = "https://api.todoist.com/api/v1";
pub const DEFAULT_PAGE_SIZE: u32 = 100;

#[derive(Clone)]
pub struct TodoistClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    page_size: u32,
}

impl fmt::Debug for TodoistClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoistClient")
            .field("base_url", &self.base_url)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl TodoistClient {
    pub fn new(token: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("todo-glance/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, 200);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(TodoistError::from_status(status.as_u16(), &body))
    }
}

impl TaskService for TodoistClient {
    async fn list_tasks(&self, cursor: Option<&str>) -> Result<TaskPage> {
        let mut query = vec![("limit", self.page_size.to_string())];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }

        let response = self
            .http
            .get(self.url("tasks"))
            .bearer_auth(&self.token)
            .query(&query)
            .send()
            .await?;
        let response = Self::check(response).await?;

        // Decode from text so a bad payload surfaces as a decode error rather
        // than a transport one.
        let body = response.text().await?;
        let page: TaskPage = serde_json::from_str(&body)?;
        debug!(
            "Fetched {} tasks (more: {})",
            page.results.len(),
            page.next_cursor.is_some()
        );
        Ok(page)
    }

    async fn close_task(&self, task_id: &str) -> Result<()> {
        let response = self
            .http
            .post(self.url(&format!("tasks/{}/close", task_id)))
            .bearer_auth(&self.token)
            .send()
            .await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(());
        }
        Self::check(response).await?;
        Ok(())
    }
}
