use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, LINK};
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::auth::Credentials;
use crate::config::Config;
use crate::models::{AccountSnapshot, Avatar, PageMarkers, RepositoryPage};

mod error;

pub use error::ApiError;

/// Page size requested for the repository listing
pub const REPO_PAGE_SIZE: u8 = 15;

/// The two read-only queries the dashboard needs from the remote service.
///
/// Both are single shot: no retries and no pagination beyond the first page.
#[async_trait]
pub trait DataClient: Send + Sync {
    /// Current authenticated account, avatar included
    async fn fetch_account(&self) -> Result<AccountSnapshot, ApiError>;

    /// First page of the account's repositories
    async fn fetch_repositories(&self, page_size: u8) -> Result<RepositoryPage, ApiError>;
}

/// Account payload of `GET /user`
#[derive(Debug, Deserialize)]
struct UserResponse {
    login: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    blog: Option<String>,
    avatar_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    total_private_repos: Option<u64>,
    #[serde(default)]
    plan: Option<PlanResponse>,
}

#[derive(Debug, Deserialize)]
struct PlanResponse {
    name: String,
    #[serde(default)]
    private_repos: u64,
}

/// Entry of `GET /user/repos`
#[derive(Debug, Deserialize)]
struct RepositoryResponse {
    name: String,
}

/// Error body returned by GitHub alongside non-2xx statuses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// API client for the GitHub REST API
pub struct GitHubClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl GitHubClient {
    /// Create a new API client
    pub fn new(config: &Config, credentials: Credentials) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.api.user_agent.clone())
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Authenticated GET against the API, failing on non-2xx statuses
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let request = self.credentials.apply(self.client.get(&url).query(query));
        let response = request.send().await?;

        check_status(response).await
    }

    /// Download and decode the avatar. Credentials are not forwarded since
    /// avatars are served from a different host.
    async fn fetch_avatar(&self, url: &str) -> Result<Avatar, ApiError> {
        tracing::debug!("Fetching avatar from {}", url);

        let response = self.client.get(url).send().await?;
        let bytes = check_status(response).await?.bytes().await?;

        Avatar::decode(&bytes).map_err(|e| ApiError::decode("avatar", e))
    }
}

#[async_trait]
impl DataClient for GitHubClient {
    async fn fetch_account(&self) -> Result<AccountSnapshot, ApiError> {
        let user: UserResponse = self
            .get("/user", &[])
            .await?
            .json()
            .await
            .map_err(|e| ApiError::from_body("account", e))?;

        let avatar = self.fetch_avatar(&user.avatar_url).await?;

        tracing::info!("Retrieved account info for {}", user.login);

        let (plan_name, plan_private_repos) = user
            .plan
            .map(|plan| (plan.name, plan.private_repos))
            .unwrap_or_default();

        Ok(AccountSnapshot {
            name: user.name.unwrap_or_default(),
            login: user.login,
            location: user.location.unwrap_or_default(),
            blog: user.blog.unwrap_or_default(),
            created_at: user.created_at,
            updated_at: user.updated_at,
            plan_name,
            plan_private_repos,
            total_private_repos: user.total_private_repos.unwrap_or_default(),
            avatar,
        })
    }

    async fn fetch_repositories(&self, page_size: u8) -> Result<RepositoryPage, ApiError> {
        let query = [("per_page", page_size.to_string()), ("page", "1".to_string())];
        let response = self.get("/user/repos", &query).await?;

        let markers = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .map(PageMarkers::from_link_header)
            .unwrap_or_default();

        let repositories: Vec<RepositoryResponse> = response
            .json()
            .await
            .map_err(|e| ApiError::from_body("repository list", e))?;

        tracing::info!("Retrieved {} repositories", repositories.len());

        Ok(RepositoryPage {
            names: repositories.into_iter().map(|repo| repo.name).collect(),
            markers,
        })
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&error_text)
        .map(|body| body.message)
        .unwrap_or(error_text);

    Err(ApiError::from_status(status, message))
}
