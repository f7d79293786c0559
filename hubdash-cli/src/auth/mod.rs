use anyhow::{bail, Result};
use dialoguer::{Input, Password};
use reqwest::RequestBuilder;
use std::fmt;

/// How requests to the service are authenticated for this run
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Pre-issued access token sent as a bearer token
    Token(String),
    /// Username and password sent with HTTP basic auth
    Basic { username: String, password: String },
}

impl Credentials {
    /// Use the token from `token_env` when it is set and non-empty,
    /// otherwise ask for a username and password on the terminal.
    pub fn resolve(token_env: &str) -> Result<Self> {
        if let Some(credentials) = Self::from_token(std::env::var(token_env).ok()) {
            tracing::info!("Authenticating with access token from {}", token_env);
            return Ok(credentials);
        }

        tracing::info!("{} not set, prompting for username and password", token_env);
        Self::prompt()
    }

    pub fn from_token(token: Option<String>) -> Option<Self> {
        token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(Credentials::Token)
    }

    pub fn basic(username: &str, password: &str) -> Result<Self> {
        let username = username.trim();
        if username.is_empty() {
            bail!("Username must not be empty");
        }

        Ok(Credentials::Basic {
            username: username.to_string(),
            password: password.trim().to_string(),
        })
    }

    fn prompt() -> Result<Self> {
        let username: String = Input::new().with_prompt("Username").interact_text()?;
        let password = Password::new().with_prompt("Password").interact()?;

        Self::basic(&username, &password)
    }

    /// Attach these credentials to a request
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Credentials::Token(token) => request.bearer_auth(token),
            Credentials::Basic { username, password } => request.basic_auth(username, Some(password)),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Token(_) => f.write_str("Credentials::Token(***)"),
            Credentials::Basic { username, .. } => {
                write!(f, "Credentials::Basic {{ username: {:?}, password: *** }}", username)
            }
        }
    }
}
