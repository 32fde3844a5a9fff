//! Forum backend client
//!
//! Every endpoint answers with the envelope `{"code", "msg", "data"}`;
//! `code == 1000` means success regardless of the HTTP status.

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const CODE_SUCCESS: i64 = 1000;

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// The payload of a successful call, or an error naming code and message
    pub fn into_data(self, what: &str) -> Result<Option<T>> {
        if self.code == CODE_SUCCESS {
            Ok(self.data)
        } else {
            Err(anyhow!("{what} rejected: code {} ({})", self.code, self.msg))
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub bio: String,
    pub avatar_url: String,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Board {
    #[serde(rename = "ID")]
    pub id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub board_id: i64,
    pub tags: Vec<String>,
}

pub struct ForumClient {
    base_url: String,
    client: Client,
}

impl ForumClient {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response, what: &str) -> Result<Envelope<T>> {
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read {what} response body"))?;
        serde_json::from_str(&body)
            .with_context(|| format!("invalid {what} response ({status}): {body}"))
    }

    pub async fn register(&self, user: &NewUser) -> Result<()> {
        let response = self
            .client
            .post(self.url("/register"))
            .json(user)
            .send()
            .await
            .context("failed to call register")?;
        Self::decode::<serde_json::Value>(response, "register")
            .await?
            .into_data("register")?;
        Ok(())
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let response = self
            .client
            .post(self.url("/login"))
            .json(&Credentials { username, password })
            .send()
            .await
            .context("failed to call login")?;
        Self::decode::<LoginData>(response, "login")
            .await?
            .into_data("login")?
            .map(|d| d.token)
            .ok_or_else(|| anyhow!("login succeeded without a token"))
    }

    pub async fn boards(&self, token: &str) -> Result<Vec<Board>> {
        let response = self
            .client
            .get(self.url("/api/boards"))
            .header(reqwest::header::AUTHORIZATION, token)
            .send()
            .await
            .context("failed to call boards")?;
        Ok(Self::decode::<Vec<Board>>(response, "boards")
            .await?
            .into_data("boards")?
            .unwrap_or_default())
    }

    pub async fn create_post(&self, token: &str, post: &NewPost) -> Result<()> {
        let response = self
            .client
            .post(self.url("/api/posts"))
            .header(reqwest::header::AUTHORIZATION, token)
            .json(post)
            .send()
            .await
            .context("failed to call create post")?;
        Self::decode::<serde_json::Value>(response, "create post")
            .await?
            .into_data("create post")?;
        Ok(())
    }
}
