//! HTTP client for the shop backend.
//!
//! The backend exposes a plain REST surface:
//!
//! | Operation | Request                     | Success            |
//! |-----------|-----------------------------|--------------------|
//! | create    | `POST {host}/articles`      | any status < 400   |
//! | read      | `GET {host}/articles/{id}`  | any status < 400   |
//! | update    | `PUT {host}/articles/{id}`  | any status < 400   |
//! | delete    | `DELETE {host}/articles/{id}` | exactly 204      |
//!
//! Bodies are JSON objects `{id, name, description}`.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Maximum length of a response body kept in an error message.
const MAX_ERROR_BODY_LENGTH: usize = 512;

/// Errors returned by [`ShopClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The underlying HTTP client could not be constructed.
    #[error("Failed to create HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// The request body could not be encoded.
    #[error("Json marshalling error: {0}")]
    Encode(#[source] serde_json::Error),

    /// The request never produced a response.
    #[error("HTTP {method} Error with URL [{url}]: {source}")]
    Request {
        /// HTTP method of the failed request.
        method: Method,
        /// Target URL.
        url: String,
        /// Transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a status >= 400.
    #[error("Backend returned bad status {status}: {body}")]
    BadStatus {
        /// Response status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// The backend answered with a status other than the one required.
    #[error(
        "HTTP {method} Error with URL [{url}] returned not the expected result code. \
         Should be {expected} but was {actual}"
    )]
    UnexpectedStatus {
        /// HTTP method of the request.
        method: Method,
        /// Target URL.
        url: String,
        /// Required status code.
        expected: u16,
        /// Received status code.
        actual: u16,
    },

    /// The response body was not a valid article.
    #[error("Json unmarshalling error: {0}")]
    Decode(#[source] serde_json::Error),

    /// A create response did not carry the server-assigned id.
    #[error("Backend response did not contain an article id")]
    MissingId,
}

/// Article as exchanged with the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Server-assigned identifier, omitted in request bodies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Article name.
    pub name: String,
    /// Article description.
    pub description: String,
}

impl Article {
    /// Build a request body without an id.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
        }
    }
}

/// REST client bound to a single backend host.
#[derive(Debug, Clone)]
pub struct ShopClient {
    http: Client,
    host: String,
}

impl ShopClient {
    /// Create a client for `host` (scheme, authority and optional base path).
    pub fn new(host: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .user_agent(concat!("tfp-example/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Build)?;

        let host = host.into().trim_end_matches('/').to_string();
        Ok(Self { http, host })
    }

    /// The base URL requests are sent to.
    pub fn host(&self) -> &str {
        &self.host
    }

    fn collection_url(&self) -> String {
        format!("{}/articles", self.host)
    }

    fn article_url(&self, id: i64) -> String {
        format!("{}/articles/{}", self.host, id)
    }

    /// `POST /articles`, returning the stored article with its new id.
    pub async fn create_article(&self, article: &Article) -> Result<Article, ClientError> {
        let url = self.collection_url();
        let created = self.send_json(Method::POST, url, Some(article)).await?;
        if created.id.is_none() {
            return Err(ClientError::MissingId);
        }
        Ok(created)
    }

    /// `GET /articles/{id}`.
    pub async fn get_article(&self, id: i64) -> Result<Article, ClientError> {
        self.send_json(Method::GET, self.article_url(id), None).await
    }

    /// `PUT /articles/{id}`, returning the article as stored by the backend.
    pub async fn update_article(&self, id: i64, article: &Article) -> Result<Article, ClientError> {
        self.send_json(Method::PUT, self.article_url(id), Some(article))
            .await
    }

    /// `DELETE /articles/{id}`; the backend must answer `204 No Content`.
    pub async fn delete_article(&self, id: i64) -> Result<(), ClientError> {
        let url = self.article_url(id);
        debug!(%url, "DELETE");

        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|source| ClientError::Request {
                method: Method::DELETE,
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            warn!(%url, status = status.as_u16(), "Unexpected DELETE status");
            return Err(ClientError::UnexpectedStatus {
                method: Method::DELETE,
                url,
                expected: StatusCode::NO_CONTENT.as_u16(),
                actual: status.as_u16(),
            });
        }
        Ok(())
    }

    async fn send_json(
        &self,
        method: Method,
        url: String,
        body: Option<&Article>,
    ) -> Result<Article, ClientError> {
        debug!(%method, %url, "Sending request");

        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(ClientError::Encode)?;
            request = request.header(CONTENT_TYPE, "application/json").body(bytes);
        }

        let response = request.send().await.map_err(|source| ClientError::Request {
            method: method.clone(),
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| ClientError::Request {
                method: method.clone(),
                url: url.clone(),
                source,
            })?;

        if status.as_u16() >= 400 {
            warn!(%method, %url, status = status.as_u16(), "Backend returned bad status");
            return Err(ClientError::BadStatus {
                status: status.as_u16(),
                body: truncate_body(&text),
            });
        }

        serde_json::from_str(&text).map_err(ClientError::Decode)
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
}
