//! HTTP client for the listing endpoint.

use serde::Deserialize;

use super::feed::BlogPage;
use super::filter::ListQuery;
use super::ClientError;
use crate::models::{Blog, Pagination};

/// Either envelope the listing endpoint can return.
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<Vec<Blog>>,
    #[serde(default)]
    pagination: Option<Pagination>,
    #[serde(default)]
    message: Option<String>,
}

/// Single-item success envelope.
#[derive(Debug, Deserialize)]
struct ItemEnvelope {
    #[serde(default)]
    data: Option<Blog>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ListingClient {
    http: reqwest::Client,
    base_url: String,
}

impl ListingClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:5000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// GET /api/blogs with the given filter snapshot.
    pub async fn fetch_blogs(&self, query: &ListQuery) -> Result<BlogPage, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/blogs", self.base_url))
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let envelope: Envelope = response.json().await?;

        if !status.is_success() || !envelope.success {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| "Failed to fetch blogs".to_string()),
            });
        }

        match (envelope.data, envelope.pagination) {
            (Some(blogs), Some(pagination)) => Ok(BlogPage { blogs, pagination }),
            _ => Err(ClientError::Decode(
                "listing response is missing data or pagination".to_string(),
            )),
        }
    }

    /// GET /api/blogs/:id
    pub async fn fetch_blog(&self, id: &str) -> Result<Blog, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/blogs/{}", self.base_url, id))
            .send()
            .await?;

        let status = response.status();
        let envelope: ItemEnvelope = response.json().await?;

        match envelope.data {
            Some(blog) if status.is_success() => Ok(blog),
            _ => Err(ClientError::Api {
                status: status.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| "Failed to fetch blog".to_string()),
            }),
        }
    }
}
