//! Chapter metadata fetching.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::embed::chapter::Chapter;

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("chapter fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("origin answered {status} for chapter {slug:?}")]
    Status { slug: String, status: StatusCode },
}

/// Where chapter metadata comes from.
#[async_trait]
pub trait ChapterSource: Send + Sync {
    async fn chapter(&self, slug: &str) -> Result<Chapter, EmbedError>;
}

/// Reads chapters from the origin's JSON API.
#[derive(Debug, Clone)]
pub struct OriginChapterSource {
    client: reqwest::Client,
    base_url: String,
}

impl OriginChapterSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, EmbedError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn chapter_url(&self, slug: &str) -> String {
        format!("{}/chapters/{}.json", self.base_url, slug)
    }
}

#[async_trait]
impl ChapterSource for OriginChapterSource {
    async fn chapter(&self, slug: &str) -> Result<Chapter, EmbedError> {
        let url = self.chapter_url(slug);
        tracing::debug!(url = %url, "Fetching chapter metadata");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EmbedError::Status {
                slug: slug.to_string(),
                status,
            });
        }
        Ok(response.json::<Chapter>().await?)
    }
}
