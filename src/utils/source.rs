use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::models::RawPage;
use crate::utils::http::fetch_with_retry;

const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Somewhere a product page can be read from.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self) -> Result<RawPage>;
    /// The URL recorded as `refUrl`.
    fn ref_url(&self) -> String;
}

/// A page fetched over HTTP with retries.
pub struct HttpSource {
    client: Client,
    url: Url,
    max_retries: u32,
}

impl HttpSource {
    pub fn new(client: Client, url: &str, max_retries: u32) -> Result<Self> {
        let url = Url::parse(url).with_context(|| format!("Invalid URL: {}", url))?;
        Ok(Self { client, url, max_retries })
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn fetch(&self) -> Result<RawPage> {
        let response =
            fetch_with_retry(&self.client, self.url.as_str(), self.max_retries, RETRY_BACKOFF)
                .await?;
        // the final URL after redirects is the page's identity
        let final_url = response.url().to_string();
        let html = response
            .text()
            .await
            .with_context(|| format!("Failed to read body of {}", self.url))?;
        debug!("Fetched {} bytes from {}", html.len(), final_url);
        Ok(RawPage::new(html, final_url))
    }

    fn ref_url(&self) -> String {
        self.url.to_string()
    }
}

/// A saved page on disk.
pub struct FileSource {
    path: PathBuf,
    ref_url: Option<String>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, ref_url: Option<String>) -> Self {
        Self { path: path.into(), ref_url }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PageSource for FileSource {
    async fn fetch(&self) -> Result<RawPage> {
        let html = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        Ok(RawPage::new(html, self.ref_url()))
    }

    fn ref_url(&self) -> String {
        if let Some(url) = &self.ref_url {
            return url.clone();
        }
        std::fs::canonicalize(&self.path)
            .ok()
            .and_then(|p| Url::from_file_path(p).ok())
            .map(|u| u.to_string())
            .unwrap_or_else(|| format!("file://{}", self.path.display()))
    }
}

/// An HTTP source for `http(s)` arguments, a file source for anything else.
pub fn source_for(
    arg: &str,
    client: &Client,
    max_retries: u32,
    ref_url: Option<String>,
) -> Result<Box<dyn PageSource>> {
    if arg.starts_with("http://") || arg.starts_with("https://") {
        Ok(Box::new(HttpSource::new(client.clone(), arg, max_retries)?))
    } else {
        Ok(Box::new(FileSource::new(arg, ref_url)))
    }
}
