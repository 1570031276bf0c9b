use anyhow::{Context, Result};
use reqwest::{Client, ClientBuilder, Response};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, warn};

use crate::config::Config;

pub fn create_client(config: &Config) -> Result<Client> {
    let client = ClientBuilder::new()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_seconds))
        .cookie_store(true)
        .pool_max_idle_per_host(6)
        .build()?;

    Ok(client)
}

/// GET `url`, retrying failures and non-2xx statuses with a doubling delay from `backoff`.
pub async fn fetch_with_retry(
    client: &Client,
    url: &str,
    max_retries: u32,
    backoff: Duration,
) -> Result<Response> {
    let mut attempts = 0;
    let mut last_error = None;

    while attempts < max_retries {
        match client.get(url).send().await {
            Ok(response) => {
                if response.status().is_success() {
                    return Ok(response);
                }
                let status = response.status();
                warn!("HTTP error {}: {}", status, url);
                last_error = Some(anyhow::anyhow!("HTTP error: {}", status));
            }
            Err(e) => {
                error!("Request failed for {}: {}", url, e);
                last_error = Some(e.into());
            }
        }

        attempts += 1;
        if attempts < max_retries {
            let delay = backoff * 2u32.pow(attempts);
            warn!("Retrying in {:?}... (attempt {}/{})", delay, attempts + 1, max_retries);
            sleep(delay).await;
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Max retries exceeded")))
        .context(format!("Failed to fetch {} after {} attempts", url, max_retries))
}
