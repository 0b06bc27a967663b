use crate::utils::error::Result;
use reqwest::Client;

/// Downloads a remote decision table. Non-success statuses are errors.
pub async fn fetch_table(client: &Client, url: &str) -> Result<Vec<u8>> {
    tracing::debug!("Fetching decision table from: {}", url);
    let response = client.get(url).send().await?;
    tracing::debug!("Source response status: {}", response.status());

    let body = response.error_for_status()?.bytes().await?;
    Ok(body.to_vec())
}
