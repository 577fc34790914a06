//! Expansion of list URLs found in the address input.

use super::address_list::{is_url, parse_ip_list, split_tokens};
use futures::future::try_join_all;
use reqwest::Client;
use std::error::Error;
use std::time::Duration;

/// Maximum accepted size of a fetched list body (1 MiB).
const MAX_LIST_SIZE: usize = 1024 * 1024;

fn build_client(timeout: Duration) -> Result<Client, Box<dyn Error>> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(format!("aznet/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| format!("Failed to create HTTP client: {e}"))?;
    Ok(client)
}

/// Download one address list and return its body.
///
/// Bodies over [`MAX_LIST_SIZE`] are refused, by advertised length before
/// reading and by bytes received while streaming.
pub async fn fetch_list(client: &Client, url: &str) -> Result<String, Box<dyn Error>> {
    log::info!("Fetching address list {url}");
    let mut response = client
        .get(url)
        .send()
        .await
        .map_err(|e| format!("Failed to fetch {url}: {e}"))?
        .error_for_status()
        .map_err(|e| format!("Bad response from {url}: {e}"))?;

    if let Some(len) = response.content_length() {
        if len > MAX_LIST_SIZE as u64 {
            return Err(format!("Address list too large: {len} bytes from {url}").into());
        }
    }

    let mut body: Vec<u8> = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| format!("Failed to read body of {url}: {e}"))?
    {
        if body.len() + chunk.len() > MAX_LIST_SIZE {
            return Err(format!(
                "Address list too large: over {MAX_LIST_SIZE} bytes from {url}"
            )
            .into());
        }
        body.extend_from_slice(&chunk);
    }

    let body = String::from_utf8(body).map_err(|e| format!("Invalid UTF-8 from {url}: {e}"))?;
    log::debug!("Fetched {} bytes from {url}", body.len());
    Ok(body)
}

/// Resolve raw input into a validated, de-duplicated CIDR list.
///
/// Inline entries come first, followed by the entries of each URL in the
/// order given. Lists are expanded one level only.
pub async fn collect_ip_list(raw: &str, timeout: Duration) -> Result<Vec<String>, Box<dyn Error>> {
    let (urls, inline): (Vec<&str>, Vec<&str>) =
        split_tokens(raw).into_iter().partition(|t| is_url(t));

    let bodies = if urls.is_empty() {
        Vec::new()
    } else {
        let client = build_client(timeout)?;
        try_join_all(urls.iter().map(|url| fetch_list(&client, url))).await?
    };

    let tokens = inline
        .into_iter()
        .chain(bodies.iter().flat_map(|body| split_tokens(body)));
    let list = parse_ip_list(tokens);
    log::info!(
        "Collected {} allowed entries from {} lists",
        list.len(),
        urls.len()
    );
    Ok(list)
}
