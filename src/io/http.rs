//! Blocking HTTP transport with a bounded retry for the feed fetch

use crate::{CancelFlag, Error, Result};
use reqwest::blocking::Client;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Build the blocking client shared by the feed fetch and the RPC calls.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!("bzmime/", env!("CARGO_PKG_VERSION")))
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| Error::Transport(format!("could not build HTTP client: {e}")))
}

/// GET `url`, retrying up to `retries` additional attempts.
///
/// Non-success statuses count as transport failures and are retried like
/// connection errors. The last error is surfaced once the budget is spent.
/// The cancel flag is checked before every attempt, so an interrupt surfaces
/// as `Cancelled` instead of waiting out the rest of the budget.
pub fn fetch_with_retry(
    client: &Client,
    url: &str,
    retries: usize,
    cancel: &CancelFlag,
) -> Result<String> {
    let mut attempt = 0;
    loop {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        match fetch_once(client, url) {
            Ok(body) => return Ok(body),
            Err(err) => {
                if attempt == retries {
                    return Err(err);
                }
                attempt += 1;
                log::warn!("{err}; retrying ({attempt}/{retries})");
            }
        }
    }
}

fn fetch_once(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Transport(format!("GET {url} returned {status}")));
    }
    Ok(response.text()?)
}
