//! HTTP access to the openrank feed.

mod basic;
mod client;
mod openrank;

pub use basic::BasicClient;
pub use client::HttpClient;
pub use openrank::{DEFAULT_BASE_URL, OpenRankSource, SnapshotSource};

use crate::error::FetchError;

/// Issues a single GET and returns the body of a successful response.
///
/// Non-success statuses become [`FetchError::Http`]; there is no retry.
pub async fn fetch_bytes<C: HttpClient + ?Sized>(
    client: &C,
    url: &str,
) -> Result<Vec<u8>, FetchError> {
    let parsed: reqwest::Url = url.parse().map_err(|_| FetchError::InvalidUrl {
        url: url.to_string(),
    })?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Http { status });
    }

    Ok(resp.bytes().await?.to_vec())
}
