use async_trait::async_trait;
use tracing::debug;

use super::client::HttpClient;
use super::fetch_bytes;
use crate::error::FetchError;
use crate::parser::parse_snapshot;
use crate::snapshot::{Snapshot, period_key};

/// Where the monthly `project_openrank_detail` documents live.
pub const DEFAULT_BASE_URL: &str =
    "https://oss.x-lab.info/open_digger/github/X-lab2017/open-digger/project_openrank_detail";

/// Anything that can produce the snapshot for a given month.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_month(&self, year: &str, month: &str) -> Result<Snapshot, FetchError>;
}

/// Reads snapshots from the OpenDigger object store.
pub struct OpenRankSource<C> {
    client: C,
    base_url: String,
}

impl<C: HttpClient> OpenRankSource<C> {
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn month_url(&self, year: &str, month: &str) -> String {
        format!(
            "{}/{}.json",
            self.base_url.trim_end_matches('/'),
            period_key(year, month)
        )
    }
}

#[async_trait]
impl<C: HttpClient> SnapshotSource for OpenRankSource<C> {
    #[tracing::instrument(skip(self), fields(period = %period_key(year, month)))]
    async fn fetch_month(&self, year: &str, month: &str) -> Result<Snapshot, FetchError> {
        let url = self.month_url(year, month);
        let bytes = fetch_bytes(&self.client, &url).await?;
        debug!(bytes = bytes.len(), "Snapshot bytes received, parsing");
        parse_snapshot(&bytes, &period_key(year, month))
    }
}
