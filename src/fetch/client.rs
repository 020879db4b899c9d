use async_trait::async_trait;
use reqwest::{Request, Response};

/// Transport used for every outbound request, so callers can wrap or replace
/// the underlying `reqwest::Client`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
