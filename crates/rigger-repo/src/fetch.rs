//! HTTP download of remote charts

use std::time::Duration;
use url::Url;

use crate::error::{RepoError, Result};

pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads chart archives
#[derive(Debug, Clone)]
pub struct ChartFetcher {
    client: reqwest::Client,
}

impl ChartFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("rigger/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RepoError::NetworkError {
                message: e.to_string(),
            })?;

        Ok(Self { client })
    }

    /// Fetch the body of `url`, failing on any non-success status
    pub async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        tracing::debug!(url = %url, "downloading chart");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RepoError::HttpError {
                status: status.as_u16(),
                message: format!("GET {} failed", url),
            });
        }

        let bytes = response.bytes().await.map_err(|e| RepoError::NetworkError {
            message: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }
}
