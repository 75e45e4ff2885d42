//! HTTP GET job
//!
//! Issues a `GET` per invocation through one shared client and reports the
//! decoded response body size as a caller metric.

use async_trait::async_trait;
use reqwest::Client;

use crate::bench::job::{Job, JobResult};
use crate::models::MetricSlot;
use crate::{Result, StressError};

pub const METRIC_RESPONSE_SIZE: &str = "response_size(byte)";

/// Job that fetches `path` from `addr`
#[derive(Debug, Clone)]
pub struct HttpGet {
    client: Client,
    url: String,
}

impl HttpGet {
    /// Build a job for `addr`, which may omit the `http://` scheme
    pub fn new(addr: impl AsRef<str>, path: impl AsRef<str>) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            url: target_url(addr.as_ref(), path.as_ref()),
        })
    }

    /// Caller metric names this job reports, in order
    pub fn metric_names() -> Vec<String> {
        vec![METRIC_RESPONSE_SIZE.to_string()]
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn target_url(addr: &str, path: &str) -> String {
    let base = if addr.starts_with("http://") || addr.starts_with("https://") {
        addr.trim_end_matches('/').to_string()
    } else {
        format!("http://{}", addr.trim_end_matches('/'))
    };
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

#[async_trait]
impl Job for HttpGet {
    async fn run(&self, _index: usize, slot: &mut MetricSlot) -> JobResult {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        slot.set_values(&[body.len() as f64])?;

        if !status.is_success() {
            return Err(StressError::HttpError(format!("HTTP status {}", status)).into());
        }
        Ok(())
    }
}
