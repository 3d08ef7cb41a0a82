// HTTP monitoring source
use crate::application::monitoring_source::MonitoringSource;
use crate::domain::monitoring::MonitoringIndex;
use crate::infrastructure::readings::MonitoringDocument;
use anyhow::Context;
use async_trait::async_trait;

/// Fetches the monitoring document from an upstream HTTP endpoint,
/// for deployments where the collector exposes readings directly.
#[derive(Debug, Clone)]
pub struct HttpMonitoringSource {
    url: String,
    client: reqwest::Client,
}

impl HttpMonitoringSource {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MonitoringSource for HttpMonitoringSource {
    async fn load_index(&self) -> anyhow::Result<MonitoringIndex> {
        tracing::debug!(url = %self.url, "fetching monitoring document");
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("failed to request monitoring data")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("monitoring source responded with {}: {}", status, body);
        }

        let document = response
            .json::<MonitoringDocument>()
            .await
            .context("failed to parse monitoring document")?;
        document.into_index()
    }
}
