// File-backed monitoring source
use crate::application::monitoring_source::MonitoringSource;
use crate::domain::monitoring::MonitoringIndex;
use crate::infrastructure::readings::MonitoringDocument;
use anyhow::Context;
use async_trait::async_trait;
use std::path::PathBuf;

/// Loads the monitoring document from a JSON file on disk. Used for
/// deployments where a collector job drops the dataset next to the
/// service.
#[derive(Debug, Clone)]
pub struct FileMonitoringSource {
    path: PathBuf,
}

impl FileMonitoringSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MonitoringSource for FileMonitoringSource {
    async fn load_index(&self) -> anyhow::Result<MonitoringIndex> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read monitoring file {}", self.path.display()))?;
        let document: MonitoringDocument = serde_json::from_str(&text)
            .with_context(|| format!("invalid monitoring document {}", self.path.display()))?;
        document.into_index()
    }
}
