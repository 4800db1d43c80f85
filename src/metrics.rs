use anyhow::{Context, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::path::{Path, PathBuf};

use crate::export::write_atomic;

/// Prometheus recorder whose rendering goes to a node-exporter textfile
/// instead of a scrape endpoint (the process exits after one cycle).
pub struct Metrics {
    pub handle: PrometheusHandle,
    textfile: PathBuf,
}

impl Metrics {
    /// Install the global recorder. Fails if another recorder is installed.
    pub fn init(textfile: impl Into<PathBuf>) -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;
        Ok(Self {
            handle,
            textfile: textfile.into(),
        })
    }

    pub fn textfile(&self) -> &Path {
        &self.textfile
    }

    /// Render the exposition format and replace the textfile with it.
    pub fn flush(&self) -> Result<()> {
        let body = self.handle.render();
        write_atomic(&self.textfile, body.as_bytes())?;
        tracing::debug!(path = %self.textfile.display(), "metrics textfile written");
        Ok(())
    }
}
