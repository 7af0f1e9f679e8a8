use crate::generator::profile::GeneratorConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use squatcore::prelude::{DetectorConfig, Dimensionality};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub detector: DetectorConfig,
    pub generator: GeneratorConfig,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .detector
            .validate()
            .with_context(|| format!("validating detector config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Applies command-line overrides on top of file or default settings.
    pub fn with_overrides(
        mut self,
        max_rep_duration_ms: Option<u64>,
        spatial: bool,
    ) -> anyhow::Result<Self> {
        if let Some(max_rep_duration_ms) = max_rep_duration_ms {
            self.detector.max_rep_duration_ms = max_rep_duration_ms;
        }
        if spatial {
            self.detector.dimensionality = Dimensionality::Spatial;
        }
        self.detector
            .validate()
            .context("validating detector overrides")?;
        Ok(self)
    }
}
