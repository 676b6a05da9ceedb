//! Profile transformer host facade.
//!
//! Wraps a [`Pipeline`] with loading of settings and reading/writing of
//! profile documents as YAML or JSON text.

use crate::config::TransformConfig;
use crate::pipeline::{Pipeline, PipelineError};
use crate::report::TransformReport;
use crate::transformer::TransformError;
use serde_json::Value as JsonValue;
use std::path::Path;
use tracing::{debug, info};

/// Serialization format of a profile document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Guess the format from a file extension. Anything other than
    /// `.yaml`/`.yml` is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        if path
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml")
        {
            Self::Yaml
        } else {
            Self::Json
        }
    }

    /// Parse a document in this format.
    pub fn parse(self, text: &str) -> Result<JsonValue, ProfileError> {
        // Blank input is an absent profile, rejected later by the pipeline.
        if text.trim().is_empty() {
            return Ok(JsonValue::Null);
        }
        Ok(match self {
            Self::Yaml => {
                // `<<` merge keys must be resolved before steps see the mapping.
                let mut value: serde_yaml::Value = serde_yaml::from_str(text)?;
                value.apply_merge()?;
                serde_json::to_value(value)?
            }
            Self::Json => serde_json::from_str(text)?,
        })
    }

    /// Render a document in this format.
    pub fn render(self, value: &JsonValue) -> Result<String, ProfileError> {
        Ok(match self {
            Self::Yaml => serde_yaml::to_string(value)?,
            Self::Json => {
                let mut out = serde_json::to_string_pretty(value)?;
                out.push('\n');
                out
            }
        })
    }
}

/// Applies the configured pipeline to proxy profiles.
pub struct ProfileTransformer {
    /// Configuration
    config: TransformConfig,
    /// Compiled steps
    pipeline: Pipeline,
}

impl ProfileTransformer {
    /// Create a new profile transformer from configuration.
    pub fn new(config: TransformConfig) -> Result<Self, PipelineError> {
        let pipeline = Pipeline::new(&config)?;

        info!(
            version = %config.version,
            steps = pipeline.step_names().len(),
            "Profile transformer initialized"
        );

        Ok(Self { config, pipeline })
    }

    /// Create from a YAML configuration string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ProfileError> {
        let config: TransformConfig = serde_yaml::from_str(yaml)?;
        Self::new(config).map_err(ProfileError::from)
    }

    /// Create from a JSON configuration string.
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let config: TransformConfig = serde_json::from_str(json)?;
        Self::new(config).map_err(ProfileError::from)
    }

    /// Create from a settings file, YAML or JSON by extension.
    pub fn from_file(path: &Path) -> Result<Self, ProfileError> {
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "Loaded transform settings");
        match DocumentFormat::from_path(path) {
            DocumentFormat::Yaml => Self::from_yaml(&content),
            DocumentFormat::Json => Self::from_json(&content),
        }
    }

    /// The configuration this transformer was built from.
    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// The compiled pipeline.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Transform a parsed profile in place.
    pub fn apply(&self, profile: &mut JsonValue) -> Result<TransformReport, TransformError> {
        self.pipeline.run(profile)
    }

    /// Transform a parsed profile and return it.
    pub fn transform(&self, profile: JsonValue) -> Result<JsonValue, TransformError> {
        self.pipeline.transform(profile)
    }

    /// Parse, transform and re-render a profile document.
    pub fn transform_document(
        &self,
        text: &str,
        input: DocumentFormat,
        output: DocumentFormat,
    ) -> Result<(String, TransformReport), ProfileError> {
        let mut profile = input.parse(text)?;
        let report = self.apply(&mut profile)?;
        let rendered = output.render(&profile)?;
        Ok((rendered, report))
    }
}

impl Default for ProfileTransformer {
    fn default() -> Self {
        Self {
            config: TransformConfig::default(),
            pipeline: Pipeline::default(),
        }
    }
}

/// Profile transformer errors.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),
}
