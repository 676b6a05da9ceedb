//! Ordered transform pipeline.

use crate::config::TransformConfig;
use crate::matcher::MatcherError;
use crate::report::TransformReport;
use crate::transformer::{
    value_kind, DnsTransformer, ExcludeTransformer, TransformError, Transformer, TunTransformer,
};
use serde_json::Value as JsonValue;
use tracing::{debug, info};

/// Compiled set of steps applied to every profile.
pub struct Pipeline {
    steps: Vec<Box<dyn Transformer>>,
}

impl Pipeline {
    /// Build a pipeline from configuration.
    ///
    /// Steps run in a fixed order: dns, tun, exclude. Disabled steps are
    /// left out. Pattern errors surface here, not at transform time.
    pub fn new(config: &TransformConfig) -> Result<Self, PipelineError> {
        let mut steps: Vec<Box<dyn Transformer>> = Vec::new();

        if config.steps.dns.enabled {
            steps.push(Box::new(DnsTransformer::new(&config.steps.dns)));
        }
        if config.steps.tun.enabled {
            steps.push(Box::new(TunTransformer::new(&config.steps.tun)));
        }
        if config.steps.exclude.enabled {
            steps.push(Box::new(ExcludeTransformer::new(&config.steps.exclude)?));
        }

        let pipeline = Self { steps };
        info!(steps = ?pipeline.step_names(), "Transform pipeline compiled");
        Ok(pipeline)
    }

    /// Names of the compiled steps, in order.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Apply every step to the profile in place.
    ///
    /// The profile must be a non-empty mapping; otherwise nothing is
    /// touched and `InvalidInput` is returned.
    pub fn run(&self, profile: &mut JsonValue) -> Result<TransformReport, TransformError> {
        validate_profile(profile)?;

        let mut report = TransformReport::new();
        for step in &self.steps {
            debug!(step = step.name(), "Applying step");
            step.transform(profile, &mut report)?;
            report.record_step(step.name());
        }

        info!(
            steps = report.steps.len(),
            proxies_removed = report.proxies_removed,
            group_refs_removed = report.group_refs_removed,
            udp_flagged = report.udp_flagged,
            malformed_skipped = report.malformed_skipped,
            "Profile transformed"
        );
        Ok(report)
    }

    /// Take ownership of a profile, transform it and hand it back.
    pub fn transform(&self, mut profile: JsonValue) -> Result<JsonValue, TransformError> {
        self.run(&mut profile)?;
        Ok(profile)
    }
}

impl Default for Pipeline {
    /// The full dns + tun + exclude pipeline with built-in settings.
    fn default() -> Self {
        // The built-in exclusion pattern is a plain literal and always compiles.
        Self::new(&TransformConfig::default()).expect("built-in settings compile")
    }
}

/// Reject anything but a non-empty mapping.
fn validate_profile(profile: &JsonValue) -> Result<(), TransformError> {
    match profile {
        JsonValue::Object(map) if map.is_empty() => Err(TransformError::InvalidInput(
            "profile is empty".to_string(),
        )),
        JsonValue::Object(_) => Ok(()),
        other => Err(TransformError::InvalidInput(format!(
            "expected a mapping, got {}",
            value_kind(other)
        ))),
    }
}

/// Errors that can occur while building a pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Exclude step: {0}")]
    Matcher(#[from] MatcherError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExcludeStep, MatchType};
    use serde_json::json;

    #[test]
    fn test_step_order() {
        let pipeline = Pipeline::new(&TransformConfig::default()).unwrap();
        assert_eq!(pipeline.step_names(), vec!["dns", "tun", "exclude"]);
        assert_eq!(Pipeline::default().step_names(), vec!["dns", "tun", "exclude"]);
    }

    #[test]
    fn test_default_matches_default_config() {
        let profile = json!({
            "proxies": [{"name": "premium a"}, {"name": "Premium b"}, {"name": "c"}],
            "proxy-groups": [{"name": "G", "proxies": ["premium a", "Premium b", "c"]}],
            "tun": {"device": "utun3"},
        });
        let from_config = Pipeline::new(&TransformConfig::default())
            .unwrap()
            .transform(profile.clone())
            .unwrap();
        let from_default = Pipeline::default().transform(profile).unwrap();

        assert_eq!(from_default, from_config);
        assert_eq!(
            from_default["proxy-groups"][0]["proxies"],
            json!(["premium a", "c"])
        );
    }

    #[test]
    fn test_disabled_steps_are_skipped() {
        let config = TransformConfig::exclusion_only(ExcludeStep::default());
        let pipeline = Pipeline::new(&config).unwrap();
        assert_eq!(pipeline.step_names(), vec!["exclude"]);

        let mut profile = json!({"proxies": [{"name": "Premium"}], "dns": {"enable": false}});
        let report = pipeline.run(&mut profile).unwrap();
        assert_eq!(profile, json!({"proxies": [], "dns": {"enable": false}}));
        assert_eq!(report.steps, vec!["exclude"]);
        assert!(!report.dns_replaced);
    }

    #[test]
    fn test_invalid_pattern_fails_build() {
        let mut config = TransformConfig::default();
        config.steps.exclude.pattern = "(".to_string();
        config.steps.exclude.match_type = MatchType::Regex;
        assert!(matches!(
            Pipeline::new(&config),
            Err(PipelineError::Matcher(MatcherError::InvalidRegex(_)))
        ));

        // A disabled step is never compiled.
        config.steps.exclude.enabled = false;
        assert!(Pipeline::new(&config).is_ok());
    }

    #[test]
    fn test_rejects_empty_mapping() {
        let pipeline = Pipeline::default();
        let mut profile = json!({});
        let err = pipeline.run(&mut profile).unwrap_err();
        assert!(matches!(err, TransformError::InvalidInput(_)));
        assert_eq!(profile, json!({}));
    }

    #[test]
    fn test_rejects_non_mapping() {
        let pipeline = Pipeline::default();
        for value in [json!(null), json!("x"), json!([{"name": "Premium"}])] {
            let before = value.clone();
            let mut profile = value;
            assert!(pipeline.run(&mut profile).is_err());
            assert_eq!(profile, before);
        }
    }

    #[test]
    fn test_full_run() {
        let profile = json!({
            "mixed-port": 7890,
            "proxies": [{"name": "A"}, {"name": "Premium-1"}],
            "proxy-groups": [{"name": "Proxy", "proxies": ["A", "Premium-1"]}],
        });
        let out = Pipeline::default().transform(profile).unwrap();

        assert_eq!(out["mixed-port"], 7890);
        assert_eq!(out["dns"]["listen"], "0.0.0.0:1053");
        assert_eq!(out["tun"]["stack"], "mixed");
        assert_eq!(out["proxies"], json!([{"name": "A", "udp": true}]));
        assert_eq!(out["proxy-groups"][0]["proxies"], json!(["A"]));
    }
}
