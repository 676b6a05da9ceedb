//! Profile transformers.

mod dns;
mod exclude;
mod tun;

pub use dns::{
    DnsTransformer, DEFAULT_NAMESERVERS, DNS_POLICY, DOMESTIC_NAMESERVERS, FAKE_IP_FILTER,
    FOREIGN_NAMESERVERS,
};
pub use exclude::{exclude_proxies, ExcludeTransformer};
pub use tun::TunTransformer;

use crate::report::TransformReport;
use serde_json::{Map, Value as JsonValue};

/// Trait for profile transformers.
pub trait Transformer: Send + Sync {
    /// Apply the transformation to the profile in place.
    fn transform(
        &self,
        profile: &mut JsonValue,
        report: &mut TransformReport,
    ) -> Result<(), TransformError>;

    /// Get the transformer name for debugging.
    fn name(&self) -> &'static str;
}

/// Borrow the profile as a mapping, rejecting anything else.
pub(crate) fn profile_map_mut(
    profile: &mut JsonValue,
) -> Result<&mut Map<String, JsonValue>, TransformError> {
    let kind = value_kind(profile);
    profile
        .as_object_mut()
        .ok_or_else(|| TransformError::InvalidInput(format!("expected a mapping, got {kind}")))
}

/// Short description of a value's type for error messages.
pub(crate) fn value_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a sequence",
        JsonValue::Object(_) => "a mapping",
    }
}

/// Errors that can occur during transformation.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Invalid profile: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_map_mut() {
        let mut profile = json!({"mode": "rule"});
        let map = profile_map_mut(&mut profile).unwrap();
        map.insert("port".to_string(), json!(7890));
        assert_eq!(profile["port"], 7890);
    }

    #[test]
    fn test_profile_map_mut_rejects_non_mapping() {
        for mut value in [json!(null), json!([1, 2]), json!("proxies"), json!(3)] {
            let err = profile_map_mut(&mut value).unwrap_err();
            assert!(matches!(err, TransformError::InvalidInput(_)));
        }
    }

    #[test]
    fn test_error_message() {
        let err = profile_map_mut(&mut json!([])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid profile: expected a mapping, got a sequence");
    }
}
