//! Virtual-interface (tun) transformer.

use super::{profile_map_mut, value_kind, TransformError, Transformer};
use crate::config::TunStep;
use crate::report::TransformReport;
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

/// Ensures a `tun` mapping exists and sets its stack and NAT fields.
pub struct TunTransformer {
    stack: String,
    endpoint_independent_nat: bool,
}

impl TunTransformer {
    /// Create a tun transformer from configuration.
    pub fn new(config: &TunStep) -> Self {
        Self {
            stack: config.stack.clone(),
            endpoint_independent_nat: config.endpoint_independent_nat,
        }
    }
}

impl Default for TunTransformer {
    fn default() -> Self {
        Self::new(&TunStep::default())
    }
}

impl Transformer for TunTransformer {
    fn transform(
        &self,
        profile: &mut JsonValue,
        report: &mut TransformReport,
    ) -> Result<(), TransformError> {
        let map = profile_map_mut(profile)?;
        let tun = map.entry("tun").or_insert(JsonValue::Null);

        // A null or scalar `tun` is treated as absent.
        if !tun.is_object() {
            if !tun.is_null() {
                debug!(found = value_kind(tun), "Replacing non-mapping tun section");
            }
            *tun = JsonValue::Object(Map::new());
            report.tun_created = true;
        }
        if let JsonValue::Object(tun) = tun {
            tun.insert("stack".to_string(), JsonValue::String(self.stack.clone()));
            tun.insert(
                "endpoint-independent-nat".to_string(),
                JsonValue::Bool(self.endpoint_independent_nat),
            );
        }

        debug!(stack = %self.stack, "Updated tun section");
        report.tun_updated = true;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "tun"
    }
}
