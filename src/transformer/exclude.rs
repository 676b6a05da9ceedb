//! Name-based proxy exclusion.

use super::{profile_map_mut, TransformError, Transformer};
use crate::config::{ExcludeStep, UdpPolicy};
use crate::matcher::{Matcher, MatcherError, NameMatcherImpl};
use crate::report::TransformReport;
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, trace, warn};

const PROXIES: &str = "proxies";
const PROXY_GROUPS: &str = "proxy-groups";

/// Drops proxies whose name matches a pattern, along with the group
/// references to them.
pub struct ExcludeTransformer {
    matcher: NameMatcherImpl,
    udp: UdpPolicy,
}

impl ExcludeTransformer {
    /// Create an exclusion transformer from configuration.
    pub fn new(config: &ExcludeStep) -> Result<Self, MatcherError> {
        Ok(Self {
            matcher: NameMatcherImpl::from_step(config)?,
            udp: config.udp,
        })
    }

    /// Create an exclusion transformer from an already compiled matcher.
    pub fn with_matcher(matcher: NameMatcherImpl, udp: UdpPolicy) -> Self {
        Self { matcher, udp }
    }
}

impl Transformer for ExcludeTransformer {
    fn transform(
        &self,
        profile: &mut JsonValue,
        report: &mut TransformReport,
    ) -> Result<(), TransformError> {
        exclude_proxies(profile, &self.matcher, self.udp, report).map(|_| ())
    }

    fn name(&self) -> &'static str {
        "exclude"
    }
}

/// Remove matching proxies and group references, then apply the UDP
/// policy to the proxies that remain.
///
/// Entries without a string `name` are never removed. Group name lists
/// that end up empty are kept. Returns the profile for chaining.
pub fn exclude_proxies<'a>(
    profile: &'a mut JsonValue,
    matcher: &dyn Matcher,
    udp: UdpPolicy,
    report: &mut TransformReport,
) -> Result<&'a mut JsonValue, TransformError> {
    let map = profile_map_mut(profile)?;

    if let Some(JsonValue::Array(proxies)) = map.get_mut(PROXIES) {
        proxies.retain(|proxy| match proxy_name(proxy) {
            Some(name) if matcher.matches(name) => {
                debug!(proxy = %name, matcher = matcher.name(), "Removing proxy");
                report.proxies_removed += 1;
                false
            }
            Some(_) => true,
            None => {
                trace!(entry = %proxy, "Keeping proxy without a name");
                report.malformed_skipped += 1;
                true
            }
        });

        for proxy in proxies.iter_mut() {
            if let JsonValue::Object(fields) = proxy {
                if udp_applies(udp, fields) {
                    fields.insert("udp".to_string(), JsonValue::Bool(true));
                    report.udp_flagged += 1;
                }
            }
        }
    }

    if let Some(JsonValue::Array(groups)) = map.get_mut(PROXY_GROUPS) {
        for group in groups.iter_mut() {
            let Some(JsonValue::Array(names)) = group.get_mut(PROXIES) else {
                continue;
            };
            let before = names.len();
            names.retain(|name| !name.as_str().is_some_and(|name| matcher.matches(name)));
            let removed = before - names.len();
            if removed == 0 {
                continue;
            }

            report.group_refs_removed += removed;
            let group_name = group.get("name").and_then(JsonValue::as_str).unwrap_or("");
            if group.get(PROXIES).and_then(JsonValue::as_array).is_some_and(Vec::is_empty) {
                warn!(group = %group_name, "Proxy group has no proxies left");
            } else {
                debug!(group = %group_name, removed, "Pruned proxy group");
            }
        }
    }

    Ok(profile)
}

/// The proxy's display name, if it is a mapping with a non-empty string `name`.
fn proxy_name(proxy: &JsonValue) -> Option<&str> {
    proxy
        .get("name")
        .and_then(JsonValue::as_str)
        .filter(|name| !name.is_empty())
}

fn udp_applies(policy: UdpPolicy, fields: &Map<String, JsonValue>) -> bool {
    match policy {
        UdpPolicy::Off => false,
        UdpPolicy::Named => fields
            .get("name")
            .and_then(JsonValue::as_str)
            .is_some_and(|name| !name.is_empty()),
        UdpPolicy::All => true,
    }
}
