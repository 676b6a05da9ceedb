//! DNS policy transformer.

use super::{profile_map_mut, TransformError, Transformer};
use crate::config::DnsStep;
use crate::report::TransformReport;
use serde_json::{json, Value as JsonValue};
use std::sync::LazyLock;
use tracing::debug;

/// Region-local DoH resolvers. Used for proxy-server and direct-target
/// lookups and for private/domestic domains.
pub const DOMESTIC_NAMESERVERS: &[&str] = &[
    "https://223.5.5.5/dns-query",
    "https://doh.pub/dns-query",
];

/// Globally reachable DoH resolvers used for general resolution.
pub const FOREIGN_NAMESERVERS: &[&str] = &[
    "https://208.67.222.222/dns-query",
    "https://77.88.8.8/dns-query",
    "https://1.1.1.1/dns-query",
    "https://8.8.4.4/dns-query",
    "https://9.9.9.9/dns-query",
];

/// Plain resolvers used to bootstrap the DoH endpoints.
pub const DEFAULT_NAMESERVERS: &[&str] = &["223.5.5.5", "1.2.4.8"];

/// Domains that always resolve to real addresses in fake-ip mode.
pub const FAKE_IP_FILTER: &[&str] = &[
    // LAN
    "+.lan",
    "+.local",
    // Windows connectivity checks
    "+.msftconnecttest.com",
    "+.msftncsi.com",
    // QQ quick login
    "localhost.ptlogin2.qq.com",
    "localhost.sec.qq.com",
    // Reverse lookups and time sync
    "+.in-addr.arpa",
    "+.ip6.arpa",
    "time.*.com",
    "time.*.gov",
    "pool.ntp.org",
    // WeCom quick login
    "localhost.work.weixin.qq.com",
];

/// Domain categories routed to the domestic pool.
const DOMESTIC_POLICY_KEY: &str = "geosite:private,cn";

/// Built-in `dns` block written over the profile's own.
pub static DNS_POLICY: LazyLock<JsonValue> = LazyLock::new(|| {
    json!({
        "enable": true,
        "listen": "0.0.0.0:1053",
        "ipv6": true,
        "prefer-h3": true,
        "respect-rules": true,
        "use-system-hosts": false,
        "cache-algorithm": "arc",
        "enhanced-mode": "fake-ip",
        "fake-ip-range": "198.18.0.1/16",
        "fake-ip-filter": FAKE_IP_FILTER,
        "default-nameserver": DEFAULT_NAMESERVERS,
        "nameserver": FOREIGN_NAMESERVERS,
        "proxy-server-nameserver": DOMESTIC_NAMESERVERS,
        "direct-nameserver": DOMESTIC_NAMESERVERS,
        "nameserver-policy": {
            DOMESTIC_POLICY_KEY: DOMESTIC_NAMESERVERS,
        },
    })
});

/// Replaces the profile's `dns` section wholesale.
pub struct DnsTransformer {
    policy: JsonValue,
}

impl DnsTransformer {
    /// Create a DNS transformer from configuration.
    pub fn new(config: &DnsStep) -> Self {
        let policy = config
            .policy
            .clone()
            .unwrap_or_else(|| DNS_POLICY.clone());
        Self { policy }
    }

    /// The block this transformer writes.
    pub fn policy(&self) -> &JsonValue {
        &self.policy
    }
}

impl Default for DnsTransformer {
    fn default() -> Self {
        Self::new(&DnsStep::default())
    }
}

impl Transformer for DnsTransformer {
    fn transform(
        &self,
        profile: &mut JsonValue,
        report: &mut TransformReport,
    ) -> Result<(), TransformError> {
        let map = profile_map_mut(profile)?;
        let previous = map.insert("dns".to_string(), self.policy.clone());

        debug!(had_dns = previous.is_some(), "Replaced dns section");
        report.dns_replaced = true;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "dns"
    }
}
