//! Configuration types for the profile transformer.

use serde::{Deserialize, Serialize};

/// Main configuration for the profile transformer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Configuration version
    pub version: String,
    /// Per-step settings (applied in the order dns, tun, exclude)
    pub steps: Steps,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            steps: Steps::default(),
        }
    }
}

impl TransformConfig {
    /// Settings for the exclusion-only variant: DNS and tun are left alone.
    pub fn exclusion_only(exclude: ExcludeStep) -> Self {
        Self {
            version: "1".to_string(),
            steps: Steps {
                dns: DnsStep {
                    enabled: false,
                    policy: None,
                },
                tun: TunStep {
                    enabled: false,
                    ..TunStep::default()
                },
                exclude,
            },
        }
    }
}

/// Step settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Steps {
    /// DNS policy replacement
    pub dns: DnsStep,
    /// Virtual-interface settings
    pub tun: TunStep,
    /// Name-based proxy exclusion
    pub exclude: ExcludeStep,
}

/// DNS policy step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsStep {
    /// Whether the `dns` section is replaced
    pub enabled: bool,
    /// Replacement block. `None` selects the built-in policy.
    pub policy: Option<serde_json::Value>,
}

impl Default for DnsStep {
    fn default() -> Self {
        Self {
            enabled: true,
            policy: None,
        }
    }
}

/// Virtual-interface step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TunStep {
    /// Whether the `tun` section is touched
    pub enabled: bool,
    /// Protocol stack selector written to `tun.stack`
    pub stack: String,
    /// Value written to `tun.endpoint-independent-nat`
    pub endpoint_independent_nat: bool,
}

impl Default for TunStep {
    fn default() -> Self {
        Self {
            enabled: true,
            stack: "mixed".to_string(),
            endpoint_independent_nat: true,
        }
    }
}

/// Proxy exclusion step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcludeStep {
    /// Whether proxies are filtered
    pub enabled: bool,
    /// Pattern tested against proxy names
    pub pattern: String,
    /// How `pattern` is interpreted
    #[serde(rename = "type")]
    pub match_type: MatchType,
    /// Which retained proxies get `udp: true`
    pub udp: UdpPolicy,
}

impl Default for ExcludeStep {
    fn default() -> Self {
        Self {
            enabled: true,
            pattern: "Premium".to_string(),
            match_type: MatchType::default(),
            udp: UdpPolicy::default(),
        }
    }
}

/// Name matching policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Case-sensitive substring
    #[default]
    Substring,
    /// Substring ignoring case
    CaseInsensitive,
    /// Unanchored regular expression search
    Regex,
    /// Glob pattern (*, ?) over the whole name
    Glob,
}

/// UDP flagging policy for retained proxies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UdpPolicy {
    /// Leave `udp` untouched
    Off,
    /// Flag mappings that carry a non-empty string `name`
    #[default]
    Named,
    /// Flag every mapping entry
    All,
}
