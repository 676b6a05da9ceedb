//! Summary of what a transform run changed.

/// Counters collected while the pipeline runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformReport {
    /// Names of the steps that ran, in order
    pub steps: Vec<&'static str>,
    /// `dns` was replaced
    pub dns_replaced: bool,
    /// `tun` was created or updated
    pub tun_updated: bool,
    /// `tun` did not exist and was created
    pub tun_created: bool,
    /// Proxies dropped from `proxies`
    pub proxies_removed: usize,
    /// Names dropped from `proxy-groups[*].proxies`
    pub group_refs_removed: usize,
    /// Retained proxies given `udp: true`
    pub udp_flagged: usize,
    /// Proxy entries without a usable name, left in place
    pub malformed_skipped: usize,
}

impl TransformReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a step ran.
    pub fn record_step(&mut self, name: &'static str) {
        self.steps.push(name);
    }

    /// Whether the run changed anything in the profile.
    pub fn changed(&self) -> bool {
        self.dns_replaced
            || self.tun_updated
            || self.proxies_removed > 0
            || self.group_refs_removed > 0
            || self.udp_flagged > 0
    }
}
