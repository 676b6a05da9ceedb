//! Proxy profile transformer.
//!
//! Rewrites a parsed proxy profile (the YAML document a proxy client
//! loads) in three optional steps:
//!
//! - Replace the `dns` section with a fixed fake-ip / DoH policy
//! - Ensure a `tun` section with a mixed stack and endpoint-independent NAT
//! - Drop proxies whose name matches a pattern, prune the references to
//!   them from `proxy-groups`, and optionally set `udp: true` on the rest
//!
//! ## Configuration Example
//!
//! ```yaml
//! steps:
//!   dns: { enabled: true }
//!   tun: { enabled: true, stack: mixed }
//!   exclude:
//!     pattern: "Premium"
//!     type: case_insensitive
//!     udp: named
//! ```

pub mod config;
pub mod matcher;
pub mod pipeline;
pub mod profile;
pub mod report;
pub mod transformer;

pub use config::TransformConfig;
pub use pipeline::{Pipeline, PipelineError};
pub use profile::{DocumentFormat, ProfileError, ProfileTransformer};
pub use report::TransformReport;
pub use transformer::TransformError;

/// Apply the built-in dns, tun and `Premium` exclusion steps to a profile.
pub fn transform(profile: serde_json::Value) -> Result<serde_json::Value, TransformError> {
    Pipeline::default().transform(profile)
}
