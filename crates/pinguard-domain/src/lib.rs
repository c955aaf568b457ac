//! Pure policy evaluation (no IO).
//!
//! Input: an already-resolved dependency tree and a dynamic-version policy.
//! Output: violations with the ancestor path that reached each one.

#![forbid(unsafe_code)]

pub mod classify;
pub mod error;
pub mod fingerprint;
pub mod matcher;
pub mod model;
pub mod policy;
pub mod report;
pub mod resolve;
pub mod version;
pub mod walker;

mod engine;

pub use classify::{Classification, DynamicKind, classify, is_banned};
pub use engine::{Auditor, audit_tree, run_audit};
pub use error::{AuditError, ConfigError};
pub use model::{Coordinate, Dependency, DependencyNode};
pub use policy::{DynamicVersionPolicy, EffectiveConfig, FailOn, FileRulePolicy, RulePolicy};
pub use report::{AuditReport, Violation};
pub use resolve::{CollectRequest, DependencyResolver, DependencySelector, ResolutionError};

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;
