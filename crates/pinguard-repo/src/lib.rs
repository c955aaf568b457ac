//! Repository adapters: load a resolved dependency tree and check files on disk.
//!
//! This crate is allowed to do filesystem IO. It never resolves dependencies itself;
//! the tree is produced by the build tool and handed over as a JSON document.

#![forbid(unsafe_code)]

mod files;
mod tree;

pub use files::{
    FileChecker, FileFailure, FileRuleKind, FileRuleOutcome, probe_filesystem_case_sensitive,
};
pub use tree::{TreeFileResolver, parse_tree_json};

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    /// Parse arbitrary text as a dependency tree document.
    ///
    /// Returns `Ok(())` when the text is a valid tree, `Err(...)` otherwise.
    /// **Never panics** on any input.
    pub fn parse_tree(text: &str) -> anyhow::Result<()> {
        let _ = super::parse_tree_json(text)?;
        Ok(())
    }
}
