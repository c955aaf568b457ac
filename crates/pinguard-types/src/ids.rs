//! Stable identifiers for rules and finding codes.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Checks
pub const CHECK_DEPS_BAN_DYNAMIC_VERSIONS: &str = "deps.ban_dynamic_versions";
pub const CHECK_FILES_REQUIRE_EXIST: &str = "files.require_exist";
pub const CHECK_FILES_REQUIRE_ABSENT: &str = "files.require_absent";

// Codes: deps.ban_dynamic_versions
pub const CODE_LATEST_VERSION: &str = "latest_version";
pub const CODE_RELEASE_VERSION: &str = "release_version";
pub const CODE_SNAPSHOT_VERSION: &str = "snapshot_version";
pub const CODE_VERSION_RANGE: &str = "version_range";

// Codes: files.require_exist / files.require_absent
pub const CODE_MISSING_FILE: &str = "missing_file";
pub const CODE_UNEXPECTED_FILE: &str = "unexpected_file";
pub const CODE_NULL_FILE: &str = "null_file";

// Tool-level
pub const CHECK_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
