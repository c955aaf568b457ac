use crate::model::Coordinate;
use crate::policy::DynamicVersionPolicy;
use crate::report::Violation;
use sha2::{Digest, Sha256};

fn sha256_hex(canonical: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compute a stable SHA-256 fingerprint for a dynamic-version finding.
///
/// Identity fields:
/// - check_id
/// - code
/// - dependency (coordinate, scope, optional marker)
/// - ancestor path
pub fn fingerprint_for_violation(check_id: &str, code: &str, violation: &Violation) -> String {
    let dependency = violation.dependency().to_string();
    let path = violation.dump_path().unwrap_or_default();
    sha256_hex(&[check_id, code, dependency.as_str(), path.as_str()].join("|"))
}

/// Fingerprint for a file-rule finding. `file` is empty for a null entry.
pub fn fingerprint_for_file(check_id: &str, code: &str, file: &str) -> String {
    sha256_hex(&[check_id, code, file].join("|"))
}

/// Identity of an audit for external build caches: the policy plus the project root.
///
/// List-valued options are sorted so that reordering them keeps the id.
pub fn cache_id(policy: &DynamicVersionPolicy, root: Option<&Coordinate>) -> String {
    let mut scopes = policy.excluded_scopes.clone();
    scopes.sort();
    scopes.dedup();
    let mut ignores = policy.ignores.clone();
    ignores.sort();
    ignores.dedup();

    let flag = |b: bool| if b { "1" } else { "0" };
    let canonical = format!(
        "snapshots={};latest={};release={};ranges={};identical={};optionals={};scopes={};ignores={};root={}",
        flag(policy.allow_snapshots),
        flag(policy.allow_latest),
        flag(policy.allow_release),
        flag(policy.allow_ranges),
        flag(policy.allow_ranges_with_identical_bounds),
        flag(policy.exclude_optionals),
        scopes.join(","),
        ignores.join(","),
        root.map(ToString::to_string).unwrap_or_default(),
    );
    sha256_hex(&canonical)
}

/// Cache identity of a file rule: its file list, in order.
pub fn files_cache_id(files: &[String]) -> String {
    sha256_hex(&files.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_id_ignores_list_order() {
        let a = DynamicVersionPolicy {
            excluded_scopes: vec!["test".into(), "provided".into()],
            ignores: vec!["org.a".into(), "com.b".into()],
            ..Default::default()
        };
        let b = DynamicVersionPolicy {
            excluded_scopes: vec!["provided".into(), "test".into()],
            ignores: vec!["com.b".into(), "org.a".into()],
            ..Default::default()
        };
        assert_eq!(cache_id(&a, None), cache_id(&b, None));
    }

    #[test]
    fn cache_id_changes_with_toggles_and_root() {
        let base = DynamicVersionPolicy::default();
        let snapshots = DynamicVersionPolicy {
            allow_snapshots: true,
            ..Default::default()
        };
        assert_ne!(cache_id(&base, None), cache_id(&snapshots, None));

        let root = Coordinate::new("g", "a", "1");
        assert_ne!(cache_id(&base, None), cache_id(&base, Some(&root)));
        assert_eq!(cache_id(&base, Some(&root)).len(), 64);
    }

    #[test]
    fn files_cache_id_is_stable() {
        let files = vec!["README.md".to_string(), "LICENSE".to_string()];
        assert_eq!(files_cache_id(&files), files_cache_id(&files.clone()));
        assert_ne!(files_cache_id(&files), files_cache_id(&files[..1]));
    }
}
