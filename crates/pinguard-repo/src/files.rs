use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use pinguard_domain::FileRulePolicy;
use pinguard_types::ids;
use std::fmt;
use std::io;

/// Which way a file list is checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileRuleKind {
    /// Every listed file must exist.
    RequireExist,
    /// No listed file may exist.
    RequireAbsent,
}

impl FileRuleKind {
    pub fn check_id(self) -> &'static str {
        match self {
            FileRuleKind::RequireExist => ids::CHECK_FILES_REQUIRE_EXIST,
            FileRuleKind::RequireAbsent => ids::CHECK_FILES_REQUIRE_ABSENT,
        }
    }

    /// Code of a finding for a real path that failed the check.
    pub fn path_code(self) -> &'static str {
        match self {
            FileRuleKind::RequireExist => ids::CODE_MISSING_FILE,
            FileRuleKind::RequireAbsent => ids::CODE_UNEXPECTED_FILE,
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            FileRuleKind::RequireExist => "Some required files are missing:",
            FileRuleKind::RequireAbsent => "Some files should not exist:",
        }
    }
}

/// One entry that failed its rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileFailure {
    /// An empty entry while nulls are not allowed.
    Null,
    Path {
        /// The entry as written in the config.
        entry: String,
        absolute: Utf8PathBuf,
    },
}

impl FileFailure {
    pub fn code(&self, kind: FileRuleKind) -> &'static str {
        match self {
            FileFailure::Null => ids::CODE_NULL_FILE,
            FileFailure::Path { .. } => kind.path_code(),
        }
    }

    pub fn entry(&self) -> &str {
        match self {
            FileFailure::Null => "",
            FileFailure::Path { entry, .. } => entry,
        }
    }
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFailure::Null => f.write_str("(an empty filename was given and allowNulls is false)"),
            FileFailure::Path { absolute, .. } => write!(f, "{absolute}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRuleOutcome {
    pub kind: FileRuleKind,
    /// Entries looked at, nulls included.
    pub checked: u32,
    pub failures: Vec<FileFailure>,
    pub passed: bool,
}

impl FileRuleOutcome {
    /// Failure text: optional custom line, the rule header, one line per failure.
    pub fn failure_message(&self, custom: Option<&str>) -> Option<String> {
        if self.passed {
            return None;
        }
        let mut lines: Vec<String> = Vec::with_capacity(self.failures.len() + 2);
        if let Some(custom) = custom {
            lines.push(custom.to_string());
        }
        lines.push(self.kind.header().to_string());
        lines.extend(self.failures.iter().map(ToString::to_string));
        Some(lines.join("\n"))
    }
}

/// Probe whether the temp directory's filesystem distinguishes name case.
///
/// Creates a lower-case temporary file and looks for its upper-cased twin.
/// Any error assumes a case-sensitive filesystem.
pub fn probe_filesystem_case_sensitive() -> bool {
    let probe = match tempfile::Builder::new()
        .prefix("pinguard_probe")
        .tempfile()
    {
        Ok(probe) => probe,
        Err(err) => {
            tracing::warn!("Failed to determine filesystem case sensitivity: {err}");
            return true;
        }
    };
    let path = probe.path();
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        tracing::warn!("Failed to determine filesystem case sensitivity");
        return true;
    };
    !path.with_file_name(name.to_uppercase()).exists()
}

/// Checks file lists relative to a repo root.
#[derive(Clone, Debug)]
pub struct FileChecker {
    root: Utf8PathBuf,
    filesystem_case_sensitive: bool,
}

impl FileChecker {
    /// `root` is made absolute; the filesystem is probed once.
    pub fn new(root: &Utf8Path) -> anyhow::Result<Self> {
        let sensitive = probe_filesystem_case_sensitive();
        tracing::debug!(case_sensitive = sensitive, "Probed filesystem case sensitivity");
        Self::with_case_sensitivity(root, sensitive)
    }

    pub fn with_case_sensitivity(
        root: &Utf8Path,
        filesystem_case_sensitive: bool,
    ) -> anyhow::Result<Self> {
        let absolute = std::path::absolute(root.as_std_path())
            .with_context(|| format!("resolve absolute path of {root}"))?;
        let root = Utf8PathBuf::from_path_buf(absolute)
            .map_err(|p| anyhow::anyhow!("non UTF-8 path: {}", p.display()))?;
        Ok(Self {
            root,
            filesystem_case_sensitive,
        })
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn check(
        &self,
        kind: FileRuleKind,
        policy: &FileRulePolicy,
    ) -> anyhow::Result<FileRuleOutcome> {
        policy
            .validate()
            .with_context(|| format!("invalid configuration for {}", kind.check_id()))?;

        let mut failures = Vec::new();
        for entry in &policy.files {
            if entry.is_empty() {
                // A null entry passes when nulls are allowed.
                if !policy.allow_nulls {
                    failures.push(FileFailure::Null);
                }
                continue;
            }

            let absolute = self.root.join(entry);
            if !self.check_file(kind, &absolute, policy.case_sensitive) {
                failures.push(FileFailure::Path {
                    entry: entry.clone(),
                    absolute,
                });
            }
        }

        let total = policy.files.len();
        let passed = if policy.satisfy_any {
            total > failures.len()
        } else {
            failures.is_empty()
        };

        Ok(FileRuleOutcome {
            kind,
            checked: total as u32,
            failures,
            passed,
        })
    }

    fn check_file(&self, kind: FileRuleKind, path: &Utf8Path, case_sensitive: bool) -> bool {
        let exists = if self.filesystem_case_sensitive {
            on_case_sensitive_fs(path, case_sensitive)
        } else {
            on_case_insensitive_fs(path, case_sensitive)
        };
        match exists {
            Ok(exists) => match kind {
                FileRuleKind::RequireExist => exists,
                FileRuleKind::RequireAbsent => !exists,
            },
            Err(err) => {
                tracing::warn!("Failed to fully check for file '{path}' due to exception '{err}'");
                false
            }
        }
    }
}

/// Case-insensitive checks here can only compare the final name segment.
fn on_case_sensitive_fs(path: &Utf8Path, case_sensitive: bool) -> io::Result<bool> {
    if case_sensitive {
        return Ok(path.exists());
    }

    tracing::warn!(
        "Case-insensitive checks on a case-sensitive filesystem are restricted to the name only"
    );
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return Ok(false);
    };
    if !parent.exists() {
        tracing::warn!("Cannot find parent folder for '{path}', path casing?");
        return Ok(false);
    }
    let wanted = name.to_lowercase();
    Ok(list_names(parent)?
        .iter()
        .any(|n| n.to_lowercase() == wanted))
}

fn on_case_insensitive_fs(path: &Utf8Path, case_sensitive: bool) -> io::Result<bool> {
    if !case_sensitive {
        return Ok(path.exists());
    }

    if path.is_symlink() {
        // Canonicalizing would follow the link, so only the name can be compared.
        tracing::warn!(
            "Case-sensitive checks on a case-insensitive filesystem of a symbolic links are restricted to the name only"
        );
        let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
            return Ok(false);
        };
        return Ok(list_names(parent)?.iter().any(|n| n == name));
    }

    match path.canonicalize_utf8() {
        Ok(canonical) => Ok(canonical.as_path() == path),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

fn list_names(dir: &Utf8Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in dir.read_dir_utf8()? {
        names.push(entry?.file_name().to_string());
    }
    Ok(names)
}
