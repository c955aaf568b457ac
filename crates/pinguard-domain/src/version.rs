//! Version scheme used by resolved dependency trees.
//!
//! Versions are compared item by item: numeric items numerically, qualifier
//! items by a fixed precedence
//! (`alpha < beta < milestone < rc < snapshot < release < sp < anything else`).
//! Trailing zero / release items are insignificant, so `1.0` == `1`.

use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

pub const LATEST: &str = "LATEST";
pub const RELEASE: &str = "RELEASE";
pub const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    #[error("version constraint is empty")]
    Empty,
    #[error("unterminated version range '{0}'")]
    Unterminated(String),
    #[error("invalid version range '{range}': {reason}")]
    InvalidRange { range: String, reason: &'static str },
    #[error("unexpected text '{rest}' after version range in '{constraint}'")]
    TrailingText { constraint: String, rest: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Item {
    /// Digits with leading zeros stripped (`"0"` for zero).
    Number(String),
    /// Lower-cased qualifier with aliases folded (`cr` -> `rc`, `ga` -> ``).
    Qualifier(String),
}

impl Item {
    fn is_null(&self) -> bool {
        match self {
            Item::Number(n) => n == "0",
            Item::Qualifier(q) => q.is_empty(),
        }
    }
}

fn qualifier_rank(q: &str) -> (u8, &str) {
    match q {
        "alpha" => (0, ""),
        "beta" => (1, ""),
        "milestone" => (2, ""),
        "rc" => (3, ""),
        "snapshot" => (4, ""),
        "" => (5, ""),
        "sp" => (6, ""),
        other => (7, other),
    }
}

fn compare_numbers(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_items(a: &Item, b: &Item) -> Ordering {
    match (a, b) {
        (Item::Number(x), Item::Number(y)) => compare_numbers(x, y),
        (Item::Number(_), Item::Qualifier(_)) => Ordering::Greater,
        (Item::Qualifier(_), Item::Number(_)) => Ordering::Less,
        (Item::Qualifier(x), Item::Qualifier(y)) => qualifier_rank(x).cmp(&qualifier_rank(y)),
    }
}

/// Compare an item against the padding of a shorter version.
fn compare_against_null(item: &Item) -> Ordering {
    match item {
        Item::Number(n) if n == "0" => Ordering::Equal,
        Item::Number(_) => Ordering::Greater,
        Item::Qualifier(q) => qualifier_rank(q).cmp(&qualifier_rank("")),
    }
}

fn fold_qualifier(token: &str, followed_by_digit: bool) -> String {
    match token {
        "a" if followed_by_digit => "alpha".to_string(),
        "b" if followed_by_digit => "beta".to_string(),
        "m" if followed_by_digit => "milestone".to_string(),
        "cr" => "rc".to_string(),
        "ga" | "final" | "release" => String::new(),
        other => other.to_string(),
    }
}

fn tokenize(text: &str) -> Vec<Item> {
    let lower = text.to_ascii_lowercase();
    let chars: Vec<char> = lower.chars().collect();
    let mut items = Vec::new();
    let mut start = 0;

    let mut push = |token: &str, followed_by_digit: bool, items: &mut Vec<Item>| {
        if token.is_empty() {
            items.push(Item::Number("0".to_string()));
        } else if token.chars().all(|c| c.is_ascii_digit()) {
            let trimmed = token.trim_start_matches('0');
            let digits = if trimmed.is_empty() { "0" } else { trimmed };
            items.push(Item::Number(digits.to_string()));
        } else {
            items.push(Item::Qualifier(fold_qualifier(token, followed_by_digit)));
        }
    };

    for i in 0..=chars.len() {
        let at_end = i == chars.len();
        let is_sep = !at_end && (chars[i] == '.' || chars[i] == '-' || chars[i] == '_');
        let is_transition = !at_end
            && i > start
            && chars[i].is_ascii_digit() != chars[i - 1].is_ascii_digit()
            && !is_sep;

        if at_end || is_sep || is_transition {
            let token: String = chars[start..i].iter().collect();
            let followed_by_digit = is_transition && chars[i].is_ascii_digit();
            if !(at_end && token.is_empty() && !items.is_empty()) {
                push(&token, followed_by_digit, &mut items);
            }
            start = if is_sep { i + 1 } else { i };
        }
    }

    while items.last().is_some_and(Item::is_null) {
        items.pop();
    }
    items
}

/// A single concrete version, ordered by the generic scheme above.
#[derive(Clone, Debug)]
pub struct Version {
    text: String,
    items: Vec<Item>,
}

impl Version {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let items = tokenize(&text);
        Self { text, items }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_snapshot(&self) -> bool {
        self.text.ends_with(SNAPSHOT_SUFFIX)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.items.len().max(other.items.len());
        for i in 0..len {
            let ord = match (self.items.get(i), other.items.get(i)) {
                (Some(a), None) => compare_against_null(a),
                (None, Some(b)) => compare_against_null(b).reverse(),
                (Some(a), Some(b)) => compare_items(a, b),
                (None, None) => Ordering::Equal,
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// One end of an interval.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bound {
    pub version: Version,
    pub inclusive: bool,
}

/// A single interval such as `[1.0,2.0)`, `(,1.0]` or `[1.0]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interval {
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
}

impl Interval {
    fn parse(text: &str) -> Result<Self, VersionParseError> {
        let invalid = |reason| VersionParseError::InvalidRange {
            range: text.to_string(),
            reason,
        };

        let open = text.chars().next().ok_or_else(|| invalid("empty range"))?;
        let close = text.chars().last().ok_or_else(|| invalid("empty range"))?;
        let inner = &text[1..text.len() - 1];

        match inner.split_once(',') {
            Some((lo, hi)) => {
                if hi.contains(',') {
                    return Err(invalid("a range has at most two bounds"));
                }
                let lower = Some(lo.trim())
                    .filter(|s| !s.is_empty())
                    .map(|s| Bound {
                        version: Version::new(s),
                        inclusive: open == '[',
                    });
                let upper = Some(hi.trim())
                    .filter(|s| !s.is_empty())
                    .map(|s| Bound {
                        version: Version::new(s),
                        inclusive: close == ']',
                    });
                if let (Some(l), Some(u)) = (&lower, &upper)
                    && l.version > u.version
                {
                    return Err(invalid("lower bound is greater than upper bound"));
                }
                Ok(Self { lower, upper })
            }
            None => {
                let v = inner.trim();
                if v.is_empty() {
                    return Err(invalid("empty range"));
                }
                if open != '[' || close != ']' {
                    return Err(invalid("a single version must be surrounded by []"));
                }
                let bound = Bound {
                    version: Version::new(v),
                    inclusive: true,
                };
                Ok(Self {
                    lower: Some(bound.clone()),
                    upper: Some(bound),
                })
            }
        }
    }

    pub fn contains(&self, version: &Version) -> bool {
        let above_lower = match &self.lower {
            None => true,
            Some(b) if b.inclusive => version >= &b.version,
            Some(b) => version > &b.version,
        };
        let below_upper = match &self.upper {
            None => true,
            Some(b) if b.inclusive => version <= &b.version,
            Some(b) => version < &b.version,
        };
        above_lower && below_upper
    }
}

/// A union of one or more intervals, keeping the text it was parsed from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionRange {
    text: String,
    intervals: Vec<Interval>,
}

impl VersionRange {
    pub fn parse(text: &str) -> Result<Self, VersionParseError> {
        let trimmed = text.trim();
        let mut rest = trimmed;
        let mut intervals = Vec::new();

        while rest.starts_with(['[', '(']) {
            let close = rest
                .find([']', ')'])
                .ok_or_else(|| VersionParseError::Unterminated(rest.to_string()))?;
            intervals.push(Interval::parse(&rest[..=close])?);
            rest = rest[close + 1..].trim_start();
            if let Some(after_comma) = rest.strip_prefix(',') {
                rest = after_comma.trim_start();
            }
        }

        if intervals.is_empty() {
            return Err(VersionParseError::InvalidRange {
                range: trimmed.to_string(),
                reason: "expected '[' or '('",
            });
        }
        if !rest.is_empty() {
            return Err(VersionParseError::TrailingText {
                constraint: trimmed.to_string(),
                rest: rest.to_string(),
            });
        }

        Ok(Self {
            text: trimmed.to_string(),
            intervals,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Lowest lower bound across all intervals; `None` means unbounded.
    pub fn lower_bound(&self) -> Option<&Bound> {
        let mut lowest: Option<&Bound> = None;
        for interval in &self.intervals {
            let bound = interval.lower.as_ref()?;
            lowest = match lowest {
                Some(current) if current.version <= bound.version => Some(current),
                _ => Some(bound),
            };
        }
        lowest
    }

    /// Highest upper bound across all intervals; `None` means unbounded.
    pub fn upper_bound(&self) -> Option<&Bound> {
        let mut highest: Option<&Bound> = None;
        for interval in &self.intervals {
            let bound = interval.upper.as_ref()?;
            highest = match highest {
                Some(current) if current.version >= bound.version => Some(current),
                _ => Some(bound),
            };
        }
        highest
    }

    /// `true` for single-point ranges like `[1.0]` (or `[1.0,1.0]`).
    pub fn has_identical_bounds(&self) -> bool {
        matches!(
            (self.lower_bound(), self.upper_bound()),
            (Some(lo), Some(hi)) if lo == hi
        )
    }

    pub fn contains(&self, version: &Version) -> bool {
        self.intervals.iter().any(|i| i.contains(version))
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VersionAlias {
    Latest,
    Release,
}

impl VersionAlias {
    pub fn as_str(self) -> &'static str {
        match self {
            VersionAlias::Latest => LATEST,
            VersionAlias::Release => RELEASE,
        }
    }
}

/// How a dependency's version was requested. Exactly one classification per node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VersionConstraint {
    Fixed(Version),
    Alias(VersionAlias),
    Range(VersionRange),
    /// Neither a fixed version nor a range; carries the raw text.
    Unrecognized(String),
}

impl VersionConstraint {
    /// Strict parse: malformed ranges and empty text are errors.
    pub fn parse(text: &str) -> Result<Self, VersionParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(VersionParseError::Empty);
        }
        if trimmed.starts_with(['[', '(']) {
            return VersionRange::parse(trimmed).map(VersionConstraint::Range);
        }
        Ok(match trimmed {
            LATEST => VersionConstraint::Alias(VersionAlias::Latest),
            RELEASE => VersionConstraint::Alias(VersionAlias::Release),
            other => VersionConstraint::Fixed(Version::new(other)),
        })
    }

    /// Lenient parse for resolver output: anything malformed is kept as
    /// [`VersionConstraint::Unrecognized`] instead of failing the run.
    pub fn from_resolver(text: &str) -> Self {
        match Self::parse(text) {
            Ok(constraint) => constraint,
            Err(err) => {
                tracing::debug!(constraint = text, error = %err, "keeping unparseable version constraint");
                VersionConstraint::Unrecognized(text.to_string())
            }
        }
    }

    pub fn fixed_version(&self) -> Option<&Version> {
        match self {
            VersionConstraint::Fixed(v) => Some(v),
            _ => None,
        }
    }

    pub fn range(&self) -> Option<&VersionRange> {
        match self {
            VersionConstraint::Range(r) => Some(r),
            _ => None,
        }
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionConstraint::Fixed(v) => write!(f, "{v}"),
            VersionConstraint::Alias(a) => f.write_str(a.as_str()),
            VersionConstraint::Range(r) => write!(f, "{r}"),
            VersionConstraint::Unrecognized(raw) => f.write_str(raw),
        }
    }
}
