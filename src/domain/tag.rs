use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use super::Version;

/// Characters allowed in a prefix mirror the ref-name subset branches use.
pub(crate) const PREFIX_CLASS: &str = r"[A-Za-z0-9_/-]+";

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"^({})-(\d+)\.(\d+)\.(\d+)$", PREFIX_CLASS))
            .expect("tag pattern is a valid regex")
    })
}

fn prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!("^{}$", PREFIX_CLASS)).expect("prefix pattern is a valid regex")
    })
}

/// A release tag, `<prefix>-<major>.<minor>.<patch>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    pub prefix: String,
    pub version: Version,
}

impl Tag {
    pub fn new(prefix: impl Into<String>, version: Version) -> Self {
        Tag {
            prefix: prefix.into(),
            version,
        }
    }

    /// Parse a tag name, returning `None` for names that are not release tags.
    ///
    /// The prefix is greedy: `release-2-1.4.0` has prefix `release-2`.
    pub fn parse(name: &str) -> Option<Self> {
        let captures = tag_regex().captures(name)?;
        let ordinal = |i: usize| captures.get(i)?.as_str().parse::<u32>().ok();

        Some(Tag {
            prefix: captures.get(1)?.as_str().to_string(),
            version: Version::new(ordinal(2)?, ordinal(3)?, ordinal(4)?),
        })
    }

    /// Whether `prefix` can start a tag name that parses back to itself
    pub fn is_valid_prefix(prefix: &str) -> bool {
        prefix_regex().is_match(prefix)
    }

    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, self.version)
    }
}
