//! Parsing of `git describe --tags --long` output
//!
//! A descriptor looks like `<prefix>-<major>.<minor>.<patch>-<distance>-g<commit>`.
//! The last four groups are anchored at the end of the string and everything
//! before them is the prefix, so a branch named `release-2` still parses.

use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;

use super::tag::PREFIX_CLASS;
use super::{Tag, Version};
use crate::error::{ReleaseError, Result};

fn descriptor_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^({})-(\d+)\.(\d+)\.(\d+)-(\d+)-g([0-9a-f]{{4,64}})$",
            PREFIX_CLASS
        ))
        .expect("descriptor pattern is a valid regex")
    })
}

/// Structured form of a describe string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDescriptor {
    pub prefix: String,
    pub version: Version,
    /// Commits since the nearest tag
    pub distance: u32,
    pub commit: String,
}

impl VersionDescriptor {
    pub fn parse(text: &str) -> Result<Self> {
        let malformed = || ReleaseError::MalformedDescriptor(text.to_string());

        let captures = descriptor_regex().captures(text.trim()).ok_or_else(malformed)?;
        let number = |i: usize| -> Result<u32> {
            captures
                .get(i)
                .ok_or_else(malformed)?
                .as_str()
                .parse::<u32>()
                .map_err(|_| malformed())
        };

        Ok(VersionDescriptor {
            prefix: captures.get(1).ok_or_else(malformed)?.as_str().to_string(),
            version: Version::new(number(2)?, number(3)?, number(4)?),
            distance: number(5)?,
            commit: captures.get(6).ok_or_else(malformed)?.as_str().to_string(),
        })
    }

    /// The nearest tag this descriptor was computed from
    pub fn tag(&self) -> Tag {
        Tag::new(self.prefix.clone(), self.version)
    }

    pub fn tag_name(&self) -> String {
        self.tag().name()
    }

    /// True when HEAD sits exactly on the nearest tag
    pub fn is_at_tag(&self) -> bool {
        self.distance == 0
    }
}

impl FromStr for VersionDescriptor {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        VersionDescriptor::parse(s)
    }
}
