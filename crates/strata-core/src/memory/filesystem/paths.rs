//! Path parsing

use std::fmt;
use std::str::FromStr;

/// Name of the generated summary file
pub(crate) const DIRECTORY_FILE: &str = ".directory";

/// Soul file under `/identity/`
pub(crate) const SOUL_FILE: &str = "soul.md";

/// Knowledge directory holding insights without a domain
pub(crate) const NO_DOMAIN_DIR: &str = "_";

/// Top-level directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Identity,
    Knowledge,
    Experience,
    References,
}

impl Section {
    /// All sections in listing order
    pub const ALL: [Section; 4] = [
        Section::Identity,
        Section::Knowledge,
        Section::Experience,
        Section::References,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Identity => "identity",
            Section::Knowledge => "knowledge",
            Section::Experience => "experience",
            Section::References => "references",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| format!("unknown section: {}", s))
    }
}

/// Strip surrounding slashes
pub(crate) fn normalize(path: &str) -> &str {
    path.trim_matches('/')
}

/// Split a normalized path into segments; the root has none
pub(crate) fn segments(normalized: &str) -> Vec<&str> {
    if normalized.is_empty() {
        Vec::new()
    } else {
        normalized.split('/').collect()
    }
}

/// Section named by the first segment, if any
pub(crate) fn section_of(parts: &[&str]) -> Option<Section> {
    parts.first().and_then(|head| head.parse().ok())
}

/// Knowledge directory name for an insight domain
pub(crate) fn domain_dir(domain: &str) -> &str {
    if domain.is_empty() {
        NO_DOMAIN_DIR
    } else {
        domain
    }
}

/// Insight domain stored under a knowledge directory name
pub(crate) fn dir_domain(dir: &str) -> &str {
    if dir == NO_DOMAIN_DIR {
        ""
    } else {
        dir
    }
}
