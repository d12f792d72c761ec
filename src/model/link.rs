//! Resolved download link states
//!
//! This module defines the outcome of resolving one raw download reference.

use std::fmt;

/// Separator used when several resolved links are rendered as one string
pub const LINK_SEPARATOR: &str = ", ";

/// Outcome of resolving one raw download reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedLink {
    /// BitTorrent magnet URI
    Magnet(String),

    /// Direct, fetchable file URL
    FileUrl(String),

    /// Resolution gave up; carries the last URL reached
    Unresolved(String),
}

impl ResolvedLink {
    /// Returns the URI or URL carried by this link
    pub fn as_str(&self) -> &str {
        match self {
            Self::Magnet(uri) => uri,
            Self::FileUrl(url) => url,
            Self::Unresolved(url) => url,
        }
    }

    /// Returns true if the link needs no further resolution
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Unresolved(_))
    }
}

impl fmt::Display for ResolvedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders links in order, duplicates included
pub fn join_links(links: &[ResolvedLink]) -> String {
    links
        .iter()
        .map(ResolvedLink::as_str)
        .collect::<Vec<_>>()
        .join(LINK_SEPARATOR)
}
