use crate::model::link::{join_links, ResolvedLink};
use serde::Serialize;

/// A search result identified on a listing page but not yet parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Display name from the listing
    pub name: String,

    /// Absolute URL of the detail page
    pub detail_link: String,

    /// Absolute URL of the poster image (empty if the listing had none)
    pub image_url: String,
}

/// Structured data extracted from a detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDetail {
    /// File size label of the first download (e.g. "154.2 MB")
    pub size: Option<String>,

    /// Raw download hrefs in page order
    pub raw_links: Vec<String>,
}

impl ParsedDetail {
    /// Returns true if no download reference was found
    pub fn is_empty(&self) -> bool {
        self.raw_links.is_empty()
    }
}

/// One fully resolved search result, as returned to API clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultEntry {
    pub name: String,
    pub link: String,
    pub image: String,
    /// Resolved links in raw-link order, joined with ", "
    pub download: String,
    pub size: String,
}

impl ResultEntry {
    /// Assembles an entry from its candidate, parsed detail and resolved links
    pub fn new(candidate: Candidate, detail: ParsedDetail, resolved: &[ResolvedLink]) -> Self {
        Self {
            name: candidate.name,
            link: candidate.detail_link,
            image: candidate.image_url,
            download: join_links(resolved),
            size: detail.size.unwrap_or_default(),
        }
    }
}
