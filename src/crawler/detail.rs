//! Detail page parser
//!
//! The catalog renders download buttons in more than one layout. Each layout
//! is an extraction strategy; strategies are tried in order and the first one
//! that finds at least one download reference wins.

use crate::crawler::fetcher::Fetcher;
use crate::model::ParsedDetail;
use crate::ParseError;
use scraper::{ElementRef, Html, Selector};

/// Download-button layouts observed on detail pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailStrategy {
    /// Accordion of versions, one button per `<li>`
    VersionList,
    /// Download buttons anywhere on the page
    StandaloneButtons,
}

impl DetailStrategy {
    /// Strategies in the order they are tried
    pub const ORDERED: [Self; 2] = [Self::VersionList, Self::StandaloneButtons];

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::VersionList => "version-list",
            Self::StandaloneButtons => "standalone-buttons",
        }
    }

    /// Applies this strategy, returning None if it finds no download reference
    pub fn try_extract(&self, document: &Html) -> Option<ParsedDetail> {
        let button_selector = Selector::parse("a.game-versions__downloads-button").ok()?;

        let buttons: Vec<ElementRef<'_>> = match self {
            Self::VersionList => {
                let item_selector = Selector::parse(".game-versions__downloads-list li").ok()?;
                document
                    .select(&item_selector)
                    .filter_map(|item| item.select(&button_selector).next())
                    .collect()
            }
            Self::StandaloneButtons => document.select(&button_selector).collect(),
        };

        let detail = detail_from_buttons(&buttons);
        (!detail.is_empty()).then_some(detail)
    }
}

/// Builds a ParsedDetail from download buttons in page order
///
/// The size label is taken from the first button only.
fn detail_from_buttons(buttons: &[ElementRef<'_>]) -> ParsedDetail {
    let size = buttons.first().and_then(|button| {
        let selector = Selector::parse(".game-versions__downloads-size").ok()?;
        let text = button
            .select(&selector)
            .next()?
            .text()
            .collect::<String>()
            .trim()
            .to_string();
        (!text.is_empty()).then_some(text)
    });

    let raw_links = buttons
        .iter()
        .filter_map(|button| button.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect();

    ParsedDetail { size, raw_links }
}

/// Runs every strategy in order over a detail page's HTML
///
/// # Returns
///
/// * `Some((strategy, detail))` - The first strategy that matched and its result
/// * `None` - No strategy found a download reference
pub fn extract_detail(html: &str) -> Option<(DetailStrategy, ParsedDetail)> {
    let document = Html::parse_document(html);
    DetailStrategy::ORDERED
        .iter()
        .find_map(|strategy| strategy.try_extract(&document).map(|d| (*strategy, d)))
}

/// Fetches a detail page and extracts its download references
pub async fn parse_detail(fetcher: &Fetcher, detail_link: &str) -> Result<ParsedDetail, ParseError> {
    let page = fetcher.fetch(detail_link).await?;

    match extract_detail(&page.body) {
        Some((strategy, detail)) => {
            tracing::debug!(
                url = %detail_link,
                strategy = strategy.name(),
                links = detail.raw_links.len(),
                "parsed detail page"
            );
            Ok(detail)
        }
        None => Err(ParseError::NoMatch {
            url: detail_link.to_string(),
        }),
    }
}
