//! Data model for the search pipeline
//!
//! Everything here is created per request and never mutated afterwards.

mod entry;
mod link;
mod query;
mod response;

pub use entry::{Candidate, ParsedDetail, ResultEntry};
pub use link::{join_links, ResolvedLink, LINK_SEPARATOR};
pub use query::Query;
pub use response::{HealthPayload, SearchResponse};
