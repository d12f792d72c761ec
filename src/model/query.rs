/// A search request that asks for at least one result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    pub limit: usize,
}

impl Query {
    /// Returns None when `limit` asks for nothing
    pub fn new(text: &str, limit: i64) -> Option<Self> {
        let limit = usize::try_from(limit).ok().filter(|limit| *limit > 0)?;
        Some(Self {
            text: text.to_string(),
            limit,
        })
    }
}
