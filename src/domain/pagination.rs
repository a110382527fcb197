use serde::Deserialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

// Raw `page` / `limit` query parameters
#[derive(Deserialize, Debug, Default)]
pub struct PageQuery{
    pub page: Option<i64>,
    pub limit: Option<i64>
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination{
    pub page: i64,
    pub limit: i64
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl From<&PageQuery> for Pagination {
    fn from(query: &PageQuery) -> Self {
        Pagination{
            page: query.page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
        }
    }
}
