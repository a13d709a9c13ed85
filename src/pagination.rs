use serde::{Deserialize, Serialize};

/// Page window requested via `?page=&pageSize=`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageQuery {
    pub page: i64,
    pub page_size: i64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
        }
    }
}

impl PageQuery {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

/// Derived metadata describing a page window over a counted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: i64,
    pub page_count: i64,
    pub page_size: i64,
    pub count: i64,
}

impl PageMeta {
    /// `page_count = ceil(count / page_size)`, 0 when the collection is empty.
    pub fn build(query: &PageQuery, count: i64) -> Self {
        let page_count = if query.page_size > 0 {
            (count + query.page_size - 1) / query.page_size
        } else {
            0
        };
        Self {
            page: query.page,
            page_count,
            page_size: query.page_size,
            count,
        }
    }
}
