use serde::{Deserialize, Serialize};

/// `?page&limit` query used by every list endpoint.
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}
fn default_limit() -> i64 {
    10
}

impl Pagination {
    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, 100)
    }

    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.limit())
    }
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_query_is_empty() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 10);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        let p = Pagination { page: 3, limit: 20 };
        assert_eq!(p.offset(), 40);
    }

    #[test]
    fn limit_is_clamped() {
        let p = Pagination { page: 0, limit: 100_000 };
        assert_eq!(p.limit(), 100);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn offset_saturates_instead_of_overflowing() {
        let p = Pagination { page: i64::MAX, limit: 10 };
        assert_eq!(p.offset(), i64::MAX);

        let p = Pagination { page: i64::MAX - 1, limit: 100 };
        assert!(p.offset() >= 0);
    }
}
