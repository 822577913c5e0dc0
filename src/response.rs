use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T: Serialize> {
    pub items: Vec<T>,
    /// Matching rows before pagination.
    pub total: u64,
    pub page: u64,
    pub size: u64,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, size: u64) -> Self {
        Self {
            items,
            total,
            page,
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_expected_shape() {
        let resp = PaginatedResponse::new(vec!["a", "b"], 15, 2, 10);
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "items": ["a", "b"], "total": 15, "page": 2, "size": 10 })
        );
    }

    #[test]
    fn empty_page_keeps_total() {
        let resp = PaginatedResponse::<String>::new(vec![], 3, 5, 10);
        assert!(resp.items.is_empty());
        assert_eq!(resp.total, 3);
    }
}
