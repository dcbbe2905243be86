use super::{ApiClient, ClientError, QueryParams};
use crate::models::{Item, ItemFilters};
use crate::pagination::Page;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemsQuery {
    pub page: u32,
    pub limit: u32,
    pub filters: ItemFilters,
}

impl ItemsQuery {
    pub fn params(&self) -> QueryParams {
        QueryParams::new()
            .push("page", self.page)
            .push("limit", self.limit)
            .push_opt("categoryId", self.filters.category_id)
            .push_text("description", self.filters.description.as_deref())
    }
}

impl ApiClient {
    /// GET /items
    pub async fn fetch_items(&self, query: &ItemsQuery) -> Result<Page<Item>, ClientError> {
        self.get_page("/items", &query.params()).await.map_err(|e| {
            tracing::warn!("Error fetching items: {}", e);
            e
        })
    }
}
