use super::{ApiClient, ClientError, QueryParams};
use crate::models::{UpdateUserPayload, User, UsersFilter};
use crate::pagination::Page;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UsersQuery {
    pub page: u32,
    pub limit: u32,
    pub filter: UsersFilter,
}

impl UsersQuery {
    pub fn params(&self) -> QueryParams {
        QueryParams::new()
            .push("page", self.page)
            .push("limit", self.limit)
            .push_text("query", self.filter.query.as_deref())
    }
}

impl ApiClient {
    /// GET /users
    pub async fn fetch_users(&self, query: &UsersQuery) -> Result<Page<User>, ClientError> {
        self.get_page("/users", &query.params()).await.map_err(|e| {
            tracing::warn!("Error fetching users: {}", e);
            e
        })
    }

    /// GET /users/{id}
    pub async fn fetch_user(&self, id: i64) -> Result<User, ClientError> {
        self.get_json(&format!("/users/{}", id)).await.map_err(|e| {
            tracing::warn!("Error fetching user {}: {}", id, e);
            e
        })
    }

    /// PUT /users/{id}
    pub async fn update_user(&self, payload: &UpdateUserPayload) -> Result<(), ClientError> {
        self.put_json(&format!("/users/{}", payload.id), payload).await
    }

    /// DELETE /users/{id}
    pub async fn delete_user(&self, id: i64) -> Result<(), ClientError> {
        self.delete(&format!("/users/{}", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_is_omitted() {
        let query = UsersQuery {
            page: 1,
            limit: 10,
            filter: UsersFilter { query: Some(String::new()) },
        };
        assert_eq!(query.params().get_all("query").count(), 0);
    }
}
