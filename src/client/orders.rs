use chrono::NaiveDate;

use super::{ApiClient, ClientError, QueryParams};
use crate::auth::Identity;
use crate::models::{Order, OrderEdit, OrderStatus, PaymentMethod, Role};
use crate::pagination::Page;

/// Which orders a caller may list: admins see everything, clients only their own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrdersScope {
    All,
    Mine(i64),
}

impl OrdersScope {
    pub fn for_identity(identity: &Identity) -> Self {
        match identity.role {
            Role::Admin => OrdersScope::All,
            Role::Client => OrdersScope::Mine(identity.id),
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            OrdersScope::All => "/orders",
            OrdersScope::Mine(_) => "/orders/my",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OrderFilters {
    pub search_name: String,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Vec<OrderStatus>,
    pub payment_method: Vec<PaymentMethod>,
}

impl OrderFilters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Complete key of one orders fetch
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrdersQuery {
    pub scope: OrdersScope,
    pub page: u32,
    pub limit: u32,
    pub filters: OrderFilters,
}

impl OrdersQuery {
    pub fn params(&self) -> QueryParams {
        let params = match self.scope {
            OrdersScope::Mine(user_id) => QueryParams::new().push("userId", user_id),
            OrdersScope::All => QueryParams::new(),
        };

        params
            .push("page", self.page)
            .push("limit", self.limit)
            .push_text("searchName", Some(self.filters.search_name.as_str()))
            .push_each("status", &self.filters.status)
            .push_each("paymentMethod", &self.filters.payment_method)
            .push_opt("dateFrom", self.filters.date_from.map(|d| d.format("%Y-%m-%d")))
            .push_opt("dateTo", self.filters.date_to.map(|d| d.format("%Y-%m-%d")))
    }
}

impl ApiClient {
    /// GET /orders or /orders/my, depending on scope
    pub async fn fetch_orders(&self, query: &OrdersQuery) -> Result<Page<Order>, ClientError> {
        self.get_page(query.scope.path(), &query.params())
            .await
            .map_err(|e| {
                tracing::warn!("Error fetching orders: {}", e);
                e
            })
    }

    /// PUT /orders/{id}
    pub async fn update_order(&self, edit: &OrderEdit) -> Result<(), ClientError> {
        self.put_json(&format!("/orders/{}", edit.id), edit).await
    }

    /// DELETE /orders/{id}
    pub async fn delete_order(&self, id: i64) -> Result<(), ClientError> {
        self.delete(&format!("/orders/{}", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> Identity {
        Identity {
            id: 12,
            name: "Bia".into(),
            email: "bia@x.com".into(),
            role,
        }
    }

    #[test]
    fn scope_follows_role() {
        assert_eq!(OrdersScope::for_identity(&identity(Role::Admin)), OrdersScope::All);
        assert_eq!(OrdersScope::for_identity(&identity(Role::Client)), OrdersScope::Mine(12));
        assert_eq!(OrdersScope::Mine(12).path(), "/orders/my");
    }

    #[test]
    fn client_scope_sends_user_id_and_repeats_multi_filters() {
        let query = OrdersQuery {
            scope: OrdersScope::Mine(12),
            page: 2,
            limit: 20,
            filters: OrderFilters {
                search_name: "Manu".into(),
                date_from: NaiveDate::from_ymd_opt(2025, 11, 1),
                date_to: None,
                status: vec![OrderStatus::Pending, OrderStatus::InProgress],
                payment_method: vec![PaymentMethod::Pix],
            },
        };
        let params = query.params();
        let pairs: Vec<(&str, &str)> = params
            .as_slice()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            pairs,
            [
                ("userId", "12"),
                ("page", "2"),
                ("limit", "20"),
                ("searchName", "Manu"),
                ("status", "PENDING"),
                ("status", "IN_PROGRESS"),
                ("paymentMethod", "PIX"),
                ("dateFrom", "2025-11-01"),
            ]
        );
    }

    #[test]
    fn admin_scope_with_empty_filters_sends_paging_only() {
        let query = OrdersQuery {
            scope: OrdersScope::All,
            page: 1,
            limit: 10,
            filters: OrderFilters::default(),
        };
        assert!(query.filters.is_empty());
        assert_eq!(query.params().as_slice().len(), 2);
    }
}
