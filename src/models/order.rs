use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::user::Address;

/// Order lifecycle status. Values the dashboard does not know are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
    Unknown(String),
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::InProgress => "IN_PROGRESS",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Unknown(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            OrderStatus::Pending => "Pendente",
            OrderStatus::InProgress => "Em Preparo",
            OrderStatus::Completed => "Concluído",
            OrderStatus::Cancelled => "Cancelado",
            OrderStatus::Unknown(raw) => raw,
        }
    }

    /// Badge color scheme
    pub fn color(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "orange",
            OrderStatus::InProgress => "blue",
            OrderStatus::Completed => "green",
            OrderStatus::Cancelled => "red",
            OrderStatus::Unknown(_) => "gray",
        }
    }
}

impl From<String> for OrderStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PENDING" => OrderStatus::Pending,
            "IN_PROGRESS" => OrderStatus::InProgress,
            "COMPLETED" => OrderStatus::Completed,
            "CANCELLED" => OrderStatus::Cancelled,
            _ => OrderStatus::Unknown(raw),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    Cash,
    Debit,
    Credit,
    Pix,
    Unknown(String),
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Debit,
        PaymentMethod::Credit,
        PaymentMethod::Pix,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Debit => "DEBIT",
            PaymentMethod::Credit => "CREDIT",
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Unknown(raw) => raw,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Dinheiro",
            PaymentMethod::Debit => "Débito",
            PaymentMethod::Credit => "Crédito",
            PaymentMethod::Pix => "Pix",
            PaymentMethod::Unknown(_) => "Desconhecido",
        }
    }
}

impl From<String> for PaymentMethod {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "CASH" => PaymentMethod::Cash,
            "DEBIT" => PaymentMethod::Debit,
            "CREDIT" => PaymentMethod::Credit,
            "PIX" => PaymentMethod::Pix,
            _ => PaymentMethod::Unknown(raw),
        }
    }
}

impl From<PaymentMethod> for String {
    fn from(method: PaymentMethod) -> Self {
        method.as_str().to_string()
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub address: Option<Address>,
}

/// Snapshot of the catalogue item at the time it was ordered
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub unit_price: Decimal,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub item: LineItem,
    pub quantity: u32,
}

impl OrderItem {
    pub fn subtotal(&self) -> Decimal {
        self.item.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub client: Client,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
    // The backend names the relation after its model
    #[serde(rename = "OrderItem", default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn total(&self) -> Decimal {
        self.items.iter().map(OrderItem::subtotal).sum()
    }

    pub fn created_at_display(&self) -> String {
        self.created_at.format("%d/%m/%Y %H:%M").to_string()
    }
}

/// Body of `PUT /orders/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEdit {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_order() -> Order {
        serde_json::from_value(json!({
            "id": 7,
            "client": {
                "name": "Manu",
                "email": "manu@email.com",
                "phone": "+55 11 91234-5678"
            },
            "status": "PENDING",
            "paymentMethod": "CREDIT",
            "createdAt": "2025-11-19T23:26:01.256Z",
            "OrderItem": [
                { "item": { "unitPrice": 20, "description": "X-Burger" }, "quantity": 2 },
                { "item": { "unitPrice": 5.5, "description": "Coca-Cola 350ml" }, "quantity": 3 }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn order_total_sums_line_items() {
        let order = sample_order();
        assert_eq!(order.total(), Decimal::new(5650, 2));
        assert_eq!(order.created_at_display(), "19/11/2025 23:26");
    }

    #[test]
    fn missing_line_items_default_to_empty() {
        let mut value = serde_json::to_value(sample_order()).unwrap();
        value.as_object_mut().unwrap().remove("OrderItem");
        let order: Order = serde_json::from_value(value).unwrap();
        assert!(order.items.is_empty());
        assert_eq!(order.total(), Decimal::ZERO);
    }

    #[test]
    fn unknown_status_is_kept_verbatim() {
        let status: OrderStatus = serde_json::from_str("\"PAID\"").unwrap();
        assert_eq!(status, OrderStatus::Unknown("PAID".into()));
        assert_eq!(status.label(), "PAID");
        assert_eq!(status.color(), "gray");
        assert_eq!(serde_json::to_value(&status).unwrap(), "PAID");
    }

    #[test]
    fn labels_follow_dashboard_wording() {
        assert_eq!(OrderStatus::InProgress.label(), "Em Preparo");
        assert_eq!(OrderStatus::Cancelled.color(), "red");
        assert_eq!(PaymentMethod::Cash.label(), "Dinheiro");
        assert_eq!(PaymentMethod::from("BOLETO".to_string()).label(), "Desconhecido");
    }

    #[test]
    fn order_edit_serializes_only_changes() {
        let edit = OrderEdit {
            id: 5,
            status: Some(OrderStatus::Completed),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&edit).unwrap(),
            json!({ "id": 5, "status": "COMPLETED" })
        );
    }
}
