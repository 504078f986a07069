//! Order entity and its user-populated view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::User;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Processing,
    Shipped,
    Delivered,
}

impl OrderStatus {
    /// Next fulfilment step. Delivered orders stay delivered.
    pub fn next(self) -> Self {
        match self {
            OrderStatus::Processing => OrderStatus::Shipped,
            OrderStatus::Shipped | OrderStatus::Delivered => OrderStatus::Delivered,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pin_code: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    pub image: String,
    pub product_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    pub shipping_info: ShippingInfo,
    /// Id of the ordering user
    pub user: String,
    pub subtotal: f64,
    pub tax: f64,
    pub shipping_charges: f64,
    pub discount: f64,
    pub total: f64,
    pub status: OrderStatus,
    pub order_items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Moves the order one fulfilment step forward.
    pub fn advance(&mut self, now: DateTime<Utc>) {
        self.status = self.status.next();
        self.updated_at = now;
    }
}

/// The ordering user's id and name, embedded in order views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

/// An order with its `user` id replaced by the user's summary.
///
/// `user` is null when the ordering user no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    #[serde(rename = "_id")]
    pub id: String,
    pub shipping_info: ShippingInfo,
    pub user: Option<UserSummary>,
    pub subtotal: f64,
    pub tax: f64,
    pub shipping_charges: f64,
    pub discount: f64,
    pub total: f64,
    pub status: OrderStatus,
    pub order_items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderDetails {
    pub fn populate(order: Order, user: Option<&User>) -> Self {
        Self {
            id: order.id,
            shipping_info: order.shipping_info,
            user: user.map(|u| UserSummary {
                id: u.id.clone(),
                name: u.name.clone(),
            }),
            subtotal: order.subtotal,
            tax: order.tax,
            shipping_charges: order.shipping_charges,
            discount: order.discount,
            total: order.total,
            status: order.status,
            order_items: order.order_items,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_progression() {
        assert_eq!(OrderStatus::Processing.next(), OrderStatus::Shipped);
        assert_eq!(OrderStatus::Shipped.next(), OrderStatus::Delivered);
        assert_eq!(OrderStatus::Delivered.next(), OrderStatus::Delivered);
    }

    #[test]
    fn test_status_serializes_capitalized() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Processing).unwrap(),
            "\"Processing\""
        );
    }
}
