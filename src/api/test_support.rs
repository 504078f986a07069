//! Fixtures shared by the handler and router tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use super::AppState;
use crate::config::Config;
use crate::db::{DocumentStore, MemoryStore};
use crate::models::{Gender, Product, Role, User};
use crate::payment::{GatewayOrder, PaymentError, PaymentGateway};

pub const ADMIN_ID: &str = "admin-1";
pub const CUSTOMER_ID: &str = "customer-1";
pub const SECRET: &str = "test_secret";

/// Gateway that answers locally, echoing the requested amount.
pub struct StubGateway;

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn create_order(
        &self,
        amount_minor: u64,
        currency: &str,
    ) -> Result<GatewayOrder, PaymentError> {
        Ok(GatewayOrder {
            id: "order_stub".to_string(),
            entity: "order".to_string(),
            amount: amount_minor,
            currency: currency.to_string(),
            status: "created".to_string(),
            created_at: 0,
        })
    }

    fn key_id(&self) -> &str {
        "rzp_test_key"
    }
}

pub fn user(id: &str, role: Role) -> User {
    let now = Utc::now();
    User {
        id: id.to_string(),
        name: format!("{id} name"),
        email: format!("{id}@example.com"),
        image: "avatar.png".to_string(),
        role,
        gender: Gender::Female,
        dob: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
        created_at: now,
        updated_at: now,
    }
}

pub fn product(id: &str, category: &str, stock: u32) -> Product {
    let now = Utc::now();
    Product {
        id: id.to_string(),
        name: format!("{id} name"),
        image: format!("uploads/{id}.png"),
        price: 250.0,
        stock,
        category: category.to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub fn test_config() -> Config {
    Config {
        upload_dir: std::env::temp_dir()
            .join(format!("shop-api-test-{}", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .into_owned(),
        razorpay_key_id: "rzp_test_key".to_string(),
        razorpay_key_secret: SECRET.to_string(),
        ..Config::default()
    }
}

/// State over an in-memory store holding one admin and one customer.
pub async fn test_state() -> AppState {
    let db = MemoryStore::new();
    db.insert_user(user(ADMIN_ID, Role::Admin)).await.unwrap();
    db.insert_user(user(CUSTOMER_ID, Role::User)).await.unwrap();
    AppState::new(test_config(), Arc::new(db), Arc::new(StubGateway))
}
