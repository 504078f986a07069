//! Document Store Module
//!
//! The persistence seam. Handlers and dashboard assemblers only see the
//! [`DocumentStore`] trait; [`MemoryStore`] is the bundled implementation.

mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{Coupon, Gender, Order, OrderStatus, Product, Role, User};

pub use memory::MemoryStore;

// == Store Error ==
#[derive(Error, Debug)]
pub enum StoreError {
    /// A unique field already holds this value
    #[error("{0} already exists")]
    Duplicate(String),

    /// Record to update does not exist
    #[error("record not found: {0}")]
    Missing(String),

    /// Backend could not serve the call
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

// == Query Types ==

/// Inclusive `createdAt` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from <= at && at <= self.to
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriceSort {
    #[default]
    None,
    Ascending,
    Descending,
}

impl PriceSort {
    /// `asc` sorts ascending, any other non-empty value descending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => PriceSort::None,
            Some("asc") => PriceSort::Ascending,
            Some(_) => PriceSort::Descending,
        }
    }
}

/// Storefront product search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductSearch {
    /// Case-insensitive substring of the product name
    pub name: Option<String>,
    pub category: Option<String>,
    pub max_price: Option<f64>,
    pub sort: PriceSort,
    pub skip: usize,
    pub limit: usize,
}

/// One page of matches plus the total match count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total_matches: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub out_of_stock: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub gender: Option<Gender>,
    pub role: Option<Role>,
}

// == Document Store Trait ==
/// Collections of users, products, orders and coupons.
///
/// Lookups return `Ok(None)` for unknown ids; `Err` is reserved for backend
/// failures and constraint violations.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    // Users
    async fn insert_user(&self, user: User) -> StoreResult<()>;
    async fn find_user(&self, id: &str) -> StoreResult<Option<User>>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn delete_user(&self, id: &str) -> StoreResult<Option<User>>;
    async fn count_users(&self, filter: UserFilter) -> StoreResult<u64>;
    async fn users_created_in(&self, range: DateRange) -> StoreResult<Vec<User>>;

    // Products
    async fn insert_product(&self, product: Product) -> StoreResult<()>;
    async fn find_product(&self, id: &str) -> StoreResult<Option<Product>>;
    async fn update_product(&self, product: Product) -> StoreResult<()>;
    async fn delete_product(&self, id: &str) -> StoreResult<Option<Product>>;
    async fn list_products(&self) -> StoreResult<Vec<Product>>;
    /// Newest first.
    async fn latest_products(&self, limit: usize) -> StoreResult<Vec<Product>>;
    async fn search_products(&self, search: &ProductSearch) -> StoreResult<ProductPage>;
    /// Distinct categories, sorted.
    async fn product_categories(&self) -> StoreResult<Vec<String>>;
    async fn count_products(&self, filter: &ProductFilter) -> StoreResult<u64>;
    async fn products_created_in(&self, range: DateRange) -> StoreResult<Vec<Product>>;

    // Orders
    async fn insert_order(&self, order: Order) -> StoreResult<()>;
    async fn find_order(&self, id: &str) -> StoreResult<Option<Order>>;
    async fn update_order(&self, order: Order) -> StoreResult<()>;
    async fn delete_order(&self, id: &str) -> StoreResult<Option<Order>>;
    async fn list_orders(&self) -> StoreResult<Vec<Order>>;
    async fn orders_for_user(&self, user_id: &str) -> StoreResult<Vec<Order>>;
    /// Counts all orders when `status` is `None`.
    async fn count_orders(&self, status: Option<OrderStatus>) -> StoreResult<u64>;
    async fn orders_created_in(&self, range: DateRange) -> StoreResult<Vec<Order>>;
    /// Newest first.
    async fn latest_orders(&self, limit: usize) -> StoreResult<Vec<Order>>;

    // Coupons
    async fn insert_coupon(&self, coupon: Coupon) -> StoreResult<()>;
    async fn find_coupon_by_code(&self, code: &str) -> StoreResult<Option<Coupon>>;
    async fn list_coupons(&self) -> StoreResult<Vec<Coupon>>;
    async fn delete_coupon(&self, id: &str) -> StoreResult<Option<Coupon>>;
}

/// Fresh document id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
