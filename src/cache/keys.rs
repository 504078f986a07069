//! Cache key names.
//!
//! Fixed keys name whole-collection snapshots and dashboard aggregates;
//! per-entity keys are built from an id.

pub const LATEST_PRODUCTS: &str = "latestProducts";
pub const CATEGORIES: &str = "categories";
pub const ALL_PRODUCTS: &str = "allProducts";
pub const ALL_ORDERS: &str = "allOrders";

pub const STATS: &str = "stats";
pub const PIE_CHARTS: &str = "pie-charts";
pub const BAR_CHARTS: &str = "bar-charts";
pub const LINE_CHARTS: &str = "line-charts";

/// Keys dropped whenever product data changes.
pub const PRODUCT_KEYS: [&str; 3] = [LATEST_PRODUCTS, CATEGORIES, ALL_PRODUCTS];

/// Dashboard aggregates, dropped on any admin-visible change.
pub const DASHBOARD_KEYS: [&str; 4] = [STATS, PIE_CHARTS, BAR_CHARTS, LINE_CHARTS];

pub fn product(id: &str) -> String {
    format!("product-{id}")
}

pub fn my_orders(user_id: &str) -> String {
    format!("myOrders-{user_id}")
}

pub fn single_order(order_id: &str) -> String {
    format!("singleOrder-{order_id}")
}
