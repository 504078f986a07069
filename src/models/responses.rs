//! Response DTOs
//!
//! Every body carries a `success` flag next to one named payload field.

use serde::Serialize;

use crate::analytics::{BarCharts, DashboardStats, LineCharts, PieCharts};
use crate::cache::CacheStats;
use crate::models::{Coupon, Product, User};
use crate::payment::GatewayOrder;

/// `{ success: true, message }` for mutations.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Error response body for all error conditions.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: User,
}

impl UserResponse {
    pub fn new(user: User) -> Self {
        Self { success: true, user }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UsersResponse {
    pub success: bool,
    pub users: Vec<User>,
}

impl UsersResponse {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            success: true,
            users,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: Product,
}

impl ProductResponse {
    pub fn new(product: Product) -> Self {
        Self {
            success: true,
            product,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductsResponse {
    pub success: bool,
    pub products: Vec<Product>,
}

impl ProductsResponse {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            success: true,
            products,
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPageResponse {
    pub success: bool,
    pub products: Vec<Product>,
    pub total_pages: usize,
}

impl ProductPageResponse {
    pub fn new(products: Vec<Product>, total_pages: usize) -> Self {
        Self {
            success: true,
            products,
            total_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: Vec<String>,
}

impl CategoriesResponse {
    pub fn new(categories: Vec<String>) -> Self {
        Self {
            success: true,
            categories,
        }
    }
}

/// Single order, either the raw record or the user-populated view.
#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse<T> {
    pub success: bool,
    pub order: T,
}

impl<T> OrderResponse<T> {
    pub fn new(order: T) -> Self {
        Self {
            success: true,
            order,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrdersResponse<T> {
    pub success: bool,
    pub orders: Vec<T>,
}

impl<T> OrdersResponse<T> {
    pub fn new(orders: Vec<T>) -> Self {
        Self {
            success: true,
            orders,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentOrderResponse {
    pub success: bool,
    pub order: GatewayOrder,
}

impl PaymentOrderResponse {
    pub fn new(order: GatewayOrder) -> Self {
        Self {
            success: true,
            order,
        }
    }
}

/// Public gateway key for the checkout widget.
#[derive(Debug, Clone, Serialize)]
pub struct KeyResponse {
    pub key: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscountResponse {
    pub success: bool,
    pub discount: f64,
}

impl DiscountResponse {
    pub fn new(discount: f64) -> Self {
        Self {
            success: true,
            discount,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CouponsResponse {
    pub success: bool,
    pub coupons: Vec<Coupon>,
}

impl CouponsResponse {
    pub fn new(coupons: Vec<Coupon>) -> Self {
        Self {
            success: true,
            coupons,
        }
    }
}

// == Dashboard ==

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: DashboardStats,
}

impl StatsResponse {
    pub fn new(stats: DashboardStats) -> Self {
        Self {
            success: true,
            stats,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PieChartsResponse {
    pub success: bool,
    pub charts: PieCharts,
}

impl PieChartsResponse {
    pub fn new(charts: PieCharts) -> Self {
        Self {
            success: true,
            charts,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarChartsResponse {
    pub success: bool,
    pub bar_charts: BarCharts,
}

impl BarChartsResponse {
    pub fn new(bar_charts: BarCharts) -> Self {
        Self {
            success: true,
            bar_charts,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineChartsResponse {
    pub success: bool,
    pub line_charts: LineCharts,
}

impl LineChartsResponse {
    pub fn new(line_charts: LineCharts) -> Self {
        Self {
            success: true,
            line_charts,
        }
    }
}

// == Service ==

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Cache counters plus the derived hit rate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsResponse {
    pub success: bool,
    pub cache: CacheStats,
    pub hit_rate: f64,
}

impl CacheStatsResponse {
    pub fn new(cache: CacheStats) -> Self {
        Self {
            success: true,
            hit_rate: cache.hit_rate(),
            cache,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_response_serialize() {
        let json = serde_json::to_value(MessageResponse::new("Order placed successfully")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Order placed successfully");
    }

    #[test]
    fn test_error_response_serialize() {
        let json = serde_json::to_value(ErrorResponse::new("Something went wrong")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Something went wrong");
    }

    #[test]
    fn test_product_page_uses_camel_case() {
        let json = serde_json::to_value(ProductPageResponse::new(Vec::new(), 3)).unwrap();
        assert_eq!(json["totalPages"], 3);
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy()).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_cache_stats_hit_rate() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();

        let resp = CacheStatsResponse::new(stats);
        assert!((resp.hit_rate - 0.5).abs() < 0.001);
    }
}
