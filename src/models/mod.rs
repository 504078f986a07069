//! Domain entities and the DTOs used for HTTP request and response bodies.

pub mod coupon;
pub mod order;
pub mod product;
pub mod requests;
pub mod responses;
pub mod user;

// Re-export commonly used types
pub use coupon::Coupon;
pub use order::{Order, OrderDetails, OrderItem, OrderStatus, ShippingInfo, UserSummary};
pub use product::Product;
pub use requests::{
    ActorQuery, CouponQuery, CreatePaymentRequest, NewCouponRequest, NewOrderRequest,
    NewUserRequest, ProductForm, ProductSearchQuery, VerifyPaymentRequest,
};
pub use responses::*;
pub use user::{Gender, Role, User};
