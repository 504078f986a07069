//! API Routes
//!
//! Configures the Axum router with every storefront and admin endpoint.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use super::handlers::{dashboard, orders, payments, products, system, users};
use super::AppState;

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/new", post(users::new_user))
        .route("/all", get(users::all_users))
        .route("/:id", get(users::get_user).delete(users::delete_user))
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/new", post(products::new_product))
        .route("/all", get(products::search_products))
        .route("/latest", get(products::latest_products))
        .route("/categories", get(products::categories))
        .route("/admin-products", get(products::admin_products))
        .route(
            "/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/new", post(orders::new_order))
        .route("/my", get(orders::my_orders))
        .route("/all", get(orders::all_orders))
        .route(
            "/:id",
            get(orders::get_order)
                .put(orders::process_order)
                .delete(orders::delete_order),
        )
}

fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(payments::create_payment))
        .route("/key", get(payments::payment_key))
        .route("/verify", post(payments::verify_payment))
        .route("/coupon/new", post(payments::new_coupon))
        .route("/discount", get(payments::apply_discount))
        .route("/coupon/all", get(payments::all_coupons))
        .route("/coupon/:id", delete(payments::delete_coupon))
}

fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(dashboard::stats))
        .route("/pie", get(dashboard::pie))
        .route("/bar", get(dashboard::bar))
        .route("/line", get(dashboard::line))
}

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: allows any origin
/// - Tracing: logs every request
/// - Body limit: `MAX_UPLOAD_BYTES`, sized for product image uploads
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .nest("/user", user_routes())
        .nest("/product", product_routes())
        .nest("/order", order_routes())
        .nest("/payment", payment_routes())
        .nest("/dashboard", dashboard_routes())
        .route("/cache/stats", get(system::cache_stats));

    Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .nest("/api/v1", api)
        .nest_service("/uploads", ServeDir::new(state.uploads.dir()))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
