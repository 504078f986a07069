//! Order handlers.

use std::collections::{BTreeMap, HashMap};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::{info, warn};

use super::not_found;
use crate::api::{AdminUser, AppState};
use crate::cache::{keys, InvalidationRequest};
use crate::db::{new_id, DocumentStore, StoreResult};
use crate::error::{ApiError, Result};
use crate::models::{
    ActorQuery, MessageResponse, NewOrderRequest, Order, OrderDetails, OrderResponse,
    OrdersResponse, Product,
};

// == Loaders ==

async fn load_user_orders(db: &dyn DocumentStore, user_id: &str) -> Result<Vec<Order>> {
    Ok(db.orders_for_user(user_id).await?)
}

async fn load_all_orders(db: &dyn DocumentStore) -> Result<Vec<OrderDetails>> {
    let (orders, users) = tokio::try_join!(db.list_orders(), db.list_users())?;
    let users: HashMap<_, _> = users.iter().map(|u| (u.id.as_str(), u)).collect();

    Ok(orders
        .into_iter()
        .map(|order| {
            let user = users.get(order.user.as_str()).copied();
            OrderDetails::populate(order, user)
        })
        .collect())
}

async fn load_order(db: &dyn DocumentStore, id: &str) -> Result<Order> {
    db.find_order(id).await?.ok_or_else(|| not_found("Order"))
}

async fn load_order_details(db: &dyn DocumentStore, id: &str) -> Result<OrderDetails> {
    let order = load_order(db, id).await?;
    let user = db.find_user(&order.user).await?;
    Ok(OrderDetails::populate(order, user.as_ref()))
}

/// Ordered products with their new stock and the quantity taken, or the
/// first item that cannot be served.
async fn reserve_stock(db: &dyn DocumentStore, order: &Order) -> Result<Vec<(Product, u32)>> {
    let mut wanted: BTreeMap<&str, u32> = BTreeMap::new();
    for item in &order.order_items {
        *wanted.entry(item.product_id.as_str()).or_default() += item.quantity;
    }

    let mut reserved = Vec::with_capacity(wanted.len());
    for (product_id, quantity) in wanted {
        let mut product = db
            .find_product(product_id)
            .await?
            .ok_or_else(|| not_found("Product"))?;
        if product.stock < quantity {
            return Err(ApiError::Validation(format!(
                "Not enough stock for {}",
                product.name
            )));
        }
        product.stock -= quantity;
        product.updated_at = order.created_at;
        reserved.push((product, quantity));
    }
    Ok(reserved)
}

/// Writes the reduced stock, then the order.
///
/// A failed write hands back the stock already taken, so a rejected order
/// leaves the catalog as it found it.
async fn place_order(
    db: &dyn DocumentStore,
    order: Order,
    reserved: &[(Product, u32)],
) -> StoreResult<()> {
    for (written, (product, _)) in reserved.iter().enumerate() {
        if let Err(err) = db.update_product(product.clone()).await {
            restore_stock(db, &reserved[..written]).await;
            return Err(err);
        }
    }

    if let Err(err) = db.insert_order(order).await {
        restore_stock(db, reserved).await;
        return Err(err);
    }
    Ok(())
}

async fn restore_stock(db: &dyn DocumentStore, reserved: &[(Product, u32)]) {
    for (product, quantity) in reserved {
        let restored = match db.find_product(&product.id).await {
            Ok(Some(mut current)) => {
                current.stock += quantity;
                db.update_product(current).await
            }
            Ok(None) => Ok(()),
            Err(err) => Err(err),
        };
        if let Err(err) = restored {
            warn!(product_id = %product.id, quantity, error = %err, "failed to restore stock");
        }
    }
}

// == Handlers ==

/// POST /order/new
///
/// The body is validated and every item's stock checked before anything is
/// written. Caches are invalidated even when a write fails.
pub async fn new_order(
    State(state): State<AppState>,
    Json(req): Json<NewOrderRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let order = req.into_order(new_id(), Utc::now())?;
    let reserved = reserve_stock(state.db.as_ref(), &order).await?;

    let invalidation = InvalidationRequest::new()
        .product()
        .product_ids(reserved.iter().map(|(p, _)| p.id.clone()))
        .order()
        .user_id(&order.user)
        .admin();

    let order_id = order.id.clone();
    let user_id = order.user.clone();
    let total = order.total;
    let placed = place_order(state.db.as_ref(), order, &reserved).await;
    state.cache.invalidate(&invalidation).await;
    placed?;

    info!(%order_id, %user_id, total, "order placed");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Order placed successfully")),
    ))
}

/// GET /order/my?id=<userId>
pub async fn my_orders(
    State(state): State<AppState>,
    Query(actor): Query<ActorQuery>,
) -> Result<Json<OrdersResponse<Order>>> {
    let user_id = actor
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Login required".to_string()))?;

    let orders = state
        .cache
        .get_or_populate(&keys::my_orders(&user_id), || {
            load_user_orders(state.db.as_ref(), &user_id)
        })
        .await?;
    Ok(Json(OrdersResponse::new(orders)))
}

/// GET /order/all
pub async fn all_orders(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<OrdersResponse<OrderDetails>>> {
    let orders = state
        .cache
        .get_or_populate(keys::ALL_ORDERS, || load_all_orders(state.db.as_ref()))
        .await?;
    Ok(Json(OrdersResponse::new(orders)))
}

/// GET /order/:id
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse<OrderDetails>>> {
    let order = state
        .cache
        .get_or_populate(&keys::single_order(&id), || {
            load_order_details(state.db.as_ref(), &id)
        })
        .await?;
    Ok(Json(OrderResponse::new(order)))
}

/// PUT /order/:id
///
/// Moves the order one step along processing, shipped, delivered.
pub async fn process_order(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let mut order = load_order(state.db.as_ref(), &id).await?;
    order.advance(Utc::now());
    info!(order_id = %id, status = ?order.status, "order processed");

    let invalidation = InvalidationRequest::new()
        .order()
        .user_id(&order.user)
        .order_id(&id)
        .admin();
    state.db.update_order(order).await?;
    state.cache.invalidate(&invalidation).await;

    Ok(Json(MessageResponse::new("Order processed successfully")))
}

/// DELETE /order/:id
pub async fn delete_order(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let order = state
        .db
        .delete_order(&id)
        .await?
        .ok_or_else(|| not_found("Order"))?;
    info!(order_id = %id, "order deleted");

    state
        .cache
        .invalidate(
            &InvalidationRequest::new()
                .order()
                .user_id(order.user)
                .order_id(id)
                .admin(),
        )
        .await;

    Ok(Json(MessageResponse::new("Order deleted successfully")))
}
