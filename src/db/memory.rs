//! In-memory document store.
//!
//! Collections are insertion-ordered vectors behind one async lock. Good for
//! development, tests and single-node demos; everything is lost on restart.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{
    DateRange, DocumentStore, PriceSort, ProductFilter, ProductPage, ProductSearch, StoreError,
    StoreResult, UserFilter,
};
use crate::models::{Coupon, Order, OrderStatus, Product, User};

#[derive(Debug, Default)]
struct Collections {
    users: Vec<User>,
    products: Vec<Product>,
    orders: Vec<Order>,
    coupons: Vec<Coupon>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Items newest first, at most `limit`.
fn newest<T: Clone>(
    items: &[T],
    limit: usize,
    created: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    let mut sorted: Vec<T> = items.to_vec();
    sorted.sort_by_key(|item| std::cmp::Reverse(created(item)));
    sorted.truncate(limit);
    sorted
}

fn remove_by<T>(items: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> Option<T> {
    items
        .iter()
        .position(matches)
        .map(|index| items.remove(index))
}

fn matches_search(product: &Product, search: &ProductSearch) -> bool {
    let name_ok = search.name.as_deref().map_or(true, |needle| {
        product
            .name
            .to_lowercase()
            .contains(&needle.to_lowercase())
    });
    let category_ok = search
        .category
        .as_deref()
        .map_or(true, |category| product.category == category);
    let price_ok = search.max_price.map_or(true, |max| product.price <= max);

    name_ok && category_ok && price_ok
}

#[async_trait]
impl DocumentStore for MemoryStore {
    // == Users ==
    async fn insert_user(&self, user: User) -> StoreResult<()> {
        let mut data = self.data.write().await;
        if data.users.iter().any(|u| u.id == user.id) {
            return Err(StoreError::Duplicate(format!("User {}", user.id)));
        }
        if data.users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(StoreError::Duplicate("Email".to_string()));
        }
        data.users.push(user);
        Ok(())
    }

    async fn find_user(&self, id: &str) -> StoreResult<Option<User>> {
        let data = self.data.read().await;
        Ok(data.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.data.read().await.users.clone())
    }

    async fn delete_user(&self, id: &str) -> StoreResult<Option<User>> {
        let mut data = self.data.write().await;
        Ok(remove_by(&mut data.users, |u| u.id == id))
    }

    async fn count_users(&self, filter: UserFilter) -> StoreResult<u64> {
        let data = self.data.read().await;
        let count = data
            .users
            .iter()
            .filter(|u| filter.gender.map_or(true, |g| u.gender == g))
            .filter(|u| filter.role.map_or(true, |r| u.role == r))
            .count();
        Ok(count as u64)
    }

    async fn users_created_in(&self, range: DateRange) -> StoreResult<Vec<User>> {
        let data = self.data.read().await;
        Ok(data
            .users
            .iter()
            .filter(|u| range.contains(u.created_at))
            .cloned()
            .collect())
    }

    // == Products ==
    async fn insert_product(&self, product: Product) -> StoreResult<()> {
        let mut data = self.data.write().await;
        if data.products.iter().any(|p| p.id == product.id) {
            return Err(StoreError::Duplicate(format!("Product {}", product.id)));
        }
        data.products.push(product);
        Ok(())
    }

    async fn find_product(&self, id: &str) -> StoreResult<Option<Product>> {
        let data = self.data.read().await;
        Ok(data.products.iter().find(|p| p.id == id).cloned())
    }

    async fn update_product(&self, product: Product) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let slot = data
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| StoreError::Missing(format!("product {}", product.id)))?;
        *slot = product;
        Ok(())
    }

    async fn delete_product(&self, id: &str) -> StoreResult<Option<Product>> {
        let mut data = self.data.write().await;
        Ok(remove_by(&mut data.products, |p| p.id == id))
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.data.read().await.products.clone())
    }

    async fn latest_products(&self, limit: usize) -> StoreResult<Vec<Product>> {
        let data = self.data.read().await;
        Ok(newest(&data.products, limit, |p| p.created_at))
    }

    async fn search_products(&self, search: &ProductSearch) -> StoreResult<ProductPage> {
        let data = self.data.read().await;
        let mut matches: Vec<Product> = data
            .products
            .iter()
            .filter(|p| matches_search(p, search))
            .cloned()
            .collect();

        match search.sort {
            PriceSort::None => {}
            PriceSort::Ascending => matches.sort_by(|a, b| a.price.total_cmp(&b.price)),
            PriceSort::Descending => matches.sort_by(|a, b| b.price.total_cmp(&a.price)),
        }

        let total_matches = matches.len();
        let products = matches
            .into_iter()
            .skip(search.skip)
            .take(search.limit)
            .collect();

        Ok(ProductPage {
            products,
            total_matches,
        })
    }

    async fn product_categories(&self) -> StoreResult<Vec<String>> {
        let data = self.data.read().await;
        let distinct: BTreeSet<&String> = data.products.iter().map(|p| &p.category).collect();
        Ok(distinct.into_iter().cloned().collect())
    }

    async fn count_products(&self, filter: &ProductFilter) -> StoreResult<u64> {
        let data = self.data.read().await;
        let count = data
            .products
            .iter()
            .filter(|p| {
                filter
                    .category
                    .as_deref()
                    .map_or(true, |c| p.category == c)
            })
            .filter(|p| !filter.out_of_stock || p.is_out_of_stock())
            .count();
        Ok(count as u64)
    }

    async fn products_created_in(&self, range: DateRange) -> StoreResult<Vec<Product>> {
        let data = self.data.read().await;
        Ok(data
            .products
            .iter()
            .filter(|p| range.contains(p.created_at))
            .cloned()
            .collect())
    }

    // == Orders ==
    async fn insert_order(&self, order: Order) -> StoreResult<()> {
        let mut data = self.data.write().await;
        if data.orders.iter().any(|o| o.id == order.id) {
            return Err(StoreError::Duplicate(format!("Order {}", order.id)));
        }
        data.orders.push(order);
        Ok(())
    }

    async fn find_order(&self, id: &str) -> StoreResult<Option<Order>> {
        let data = self.data.read().await;
        Ok(data.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn update_order(&self, order: Order) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let slot = data
            .orders
            .iter_mut()
            .find(|o| o.id == order.id)
            .ok_or_else(|| StoreError::Missing(format!("order {}", order.id)))?;
        *slot = order;
        Ok(())
    }

    async fn delete_order(&self, id: &str) -> StoreResult<Option<Order>> {
        let mut data = self.data.write().await;
        Ok(remove_by(&mut data.orders, |o| o.id == id))
    }

    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        Ok(self.data.read().await.orders.clone())
    }

    async fn orders_for_user(&self, user_id: &str) -> StoreResult<Vec<Order>> {
        let data = self.data.read().await;
        Ok(data
            .orders
            .iter()
            .filter(|o| o.user == user_id)
            .cloned()
            .collect())
    }

    async fn count_orders(&self, status: Option<OrderStatus>) -> StoreResult<u64> {
        let data = self.data.read().await;
        let count = data
            .orders
            .iter()
            .filter(|o| status.map_or(true, |s| o.status == s))
            .count();
        Ok(count as u64)
    }

    async fn orders_created_in(&self, range: DateRange) -> StoreResult<Vec<Order>> {
        let data = self.data.read().await;
        Ok(data
            .orders
            .iter()
            .filter(|o| range.contains(o.created_at))
            .cloned()
            .collect())
    }

    async fn latest_orders(&self, limit: usize) -> StoreResult<Vec<Order>> {
        let data = self.data.read().await;
        Ok(newest(&data.orders, limit, |o| o.created_at))
    }

    // == Coupons ==
    async fn insert_coupon(&self, coupon: Coupon) -> StoreResult<()> {
        let mut data = self.data.write().await;
        if data.coupons.iter().any(|c| c.coupon == coupon.coupon) {
            return Err(StoreError::Duplicate(format!("Coupon {}", coupon.coupon)));
        }
        data.coupons.push(coupon);
        Ok(())
    }

    async fn find_coupon_by_code(&self, code: &str) -> StoreResult<Option<Coupon>> {
        let data = self.data.read().await;
        Ok(data.coupons.iter().find(|c| c.coupon == code).cloned())
    }

    async fn list_coupons(&self) -> StoreResult<Vec<Coupon>> {
        Ok(self.data.read().await.coupons.clone())
    }

    async fn delete_coupon(&self, id: &str) -> StoreResult<Option<Coupon>> {
        let mut data = self.data.write().await;
        Ok(remove_by(&mut data.coupons, |c| c.id == id))
    }
}
