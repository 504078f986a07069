//! Cache invalidation.
//!
//! Mutating handlers describe what changed with an [`InvalidationRequest`];
//! the request resolves to the set of stale keys, which the store then drops.

use std::collections::BTreeSet;

use crate::cache::{keys, CacheStore};

// == Invalidation Request ==
/// Which cached categories became stale after a mutation.
///
/// Flags are independent. Ids only matter when their category flag is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationRequest {
    pub product: bool,
    pub order: bool,
    pub admin: bool,
    pub product_ids: Vec<String>,
    pub order_id: Option<String>,
    pub user_id: Option<String>,
}

impl InvalidationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks product listings stale.
    pub fn product(mut self) -> Self {
        self.product = true;
        self
    }

    /// Marks order listings stale.
    pub fn order(mut self) -> Self {
        self.order = true;
        self
    }

    /// Marks every dashboard aggregate stale.
    pub fn admin(mut self) -> Self {
        self.admin = true;
        self
    }

    pub fn product_id(mut self, id: impl Into<String>) -> Self {
        self.product_ids.push(id.into());
        self
    }

    pub fn product_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.product_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn order_id(mut self, id: impl Into<String>) -> Self {
        self.order_id = Some(id.into());
        self
    }

    pub fn user_id(mut self, id: impl Into<String>) -> Self {
        self.user_id = Some(id.into());
        self
    }

    // == Stale Keys ==
    /// Resolves the request to the set of keys to delete.
    ///
    /// Per-entity order keys are only produced for known ids; a key built
    /// from a missing id could never have been populated.
    pub fn stale_keys(&self) -> BTreeSet<String> {
        let mut stale = BTreeSet::new();

        if self.product {
            stale.extend(keys::PRODUCT_KEYS.iter().map(|key| key.to_string()));
            stale.extend(self.product_ids.iter().map(|id| keys::product(id)));
        }

        if self.order {
            stale.insert(keys::ALL_ORDERS.to_string());
            if let Some(user_id) = &self.user_id {
                stale.insert(keys::my_orders(user_id));
            }
            if let Some(order_id) = &self.order_id {
                stale.insert(keys::single_order(order_id));
            }
        }

        if self.admin {
            stale.extend(keys::DASHBOARD_KEYS.iter().map(|key| key.to_string()));
        }

        stale
    }

    /// Returns true when no flag is set.
    pub fn is_empty(&self) -> bool {
        !(self.product || self.order || self.admin)
    }
}

// == Invalidate ==
/// Deletes every key the request marks stale. Never fails.
///
/// Returns the number of entries that were actually present.
pub fn invalidate(store: &mut CacheStore, request: &InvalidationRequest) -> usize {
    store.del(request.stale_keys())
}
