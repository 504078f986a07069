//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check store bookkeeping and invalidation key sets.

use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

use crate::cache::{invalidation, keys, CacheService, CacheStore, InvalidationRequest};

// == Strategies ==
fn id_strategy() -> impl Strategy<Value = String> {
    "[a-f0-9]{1,12}".prop_map(|s| s)
}

/// Keys that look like the ones handlers actually write.
fn cache_key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(keys::LATEST_PRODUCTS.to_string()),
        Just(keys::CATEGORIES.to_string()),
        Just(keys::ALL_PRODUCTS.to_string()),
        Just(keys::ALL_ORDERS.to_string()),
        Just(keys::STATS.to_string()),
        Just(keys::PIE_CHARTS.to_string()),
        Just(keys::BAR_CHARTS.to_string()),
        Just(keys::LINE_CHARTS.to_string()),
        id_strategy().prop_map(|id| keys::product(&id)),
        id_strategy().prop_map(|id| keys::my_orders(&id)),
        id_strategy().prop_map(|id| keys::single_order(&id)),
    ]
}

fn request_strategy() -> impl Strategy<Value = InvalidationRequest> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        prop::collection::vec(id_strategy(), 0..4),
        prop::option::of(id_strategy()),
        prop::option::of(id_strategy()),
    )
        .prop_map(
            |(product, order, admin, product_ids, order_id, user_id)| InvalidationRequest {
                product,
                order,
                admin,
                product_ids,
                order_id,
                user_id,
            },
        )
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Del { keys: Vec<String> },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (cache_key_strategy(), "[a-z0-9]{0,16}")
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        cache_key_strategy().prop_map(|key| CacheOp::Get { key }),
        prop::collection::vec(cache_key_strategy(), 0..4).prop_map(|keys| CacheOp::Del { keys }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // The store behaves like a plain map: reads return the last write,
    // deletes remove exactly what was present.
    #[test]
    fn prop_store_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store = CacheStore::new(None);
        let mut model: HashMap<String, String> = HashMap::new();
        let mut expected_hits = 0u64;
        let mut expected_misses = 0u64;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key.clone(), value.clone());
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    let got = store.get(&key);
                    prop_assert_eq!(got.as_ref(), model.get(&key));
                    if got.is_some() { expected_hits += 1 } else { expected_misses += 1 }
                }
                CacheOp::Del { keys } => {
                    let unique: BTreeSet<&String> = keys.iter().collect();
                    let expected = unique.iter().filter(|k| model.contains_key(k.as_str())).count();
                    for key in &keys {
                        model.remove(key);
                    }
                    prop_assert_eq!(store.del(&keys), expected);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.total_entries, model.len());
    }

    // Invalidation removes the stale set and nothing else.
    #[test]
    fn prop_invalidate_removes_only_stale_keys(
        seeded in prop::collection::btree_set(cache_key_strategy(), 0..20),
        request in request_strategy(),
    ) {
        let mut store = CacheStore::new(None);
        for key in &seeded {
            store.set(key.clone(), "{}".to_string());
        }

        let stale = request.stale_keys();
        invalidation::invalidate(&mut store, &request);

        let expected: Vec<String> = seeded.difference(&stale).cloned().collect();
        prop_assert_eq!(store.keys(), expected);
    }

    // Flags combine as a set union regardless of how the request is split.
    #[test]
    fn prop_flags_compose(request in request_strategy()) {
        let product_only = InvalidationRequest { order: false, admin: false, ..request.clone() };
        let order_only = InvalidationRequest { product: false, admin: false, ..request.clone() };
        let admin_only = InvalidationRequest { product: false, order: false, ..request.clone() };

        let mut union = product_only.stale_keys();
        union.extend(order_only.stale_keys());
        union.extend(admin_only.stale_keys());

        prop_assert_eq!(request.stale_keys(), union);
    }

    // Invalidating twice is the same as invalidating once.
    #[test]
    fn prop_invalidate_is_idempotent(
        seeded in prop::collection::btree_set(cache_key_strategy(), 0..20),
        request in request_strategy(),
    ) {
        let cache = CacheService::new(CacheStore::new(None));

        let keys_after = tokio_test::block_on(async {
            for key in &seeded {
                cache.set(key, "{}".to_string()).await;
            }
            cache.invalidate(&request).await;
            let once = cache.store().read().await.keys();
            cache.invalidate(&request).await;
            let twice = cache.store().read().await.keys();
            (once, twice)
        });

        prop_assert_eq!(keys_after.0, keys_after.1);
    }
}
