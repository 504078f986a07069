//! Category share of the product catalogue.

use std::collections::BTreeMap;

use crate::db::{DocumentStore, ProductFilter, StoreResult};

/// `[{ category: percent }]`, one single-entry map per category.
pub type CategoryShares = Vec<BTreeMap<String, u32>>;

/// Rounded percentage of `total` that each category count represents.
///
/// Every share is 0 when the catalogue is empty.
pub fn category_shares(counts: &[(String, u64)], total: u64) -> CategoryShares {
    counts
        .iter()
        .map(|(category, count)| {
            let share = if total == 0 {
                0
            } else {
                (*count as f64 / total as f64 * 100.0).round() as u32
            };
            BTreeMap::from([(category.clone(), share)])
        })
        .collect()
}

/// Counts each category in the store and turns the counts into shares.
pub async fn inventories(
    db: &dyn DocumentStore,
    categories: &[String],
    total: u64,
) -> StoreResult<CategoryShares> {
    let mut counts = Vec::with_capacity(categories.len());
    for category in categories {
        let filter = ProductFilter {
            category: Some(category.clone()),
            ..ProductFilter::default()
        };
        counts.push((category.clone(), db.count_products(&filter).await?));
    }
    Ok(category_shares(&counts, total))
}
