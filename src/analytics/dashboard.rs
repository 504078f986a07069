//! Dashboard aggregate assemblers.
//!
//! Each assembler runs a fixed set of store queries concurrently and folds
//! the results into one payload. Caching is the caller's concern; these
//! functions always hit the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::chart::{count_by_month, last_month, sum_by_month, this_month, window_range};
use super::inventory::{inventories, CategoryShares};
use super::percent::percent_change;
use crate::db::{DocumentStore, ProductFilter, StoreResult, UserFilter};
use crate::models::{Gender, Order, OrderStatus, Role};

/// Months in the stats revenue chart and the short bar series.
pub const HALF_YEAR: usize = 6;
/// Months in the long bar series and the line charts.
pub const FULL_YEAR: usize = 12;
/// Orders shown under latest transactions.
pub const LATEST_TRANSACTIONS: usize = 4;
/// Share of gross income booked as marketing cost.
pub const MARKETING_SHARE: f64 = 0.20;

fn revenue(orders: &[Order]) -> f64 {
    orders.iter().map(|o| o.total).sum()
}

// == Stats ==

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangePercent {
    pub revenue: f64,
    pub product: f64,
    pub user: f64,
    pub order: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Counts {
    pub revenue: f64,
    pub product: u64,
    pub user: u64,
    pub order: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsChart {
    pub order: Vec<u64>,
    pub revenue: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenderRatio {
    pub male: u64,
    pub female: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: String,
    pub discount: f64,
    pub amount: f64,
    /// Number of line items
    pub quantity: usize,
    pub status: OrderStatus,
}

impl From<&Order> for Transaction {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            discount: order.discount,
            amount: order.total,
            quantity: order.order_items.len(),
            status: order.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub category_count: CategoryShares,
    pub change_percent: ChangePercent,
    pub count: Counts,
    pub chart: StatsChart,
    pub user_gender_ratio: GenderRatio,
    pub latest_transactions: Vec<Transaction>,
}

/// Headline numbers: month-over-month change, totals, a six-month revenue
/// chart, inventory mix, gender split and the latest orders.
pub async fn dashboard_stats(
    db: &dyn DocumentStore,
    today: DateTime<Utc>,
) -> StoreResult<DashboardStats> {
    let this = this_month(today);
    let last = last_month(today);
    let male = UserFilter {
        gender: Some(Gender::Male),
        ..UserFilter::default()
    };
    let all_products = ProductFilter::default();

    let (
        this_month_products,
        last_month_products,
        this_month_users,
        last_month_users,
        this_month_orders,
        last_month_orders,
        products_count,
        users_count,
        all_orders,
        half_year_orders,
        categories,
        male_users,
        latest_orders,
    ) = tokio::try_join!(
        db.products_created_in(this),
        db.products_created_in(last),
        db.users_created_in(this),
        db.users_created_in(last),
        db.orders_created_in(this),
        db.orders_created_in(last),
        db.count_products(&all_products),
        db.count_users(UserFilter::default()),
        db.list_orders(),
        db.orders_created_in(window_range(today, HALF_YEAR)),
        db.product_categories(),
        db.count_users(male),
        db.latest_orders(LATEST_TRANSACTIONS),
    )?;

    let category_count = inventories(db, &categories, products_count).await?;

    let change_percent = ChangePercent {
        revenue: percent_change(revenue(&this_month_orders), revenue(&last_month_orders)),
        product: percent_change(
            this_month_products.len() as f64,
            last_month_products.len() as f64,
        ),
        user: percent_change(this_month_users.len() as f64, last_month_users.len() as f64),
        order: percent_change(
            this_month_orders.len() as f64,
            last_month_orders.len() as f64,
        ),
    };

    let count = Counts {
        revenue: revenue(&all_orders),
        product: products_count,
        user: users_count,
        order: all_orders.len() as u64,
    };

    let chart = StatsChart {
        order: count_by_month(&half_year_orders, HALF_YEAR, today),
        revenue: sum_by_month(&half_year_orders, HALF_YEAR, today, |o| o.total),
    };

    Ok(DashboardStats {
        category_count,
        change_percent,
        count,
        chart,
        user_gender_ratio: GenderRatio {
            male: male_users,
            female: users_count.saturating_sub(male_users),
        },
        latest_transactions: latest_orders.iter().map(Transaction::from).collect(),
    })
}

// == Pie Charts ==

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderFulfillment {
    pub processing: u64,
    pub shipped: u64,
    pub delivered: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAvailability {
    pub in_stock: u64,
    pub out_of_stock: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueDistribution {
    pub net_margin: f64,
    pub discount: f64,
    /// Shipping charges
    pub production_cost: f64,
    /// Tax
    pub burnt: f64,
    pub marketing_cost: f64,
}

impl RevenueDistribution {
    pub fn from_orders(orders: &[Order]) -> Self {
        let gross_income = revenue(orders);
        let discount: f64 = orders.iter().map(|o| o.discount).sum();
        let production_cost: f64 = orders.iter().map(|o| o.shipping_charges).sum();
        let burnt: f64 = orders.iter().map(|o| o.tax).sum();
        let marketing_cost = (gross_income * MARKETING_SHARE).round();

        Self {
            net_margin: gross_income - discount - production_cost - burnt - marketing_cost,
            discount,
            production_cost,
            burnt,
            marketing_cost,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgeGroups {
    /// Under 20
    pub teen: u64,
    /// 20 to 39
    pub adult: u64,
    /// 40 and over
    pub senior: u64,
}

impl AgeGroups {
    pub fn from_ages(ages: impl IntoIterator<Item = i32>) -> Self {
        ages.into_iter().fold(Self::default(), |mut groups, age| {
            match age {
                ..=19 => groups.teen += 1,
                20..=39 => groups.adult += 1,
                _ => groups.senior += 1,
            }
            groups
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminCustomer {
    pub admin: u64,
    pub customer: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieCharts {
    #[serde(rename = "orderFullfillment")]
    pub order_fulfillment: OrderFulfillment,
    pub product_categories: CategoryShares,
    pub stock_availability: StockAvailability,
    pub revenue_distribution: RevenueDistribution,
    pub users_age_group: AgeGroups,
    pub admin_customer: AdminCustomer,
}

/// Distribution breakdowns: order status, catalogue, stock, revenue, user
/// ages and roles.
pub async fn pie_charts(db: &dyn DocumentStore, today: DateTime<Utc>) -> StoreResult<PieCharts> {
    let out_of_stock = ProductFilter {
        out_of_stock: true,
        ..ProductFilter::default()
    };
    let all_products = ProductFilter::default();
    let role = |role| UserFilter {
        role: Some(role),
        ..UserFilter::default()
    };

    let (
        processing,
        shipped,
        delivered,
        categories,
        products_count,
        products_out_of_stock,
        all_orders,
        all_users,
        admin_users,
        customer_users,
    ) = tokio::try_join!(
        db.count_orders(Some(OrderStatus::Processing)),
        db.count_orders(Some(OrderStatus::Shipped)),
        db.count_orders(Some(OrderStatus::Delivered)),
        db.product_categories(),
        db.count_products(&all_products),
        db.count_products(&out_of_stock),
        db.list_orders(),
        db.list_users(),
        db.count_users(role(Role::Admin)),
        db.count_users(role(Role::User)),
    )?;

    let product_categories = inventories(db, &categories, products_count).await?;
    let today = today.date_naive();

    Ok(PieCharts {
        order_fulfillment: OrderFulfillment {
            processing,
            shipped,
            delivered,
        },
        product_categories,
        stock_availability: StockAvailability {
            in_stock: products_count.saturating_sub(products_out_of_stock),
            out_of_stock: products_out_of_stock,
        },
        revenue_distribution: RevenueDistribution::from_orders(&all_orders),
        users_age_group: AgeGroups::from_ages(all_users.iter().map(|u| u.age_on(today))),
        admin_customer: AdminCustomer {
            admin: admin_users,
            customer: customer_users,
        },
    })
}

// == Bar Charts ==

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarCharts {
    /// Six months
    pub products: Vec<u64>,
    /// Six months
    pub users: Vec<u64>,
    /// Twelve months
    pub orders: Vec<u64>,
}

pub async fn bar_charts(db: &dyn DocumentStore, today: DateTime<Utc>) -> StoreResult<BarCharts> {
    let (products, users, orders) = tokio::try_join!(
        db.products_created_in(window_range(today, HALF_YEAR)),
        db.users_created_in(window_range(today, HALF_YEAR)),
        db.orders_created_in(window_range(today, FULL_YEAR)),
    )?;

    Ok(BarCharts {
        products: count_by_month(&products, HALF_YEAR, today),
        users: count_by_month(&users, HALF_YEAR, today),
        orders: count_by_month(&orders, FULL_YEAR, today),
    })
}

// == Line Charts ==

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineCharts {
    pub products: Vec<u64>,
    pub users: Vec<u64>,
    pub discount: Vec<f64>,
    pub revenue: Vec<f64>,
}

pub async fn line_charts(db: &dyn DocumentStore, today: DateTime<Utc>) -> StoreResult<LineCharts> {
    let year = window_range(today, FULL_YEAR);
    let (products, users, orders) = tokio::try_join!(
        db.products_created_in(year),
        db.users_created_in(year),
        db.orders_created_in(year),
    )?;

    Ok(LineCharts {
        products: count_by_month(&products, FULL_YEAR, today),
        users: count_by_month(&users, FULL_YEAR, today),
        discount: sum_by_month(&orders, FULL_YEAR, today, |o| o.discount),
        revenue: sum_by_month(&orders, FULL_YEAR, today, |o| o.total),
    })
}
