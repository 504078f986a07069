//! Analytics Module
//!
//! Admin dashboard aggregates built from the document store.
//!
//! # Components
//! - `chart`: month bucketing and lookback windows
//! - `percent`: month-over-month change
//! - `inventory`: category share of the catalogue
//! - `dashboard`: stats, pie, bar and line assemblers

pub mod chart;
mod dashboard;
mod inventory;
mod percent;


pub use chart::{bucketize, count_by_month, sum_by_month, Timestamped};
pub use dashboard::{
    bar_charts, dashboard_stats, line_charts, pie_charts, AdminCustomer, AgeGroups, BarCharts,
    ChangePercent, Counts, DashboardStats, GenderRatio, LineCharts, OrderFulfillment, PieCharts,
    RevenueDistribution, StatsChart, StockAvailability, Transaction, FULL_YEAR, HALF_YEAR,
};
pub use inventory::{category_shares, inventories, CategoryShares};
pub use percent::percent_change;
