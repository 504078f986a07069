//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Page size for product search
    pub products_per_page: usize,
    /// Default cache TTL in seconds, 0 disables expiry
    pub cache_ttl: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Directory uploaded images are written to
    pub upload_dir: String,
    /// Request body limit for multipart uploads
    pub max_upload_bytes: usize,
    /// Public payment gateway key id
    pub razorpay_key_id: String,
    /// Payment gateway secret, also used for signature verification
    pub razorpay_key_secret: String,
    /// Currency for gateway orders
    pub payment_currency: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 4001)
    /// - `PRODUCTS_PER_PAGE` - Search page size (default: 8)
    /// - `CACHE_TTL` - Default cache TTL in seconds, 0 = never (default: 0)
    /// - `CLEANUP_INTERVAL` - TTL sweep frequency in seconds (default: 60)
    /// - `UPLOAD_DIR` - Upload directory (default: uploads)
    /// - `MAX_UPLOAD_BYTES` - Multipart body limit (default: 5 MiB)
    /// - `RAZORPAY_KEY_ID` / `RAZORPAY_KEY_SECRET` - Gateway credentials
    /// - `PAYMENT_CURRENCY` - Gateway order currency (default: INR)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parsed("PORT").unwrap_or(defaults.server_port),
            products_per_page: parsed("PRODUCTS_PER_PAGE")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.products_per_page),
            cache_ttl: parsed("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            cleanup_interval: parsed("CLEANUP_INTERVAL")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.cleanup_interval),
            upload_dir: text("UPLOAD_DIR").unwrap_or(defaults.upload_dir),
            max_upload_bytes: parsed("MAX_UPLOAD_BYTES").unwrap_or(defaults.max_upload_bytes),
            razorpay_key_id: text("RAZORPAY_KEY_ID").unwrap_or_default(),
            razorpay_key_secret: text("RAZORPAY_KEY_SECRET").unwrap_or_default(),
            payment_currency: text("PAYMENT_CURRENCY").unwrap_or(defaults.payment_currency),
        }
    }

    /// Default TTL handed to the cache store, `None` when expiry is disabled.
    pub fn cache_ttl(&self) -> Option<u64> {
        (self.cache_ttl > 0).then_some(self.cache_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 4001,
            products_per_page: 8,
            cache_ttl: 0,
            cleanup_interval: 60,
            upload_dir: "uploads".to_string(),
            max_upload_bytes: 5 * 1024 * 1024,
            razorpay_key_id: String::new(),
            razorpay_key_secret: String::new(),
            payment_currency: "INR".to_string(),
        }
    }
}

fn text(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed<T: FromStr>(key: &str) -> Option<T> {
    text(key).and_then(|v| v.parse().ok())
}
