//! Request DTOs
//!
//! Incoming bodies and query strings. Required fields are modelled as
//! `Option` so a missing field turns into a 400 with a readable message
//! instead of a deserialization rejection.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::error::{ApiError, Result};
use crate::models::{
    Gender, Order, OrderItem, OrderStatus, Product, Role, ShippingInfo, User,
};

fn required<T>(field: Option<T>) -> Result<T> {
    field.ok_or_else(|| ApiError::Validation("Please fill all the fields".to_string()))
}

fn required_text(field: Option<String>) -> Result<String> {
    required(field.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

// == Query Strings ==

/// `?id=<userId>` identifying the acting user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorQuery {
    pub id: Option<String>,
}

/// `?coupon=<code>`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CouponQuery {
    pub coupon: Option<String>,
}

/// Product search parameters. Malformed numbers are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductSearchQuery {
    pub search: Option<String>,
    /// `asc` or `desc` by price
    pub sort: Option<String>,
    pub category: Option<String>,
    pub page: Option<String>,
    /// Maximum price
    pub price: Option<String>,
}

impl ProductSearchQuery {
    /// 1-based page number, defaulting to 1.
    pub fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.parse().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1)
    }

    pub fn max_price(&self) -> Option<f64> {
        self.price.as_deref().and_then(|p| p.parse().ok())
    }
}

// == Users ==

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUserRequest {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub gender: Option<Gender>,
    pub dob: Option<NaiveDate>,
    pub role: Option<Role>,
}

impl NewUserRequest {
    pub fn into_user(self, now: DateTime<Utc>) -> Result<User> {
        let email = required_text(self.email)?;
        if !is_plausible_email(&email) {
            return Err(ApiError::Validation("Please enter a valid email".to_string()));
        }

        Ok(User {
            id: required_text(self.id)?,
            name: required_text(self.name)?,
            email,
            image: required_text(self.image)?,
            role: self.role.unwrap_or_default(),
            gender: required(self.gender)?,
            dob: required(self.dob)?,
            created_at: now,
            updated_at: now,
        })
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

// == Products ==

/// Text fields of the multipart product form.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: Option<String>,
    pub price: Option<String>,
    pub stock: Option<String>,
    pub category: Option<String>,
}

impl ProductForm {
    /// Builds a new product; every field is required.
    pub fn into_product(
        self,
        id: String,
        image: String,
        now: DateTime<Utc>,
    ) -> Result<Product> {
        let price = parse_price(&required_text(self.price)?)?;
        let stock = parse_stock(&required_text(self.stock)?)?;

        Ok(Product {
            id,
            name: required_text(self.name)?,
            image,
            price,
            stock,
            category: required_text(self.category)?.to_lowercase(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Overwrites the fields present in the form.
    pub fn apply_to(self, product: &mut Product, now: DateTime<Utc>) -> Result<()> {
        let present = |field: Option<String>| {
            field
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        if let Some(name) = present(self.name) {
            product.name = name;
        }
        if let Some(price) = present(self.price) {
            product.price = parse_price(&price)?;
        }
        if let Some(stock) = present(self.stock) {
            product.stock = parse_stock(&stock)?;
        }
        if let Some(category) = present(self.category) {
            product.category = category.to_lowercase();
        }
        product.updated_at = now;
        Ok(())
    }
}

fn parse_price(raw: &str) -> Result<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or_else(|| ApiError::Validation("Price must be a positive number".to_string()))
}

fn parse_stock(raw: &str) -> Result<u32> {
    raw.parse()
        .map_err(|_| ApiError::Validation("Stock must be a whole number".to_string()))
}

// == Orders ==

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderRequest {
    pub shipping_info: Option<ShippingInfo>,
    pub order_items: Option<Vec<OrderItem>>,
    pub user: Option<String>,
    pub subtotal: Option<f64>,
    pub tax: Option<f64>,
    #[serde(default)]
    pub shipping_charges: f64,
    #[serde(default)]
    pub discount: f64,
    pub total: Option<f64>,
}

impl NewOrderRequest {
    /// Validates the body and builds the order. Nothing is persisted here.
    pub fn into_order(self, id: String, now: DateTime<Utc>) -> Result<Order> {
        let order_items = required(self.order_items.filter(|items| !items.is_empty()))?;
        let subtotal = required(self.subtotal.filter(|v| *v > 0.0))?;
        let total = required(self.total.filter(|v| *v > 0.0))?;

        if order_items.iter().any(|item| item.quantity == 0) {
            return Err(ApiError::Validation(
                "Order item quantity must be at least 1".to_string(),
            ));
        }

        Ok(Order {
            id,
            shipping_info: required(self.shipping_info)?,
            user: required_text(self.user)?,
            subtotal,
            tax: required(self.tax)?,
            shipping_charges: self.shipping_charges,
            discount: self.discount,
            total,
            status: OrderStatus::Processing,
            order_items,
            created_at: now,
            updated_at: now,
        })
    }
}

// == Payments ==

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePaymentRequest {
    /// Amount in major currency units
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(default)]
    pub razorpay_order_id: String,
    #[serde(default)]
    pub razorpay_payment_id: String,
    #[serde(default)]
    pub razorpay_signature: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCouponRequest {
    pub coupon: Option<String>,
    pub amount: Option<f64>,
}

impl NewCouponRequest {
    pub fn validate(self) -> Result<(String, f64)> {
        let code = required_text(self.coupon)?;
        let amount = required(self.amount.filter(|a| *a > 0.0))?;
        Ok((code, amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_missing_field() {
        let json = r#"{"_id":"u1","name":"Asha","email":"a@b.io","gender":"female","dob":"2000-01-01"}"#;
        let req: NewUserRequest = serde_json::from_str(json).unwrap();

        let err = req.into_user(Utc::now()).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_new_user_defaults_role() {
        let json = r#"{"_id":"u1","name":"Asha","email":"a@b.io","image":"x.png","gender":"female","dob":"2000-01-01"}"#;
        let req: NewUserRequest = serde_json::from_str(json).unwrap();

        let user = req.into_user(Utc::now()).unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.dob, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
    }

    #[test]
    fn test_new_user_rejects_bad_email() {
        let req = NewUserRequest {
            id: Some("u1".into()),
            name: Some("Asha".into()),
            email: Some("not-an-email".into()),
            image: Some("x.png".into()),
            gender: Some(Gender::Female),
            dob: NaiveDate::from_ymd_opt(2000, 1, 1),
            role: None,
        };
        assert!(req.into_user(Utc::now()).is_err());
    }

    #[test]
    fn test_product_form_lowercases_category() {
        let form = ProductForm {
            name: Some("Laptop".into()),
            price: Some("999.5".into()),
            stock: Some("3".into()),
            category: Some(" Electronics ".into()),
        };

        let product = form
            .into_product("p1".into(), "uploads/p1.png".into(), Utc::now())
            .unwrap();
        assert_eq!(product.category, "electronics");
        assert_eq!(product.price, 999.5);
        assert_eq!(product.stock, 3);
    }

    #[test]
    fn test_product_form_rejects_bad_price() {
        let form = ProductForm {
            name: Some("Laptop".into()),
            price: Some("free".into()),
            stock: Some("3".into()),
            category: Some("electronics".into()),
        };
        assert!(form
            .into_product("p1".into(), "img".into(), Utc::now())
            .is_err());
    }

    #[test]
    fn test_product_form_partial_update() {
        let now = Utc::now();
        let mut product = ProductForm {
            name: Some("Laptop".into()),
            price: Some("10".into()),
            stock: Some("3".into()),
            category: Some("tech".into()),
        }
        .into_product("p1".into(), "img".into(), now)
        .unwrap();

        ProductForm {
            stock: Some("9".into()),
            ..ProductForm::default()
        }
        .apply_to(&mut product, now)
        .unwrap();

        assert_eq!(product.stock, 9);
        assert_eq!(product.name, "Laptop");
    }

    #[test]
    fn test_new_order_requires_items() {
        let json = r#"{
            "shippingInfo": {"address":"1 Road","city":"Pune","state":"MH","country":"India","pinCode":411001},
            "orderItems": [],
            "user": "u1", "subtotal": 100, "tax": 18, "total": 118
        }"#;
        let req: NewOrderRequest = serde_json::from_str(json).unwrap();
        assert!(req.into_order("o1".into(), Utc::now()).is_err());
    }

    #[test]
    fn test_new_order_defaults_charges() {
        let json = r#"{
            "shippingInfo": {"address":"1 Road","city":"Pune","state":"MH","country":"India","pinCode":411001},
            "orderItems": [{"name":"Pen","price":10,"quantity":2,"image":"pen.png","productId":"p1"}],
            "user": "u1", "subtotal": 20, "tax": 0, "total": 20
        }"#;
        let req: NewOrderRequest = serde_json::from_str(json).unwrap();

        let order = req.into_order("o1".into(), Utc::now()).unwrap();
        assert_eq!(order.shipping_charges, 0.0);
        assert_eq!(order.discount, 0.0);
        assert_eq!(order.status, OrderStatus::Processing);
    }

    #[test]
    fn test_search_query_parsing() {
        let query = ProductSearchQuery {
            page: Some("abc".into()),
            price: Some("500".into()),
            ..ProductSearchQuery::default()
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.max_price(), Some(500.0));
    }

    #[test]
    fn test_coupon_validation() {
        let ok = NewCouponRequest {
            coupon: Some("SAVE10".into()),
            amount: Some(10.0),
        };
        assert_eq!(ok.validate().unwrap(), ("SAVE10".to_string(), 10.0));

        let missing = NewCouponRequest {
            coupon: None,
            amount: Some(10.0),
        };
        assert!(missing.validate().is_err());
    }
}
