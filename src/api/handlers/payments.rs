//! Payment and coupon handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::{info, warn};

use super::not_found;
use crate::api::{AdminUser, AppState};
use crate::db::new_id;
use crate::error::{ApiError, Result};
use crate::models::{
    Coupon, CouponQuery, CouponsResponse, CreatePaymentRequest, DiscountResponse, KeyResponse,
    MessageResponse, NewCouponRequest, PaymentOrderResponse, SuccessResponse,
    VerifyPaymentRequest,
};
use crate::payment::{to_minor_units, verify_signature};

// == Gateway ==

/// POST /payment/create
///
/// Opens a gateway order for `amount` in the configured currency.
pub async fn create_payment(
    State(state): State<AppState>,
    Json(req): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<PaymentOrderResponse>)> {
    let amount = req
        .amount
        .and_then(to_minor_units)
        .ok_or_else(|| ApiError::Validation("Please enter a valid amount".to_string()))?;

    let order = state
        .payments
        .create_order(amount, &state.config.payment_currency)
        .await?;
    Ok((StatusCode::CREATED, Json(PaymentOrderResponse::new(order))))
}

/// GET /payment/key
pub async fn payment_key(State(state): State<AppState>) -> Json<KeyResponse> {
    Json(KeyResponse {
        key: state.payments.key_id().to_string(),
    })
}

/// POST /payment/verify
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(req): Json<VerifyPaymentRequest>,
) -> Result<Json<SuccessResponse>> {
    let valid = verify_signature(
        &state.config.razorpay_key_secret,
        &req.razorpay_order_id,
        &req.razorpay_payment_id,
        &req.razorpay_signature,
    );
    if !valid {
        warn!(order_id = %req.razorpay_order_id, "payment signature mismatch");
        return Err(ApiError::Validation("Invalid signature".to_string()));
    }

    info!(
        order_id = %req.razorpay_order_id,
        payment_id = %req.razorpay_payment_id,
        "payment verified"
    );
    Ok(Json(SuccessResponse::ok()))
}

// == Coupons ==

/// POST /payment/coupon/new
pub async fn new_coupon(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(req): Json<NewCouponRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let (code, amount) = req.validate()?;
    let now = Utc::now();

    state
        .db
        .insert_coupon(Coupon {
            id: new_id(),
            coupon: code.clone(),
            amount,
            created_at: now,
            updated_at: now,
        })
        .await?;
    info!(coupon = %code, amount, "coupon created");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(format!("Coupon {code} created successfully"))),
    ))
}

/// GET /payment/discount?coupon=<code>
pub async fn apply_discount(
    State(state): State<AppState>,
    Query(query): Query<CouponQuery>,
) -> Result<Json<DiscountResponse>> {
    let code = query
        .coupon
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("Please enter a coupon code".to_string()))?;

    let coupon = state
        .db
        .find_coupon_by_code(code.trim())
        .await?
        .ok_or_else(|| not_found("Coupon"))?;
    Ok(Json(DiscountResponse::new(coupon.amount)))
}

/// GET /payment/coupon/all
pub async fn all_coupons(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<CouponsResponse>> {
    let coupons = state.db.list_coupons().await?;
    Ok(Json(CouponsResponse::new(coupons)))
}

/// DELETE /payment/coupon/:id
pub async fn delete_coupon(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let coupon = state
        .db
        .delete_coupon(&id)
        .await?
        .ok_or_else(|| ApiError::Validation("Invalid ID".to_string()))?;
    info!(coupon = %coupon.coupon, "coupon deleted");

    Ok(Json(MessageResponse::new(format!(
        "Coupon {} deleted successfully",
        coupon.coupon
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{test_state, user, SECRET};
    use crate::models::Role;
    use crate::payment::sign;

    fn admin() -> AdminUser {
        AdminUser(user("admin-x", Role::Admin))
    }

    #[tokio::test]
    async fn test_create_payment_in_minor_units() {
        let state = test_state().await;

        let (status, Json(body)) = create_payment(
            State(state),
            Json(CreatePaymentRequest { amount: Some(499.5) }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.order.amount, 49_950);
        assert_eq!(body.order.currency, "INR");
    }

    #[tokio::test]
    async fn test_create_payment_requires_amount() {
        let state = test_state().await;

        let err = create_payment(State(state), Json(CreatePaymentRequest::default()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_payment_key() {
        let state = test_state().await;
        assert_eq!(payment_key(State(state)).await.key, "rzp_test_key");
    }

    #[tokio::test]
    async fn test_verify_payment() {
        let state = test_state().await;
        let mut req = VerifyPaymentRequest {
            razorpay_order_id: "order_1".to_string(),
            razorpay_payment_id: "pay_1".to_string(),
            razorpay_signature: sign(SECRET, "order_1", "pay_1"),
        };

        assert!(verify_payment(State(state.clone()), Json(req.clone())).await.is_ok());

        req.razorpay_payment_id = "pay_2".to_string();
        let err = verify_payment(State(state), Json(req)).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid signature");
    }

    #[tokio::test]
    async fn test_coupon_flow() {
        let state = test_state().await;
        let req = NewCouponRequest {
            coupon: Some("SAVE50".to_string()),
            amount: Some(50.0),
        };

        let (status, Json(body)) = new_coupon(admin(), State(state.clone()), Json(req))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.message, "Coupon SAVE50 created successfully");

        let Json(discount) = apply_discount(
            State(state.clone()),
            Query(CouponQuery { coupon: Some("SAVE50".to_string()) }),
        )
        .await
        .unwrap();
        assert_eq!(discount.discount, 50.0);

        let Json(all) = all_coupons(admin(), State(state.clone())).await.unwrap();
        let id = all.coupons[0].id.clone();

        delete_coupon(admin(), State(state.clone()), Path(id.clone())).await.unwrap();
        let err = delete_coupon(admin(), State(state.clone()), Path(id)).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid ID");

        let err = apply_discount(
            State(state),
            Query(CouponQuery { coupon: Some("SAVE50".to_string()) }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Coupon not found");
    }

    #[tokio::test]
    async fn test_duplicate_coupon_is_bad_request() {
        let state = test_state().await;
        let req = || NewCouponRequest {
            coupon: Some("DUP".to_string()),
            amount: Some(10.0),
        };

        new_coupon(admin(), State(state.clone()), Json(req())).await.unwrap();
        let err = new_coupon(admin(), State(state), Json(req())).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
