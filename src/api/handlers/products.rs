//! Product handlers.
//!
//! Create and update take a multipart form with text fields `name`, `price`,
//! `stock`, `category` and a file field `image`.

use axum::{
    body::Bytes,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;

use super::not_found;
use crate::api::{AdminUser, AppState};
use crate::cache::{keys, InvalidationRequest};
use crate::db::{new_id, DocumentStore, PriceSort, ProductSearch};
use crate::error::{ApiError, Result};
use crate::models::{
    CategoriesResponse, MessageResponse, Product, ProductForm, ProductPageResponse,
    ProductResponse, ProductSearchQuery, ProductsResponse,
};

/// Products shown under "latest".
pub const LATEST_PRODUCTS_LIMIT: usize = 5;

// == Multipart ==

#[derive(Default)]
struct ProductUpload {
    form: ProductForm,
    /// Original file name and content
    image: Option<(String, Bytes)>,
}

async fn read_product_form(mut multipart: Multipart) -> Result<ProductUpload> {
    let bad_form = |err: axum::extract::multipart::MultipartError| {
        ApiError::Validation(err.body_text())
    };

    let mut upload = ProductUpload::default();
    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(bad_form)?;
                if !bytes.is_empty() {
                    upload.image = Some((file_name, bytes));
                }
            }
            "name" => upload.form.name = Some(field.text().await.map_err(bad_form)?),
            "price" => upload.form.price = Some(field.text().await.map_err(bad_form)?),
            "stock" => upload.form.stock = Some(field.text().await.map_err(bad_form)?),
            "category" => upload.form.category = Some(field.text().await.map_err(bad_form)?),
            _ => {}
        }
    }
    Ok(upload)
}

async fn save_image(state: &AppState, file_name: &str, bytes: &[u8]) -> Result<String> {
    state
        .uploads
        .save(file_name, bytes)
        .await
        .map_err(|err| ApiError::Internal(format!("saving upload: {err}")))
}

// == Loaders ==

async fn load_latest(db: &dyn DocumentStore) -> Result<Vec<Product>> {
    Ok(db.latest_products(LATEST_PRODUCTS_LIMIT).await?)
}

async fn load_categories(db: &dyn DocumentStore) -> Result<Vec<String>> {
    Ok(db.product_categories().await?)
}

async fn load_all(db: &dyn DocumentStore) -> Result<Vec<Product>> {
    Ok(db.list_products().await?)
}

async fn load_product(db: &dyn DocumentStore, id: &str) -> Result<Product> {
    db.find_product(id).await?.ok_or_else(|| not_found("Product"))
}

// == Handlers ==

/// POST /product/new
pub async fn new_product(
    _admin: AdminUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let ProductUpload { form, image } = read_product_form(multipart).await?;
    let (file_name, bytes) =
        image.ok_or_else(|| ApiError::Validation("Please add an image".to_string()))?;

    let path = save_image(&state, &file_name, &bytes).await?;
    let product = match form.into_product(new_id(), path.clone(), Utc::now()) {
        Ok(product) => product,
        Err(err) => {
            state.uploads.remove(&path).await;
            return Err(err);
        }
    };

    info!(product_id = %product.id, category = %product.category, "product created");
    if let Err(err) = state.db.insert_product(product).await {
        state.uploads.remove(&path).await;
        return Err(err.into());
    }

    state
        .cache
        .invalidate(&InvalidationRequest::new().product().admin())
        .await;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Product created successfully")),
    ))
}

/// GET /product/all
///
/// Uncached search with optional name, category, max price and price sort.
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<ProductSearchQuery>,
) -> Result<Json<ProductPageResponse>> {
    let per_page = state.config.products_per_page.max(1);
    let non_empty = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let search = ProductSearch {
        name: non_empty(&query.search),
        category: non_empty(&query.category).map(|c| c.to_lowercase()),
        max_price: query.max_price(),
        sort: PriceSort::parse(query.sort.as_deref()),
        skip: (query.page() - 1) * per_page,
        limit: per_page,
    };

    let page = state.db.search_products(&search).await?;
    let total_pages = page.total_matches.div_ceil(per_page);
    Ok(Json(ProductPageResponse::new(page.products, total_pages)))
}

/// GET /product/latest
pub async fn latest_products(State(state): State<AppState>) -> Result<Json<ProductsResponse>> {
    let products = state
        .cache
        .get_or_populate(keys::LATEST_PRODUCTS, || load_latest(state.db.as_ref()))
        .await?;
    Ok(Json(ProductsResponse::new(products)))
}

/// GET /product/categories
pub async fn categories(State(state): State<AppState>) -> Result<Json<CategoriesResponse>> {
    let categories = state
        .cache
        .get_or_populate(keys::CATEGORIES, || load_categories(state.db.as_ref()))
        .await?;
    Ok(Json(CategoriesResponse::new(categories)))
}

/// GET /product/admin-products
pub async fn admin_products(State(state): State<AppState>) -> Result<Json<ProductsResponse>> {
    let products = state
        .cache
        .get_or_populate(keys::ALL_PRODUCTS, || load_all(state.db.as_ref()))
        .await?;
    Ok(Json(ProductsResponse::new(products)))
}

/// GET /product/:id
///
/// Unknown ids answer 404 and leave nothing in the cache.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>> {
    let product = state
        .cache
        .get_or_populate(&keys::product(&id), || load_product(state.db.as_ref(), &id))
        .await?;
    Ok(Json(ProductResponse::new(product)))
}

/// PUT /product/:id
///
/// Only the submitted fields change. A new image replaces the old file.
pub async fn update_product(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<MessageResponse>> {
    let ProductUpload { form, image } = read_product_form(multipart).await?;
    let mut product = load_product(state.db.as_ref(), &id).await?;

    let mut old_image = None;
    if let Some((file_name, bytes)) = image {
        let path = save_image(&state, &file_name, &bytes).await?;
        old_image = Some(std::mem::replace(&mut product.image, path));
    }

    let applied = form.apply_to(&mut product, Utc::now());
    let saved = match applied {
        Ok(()) => state.db.update_product(product.clone()).await.map_err(ApiError::from),
        Err(err) => Err(err),
    };
    if let Err(err) = saved {
        if old_image.is_some() {
            state.uploads.remove(&product.image).await;
        }
        return Err(err);
    }

    if let Some(old_image) = old_image {
        state.uploads.remove(&old_image).await;
    }
    info!(product_id = %id, "product updated");

    state
        .cache
        .invalidate(&InvalidationRequest::new().product().product_id(&id).admin())
        .await;

    Ok(Json(MessageResponse::new("Product updated successfully")))
}

/// DELETE /product/:id
pub async fn delete_product(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let product = state
        .db
        .delete_product(&id)
        .await?
        .ok_or_else(|| not_found("Product"))?;
    state.uploads.remove(&product.image).await;
    info!(product_id = %id, "product deleted");

    state
        .cache
        .invalidate(&InvalidationRequest::new().product().product_id(&id).admin())
        .await;

    Ok(Json(MessageResponse::new("Product deleted successfully")))
}
