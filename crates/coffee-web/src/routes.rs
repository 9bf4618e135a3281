//! HTTP routes: the page, htmx fragment endpoints, CSV export and the wasm
//! bundle.

use axum::extract::{Form, Query, State};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::Router;
use http::{StatusCode, header};
use serde::Deserialize;
use std::path::Path;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;

use crate::app;
use crate::db::{ProductDeletion, Store};
use crate::export;
use crate::price::Price;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
}

/// Build the application router. `pkg_dir` holds the compiled wasm bundle
/// and stylesheet, served under `/pkg`.
pub fn router(state: AppState, pkg_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/get_csv", get(get_csv))
        .route("/hx/create_order", post(create_order))
        .route("/hx/delete_order", delete(delete_order))
        .route("/hx/create_product", post(create_product))
        .route("/hx/update_product", post(update_product))
        .route("/hx/delete_product", delete(delete_product))
        .nest_service("/pkg", ServeDir::new(pkg_dir))
        .fallback(not_found)
        .layer(CompressionLayer::new())
        .with_state(state)
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum AppError {
    NotFound,
    BadRequest(&'static str),
    Conflict(String),
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Internal(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, Html(app::render_not_found())).into_response(),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg).into_response(),
            AppError::Internal(e) => {
                log::error!("[routes] request failed: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

type HtmlResult = Result<Html<String>, AppError>;

// ── Forms ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateOrderForm {
    pub product: i64,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductForm {
    pub name: String,
    pub price: Price,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductForm {
    pub product: i64,
    pub name: String,
    pub price: Price,
}

fn product_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("product name must not be empty"));
    }
    Ok(name)
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn content(store: &Store) -> HtmlResult {
    let (orders, products) = tokio::try_join!(store.orders(), store.products())?;
    Ok(Html(app::render_content(orders, products)))
}

async fn index(State(state): State<AppState>) -> HtmlResult {
    let (orders, products) = tokio::try_join!(state.store.orders(), state.store.products())?;
    Ok(Html(app::render_index(orders, products)))
}

async fn get_csv(State(state): State<AppState>) -> Result<Response, AppError> {
    let orders = state.store.order_history().await?;
    let body = export::orders_csv(&orders)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"orders.csv\""),
        ],
        body,
    )
        .into_response())
}

async fn create_order(State(state): State<AppState>, Form(form): Form<CreateOrderForm>) -> HtmlResult {
    let Some(id) = state.store.create_order(form.product).await? else {
        return Err(AppError::NotFound);
    };
    log::info!("[routes] order {} placed for product {}", id, form.product);
    content(&state.store).await
}

async fn delete_order(State(state): State<AppState>, Query(query): Query<IdQuery>) -> HtmlResult {
    if !state.store.delete_order(query.id).await? {
        return Err(AppError::NotFound);
    }
    content(&state.store).await
}

async fn create_product(State(state): State<AppState>, Form(form): Form<CreateProductForm>) -> HtmlResult {
    let name = product_name(&form.name)?;
    state.store.create_product(name, form.price).await?;

    let products = state.store.products().await?;
    Ok(Html(app::render_product_list(products)))
}

async fn update_product(State(state): State<AppState>, Form(form): Form<UpdateProductForm>) -> HtmlResult {
    let name = product_name(&form.name)?;
    if !state.store.update_product(form.product, name, form.price).await? {
        return Err(AppError::NotFound);
    }
    content(&state.store).await
}

/// Responds with an empty body; the card swaps itself out.
async fn delete_product(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<StatusCode, AppError> {
    match state.store.delete_product(query.id).await? {
        ProductDeletion::Deleted => Ok(StatusCode::OK),
        ProductDeletion::NotFound => Err(AppError::NotFound),
        ProductDeletion::HasOrders(count) => Err(AppError::Conflict(format!(
            "product {} still has {} orders",
            query.id, count
        ))),
    }
}

async fn not_found() -> AppError {
    AppError::NotFound
}
