use crate::{
    abstract_trait::cart::DynCartService,
    domain::{
        requests::cart::{AddCartItemRequest, UpdateCartItemRequest},
        response::cart::CartResponse,
    },
    middleware::{jwt::auth_middleware, validate::SimpleValidatedJson},
    state::AppState,
};
use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use shared::errors::{ErrorResponse, HttpError};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/v1/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current cart", body = CartResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_cart(
    Extension(service): Extension<DynCartService>,
    Extension(owner_id): Extension<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let cart = service.get_cart(owner_id).await?;
    Ok((
        StatusCode::OK,
        Json(CartResponse::success("Cart retrieved successfully", cart)),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = AddCartItemRequest,
    responses(
        (status = 200, description = "Item added", body = CartResponse),
        (status = 400, description = "Invalid quantity", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 409, description = "Cart modified concurrently", body = ErrorResponse),
        (status = 503, description = "Product catalog unavailable", body = ErrorResponse)
    )
)]
pub async fn add_item(
    Extension(service): Extension<DynCartService>,
    Extension(owner_id): Extension<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<AddCartItemRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let cart = service
        .add_item(owner_id, body.product_id, body.quantity)
        .await?;
    Ok((
        StatusCode::OK,
        Json(CartResponse::success("Item added to cart", cart)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/cart/{item_id}",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(("item_id" = i32, Path, description = "Cart item ID")),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Quantity updated", body = CartResponse),
        (status = 400, description = "Invalid quantity", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 409, description = "Cart modified concurrently", body = ErrorResponse)
    )
)]
pub async fn update_item(
    Extension(service): Extension<DynCartService>,
    Extension(owner_id): Extension<i32>,
    Path(item_id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateCartItemRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let cart = service
        .update_quantity(owner_id, item_id, body.quantity)
        .await?;
    Ok((
        StatusCode::OK,
        Json(CartResponse::success("Cart item updated", cart)),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/cart/{item_id}",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(("item_id" = i32, Path, description = "Cart item ID")),
    responses(
        (status = 200, description = "Item removed", body = CartResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 409, description = "Cart modified concurrently", body = ErrorResponse)
    )
)]
pub async fn remove_item(
    Extension(service): Extension<DynCartService>,
    Extension(owner_id): Extension<i32>,
    Path(item_id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let cart = service.remove_item(owner_id, item_id).await?;
    Ok((
        StatusCode::OK,
        Json(CartResponse::success("Item removed from cart", cart)),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cart cleared", body = CartResponse),
        (status = 409, description = "Cart modified concurrently", body = ErrorResponse)
    )
)]
pub async fn clear_cart(
    Extension(service): Extension<DynCartService>,
    Extension(owner_id): Extension<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let cart = service.clear_cart(owner_id).await?;
    Ok((
        StatusCode::OK,
        Json(CartResponse::success("Cart cleared", cart)),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/cart/checkout",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cart as it was checked out", body = CartResponse),
        (status = 409, description = "Coupon exhausted or cart modified concurrently", body = ErrorResponse),
        (status = 422, description = "Cart is empty", body = ErrorResponse)
    )
)]
pub async fn checkout(
    Extension(service): Extension<DynCartService>,
    Extension(owner_id): Extension<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let cart = service.checkout(owner_id).await?;
    Ok((
        StatusCode::OK,
        Json(CartResponse::success("Checkout completed", cart)),
    ))
}

pub fn cart_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/v1/cart", get(get_cart))
        .route("/api/v1/cart", post(add_item))
        .route("/api/v1/cart", delete(clear_cart))
        .route("/api/v1/cart/checkout", post(checkout))
        .route("/api/v1/cart/{item_id}", put(update_item))
        .route("/api/v1/cart/{item_id}", delete(remove_item))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.cart_service.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
