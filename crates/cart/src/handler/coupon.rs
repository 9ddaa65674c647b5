use crate::{
    abstract_trait::{cart::DynCartService, coupon::DynCouponService},
    domain::{
        requests::coupon::{ApplyCouponRequest, CreateCouponRequest},
        response::{api::ApiResponse, cart::CartResponse, coupon::CouponResponse},
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
    routing::{get, post},
};
use shared::{
    abstract_trait::DynJwtService,
    config::Identity,
    errors::{ErrorResponse, HttpError},
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

const COUPON_ADMIN_ROLES: [&str; 2] = ["ROLE_ADMIN", "ROLE_MODERATOR"];

fn require_coupon_admin(identity: &Identity) -> Result<(), HttpError> {
    if identity.has_any_role(&COUPON_ADMIN_ROLES) {
        return Ok(());
    }

    Err(HttpError::Forbidden(
        "FORBIDDEN",
        "Access denied. Required role: ADMIN or MODERATOR".to_string(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/coupon/apply",
    tag = "Coupon",
    security(("bearer_auth" = [])),
    request_body = ApplyCouponRequest,
    responses(
        (status = 200, description = "Coupon applied", body = CartResponse),
        (status = 404, description = "Coupon not found", body = ErrorResponse),
        (status = 409, description = "Coupon exhausted", body = ErrorResponse),
        (status = 422, description = "Coupon expired or minimum spend not met", body = ErrorResponse)
    )
)]
pub async fn apply_coupon(
    Extension(service): Extension<DynCartService>,
    Extension(owner_id): Extension<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<ApplyCouponRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let cart = service.apply_coupon(owner_id, &body.coupon_code).await?;
    Ok((
        StatusCode::OK,
        Json(CartResponse::success("Coupon applied", cart)),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/coupon/remove",
    tag = "Coupon",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Coupon removed", body = CartResponse),
        (status = 409, description = "Cart modified concurrently", body = ErrorResponse)
    )
)]
pub async fn remove_coupon(
    Extension(service): Extension<DynCartService>,
    Extension(owner_id): Extension<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let cart = service.remove_coupon(owner_id).await?;
    Ok((
        StatusCode::OK,
        Json(CartResponse::success("Coupon removed", cart)),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/coupons",
    tag = "Coupon",
    security(("bearer_auth" = [])),
    request_body = CreateCouponRequest,
    responses(
        (status = 201, description = "Coupon created", body = ApiResponse<CouponResponse>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Caller is not a coupon administrator", body = ErrorResponse),
        (status = 409, description = "Coupon code already exists", body = ErrorResponse)
    )
)]
pub async fn create_coupon(
    Extension(service): Extension<DynCouponService>,
    Extension(identity): Extension<Identity>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateCouponRequest>,
) -> Result<impl IntoResponse, HttpError> {
    require_coupon_admin(&identity)?;

    let response = service.create_coupon(&body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/v1/coupons/{code}",
    tag = "Coupon",
    security(("bearer_auth" = [])),
    params(("code" = String, Path, description = "Coupon code, case-insensitive")),
    responses(
        (status = 200, description = "Coupon details", body = ApiResponse<CouponResponse>),
        (status = 403, description = "Caller is not a coupon administrator", body = ErrorResponse),
        (status = 404, description = "Coupon not found", body = ErrorResponse)
    )
)]
pub async fn get_coupon(
    Extension(service): Extension<DynCouponService>,
    Extension(identity): Extension<Identity>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    require_coupon_admin(&identity)?;

    let response = service.find_coupon(&code).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn coupon_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let jwt = app_state.jwt_config.clone();

    cart_coupon_routes(app_state.di_container.cart_service.clone(), jwt.clone()).merge(
        coupon_admin_routes(app_state.di_container.coupon_service.clone(), jwt),
    )
}

fn cart_coupon_routes(cart_service: DynCartService, jwt: DynJwtService) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/v1/coupon/apply", post(apply_coupon))
        .route("/api/v1/coupon/remove", post(remove_coupon))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(cart_service))
        .layer(Extension(jwt))
}

fn coupon_admin_routes(coupon_service: DynCouponService, jwt: DynJwtService) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/v1/coupons", post(create_coupon))
        .route("/api/v1/coupons/{code}", get(get_coupon))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(coupon_service))
        .layer(Extension(jwt))
}
