use axum::{
    Extension,
    body::Body,
    http::{Request, header},
    middleware::Next,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use shared::{abstract_trait::DynJwtService, config::Identity, errors::HttpError};
use tracing::warn;

/// Resolves the caller from the `token` cookie or a bearer header and
/// exposes the verified user id to handlers as `Extension<i32>`, and the
/// full caller as `Extension<Identity>`.
pub async fn auth_middleware(
    cookie_jar: CookieJar,
    Extension(jwt): Extension<DynJwtService>,
    mut req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let token = cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer ").map(str::to_owned))
        })
        .ok_or_else(|| {
            HttpError::Unauthorized(
                "UNAUTHENTICATED",
                "You are not logged in, please provide token".to_string(),
            )
        })?;

    let identity: Identity = jwt.verify_token(&token, "access").map_err(|e| {
        warn!("🔒 Rejected token: {e}");
        HttpError::from(e)
    })?;

    let owner_id = i32::try_from(identity.user_id).map_err(|_| {
        HttpError::Unauthorized("INVALID_TOKEN", "Token subject out of range".to_string())
    })?;

    req.extensions_mut().insert(owner_id);
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
