use std::{num::NonZeroU32, sync::Arc};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::DefaultClock,
    state::keyed::DashMapStateStore,
    Quota, RateLimiter,
};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::{error::AppError, models::user::User, state::AppState};

type KeyedRateLimiter = RateLimiter<String, DashMapStateStore<String>, DefaultClock>;
static RATE_LIMITER: OnceCell<KeyedRateLimiter> = OnceCell::const_new();

/// Resolve the caller's identity from a bearer token and attach the local
/// user to the request. Verification failures do not abort the request;
/// handlers that require identity reject unauthenticated callers themselves.
pub async fn auth_middleware(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request<Body>,
    next: Next<Body>,
) -> Result<Response, AppError> {
    if let Some(token) = bearer_token(&headers) {
        match app_state.auth_service.resolve_identity(token).await {
            Ok(identity) => match app_state.user_service.resolve_user(&identity).await {
                Ok(user) => {
                    debug!("Authenticated user: {} ({})", user.id, user.email);
                    request.extensions_mut().insert(user);
                }
                Err(e) => {
                    warn!("Failed to resolve local user: {}", e);
                }
            },
            Err(e) => {
                debug!("Token verification failed: {}", e);
            }
        }
    }

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Per-client-IP rate limiting.
pub async fn rate_limit_middleware(
    State(app_state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next<Body>,
) -> Result<Response, AppError> {
    let rate_limiter = RATE_LIMITER
        .get_or_init(|| async {
            let per_minute = app_state.config.rate_limit_requests.max(1);
            let quota = Quota::per_minute(NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN))
                .allow_burst(NonZeroU32::new(10).unwrap_or(NonZeroU32::MIN));
            RateLimiter::dashmap(quota)
        })
        .await;

    let client_ip = client_ip(&request);

    match rate_limiter.check_key(&client_ip) {
        Ok(_) => Ok(next.run(request).await),
        Err(_) => {
            warn!("Rate limit exceeded for IP: {}", client_ip);
            Err(AppError::RateLimitExceeded)
        }
    }
}

pub async fn request_logging_middleware(request: Request<Body>, next: Next<Body>) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start_time = std::time::Instant::now();

    let response = next.run(request).await;

    info!(
        "Request completed: {} {} {} - {}ms",
        method,
        uri,
        response.status().as_u16(),
        start_time.elapsed().as_millis()
    );

    response
}

fn client_ip(request: &Request<Body>) -> String {
    let headers = request.headers();

    if let Some(forwarded_for) = headers.get("x-forwarded-for") {
        if let Ok(ip_str) = forwarded_for.to_str() {
            if let Some(ip) = ip_str.split(',').next() {
                return ip.trim().to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(ip_str) = real_ip.to_str() {
            return ip_str.to_string();
        }
    }

    request
        .extensions()
        .get::<std::net::SocketAddr>()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Optional identity extractor; handlers requiring auth unwrap it to a 401.
pub struct OptionalAuth(pub Option<User>);

#[async_trait::async_trait]
impl<S> axum::extract::FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<User>().cloned();
        Ok(OptionalAuth(user))
    }
}
