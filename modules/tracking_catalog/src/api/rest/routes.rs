//! Route registration

use super::auth::{require_auth, Authenticator};
use super::error::ApiError;
use super::handlers;
use crate::config::ServerConfig;
use crate::domain::Service;
use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Router,
};
use std::any::Any;
use std::sync::Arc;
use tower::{timeout::TimeoutLayer, BoxError, ServiceBuilder};
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

/// Catalog routes, relative to the API prefix
///
/// When an authenticator is supplied every matched route requires a valid
/// token; unmatched paths still fall through to the 404 fallback.
pub fn catalog_routes(service: Arc<Service>, auth: Option<Authenticator>) -> Router {
    let router = Router::new()
        // Event endpoints
        .route(
            "/events",
            get(handlers::list_events).post(handlers::create_event),
        )
        .route(
            "/events/{id}",
            get(handlers::get_event)
                .put(handlers::update_event)
                .delete(handlers::delete_event),
        )
        // Property endpoints
        .route(
            "/properties",
            get(handlers::list_properties).post(handlers::create_property),
        )
        .route(
            "/properties/{id}",
            get(handlers::get_property)
                .put(handlers::update_property)
                .delete(handlers::delete_property),
        )
        // Tracking plan endpoints
        .route(
            "/tracking-plans",
            get(handlers::list_tracking_plans).post(handlers::create_tracking_plan),
        )
        .route(
            "/tracking-plans/{id}",
            get(handlers::get_tracking_plan)
                .put(handlers::update_tracking_plan)
                .delete(handlers::delete_tracking_plan),
        );

    let router = match auth {
        Some(auth) => router.route_layer(middleware::from_fn_with_state(auth, require_auth)),
        None => router,
    };

    router.layer(Extension(service))
}

/// Health, OpenAPI and the catalog routes mounted under `prefix`
pub fn register_routes(
    router: Router,
    prefix: &str,
    service: Arc<Service>,
    auth: Option<Authenticator>,
) -> Router {
    let prefix = normalize_prefix(prefix);
    let openapi = Arc::new(super::openapi::document(&prefix));

    let router = router
        .route("/health", get(handlers::health))
        .route(
            "/openapi.json",
            get(move || {
                let doc = openapi.clone();
                async move { axum::Json(doc.as_ref().clone()) }
            }),
        );

    let catalog = catalog_routes(service, auth);
    let router = if prefix.is_empty() {
        router.merge(catalog)
    } else {
        router.nest(&prefix, catalog)
    };

    router.fallback(handlers::fallback)
}

/// Request ids, tracing, panic recovery, timeout and body limit
///
/// Every failure produced here uses the same JSON envelope as the handlers.
pub fn apply_middleware(router: Router, server: &ServerConfig) -> Router {
    router.layer(DefaultBodyLimit::max(server.body_limit_bytes)).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(CatchPanicLayer::custom(recover_from_panic))
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .layer(TimeoutLayer::new(server.request_timeout)),
    )
}

fn recover_from_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %message, "request handler panicked");
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("request timed out");
        ApiError::new(StatusCode::REQUEST_TIMEOUT, "Request timed out")
    } else {
        tracing::error!(error = %err, "unhandled middleware error");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    }
}

/// `"api/v1/"` → `"/api/v1"`; `"/"` and `""` → `""`
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
