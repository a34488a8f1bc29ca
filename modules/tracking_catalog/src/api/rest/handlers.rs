//! HTTP request handlers - thin layer that delegates to domain service

use super::dto::*;
use super::error::{ApiError, ErrorBody};
use crate::domain::validation::parse_id;
use crate::domain::Service;
use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

type Payload<T> = Result<Json<T>, JsonRejection>;

// ===== Event Handlers =====

/// Create a new event
#[utoipa::path(
    post,
    path = "/events",
    tag = "events",
    request_body = EventRequest,
    responses(
        (status = 201, description = "Event created", body = EventDto),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 409, description = "Event with the same name and type exists", body = ErrorBody),
    )
)]
pub async fn create_event(
    Extension(service): Extension<Arc<Service>>,
    payload: Payload<EventRequest>,
) -> Result<(StatusCode, Json<EventDto>), ApiError> {
    let Json(req) = payload?;
    let event = service.create_event(req.into()).await?;
    Ok((StatusCode::CREATED, Json(event.into())))
}

/// List all events
#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    responses((status = 200, description = "All events", body = [EventDto]))
)]
pub async fn list_events(
    Extension(service): Extension<Arc<Service>>,
) -> Result<Json<Vec<EventDto>>, ApiError> {
    let events = service.list_events().await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

/// Get an event by id
#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "events",
    params(("id" = uuid::Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event found", body = EventDto),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "Event not found", body = ErrorBody),
    )
)]
pub async fn get_event(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<String>,
) -> Result<Json<EventDto>, ApiError> {
    let event = service.get_event(parse_id(&id)?).await?;
    Ok(Json(event.into()))
}

/// Replace an event's name, type and description
#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = "events",
    params(("id" = uuid::Uuid, Path, description = "Event id")),
    request_body = EventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventDto),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 404, description = "Event not found", body = ErrorBody),
        (status = 409, description = "Event with the same name and type exists", body = ErrorBody),
    )
)]
pub async fn update_event(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<String>,
    payload: Payload<EventRequest>,
) -> Result<Json<EventDto>, ApiError> {
    let id = parse_id(&id)?;
    let Json(req) = payload?;
    let event = service.update_event(id, req.into()).await?;
    Ok(Json(event.into()))
}

/// Delete an event that no tracking plan references
#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "events",
    params(("id" = uuid::Uuid, Path, description = "Event id")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found", body = ErrorBody),
        (status = 409, description = "Event is bound to a tracking plan", body = ErrorBody),
    )
)]
pub async fn delete_event(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.delete_event(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Property Handlers =====

/// Create a new property
#[utoipa::path(
    post,
    path = "/properties",
    tag = "properties",
    request_body = PropertyRequest,
    responses(
        (status = 201, description = "Property created", body = PropertyDto),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 409, description = "Property with the same name and type exists", body = ErrorBody),
    )
)]
pub async fn create_property(
    Extension(service): Extension<Arc<Service>>,
    payload: Payload<PropertyRequest>,
) -> Result<(StatusCode, Json<PropertyDto>), ApiError> {
    let Json(req) = payload?;
    let property = service.create_property(req.into()).await?;
    Ok((StatusCode::CREATED, Json(property.into())))
}

/// List all properties
#[utoipa::path(
    get,
    path = "/properties",
    tag = "properties",
    responses((status = 200, description = "All properties", body = [PropertyDto]))
)]
pub async fn list_properties(
    Extension(service): Extension<Arc<Service>>,
) -> Result<Json<Vec<PropertyDto>>, ApiError> {
    let properties = service.list_properties().await?;
    Ok(Json(properties.into_iter().map(Into::into).collect()))
}

/// Get a property by id
#[utoipa::path(
    get,
    path = "/properties/{id}",
    tag = "properties",
    params(("id" = uuid::Uuid, Path, description = "Property id")),
    responses(
        (status = 200, description = "Property found", body = PropertyDto),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "Property not found", body = ErrorBody),
    )
)]
pub async fn get_property(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<String>,
) -> Result<Json<PropertyDto>, ApiError> {
    let property = service.get_property(parse_id(&id)?).await?;
    Ok(Json(property.into()))
}

/// Replace a property's name, type and description
#[utoipa::path(
    put,
    path = "/properties/{id}",
    tag = "properties",
    params(("id" = uuid::Uuid, Path, description = "Property id")),
    request_body = PropertyRequest,
    responses(
        (status = 200, description = "Property updated", body = PropertyDto),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 404, description = "Property not found", body = ErrorBody),
        (status = 409, description = "Property with the same name and type exists", body = ErrorBody),
    )
)]
pub async fn update_property(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<String>,
    payload: Payload<PropertyRequest>,
) -> Result<Json<PropertyDto>, ApiError> {
    let id = parse_id(&id)?;
    let Json(req) = payload?;
    let property = service.update_property(id, req.into()).await?;
    Ok(Json(property.into()))
}

/// Delete a property that no tracking plan references
#[utoipa::path(
    delete,
    path = "/properties/{id}",
    tag = "properties",
    params(("id" = uuid::Uuid, Path, description = "Property id")),
    responses(
        (status = 204, description = "Property deleted"),
        (status = 404, description = "Property not found", body = ErrorBody),
        (status = 409, description = "Property is bound to a tracking plan", body = ErrorBody),
    )
)]
pub async fn delete_property(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.delete_property(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Tracking Plan Handlers =====

/// Create a tracking plan, reconciling its events and properties
#[utoipa::path(
    post,
    path = "/tracking-plans",
    tag = "tracking-plans",
    request_body = TrackingPlanRequest,
    responses(
        (status = 201, description = "Tracking plan created", body = TrackingPlanDto),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 409, description = "Name taken or definition conflict", body = ErrorBody),
    )
)]
pub async fn create_tracking_plan(
    Extension(service): Extension<Arc<Service>>,
    payload: Payload<TrackingPlanRequest>,
) -> Result<(StatusCode, Json<TrackingPlanDto>), ApiError> {
    let Json(req) = payload?;
    let plan = service.create_plan(req.into()).await?;
    Ok((StatusCode::CREATED, Json(plan.into())))
}

/// List all tracking plans with their bindings
#[utoipa::path(
    get,
    path = "/tracking-plans",
    tag = "tracking-plans",
    responses((status = 200, description = "All tracking plans", body = [TrackingPlanDto]))
)]
pub async fn list_tracking_plans(
    Extension(service): Extension<Arc<Service>>,
) -> Result<Json<Vec<TrackingPlanDto>>, ApiError> {
    let plans = service.list_plans().await?;
    Ok(Json(plans.into_iter().map(Into::into).collect()))
}

/// Get a tracking plan with its bindings
#[utoipa::path(
    get,
    path = "/tracking-plans/{id}",
    tag = "tracking-plans",
    params(("id" = uuid::Uuid, Path, description = "Tracking plan id")),
    responses(
        (status = 200, description = "Tracking plan found", body = TrackingPlanDto),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "Tracking plan not found", body = ErrorBody),
    )
)]
pub async fn get_tracking_plan(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<String>,
) -> Result<Json<TrackingPlanDto>, ApiError> {
    let plan = service.get_plan(parse_id(&id)?).await?;
    Ok(Json(plan.into()))
}

/// Replace a tracking plan and rebuild its bindings
#[utoipa::path(
    put,
    path = "/tracking-plans/{id}",
    tag = "tracking-plans",
    params(("id" = uuid::Uuid, Path, description = "Tracking plan id")),
    request_body = TrackingPlanRequest,
    responses(
        (status = 200, description = "Tracking plan updated", body = TrackingPlanDto),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 404, description = "Tracking plan not found", body = ErrorBody),
        (status = 409, description = "Name taken or definition conflict", body = ErrorBody),
    )
)]
pub async fn update_tracking_plan(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<String>,
    payload: Payload<TrackingPlanRequest>,
) -> Result<Json<TrackingPlanDto>, ApiError> {
    let id = parse_id(&id)?;
    let Json(req) = payload?;
    let plan = service.update_plan(id, req.into()).await?;
    Ok(Json(plan.into()))
}

/// Delete a tracking plan; shared events and properties are kept
#[utoipa::path(
    delete,
    path = "/tracking-plans/{id}",
    tag = "tracking-plans",
    params(("id" = uuid::Uuid, Path, description = "Tracking plan id")),
    responses(
        (status = 204, description = "Tracking plan deleted"),
        (status = 404, description = "Tracking plan not found", body = ErrorBody),
    )
)]
pub async fn delete_tracking_plan(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.delete_plan(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Misc =====

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthDto))
)]
pub async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}

pub async fn fallback() -> ApiError {
    ApiError::not_found("Route not found")
}
