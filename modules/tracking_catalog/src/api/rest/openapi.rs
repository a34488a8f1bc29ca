//! OpenAPI document for the REST surface

use super::{dto, error, handlers};
use utoipa::OpenApi;

/// Catalog routes, documented relative to the API prefix
#[derive(OpenApi)]
#[openapi(
    info(title = "Tracking Catalog API", description = "Events, properties and tracking plans"),
    paths(
        handlers::create_event,
        handlers::list_events,
        handlers::get_event,
        handlers::update_event,
        handlers::delete_event,
        handlers::create_property,
        handlers::list_properties,
        handlers::get_property,
        handlers::update_property,
        handlers::delete_property,
        handlers::create_tracking_plan,
        handlers::list_tracking_plans,
        handlers::get_tracking_plan,
        handlers::update_tracking_plan,
        handlers::delete_tracking_plan,
    ),
    components(schemas(
        dto::EventDto,
        dto::EventRequest,
        dto::PropertyDto,
        dto::PropertyRequest,
        dto::TrackingPlanDto,
        dto::PlanEventDto,
        dto::PlanEventPropertyDto,
        dto::TrackingPlanRequest,
        dto::PlanEventRequest,
        dto::PlanPropertyRequest,
        error::ErrorBody,
    )),
    tags(
        (name = "events", description = "Event definitions"),
        (name = "properties", description = "Property definitions"),
        (name = "tracking-plans", description = "Tracking plan composition"),
    )
)]
pub struct CatalogApiDoc;

/// Unprefixed operational routes
#[derive(OpenApi)]
#[openapi(paths(handlers::health), components(schemas(dto::HealthDto)))]
pub struct OpsApiDoc;

/// Full document with catalog paths nested under `prefix`
pub fn document(prefix: &str) -> utoipa::openapi::OpenApi {
    let catalog = CatalogApiDoc::openapi();
    let info = catalog.info.clone();

    let mut doc = if prefix.is_empty() {
        OpsApiDoc::openapi().merge_from(catalog)
    } else {
        OpsApiDoc::openapi().nest(prefix, catalog)
    };
    doc.info = info;
    doc
}
