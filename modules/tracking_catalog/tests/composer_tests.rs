//! Tracking plan composition against in-memory test doubles

mod common;

use common::*;
use tracking_catalog::contract::*;

#[tokio::test]
async fn plan_creation_builds_graph_in_declaration_order() {
    let catalog = MemoryCatalog::new();
    let service = catalog.service(1);

    let plan = service.create_plan(checkout_plan()).await.unwrap();

    assert_eq!(plan.name, "Checkout");
    assert_eq!(plan.events.len(), 2);
    assert_eq!(plan.events[0].event.name, "Order Completed");
    assert!(plan.events[0].additional_properties);
    assert_eq!(plan.events[1].event.name, "Checkout Started");

    let props: Vec<_> = plan.events[0]
        .properties
        .iter()
        .map(|p| (p.property.name.as_str(), p.required))
        .collect();
    assert_eq!(props, vec![("price", true), ("currency", false)]);

    assert_eq!(catalog.begin_count(), 1);
}

#[tokio::test]
async fn shared_definitions_are_deduplicated_across_plans() {
    let catalog = MemoryCatalog::new();
    let service = catalog.service(1);

    let first = service
        .create_plan(plan_spec(
            "Onboarding",
            vec![event_spec("signup", "track", vec![property_spec("plan", "string", true)])],
        ))
        .await
        .unwrap();
    let second = service
        .create_plan(plan_spec(
            "Growth",
            vec![event_spec("signup", "track", vec![property_spec("plan", "string", false)])],
        ))
        .await
        .unwrap();

    let store = catalog.snapshot();
    assert_eq!(store.events.len(), 1);
    assert_eq!(store.properties.len(), 1);
    assert_eq!(first.events[0].event.id, second.events[0].event.id);
    assert_eq!(
        first.events[0].properties[0].property.id,
        second.events[0].properties[0].property.id
    );
    // bindings carry their own required flag
    assert!(first.events[0].properties[0].required);
    assert!(!second.events[0].properties[0].required);
}

#[tokio::test]
async fn same_name_with_different_type_is_a_distinct_event() {
    let catalog = MemoryCatalog::new();
    let service = catalog.service(1);

    service
        .create_plan(plan_spec(
            "Mixed",
            vec![
                event_spec("home", "page", vec![]),
                event_spec("home", "screen", vec![]),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(catalog.snapshot().events.len(), 2);
}

#[tokio::test]
async fn conflicting_description_rejects_plan() {
    let catalog = MemoryCatalog::new();
    catalog.seed_event("signup", EventType::Track, "desc-A");
    let service = catalog.service(1);

    let mut event = event_spec("signup", "track", vec![]);
    event.description = "desc-B".to_string();

    let err = service
        .create_plan(plan_spec("Onboarding", vec![event]))
        .await
        .unwrap_err();

    match err {
        CatalogError::Conflict { reason } => {
            assert!(reason.contains("signup"), "unexpected reason: {reason}");
            assert!(reason.contains("desc-A"));
            assert!(reason.contains("desc-B"));
        }
        other => panic!("expected conflict, got {other:?}"),
    }
    assert!(catalog.snapshot().plans.is_empty());
}

#[tokio::test]
async fn failure_late_in_composition_leaves_no_trace() {
    let catalog = MemoryCatalog::new();
    let seeded = catalog.seed_property("amount", PropertyType::Number, "Order total");
    let before = catalog.snapshot();
    let service = catalog.service(1);

    let mut conflicting = property_spec("amount", "number", true);
    conflicting.description = "Refund total".to_string();

    let spec = plan_spec(
        "Payments",
        vec![
            event_spec("payment started", "track", vec![property_spec("method", "string", true)]),
            event_spec("payment failed", "track", vec![property_spec("reason", "string", false)]),
            event_spec("payment refunded", "track", vec![conflicting]),
        ],
    );

    let err = service.create_plan(spec).await.unwrap_err();
    assert!(matches!(err, CatalogError::Conflict { .. }));

    let after = catalog.snapshot();
    assert!(after.plans.is_empty());
    assert!(after.plan_events.is_empty());
    assert!(after.plan_event_properties.is_empty());
    assert_eq!(after.events.len(), before.events.len());
    assert_eq!(after.properties.len(), before.properties.len());
    assert_eq!(after.properties[0].description, seeded.description);
}

#[tokio::test]
async fn empty_description_matches_existing_definition() {
    let catalog = MemoryCatalog::new();
    let seeded = catalog.seed_event("signup", EventType::Track, "User signed up");
    let service = catalog.service(1);

    let plan = service
        .create_plan(plan_spec("Onboarding", vec![event_spec("signup", "track", vec![])]))
        .await
        .unwrap();

    assert_eq!(plan.events[0].event.id, seeded.id);
    assert_eq!(plan.events[0].event.description, "User signed up");
    assert_eq!(catalog.snapshot().events.len(), 1);
}

#[tokio::test]
async fn description_fills_in_nothing_when_stored_is_empty() {
    let catalog = MemoryCatalog::new();
    let seeded = catalog.seed_event("signup", EventType::Track, "");
    let service = catalog.service(1);

    let mut event = event_spec("signup", "track", vec![]);
    event.description = "User signed up".to_string();
    let plan = service
        .create_plan(plan_spec("Onboarding", vec![event]))
        .await
        .unwrap();

    assert_eq!(plan.events[0].event.id, seeded.id);
    assert_eq!(plan.events[0].event.description, "");
}

#[tokio::test]
async fn update_rebuilds_bindings_and_keeps_definitions() {
    let catalog = MemoryCatalog::new();
    let service = catalog.service(1);

    let plan = service
        .create_plan(plan_spec(
            "Funnel",
            vec![
                event_spec("A", "track", vec![property_spec("x", "string", true)]),
                event_spec("B", "track", vec![]),
            ],
        ))
        .await
        .unwrap();

    let mut replacement = plan_spec("Funnel v2", vec![event_spec("C", "identify", vec![])]);
    replacement.description = "Slimmed down".to_string();
    let updated = service.update_plan(plan.id, replacement).await.unwrap();

    assert_eq!(updated.id, plan.id);
    assert_eq!(updated.name, "Funnel v2");
    assert_eq!(updated.description, "Slimmed down");
    assert_eq!(updated.created_at, plan.created_at);
    assert_eq!(updated.events.len(), 1);
    assert_eq!(updated.events[0].event.name, "C");
    assert_eq!(updated.events[0].event.event_type, EventType::Identify);

    let store = catalog.snapshot();
    assert_eq!(store.plan_events.len(), 1);
    assert!(store.plan_event_properties.is_empty());
    let names: Vec<_> = store.events.iter().map(|e| e.name.as_str()).collect();
    assert!(names.contains(&"A"));
    assert!(names.contains(&"B"));
    assert_eq!(store.properties.len(), 1);
}

#[tokio::test]
async fn invalid_definition_never_opens_a_transaction() {
    let catalog = MemoryCatalog::new();
    let service = catalog.service(1);

    let spec = plan_spec(
        "Payments",
        vec![
            event_spec("payment started", "track", vec![]),
            event_spec("payment done", "track", vec![property_spec("amount", "currency", true)]),
        ],
    );

    let err = service.create_plan(spec).await.unwrap_err();
    assert_eq!(
        err,
        CatalogError::invalid(
            "events[1].properties[0].type 'currency' is invalid. Must be one of: string, number, boolean"
        )
    );
    assert_eq!(catalog.begin_count(), 0);
    assert!(catalog.snapshot().events.is_empty());
}

#[tokio::test]
async fn empty_events_are_rejected() {
    let catalog = MemoryCatalog::new();
    let service = catalog.service(1);

    let err = service
        .create_plan(plan_spec("Nothing", vec![]))
        .await
        .unwrap_err();
    assert_eq!(err, CatalogError::invalid("events is required and cannot be empty"));
    assert_eq!(catalog.begin_count(), 0);
}

#[tokio::test]
async fn duplicate_plan_name_conflicts() {
    let catalog = MemoryCatalog::new();
    let service = catalog.service(1);

    service.create_plan(checkout_plan()).await.unwrap();
    let err = service.create_plan(checkout_plan()).await.unwrap_err();

    assert!(matches!(err, CatalogError::Conflict { .. }));
    assert_eq!(catalog.snapshot().plans.len(), 1);
}

#[tokio::test]
async fn update_of_missing_plan_is_not_found() {
    let catalog = MemoryCatalog::new();
    let service = catalog.service(1);

    let err = service
        .update_plan(uuid::Uuid::new_v4(), checkout_plan())
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { .. }));
}

#[tokio::test]
async fn lost_creation_race_is_retried() {
    let catalog = MemoryCatalog::new();
    let now = chrono::Utc::now();
    catalog.race_next_insert(Interloper::Event(Event {
        id: uuid::Uuid::new_v4(),
        name: "signup".to_string(),
        event_type: EventType::Track,
        description: String::new(),
        created_at: now,
        updated_at: now,
    }));
    let service = catalog.service(1);

    let plan = service
        .create_plan(plan_spec("Onboarding", vec![event_spec("signup", "track", vec![])]))
        .await
        .unwrap();

    assert_eq!(catalog.begin_count(), 2);
    assert_eq!(catalog.snapshot().events.len(), 1);
    assert_eq!(plan.events[0].event.id, catalog.snapshot().events[0].id);
}

#[tokio::test]
async fn lost_race_without_retries_is_a_conflict() {
    let catalog = MemoryCatalog::new();
    let now = chrono::Utc::now();
    catalog.race_next_insert(Interloper::Property(Property {
        id: uuid::Uuid::new_v4(),
        name: "price".to_string(),
        property_type: PropertyType::Number,
        description: String::new(),
        created_at: now,
        updated_at: now,
    }));
    let service = catalog.service(0);

    let err = service
        .create_plan(plan_spec(
            "Pricing",
            vec![event_spec("viewed", "track", vec![property_spec("price", "number", true)])],
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::Conflict { .. }));
    assert_eq!(catalog.begin_count(), 1);
    assert!(catalog.snapshot().plans.is_empty());
}

#[tokio::test]
async fn delete_plan_keeps_shared_definitions() {
    let catalog = MemoryCatalog::new();
    let service = catalog.service(1);

    let plan = service.create_plan(checkout_plan()).await.unwrap();
    service.delete_plan(plan.id).await.unwrap();

    let store = catalog.snapshot();
    assert!(store.plans.is_empty());
    assert!(store.plan_events.is_empty());
    assert!(store.plan_event_properties.is_empty());
    assert_eq!(store.events.len(), 2);
    assert_eq!(store.properties.len(), 2);

    let err = service.delete_plan(plan.id).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { .. }));
}
