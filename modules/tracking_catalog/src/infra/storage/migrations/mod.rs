//! Database migrations for the tracking catalog

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_definitions::Migration),
            Box::new(m20250301_000002_create_tracking_plans::Migration),
        ]
    }
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    Name,
    Type,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Properties {
    Table,
    Id,
    Name,
    Type,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TrackingPlans {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PlanEvents {
    Table,
    Id,
    TrackingPlanId,
    EventId,
    AdditionalProperties,
    Position,
}

#[derive(DeriveIden)]
enum PlanEventProperties {
    Table,
    Id,
    PlanEventId,
    PropertyId,
    Required,
    Position,
}

mod m20250301_000001_create_definitions {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_definitions"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Events::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Events::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Events::Name).string().not_null())
                        .col(ColumnDef::new(Events::Type).string().not_null())
                        .col(
                            ColumnDef::new(Events::Description)
                                .text()
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(Events::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(Events::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("ux_events_name_type")
                        .table(Events::Table)
                        .col(Events::Name)
                        .col(Events::Type)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Properties::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Properties::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Properties::Name).string().not_null())
                        .col(ColumnDef::new(Properties::Type).string().not_null())
                        .col(
                            ColumnDef::new(Properties::Description)
                                .text()
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(Properties::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(Properties::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("ux_properties_name_type")
                        .table(Properties::Table)
                        .col(Properties::Name)
                        .col(Properties::Type)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Properties::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Events::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000002_create_tracking_plans {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_tracking_plans"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(TrackingPlans::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TrackingPlans::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(TrackingPlans::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(TrackingPlans::Description)
                                .text()
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(TrackingPlans::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(TrackingPlans::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PlanEvents::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PlanEvents::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(PlanEvents::TrackingPlanId).uuid().not_null())
                        .col(ColumnDef::new(PlanEvents::EventId).uuid().not_null())
                        .col(
                            ColumnDef::new(PlanEvents::AdditionalProperties)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(PlanEvents::Position).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_plan_events_tracking_plan")
                                .from(PlanEvents::Table, PlanEvents::TrackingPlanId)
                                .to(TrackingPlans::Table, TrackingPlans::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_plan_events_event")
                                .from(PlanEvents::Table, PlanEvents::EventId)
                                .to(Events::Table, Events::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_plan_events_tracking_plan_id")
                        .table(PlanEvents::Table)
                        .col(PlanEvents::TrackingPlanId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_plan_events_event_id")
                        .table(PlanEvents::Table)
                        .col(PlanEvents::EventId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PlanEventProperties::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PlanEventProperties::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PlanEventProperties::PlanEventId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PlanEventProperties::PropertyId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PlanEventProperties::Required)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(PlanEventProperties::Position)
                                .integer()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_plan_event_properties_plan_event")
                                .from(PlanEventProperties::Table, PlanEventProperties::PlanEventId)
                                .to(PlanEvents::Table, PlanEvents::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_plan_event_properties_property")
                                .from(PlanEventProperties::Table, PlanEventProperties::PropertyId)
                                .to(Properties::Table, Properties::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_plan_event_properties_plan_event_id")
                        .table(PlanEventProperties::Table)
                        .col(PlanEventProperties::PlanEventId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_plan_event_properties_property_id")
                        .table(PlanEventProperties::Table)
                        .col(PlanEventProperties::PropertyId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PlanEventProperties::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PlanEvents::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(TrackingPlans::Table).to_owned())
                .await
        }
    }
}
