//! Database migrations for the inspection engine

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_catalog::Migration),
            Box::new(m20250301_000002_create_templates::Migration),
            Box::new(m20250301_000003_create_inspections::Migration),
        ]
    }
}

mod m20250301_000001_create_catalog {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_catalog"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PartDefinitions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PartDefinitions::Key)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(PartDefinitions::LabelAr).string().not_null())
                        .col(ColumnDef::new(PartDefinitions::LabelEn).string().not_null())
                        .col(ColumnDef::new(PartDefinitions::Category).string().not_null())
                        .col(
                            ColumnDef::new(PartDefinitions::SortOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ColorMappings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ColorMappings::Condition)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(ColorMappings::Color).string().not_null())
                        .col(ColumnDef::new(ColorMappings::LabelAr).string().not_null())
                        .col(ColumnDef::new(ColorMappings::LabelEn).string().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ColorMappings::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PartDefinitions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum PartDefinitions {
        Table,
        Key,
        LabelAr,
        LabelEn,
        Category,
        SortOrder,
    }

    #[derive(DeriveIden)]
    enum ColorMappings {
        Table,
        Condition,
        Color,
        LabelAr,
        LabelEn,
    }
}

mod m20250301_000002_create_templates {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_templates"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(CarTemplates::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CarTemplates::Id)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(CarTemplates::BodyType).string().not_null())
                        .col(ColumnDef::new(CarTemplates::NameAr).string().not_null())
                        .col(ColumnDef::new(CarTemplates::NameEn).string().not_null())
                        .col(
                            ColumnDef::new(CarTemplates::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(CarTemplates::IsDefault)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(CarTemplates::Diagrams).json().not_null())
                        .col(
                            ColumnDef::new(CarTemplates::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(CarTemplates::UpdatedAt)
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
                        .name("idx_car_templates_body_type")
                        .table(CarTemplates::Table)
                        .col(CarTemplates::BodyType)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(TemplatePartMappings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TemplatePartMappings::TemplateId)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TemplatePartMappings::PartKey)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TemplatePartMappings::ElementId)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TemplatePartMappings::Angles).json().not_null())
                        .col(
                            ColumnDef::new(TemplatePartMappings::Visible)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .primary_key(
                            Index::create()
                                .col(TemplatePartMappings::TemplateId)
                                .col(TemplatePartMappings::PartKey),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_template_part_mappings_template")
                                .from(TemplatePartMappings::Table, TemplatePartMappings::TemplateId)
                                .to(CarTemplates::Table, CarTemplates::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TemplatePartMappings::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(CarTemplates::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum CarTemplates {
        Table,
        Id,
        BodyType,
        NameAr,
        NameEn,
        IsActive,
        IsDefault,
        Diagrams,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum TemplatePartMappings {
        Table,
        TemplateId,
        PartKey,
        ElementId,
        Angles,
        Visible,
    }
}

mod m20250301_000003_create_inspections {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_inspections"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Inspections::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Inspections::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Inspections::TemplateType).string().not_null())
                        .col(ColumnDef::new(Inspections::CarId).uuid())
                        .col(
                            ColumnDef::new(Inspections::Status)
                                .string()
                                .not_null()
                                .default("draft"),
                        )
                        .col(ColumnDef::new(Inspections::Vehicle).json().not_null())
                        .col(ColumnDef::new(Inspections::Customer).json())
                        .col(ColumnDef::new(Inspections::Inspector).json())
                        .col(ColumnDef::new(Inspections::GeneralNotes).text())
                        .col(
                            ColumnDef::new(Inspections::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(Inspections::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(ColumnDef::new(Inspections::FinalizedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await?;

            // Vehicle deletion nulls car_id through this index
            manager
                .create_index(
                    Index::create()
                        .name("idx_inspections_car_id")
                        .table(Inspections::Table)
                        .col(Inspections::CarId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_inspections_created_at")
                        .table(Inspections::Table)
                        .col(Inspections::CreatedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(InspectionParts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InspectionParts::InspectionId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InspectionParts::PartKey).string().not_null())
                        .col(ColumnDef::new(InspectionParts::Condition).string().not_null())
                        .col(ColumnDef::new(InspectionParts::Severity).string())
                        .col(ColumnDef::new(InspectionParts::Notes).text())
                        .col(ColumnDef::new(InspectionParts::Photos).json().not_null())
                        .col(
                            ColumnDef::new(InspectionParts::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .primary_key(
                            Index::create()
                                .col(InspectionParts::InspectionId)
                                .col(InspectionParts::PartKey),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_inspection_parts_inspection")
                                .from(InspectionParts::Table, InspectionParts::InspectionId)
                                .to(Inspections::Table, Inspections::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InspectionParts::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Inspections::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Inspections {
        Table,
        Id,
        TemplateType,
        CarId,
        Status,
        Vehicle,
        Customer,
        Inspector,
        GeneralNotes,
        CreatedAt,
        UpdatedAt,
        FinalizedAt,
    }

    #[derive(DeriveIden)]
    enum InspectionParts {
        Table,
        InspectionId,
        PartKey,
        Condition,
        Severity,
        Notes,
        Photos,
        UpdatedAt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_migration_names_are_unique_and_ordered() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), names.len(), "duplicate names: {names:?}");

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(sorted, names);
        assert!(names.iter().all(|n| n.starts_with("m2025")));
    }
}
