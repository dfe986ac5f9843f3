//! SeaORM repository implementations

use crate::contract::{CarTemplate, ColorMapping, Inspection, InspectionStatus, PartDefinition};
use crate::domain::repository::{
    CatalogRepository, FinalizedConflict, InspectionRepository, TemplateRepository,
};
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{
    prelude::Expr, sea_query::OnConflict, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::entity::{
    car_template, color_mapping, inspection, inspection_part, part_definition,
    template_part_mapping,
};
use super::mapper;

// ===== Inspection Repository =====

pub struct SeaOrmInspectionRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmInspectionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn load_parts<C: ConnectionTrait>(
        conn: &C,
        ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, Vec<inspection_part::Model>>> {
        let mut grouped: HashMap<Uuid, Vec<inspection_part::Model>> = HashMap::new();
        if ids.is_empty() {
            return Ok(grouped);
        }
        let rows = inspection_part::Entity::find()
            .filter(inspection_part::Column::InspectionId.is_in(ids))
            .order_by_asc(inspection_part::Column::PartKey)
            .all(conn)
            .await?;
        for row in rows {
            grouped.entry(row.inspection_id).or_default().push(row);
        }
        Ok(grouped)
    }
}

#[async_trait]
impl InspectionRepository for SeaOrmInspectionRepository {
    async fn save(&self, inspection: &Inspection) -> Result<Inspection> {
        let active = mapper::inspection_active_model(inspection)?;
        let parts: Vec<inspection_part::ActiveModel> = inspection
            .parts
            .values()
            .map(|part| mapper::part_active_model(inspection.id, part))
            .collect();

        // Row and part records change together
        let txn = self.db.begin().await?;

        let existing = inspection::Entity::find_by_id(inspection.id)
            .one(&txn)
            .await?;
        if let Some(stored) = existing {
            if stored.status == InspectionStatus::Finalized.as_str() {
                txn.rollback().await?;
                if stored.finalized_at == inspection.finalized_at {
                    return Ok(inspection.clone());
                }
                return Err(FinalizedConflict(inspection.id).into());
            }
            inspection::Entity::update(active).exec(&txn).await?;
        } else {
            inspection::Entity::insert(active)
                .exec_without_returning(&txn)
                .await?;
        }

        inspection_part::Entity::delete_many()
            .filter(inspection_part::Column::InspectionId.eq(inspection.id))
            .exec(&txn)
            .await?;
        if !parts.is_empty() {
            inspection_part::Entity::insert_many(parts)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(inspection.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Inspection>> {
        let Some(row) = inspection::Entity::find_by_id(id).one(&*self.db).await? else {
            return Ok(None);
        };
        let parts = inspection_part::Entity::find()
            .filter(inspection_part::Column::InspectionId.eq(id))
            .order_by_asc(inspection_part::Column::PartKey)
            .all(&*self.db)
            .await?;

        Ok(Some(mapper::inspection_from_rows(row, parts)?))
    }

    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<Inspection>> {
        let rows = inspection::Entity::find()
            .order_by_desc(inspection::Column::CreatedAt)
            .order_by_asc(inspection::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&*self.db)
            .await?;

        let ids = rows.iter().map(|r| r.id).collect();
        let mut parts = Self::load_parts(&*self.db, ids).await?;

        rows.into_iter()
            .map(|row| {
                let row_parts = parts.remove(&row.id).unwrap_or_default();
                mapper::inspection_from_rows(row, row_parts)
            })
            .collect()
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let txn = self.db.begin().await?;
        inspection_part::Entity::delete_many()
            .filter(inspection_part::Column::InspectionId.eq(id))
            .exec(&txn)
            .await?;
        let result = inspection::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(result.rows_affected > 0)
    }

    async fn clear_vehicle_link(&self, car_id: Uuid) -> Result<u64> {
        let result = inspection::Entity::update_many()
            .col_expr(inspection::Column::CarId, Expr::value(Option::<Uuid>::None))
            .filter(inspection::Column::CarId.eq(car_id))
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

// ===== Template Repository =====

pub struct SeaOrmTemplateRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmTemplateRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn with_mappings(&self, rows: Vec<car_template::Model>) -> Result<Vec<CarTemplate>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let mut grouped: HashMap<String, Vec<template_part_mapping::Model>> = HashMap::new();
        for mapping in template_part_mapping::Entity::find()
            .filter(template_part_mapping::Column::TemplateId.is_in(ids))
            .order_by_asc(template_part_mapping::Column::PartKey)
            .all(&*self.db)
            .await?
        {
            grouped
                .entry(mapping.template_id.clone())
                .or_default()
                .push(mapping);
        }

        rows.into_iter()
            .map(|row| {
                let mappings = grouped.remove(&row.id).unwrap_or_default();
                mapper::template_from_rows(row, mappings)
            })
            .collect()
    }

    async fn first(&self, row: Option<car_template::Model>) -> Result<Option<CarTemplate>> {
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(self.with_mappings(vec![row]).await?.into_iter().next())
    }
}

#[async_trait]
impl TemplateRepository for SeaOrmTemplateRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<CarTemplate>> {
        let row = car_template::Entity::find_by_id(id).one(&*self.db).await?;
        self.first(row).await
    }

    async fn find_by_body_type(&self, body_type: &str) -> Result<Option<CarTemplate>> {
        let row = car_template::Entity::find()
            .filter(car_template::Column::BodyType.eq(body_type))
            .filter(car_template::Column::IsActive.eq(true))
            .order_by_desc(car_template::Column::IsDefault)
            .order_by_asc(car_template::Column::Id)
            .one(&*self.db)
            .await?;
        self.first(row).await
    }

    async fn find_default(&self) -> Result<Option<CarTemplate>> {
        let row = car_template::Entity::find()
            .filter(car_template::Column::IsDefault.eq(true))
            .filter(car_template::Column::IsActive.eq(true))
            .one(&*self.db)
            .await?;
        self.first(row).await
    }

    async fn list_all(&self) -> Result<Vec<CarTemplate>> {
        let rows = car_template::Entity::find()
            .order_by_asc(car_template::Column::Id)
            .all(&*self.db)
            .await?;
        self.with_mappings(rows).await
    }

    async fn upsert(&self, template: &CarTemplate) -> Result<CarTemplate> {
        let active: car_template::ActiveModel = template.into();
        let mappings: Vec<template_part_mapping::ActiveModel> = template
            .parts
            .iter()
            .map(|m| mapper::mapping_active_model(&template.id, m))
            .collect();

        let txn = self.db.begin().await?;

        if template.is_default {
            car_template::Entity::update_many()
                .col_expr(car_template::Column::IsDefault, Expr::value(false))
                .filter(car_template::Column::Id.ne(template.id.as_str()))
                .exec(&txn)
                .await?;
        }

        let existing = car_template::Entity::find_by_id(template.id.as_str())
            .one(&txn)
            .await?;
        if existing.is_some() {
            car_template::Entity::update(active).exec(&txn).await?;
        } else {
            car_template::Entity::insert(active)
                .exec_without_returning(&txn)
                .await?;
        }

        template_part_mapping::Entity::delete_many()
            .filter(template_part_mapping::Column::TemplateId.eq(template.id.as_str()))
            .exec(&txn)
            .await?;
        if !mappings.is_empty() {
            template_part_mapping::Entity::insert_many(mappings)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(template.clone())
    }
}

// ===== Catalog Repository =====

pub struct SeaOrmCatalogRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmCatalogRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogRepository for SeaOrmCatalogRepository {
    async fn list_parts(&self) -> Result<Vec<PartDefinition>> {
        let results = part_definition::Entity::find()
            .order_by_asc(part_definition::Column::SortOrder)
            .order_by_asc(part_definition::Column::Key)
            .all(&*self.db)
            .await?;

        results
            .into_iter()
            .map(PartDefinition::try_from)
            .collect::<Result<Vec<_>>>()
    }

    async fn list_colors(&self) -> Result<Vec<ColorMapping>> {
        let results = color_mapping::Entity::find()
            .order_by_asc(color_mapping::Column::Condition)
            .all(&*self.db)
            .await?;

        results
            .into_iter()
            .map(ColorMapping::try_from)
            .collect::<Result<Vec<_>>>()
    }

    async fn upsert_part(&self, part: &PartDefinition) -> Result<()> {
        let active: part_definition::ActiveModel = part.into();
        part_definition::Entity::insert(active)
            .on_conflict(
                OnConflict::column(part_definition::Column::Key)
                    .update_columns([
                        part_definition::Column::LabelAr,
                        part_definition::Column::LabelEn,
                        part_definition::Column::Category,
                        part_definition::Column::SortOrder,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&*self.db)
            .await?;

        Ok(())
    }

    async fn upsert_color(&self, mapping: &ColorMapping) -> Result<()> {
        let active: color_mapping::ActiveModel = mapping.into();
        color_mapping::Entity::insert(active)
            .on_conflict(
                OnConflict::column(color_mapping::Column::Condition)
                    .update_columns([
                        color_mapping::Column::Color,
                        color_mapping::Column::LabelAr,
                        color_mapping::Column::LabelEn,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&*self.db)
            .await?;

        Ok(())
    }
}
