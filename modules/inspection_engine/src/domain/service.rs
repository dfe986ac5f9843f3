//! Domain service - orchestrates persistence around the inspection state machine

use super::catalog::{Catalog, CatalogCache};
use super::events::{EventPublisher, InspectionEvent};
use super::form::{DamageEntryForm, SaveOutcome};
use super::repository::{
    CatalogRepository, FinalizedConflict, InspectionRepository, PhotoStore, TemplateRepository,
};
use super::template::{builtin_sedan, TemplateRegistry};
use super::validation::{validate_color_mapping, validate_damage_record, validate_part_definition};
use crate::config::Config;
use crate::contract::{
    CarTemplate, ColorMapping, DamageRecord, Inspection, InspectionDetailsUpdate, InspectionError,
    NewInspection, PartDefinition, PartKey, TireStatus, ViewAngle,
};
use crate::render::{render, render_placeholder};
use crate::report::{assemble, render_html, ReportDocument, ReportOptions};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Upper bound on a single inspection listing page
pub const MAX_PAGE_SIZE: u64 = 200;

/// Domain service for inspections, templates and the catalog
pub struct Service {
    inspection_repo: Arc<dyn InspectionRepository>,
    templates: TemplateRegistry,
    catalog_repo: Arc<dyn CatalogRepository>,
    catalog: Arc<CatalogCache>,
    photo_store: Arc<dyn PhotoStore>,
    event_publisher: Arc<dyn EventPublisher>,
    config: Config,
}

impl Service {
    /// Create a new service instance; the catalog starts from the built-in tables
    pub fn new(
        inspection_repo: Arc<dyn InspectionRepository>,
        template_repo: Arc<dyn TemplateRepository>,
        catalog_repo: Arc<dyn CatalogRepository>,
        photo_store: Arc<dyn PhotoStore>,
        event_publisher: Arc<dyn EventPublisher>,
        config: Config,
    ) -> Self {
        Self {
            inspection_repo,
            templates: TemplateRegistry::new(template_repo, config.default_template.clone()),
            catalog_repo,
            catalog: Arc::new(CatalogCache::default()),
            photo_store,
            event_publisher,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current catalog snapshot
    pub fn catalog(&self) -> Arc<Catalog> {
        self.catalog.snapshot()
    }

    // ===== Inspection Operations =====

    /// Create a draft inspection on the resolved template
    pub async fn create_inspection(
        &self,
        mut input: NewInspection,
    ) -> Result<Inspection, InspectionError> {
        if input.template_type.trim().is_empty() {
            input.template_type = self.config.default_template.clone();
        }
        let template = self.templates.resolve(&input.template_type).await?;
        input.template_type = template.id;

        let inspection = Inspection::create(input, Utc::now());
        let saved = self.persist(&inspection).await?;

        tracing::info!(
            inspection_id = %saved.id,
            template = %saved.template_type,
            "Inspection created"
        );
        self.publish(InspectionEvent::created(&saved)).await;
        Ok(saved)
    }

    async fn persist(&self, inspection: &Inspection) -> Result<Inspection, InspectionError> {
        match self.inspection_repo.save(inspection).await {
            Ok(saved) => Ok(saved),
            Err(e) if is_finalized_conflict(&e) => {
                tracing::warn!(
                    inspection_id = %inspection.id,
                    "Rejected write to finalized inspection"
                );
                Err(InspectionError::InspectionLocked {
                    id: inspection.id.to_string(),
                })
            }
            Err(e) => Err(storage("save inspection")(e)),
        }
    }

    pub async fn get_inspection(&self, id: Uuid) -> Result<Inspection, InspectionError> {
        self.inspection_repo
            .find_by_id(id)
            .await
            .map_err(storage("load inspection"))?
            .ok_or_else(|| InspectionError::NotFound {
                resource: "inspection".to_string(),
                id: id.to_string(),
            })
    }

    /// Newest first, page size capped at [`MAX_PAGE_SIZE`]
    pub async fn list_inspections(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Inspection>, InspectionError> {
        self.inspection_repo
            .list(limit.clamp(1, MAX_PAGE_SIZE), offset)
            .await
            .map_err(storage("list inspections"))
    }

    /// Record (or replace) one part's observation
    ///
    /// Tire parts accept only conditions their status vocabulary maps to and
    /// never keep a severity.
    pub async fn record_damage(
        &self,
        id: Uuid,
        part_key: &PartKey,
        mut record: DamageRecord,
    ) -> Result<Inspection, InspectionError> {
        let mut inspection = self.get_inspection(id).await?;
        inspection.ensure_editable()?;

        let catalog = self.catalog.snapshot();
        let part = catalog.require_part(part_key.as_str())?;
        if part.is_tire() {
            if TireStatus::from_condition(record.condition).is_none() {
                return Err(InspectionError::validation(format!(
                    "condition '{}' is not a tire status",
                    record.condition
                )));
            }
            record.severity = None;
        }
        validate_damage_record(&record, self.config.photo.max_photos_per_part)?;

        let recorded = inspection
            .record_damage(part_key, record, Utc::now())?
            .clone();

        let saved = self.persist(&inspection).await?;

        tracing::info!(
            inspection_id = %id,
            part_key = %part_key,
            condition = %recorded.condition,
            "Damage recorded"
        );
        self.publish(InspectionEvent::part_recorded(id, &recorded)).await;
        Ok(saved)
    }

    pub async fn update_details(
        &self,
        id: Uuid,
        update: InspectionDetailsUpdate,
    ) -> Result<Inspection, InspectionError> {
        let mut inspection = self.get_inspection(id).await?;
        inspection.update_details(update, Utc::now())?;

        let saved = self.persist(&inspection).await?;
        self.publish(InspectionEvent::details_updated(&saved)).await;
        Ok(saved)
    }

    /// One-way transition to `finalized`
    pub async fn finalize_inspection(&self, id: Uuid) -> Result<Inspection, InspectionError> {
        let mut inspection = self.get_inspection(id).await?;
        inspection.finalize(Utc::now())?;

        let saved = self.persist(&inspection).await.map_err(|e| match e {
            InspectionError::InspectionLocked { id } => InspectionError::AlreadyFinalized { id },
            other => other,
        })?;

        tracing::info!(
            inspection_id = %id,
            parts = saved.parts.len(),
            "Inspection finalized"
        );
        self.publish(InspectionEvent::finalized(&saved)).await;
        Ok(saved)
    }

    /// Delete an inspection together with its part records
    pub async fn delete_inspection(&self, id: Uuid) -> Result<(), InspectionError> {
        let existed = self
            .inspection_repo
            .delete(id)
            .await
            .map_err(storage("delete inspection"))?;
        if !existed {
            return Err(InspectionError::NotFound {
                resource: "inspection".to_string(),
                id: id.to_string(),
            });
        }

        tracing::info!(inspection_id = %id, "Inspection deleted");
        self.publish(InspectionEvent::deleted(id)).await;
        Ok(())
    }

    /// Called when a vehicle listing is deleted; inspections survive unlinked
    pub async fn detach_vehicle(&self, car_id: Uuid) -> Result<u64, InspectionError> {
        let cleared = self
            .inspection_repo
            .clear_vehicle_link(car_id)
            .await
            .map_err(storage("clear vehicle link"))?;
        tracing::info!(car_id = %car_id, inspections = cleared, "Vehicle link cleared");
        Ok(cleared)
    }

    // ===== Damage Entry Form =====

    /// Open the entry form for one part of a draft inspection
    pub async fn open_form(
        &self,
        id: Uuid,
        part_key: &str,
    ) -> Result<DamageEntryForm, InspectionError> {
        let catalog = self.catalog.snapshot();
        let part = catalog.require_part(part_key)?;
        let inspection = self.get_inspection(id).await?;
        DamageEntryForm::open(&inspection, part, self.config.photo.max_photos_per_part)
    }

    /// Upload the form's photos and persist its single `record_damage`
    pub async fn save_form(&self, form: DamageEntryForm) -> Result<SaveOutcome, InspectionError> {
        let submission = form.submit(self.photo_store.as_ref()).await?;
        let saved = self
            .record_damage(
                submission.inspection_id,
                &submission.part_key,
                submission.record,
            )
            .await?;
        let part = saved
            .parts
            .get(&submission.part_key)
            .cloned()
            .ok_or(InspectionError::Internal)?;

        Ok(SaveOutcome {
            part,
            failed_uploads: submission.failed_uploads,
        })
    }

    // ===== Diagrams and Reports =====

    /// Colored diagram of one angle, or a visible placeholder when it cannot be drawn
    pub async fn render_diagram(
        &self,
        id: Uuid,
        angle: ViewAngle,
    ) -> Result<String, InspectionError> {
        let inspection = self.get_inspection(id).await?;
        let template = self.templates.resolve(&inspection.template_type).await?;
        let catalog = self.catalog.snapshot();

        match render(&template, angle, &inspection.parts, &catalog) {
            Ok(diagram) => Ok(diagram.to_svg_string()),
            Err(e @ InspectionError::ViewAngleUnavailable { .. })
            | Err(e @ InspectionError::InvalidTemplate { .. }) => {
                tracing::warn!(
                    inspection_id = %id,
                    angle = %angle,
                    error = %e,
                    "Diagram unavailable, rendering placeholder"
                );
                Ok(render_placeholder(angle, &e.to_string()).to_svg_string())
            }
            Err(e) => Err(e),
        }
    }

    /// Assemble the paginated report for preview or a finalized inspection
    pub async fn generate_report(
        &self,
        id: Uuid,
        options: &ReportOptions,
    ) -> Result<ReportDocument, InspectionError> {
        let inspection = self.get_inspection(id).await?;
        let template = self.templates.resolve(&inspection.template_type).await?;
        let catalog = self.catalog.snapshot();

        let report = assemble(&inspection, &template, &catalog, options).map_err(|e| {
            tracing::error!(inspection_id = %id, error = %e, "Report generation failed");
            match e {
                InspectionError::ReportGenerationFailed { .. } => e,
                other => InspectionError::ReportGenerationFailed {
                    reason: other.to_string(),
                },
            }
        })?;

        tracing::info!(
            inspection_id = %id,
            language = %options.language,
            page_size = %options.page_size,
            pages = report.pages.len(),
            "Report generated"
        );
        Ok(report)
    }

    /// Printable HTML artifact of [`Service::generate_report`]
    pub async fn report_html(
        &self,
        id: Uuid,
        options: &ReportOptions,
    ) -> Result<String, InspectionError> {
        let report = self.generate_report(id, options).await?;
        Ok(render_html(&report))
    }

    /// Report options from the module defaults
    pub fn default_report_options(&self) -> ReportOptions {
        ReportOptions::from_config(&self.config.report)
    }

    // ===== Templates =====

    /// Template by id or body type, falling back to the default
    pub async fn get_template(&self, template_type: &str) -> Result<CarTemplate, InspectionError> {
        self.templates.resolve(template_type).await
    }

    pub async fn list_templates(&self) -> Result<Vec<CarTemplate>, InspectionError> {
        self.templates.list().await
    }

    pub async fn register_template(
        &self,
        template: &CarTemplate,
    ) -> Result<CarTemplate, InspectionError> {
        let catalog = self.catalog.snapshot();
        self.templates.register(template, &catalog).await
    }

    // ===== Catalog =====

    pub fn part_dictionary(&self) -> Vec<PartDefinition> {
        self.catalog.snapshot().parts().to_vec()
    }

    pub fn color_mappings(&self) -> Vec<ColorMapping> {
        self.catalog.snapshot().colors().iter().cloned().collect()
    }

    /// Write a part definition and swap in a reloaded catalog
    pub async fn upsert_part_definition(
        &self,
        part: &PartDefinition,
    ) -> Result<PartDefinition, InspectionError> {
        validate_part_definition(part)?;
        self.catalog_repo
            .upsert_part(part)
            .await
            .map_err(storage("upsert part definition"))?;
        self.reload_catalog().await?;
        Ok(part.clone())
    }

    /// Write a color mapping and swap in a reloaded catalog
    pub async fn upsert_color_mapping(
        &self,
        mapping: &ColorMapping,
    ) -> Result<ColorMapping, InspectionError> {
        validate_color_mapping(mapping)?;
        self.catalog_repo
            .upsert_color(mapping)
            .await
            .map_err(storage("upsert color mapping"))?;
        self.reload_catalog().await?;
        Ok(mapping.clone())
    }

    pub async fn reload_catalog(&self) -> Result<Arc<Catalog>, InspectionError> {
        self.catalog.reload(self.catalog_repo.as_ref()).await
    }

    /// Seed an empty store with the built-in catalog and sedan template, then load it
    pub async fn seed_defaults(&self) -> Result<(), InspectionError> {
        let builtin = Catalog::builtin();

        let parts = self
            .catalog_repo
            .list_parts()
            .await
            .map_err(storage("list part definitions"))?;
        if parts.is_empty() {
            for part in builtin.parts() {
                self.catalog_repo
                    .upsert_part(part)
                    .await
                    .map_err(storage("seed part definition"))?;
            }
            tracing::info!(parts = builtin.parts().len(), "Seeded part dictionary");
        }

        let colors = self
            .catalog_repo
            .list_colors()
            .await
            .map_err(storage("list color mappings"))?;
        if colors.is_empty() {
            for mapping in builtin.colors().iter() {
                self.catalog_repo
                    .upsert_color(mapping)
                    .await
                    .map_err(storage("seed color mapping"))?;
            }
            tracing::info!(colors = builtin.colors().len(), "Seeded color mappings");
        }

        let catalog = self.reload_catalog().await?;

        if self.templates.list().await?.is_empty() {
            self.templates.register(&builtin_sedan(), &catalog).await?;
        }
        Ok(())
    }

    async fn publish(&self, event: InspectionEvent) {
        let inspection_id = event.inspection_id();
        if let Err(e) = self.event_publisher.publish(event).await {
            tracing::warn!(
                inspection_id = %inspection_id,
                error = %e,
                "Failed to publish inspection event"
            );
        }
    }
}

/// Lost a race with a concurrent finalize
fn is_finalized_conflict(e: &anyhow::Error) -> bool {
    e.downcast_ref::<FinalizedConflict>().is_some()
}

fn storage(action: &'static str) -> impl Fn(anyhow::Error) -> InspectionError {
    move |e| {
        tracing::error!(error = ?e, "Failed to {}", action);
        InspectionError::Internal
    }
}
