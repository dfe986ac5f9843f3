//! Native client trait for inter-module communication
//!
//! This trait mirrors the backing-service operations the inspection UI depends on.
//! NO HTTP - direct function calls for performance.

use super::{
    error::InspectionError,
    model::{
        CarTemplate, ColorMapping, DamageRecord, Inspection, InspectionDetailsUpdate,
        NewInspection, PartDefinition, PartKey,
    },
};
use async_trait::async_trait;
use uuid::Uuid;

/// Inspection engine API for inter-module communication
#[async_trait]
pub trait InspectionApi: Send + Sync {
    // ===== Catalog =====

    /// Get a template by id, falling back to the default template
    async fn get_template(&self, template_id: &str) -> Result<CarTemplate, InspectionError>;

    /// Part dictionary ordered by sort order
    async fn part_dictionary(&self) -> Result<Vec<PartDefinition>, InspectionError>;

    /// One color mapping per display condition
    async fn color_mappings(&self) -> Result<Vec<ColorMapping>, InspectionError>;

    // ===== Inspections =====

    /// Get an inspection by id
    async fn get_inspection(&self, id: Uuid) -> Result<Inspection, InspectionError>;

    /// Create a draft inspection
    async fn create_inspection(&self, input: NewInspection) -> Result<Inspection, InspectionError>;

    /// Record (or replace) the damage observation for one part
    async fn record_damage(
        &self,
        id: Uuid,
        part_key: PartKey,
        record: DamageRecord,
    ) -> Result<Inspection, InspectionError>;

    /// Edit descriptive fields of a draft inspection
    async fn update_details(
        &self,
        id: Uuid,
        update: InspectionDetailsUpdate,
    ) -> Result<Inspection, InspectionError>;

    /// Lock the inspection against further edits
    async fn finalize_inspection(&self, id: Uuid) -> Result<Inspection, InspectionError>;
}
