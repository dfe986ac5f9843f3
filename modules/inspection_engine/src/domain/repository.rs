//! Repository traits for data access
//!
//! These traits define the interface to the backing store.
//! Implementations are in infra/storage/repositories.rs and infra/memory.rs

use crate::contract::{CarTemplate, ColorMapping, Inspection, PartDefinition, PhotoRef};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Returned by [`InspectionRepository::save`] when the stored row is already
/// finalized and the incoming record is not that same finalized record
#[derive(Debug, thiserror::Error)]
#[error("inspection {0} is finalized in storage")]
pub struct FinalizedConflict(pub Uuid);

/// Repository for inspections and their part records
#[async_trait]
pub trait InspectionRepository: Send + Sync {
    /// Insert or overwrite an inspection together with all its part records
    ///
    /// A finalized row is never rewritten. Saving a record with the stored
    /// `finalized_at` is a no-op; anything else fails with [`FinalizedConflict`].
    async fn save(&self, inspection: &Inspection) -> Result<Inspection>;

    /// Find an inspection by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Inspection>>;

    /// List inspections, newest first
    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<Inspection>>;

    /// Delete an inspection and its part records; returns whether it existed
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Null the vehicle link on every inspection pointing at `car_id`
    async fn clear_vehicle_link(&self, car_id: Uuid) -> Result<u64>;
}

/// Repository for car templates
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Find a template by id
    async fn find_by_id(&self, id: &str) -> Result<Option<CarTemplate>>;

    /// Find the active template for a body type
    async fn find_by_body_type(&self, body_type: &str) -> Result<Option<CarTemplate>>;

    /// Find the template flagged as default
    async fn find_default(&self) -> Result<Option<CarTemplate>>;

    /// List all templates
    async fn list_all(&self) -> Result<Vec<CarTemplate>>;

    /// Create or replace a template; clears the default flag elsewhere when set
    async fn upsert(&self, template: &CarTemplate) -> Result<CarTemplate>;
}

/// Repository for the part dictionary and color mapping table
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_parts(&self) -> Result<Vec<PartDefinition>>;

    async fn list_colors(&self) -> Result<Vec<ColorMapping>>;

    async fn upsert_part(&self, part: &PartDefinition) -> Result<()>;

    async fn upsert_color(&self, mapping: &ColorMapping) -> Result<()>;
}

/// Destination for compressed inspection photos
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Store one JPEG and return the reference recorded on the part
    async fn upload(&self, jpeg: &[u8]) -> Result<PhotoRef>;
}
