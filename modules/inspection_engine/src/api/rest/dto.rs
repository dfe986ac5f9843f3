//! REST DTOs with serde derives for HTTP API
//!
//! The inspection DTO is the persisted wire shape: camelCase keys, enum values as
//! their lowercase names, parts as an array.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

// ===== Inspection DTOs =====

/// Inspection response DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InspectionDto {
    pub id: Uuid,

    /// Template id the inspection is drawn with
    #[schema(example = "sedan")]
    pub template_type: String,

    /// Linked vehicle listing, null once the vehicle is deleted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_id: Option<Uuid>,

    /// `draft` or `finalized`
    #[schema(example = "draft")]
    pub status: String,

    #[serde(default)]
    pub vehicle: VehicleDto,

    #[serde(default)]
    pub customer: Option<CustomerDto>,

    #[serde(default)]
    pub inspector: Option<InspectorDto>,

    #[serde(default)]
    pub parts: Vec<InspectionPartDto>,

    #[serde(default)]
    pub general_notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub finalized_at: Option<DateTime<Utc>>,
}

/// One part's damage record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InspectionPartDto {
    #[schema(example = "front_bumper")]
    pub part_key: String,

    #[schema(example = "scratch")]
    pub condition: String,

    #[serde(default)]
    #[schema(example = "light")]
    pub severity: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub photos: Vec<String>,

    /// Defaults to the inspection's `updatedAt` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDto {
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub plate: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub mileage: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InspectorDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Inspection creation request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateInspectionRequest {
    /// Template id or body type; the default template when empty or unknown
    #[serde(default)]
    #[schema(example = "sedan")]
    pub template_type: String,

    #[serde(default)]
    pub car_id: Option<Uuid>,

    #[serde(default)]
    pub vehicle: VehicleDto,

    #[serde(default)]
    pub customer: Option<CustomerDto>,

    #[serde(default)]
    pub inspector: Option<InspectorDto>,

    #[serde(default)]
    pub general_notes: Option<String>,
}

/// Record one part's observation
///
/// Body parts send `condition`; tire parts may send `tireStatus` instead.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PartUpdateRequest {
    #[schema(example = "front_bumper")]
    pub part_key: String,

    #[serde(default)]
    #[schema(example = "scratch")]
    pub condition: Option<String>,

    #[serde(default)]
    #[schema(example = "damaged")]
    pub tire_status: Option<String>,

    #[serde(default)]
    pub severity: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub photos: Vec<String>,
}

/// Edit descriptive fields of a draft inspection
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DetailsUpdateRequest {
    #[serde(default)]
    pub vehicle: Option<VehicleDto>,
    #[serde(default)]
    pub customer: Option<CustomerDto>,
    #[serde(default)]
    pub inspector: Option<InspectorDto>,
    #[serde(default)]
    pub general_notes: Option<String>,
}

/// PATCH body: a part update (has `partKey`) or a details update
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum PatchInspectionRequest {
    Part(PartUpdateRequest),
    Details(DetailsUpdateRequest),
}

/// List of inspections, newest first
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InspectionListResponse {
    pub items: Vec<InspectionDto>,
    pub total: usize,
}

/// Result of unlinking a deleted vehicle
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UnlinkVehicleResponse {
    /// Inspections whose link was cleared
    pub cleared: u64,
}

// ===== Catalog DTOs =====

/// Part dictionary entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartDefinitionDto {
    #[schema(example = "front_bumper")]
    pub key: String,
    #[schema(example = "الصدام الأمامي")]
    pub label_ar: String,
    #[schema(example = "Front Bumper")]
    pub label_en: String,
    #[schema(example = "front")]
    pub category: String,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpsertPartDefinitionRequest {
    pub label_ar: String,
    pub label_en: String,
    pub category: String,
    #[serde(default)]
    pub sort_order: i32,
}

/// Color mapping entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColorMappingDto {
    #[schema(example = "scratch")]
    pub condition: String,
    #[schema(example = "#facc15")]
    pub color: String,
    pub label_ar: String,
    pub label_en: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpsertColorMappingRequest {
    pub color: String,
    pub label_ar: String,
    pub label_en: String,
}

// ===== Template DTOs =====

/// Car template with its diagrams and part mappings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDto {
    #[schema(example = "sedan")]
    pub id: String,
    #[schema(example = "sedan")]
    pub body_type: String,
    pub name_ar: String,
    pub name_en: String,
    pub is_active: bool,
    pub is_default: bool,
    /// View angle name to SVG source
    pub diagrams: BTreeMap<String, String>,
    pub parts: Vec<TemplatePartMappingDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePartMappingDto {
    pub part_key: String,
    pub element_id: String,
    pub angles: Vec<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

/// Template registration request; the id comes from the path
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpsertTemplateRequest {
    pub body_type: String,
    pub name_ar: String,
    pub name_en: String,
    #[serde(default = "default_visible")]
    pub is_active: bool,
    #[serde(default)]
    pub is_default: bool,
    pub diagrams: BTreeMap<String, String>,
    pub parts: Vec<TemplatePartMappingDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TemplateListResponse {
    pub items: Vec<TemplateDto>,
    pub total: usize,
}
