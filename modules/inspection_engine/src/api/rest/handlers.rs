//! HTTP request handlers - thin layer that delegates to domain service

use super::{
    dto::*,
    error::{map_domain_error, Problem},
};
use crate::contract::{Language, ViewAngle};
use crate::domain::Service;
use crate::report::{PageSize, ReportOptions};
use axum::{
    extract::{Path, Query},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

// ===== Template Handlers =====

/// Template by id or body type, falling back to the default template
#[utoipa::path(
    get,
    path = "/templates/{id}",
    params(("id" = String, Path, description = "Template id or body type")),
    responses(
        (status = 200, description = "Template", body = TemplateDto),
        (status = 404, description = "No template and no default")
    ),
    tag = "templates"
)]
pub async fn get_template(
    service: Arc<Service>,
    Path(id): Path<String>,
) -> Result<Json<TemplateDto>, Problem> {
    let template = service.get_template(&id).await.map_err(map_domain_error)?;
    Ok(Json(template.into()))
}

#[utoipa::path(
    get,
    path = "/templates",
    responses((status = 200, description = "All templates", body = TemplateListResponse)),
    tag = "templates"
)]
pub async fn list_templates(service: Arc<Service>) -> Result<Json<TemplateListResponse>, Problem> {
    let items: Vec<TemplateDto> = service
        .list_templates()
        .await
        .map_err(map_domain_error)?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = items.len();
    Ok(Json(TemplateListResponse { items, total }))
}

/// Validate and store a template
#[utoipa::path(
    put,
    path = "/templates/{id}",
    params(("id" = String, Path, description = "Template id")),
    request_body = UpsertTemplateRequest,
    responses(
        (status = 200, description = "Stored template", body = TemplateDto),
        (status = 400, description = "Template violates an invariant")
    ),
    tag = "templates"
)]
pub async fn upsert_template(
    service: Arc<Service>,
    Path(id): Path<String>,
    Json(req): Json<UpsertTemplateRequest>,
) -> Result<Json<TemplateDto>, Problem> {
    let template = req.into_template(id).map_err(map_domain_error)?;
    let stored = service
        .register_template(&template)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(stored.into()))
}

// ===== Catalog Handlers =====

#[utoipa::path(
    get,
    path = "/part-dictionary",
    responses((status = 200, description = "Parts ordered by sort order", body = [PartDefinitionDto])),
    tag = "catalog"
)]
pub async fn part_dictionary(service: Arc<Service>) -> Json<Vec<PartDefinitionDto>> {
    Json(service.part_dictionary().into_iter().map(Into::into).collect())
}

#[utoipa::path(
    put,
    path = "/part-dictionary/{part_key}",
    params(("part_key" = String, Path, description = "Part key")),
    request_body = UpsertPartDefinitionRequest,
    responses(
        (status = 200, description = "Stored part definition", body = PartDefinitionDto),
        (status = 400, description = "Invalid part definition")
    ),
    tag = "catalog"
)]
pub async fn upsert_part_definition(
    service: Arc<Service>,
    Path(part_key): Path<String>,
    Json(req): Json<UpsertPartDefinitionRequest>,
) -> Result<Json<PartDefinitionDto>, Problem> {
    let part = req.into_definition(part_key).map_err(map_domain_error)?;
    let stored = service
        .upsert_part_definition(&part)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(stored.into()))
}

#[utoipa::path(
    get,
    path = "/color-mappings",
    responses((status = 200, description = "One mapping per display condition", body = [ColorMappingDto])),
    tag = "catalog"
)]
pub async fn color_mappings(service: Arc<Service>) -> Json<Vec<ColorMappingDto>> {
    Json(service.color_mappings().into_iter().map(Into::into).collect())
}

#[utoipa::path(
    put,
    path = "/color-mappings/{condition}",
    params(("condition" = String, Path, description = "Display condition, including not_inspected")),
    request_body = UpsertColorMappingRequest,
    responses(
        (status = 200, description = "Stored color mapping", body = ColorMappingDto),
        (status = 400, description = "Invalid color mapping")
    ),
    tag = "catalog"
)]
pub async fn upsert_color_mapping(
    service: Arc<Service>,
    Path(condition): Path<String>,
    Json(req): Json<UpsertColorMappingRequest>,
) -> Result<Json<ColorMappingDto>, Problem> {
    let mapping = req.into_mapping(&condition).map_err(map_domain_error)?;
    let stored = service
        .upsert_color_mapping(&mapping)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(stored.into()))
}

// ===== Inspection Handlers =====

/// Query parameters for listing inspections
#[derive(Debug, Deserialize)]
pub struct ListInspectionsQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> u64 {
    50
}

#[utoipa::path(
    get,
    path = "/inspections",
    params(
        ("limit" = Option<u64>, Query, description = "Page size, at most 200"),
        ("offset" = Option<u64>, Query, description = "Items to skip")
    ),
    responses((status = 200, description = "Inspections, newest first", body = InspectionListResponse)),
    tag = "inspections"
)]
pub async fn list_inspections(
    service: Arc<Service>,
    Query(query): Query<ListInspectionsQuery>,
) -> Result<Json<InspectionListResponse>, Problem> {
    let items: Vec<InspectionDto> = service
        .list_inspections(query.limit, query.offset)
        .await
        .map_err(map_domain_error)?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = items.len();
    Ok(Json(InspectionListResponse { items, total }))
}

#[utoipa::path(
    post,
    path = "/inspections",
    request_body = CreateInspectionRequest,
    responses((status = 201, description = "Draft inspection", body = InspectionDto)),
    tag = "inspections"
)]
pub async fn create_inspection(
    service: Arc<Service>,
    Json(req): Json<CreateInspectionRequest>,
) -> Result<(StatusCode, Json<InspectionDto>), Problem> {
    let inspection = service
        .create_inspection(req.into())
        .await
        .map_err(map_domain_error)?;
    Ok((StatusCode::CREATED, Json(inspection.into())))
}

#[utoipa::path(
    get,
    path = "/inspections/{id}",
    params(("id" = Uuid, Path, description = "Inspection id")),
    responses(
        (status = 200, description = "Inspection", body = InspectionDto),
        (status = 404, description = "Inspection not found")
    ),
    tag = "inspections"
)]
pub async fn get_inspection(
    service: Arc<Service>,
    Path(id): Path<Uuid>,
) -> Result<Json<InspectionDto>, Problem> {
    let inspection = service.get_inspection(id).await.map_err(map_domain_error)?;
    Ok(Json(inspection.into()))
}

/// Record a part observation or edit details; rejected once finalized
#[utoipa::path(
    patch,
    path = "/inspections/{id}",
    params(("id" = Uuid, Path, description = "Inspection id")),
    request_body = PatchInspectionRequest,
    responses(
        (status = 200, description = "Updated inspection", body = InspectionDto),
        (status = 400, description = "Invalid update"),
        (status = 404, description = "Inspection not found"),
        (status = 409, description = "Inspection is finalized")
    ),
    tag = "inspections"
)]
pub async fn patch_inspection(
    service: Arc<Service>,
    Path(id): Path<Uuid>,
    Json(req): Json<PatchInspectionRequest>,
) -> Result<Json<InspectionDto>, Problem> {
    let inspection = match req {
        PatchInspectionRequest::Part(part) => {
            let (part_key, record) = part.into_record().map_err(map_domain_error)?;
            service.record_damage(id, &part_key, record).await
        }
        PatchInspectionRequest::Details(details) => {
            service.update_details(id, details.into()).await
        }
    }
    .map_err(map_domain_error)?;

    Ok(Json(inspection.into()))
}

#[utoipa::path(
    delete,
    path = "/inspections/{id}",
    params(("id" = Uuid, Path, description = "Inspection id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Inspection not found")
    ),
    tag = "inspections"
)]
pub async fn delete_inspection(
    service: Arc<Service>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Problem> {
    service
        .delete_inspection(id)
        .await
        .map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/inspections/{id}/finalize",
    params(("id" = Uuid, Path, description = "Inspection id")),
    responses(
        (status = 200, description = "Finalized inspection", body = InspectionDto),
        (status = 409, description = "Already finalized")
    ),
    tag = "inspections"
)]
pub async fn finalize_inspection(
    service: Arc<Service>,
    Path(id): Path<Uuid>,
) -> Result<Json<InspectionDto>, Problem> {
    let inspection = service
        .finalize_inspection(id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(inspection.into()))
}

#[utoipa::path(
    get,
    path = "/inspections/{id}/diagrams/{angle}",
    params(
        ("id" = Uuid, Path, description = "Inspection id"),
        ("angle" = String, Path, description = "front, rear, left, right or top")
    ),
    responses((status = 200, description = "Colored SVG diagram, or a placeholder", content_type = "image/svg+xml", body = String)),
    tag = "inspections"
)]
pub async fn get_diagram(
    service: Arc<Service>,
    Path((id, angle)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, Problem> {
    let angle: ViewAngle = angle.parse().map_err(map_domain_error)?;
    let svg = service
        .render_diagram(id, angle)
        .await
        .map_err(map_domain_error)?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}

/// Report query; omitted values use the module defaults
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// `ar` or `en`
    pub lang: Option<String>,
    /// `a4` or `letter`
    pub page: Option<String>,
    pub photos: Option<bool>,
}

impl ReportQuery {
    fn options(self, defaults: ReportOptions) -> Result<ReportOptions, Problem> {
        let mut options = defaults;
        if let Some(lang) = self.lang {
            options.language = lang.parse::<Language>().map_err(map_domain_error)?;
        }
        if let Some(page) = self.page {
            options.page_size = page.parse::<PageSize>().map_err(map_domain_error)?;
        }
        if let Some(photos) = self.photos {
            options.include_photos = photos;
        }
        Ok(options)
    }
}

#[utoipa::path(
    get,
    path = "/inspections/{id}/report",
    params(
        ("id" = Uuid, Path, description = "Inspection id"),
        ("lang" = Option<String>, Query, description = "ar or en"),
        ("page" = Option<String>, Query, description = "a4 or letter"),
        ("photos" = Option<bool>, Query, description = "Include the photo section")
    ),
    responses(
        (status = 200, description = "Printable HTML report", content_type = "text/html", body = String),
        (status = 500, description = "Report generation failed, retryable")
    ),
    tag = "inspections"
)]
pub async fn get_report(
    service: Arc<Service>,
    Path(id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, Problem> {
    let options = query.options(service.default_report_options())?;
    let html = service
        .report_html(id, &options)
        .await
        .map_err(map_domain_error)?;
    Ok(([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html))
}

// ===== Vehicle Handlers =====

/// Called when a vehicle listing is deleted
#[utoipa::path(
    post,
    path = "/vehicles/{car_id}/unlink",
    params(("car_id" = Uuid, Path, description = "Deleted vehicle id")),
    responses((status = 200, description = "Inspections unlinked", body = UnlinkVehicleResponse)),
    tag = "inspections"
)]
pub async fn unlink_vehicle(
    service: Arc<Service>,
    Path(car_id): Path<Uuid>,
) -> Result<Json<UnlinkVehicleResponse>, Problem> {
    let cleared = service
        .detach_vehicle(car_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(UnlinkVehicleResponse { cleared }))
}
