//! Route registration and the OpenAPI document

use super::{dto::*, error::Problem, handlers};
use crate::domain::Service;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

#[derive(OpenApi)]
#[openapi(
    info(title = "Inspection Engine", description = "Vehicle damage inspections, diagrams and reports"),
    paths(
        handlers::get_template,
        handlers::list_templates,
        handlers::upsert_template,
        handlers::part_dictionary,
        handlers::upsert_part_definition,
        handlers::color_mappings,
        handlers::upsert_color_mapping,
        handlers::list_inspections,
        handlers::create_inspection,
        handlers::get_inspection,
        handlers::patch_inspection,
        handlers::delete_inspection,
        handlers::finalize_inspection,
        handlers::get_diagram,
        handlers::get_report,
        handlers::unlink_vehicle,
    ),
    components(schemas(
        InspectionDto,
        InspectionPartDto,
        VehicleDto,
        CustomerDto,
        InspectorDto,
        CreateInspectionRequest,
        PartUpdateRequest,
        DetailsUpdateRequest,
        PatchInspectionRequest,
        InspectionListResponse,
        UnlinkVehicleResponse,
        PartDefinitionDto,
        UpsertPartDefinitionRequest,
        ColorMappingDto,
        UpsertColorMappingRequest,
        TemplateDto,
        TemplatePartMappingDto,
        UpsertTemplateRequest,
        TemplateListResponse,
    )),
    tags(
        (name = "inspections", description = "Inspection lifecycle, diagrams and reports"),
        (name = "templates", description = "Car templates"),
        (name = "catalog", description = "Part dictionary and color mappings")
    )
)]
pub struct ApiDoc;

/// Register all REST routes on `router`
pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let router = router
        // Catalog endpoints
        .route(
            "/templates",
            get(list_templates_handler),
        )
        .route(
            "/templates/{id}",
            get(get_template_handler).put(upsert_template_handler),
        )
        .route("/part-dictionary", get(part_dictionary_handler))
        .route(
            "/part-dictionary/{part_key}",
            put(upsert_part_definition_handler),
        )
        .route("/color-mappings", get(color_mappings_handler))
        .route(
            "/color-mappings/{condition}",
            put(upsert_color_mapping_handler),
        )
        // Inspection endpoints
        .route(
            "/inspections",
            get(list_inspections_handler).post(create_inspection_handler),
        )
        .route(
            "/inspections/{id}",
            get(get_inspection_handler)
                .patch(patch_inspection_handler)
                .delete(delete_inspection_handler),
        )
        .route(
            "/inspections/{id}/finalize",
            post(finalize_inspection_handler),
        )
        .route(
            "/inspections/{id}/diagrams/{angle}",
            get(get_diagram_handler),
        )
        .route("/inspections/{id}/report", get(get_report_handler))
        .route("/vehicles/{car_id}/unlink", post(unlink_vehicle_handler))
        .route("/openapi.json", get(openapi_handler))
        // Add service as extension for handlers
        .layer(Extension(service));

    Ok(router)
}

// ===== Handler wrappers that extract service from Extension =====

async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn list_templates_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Result<Json<TemplateListResponse>, Problem> {
    handlers::list_templates(service).await
}

async fn get_template_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<String>,
) -> Result<Json<TemplateDto>, Problem> {
    handlers::get_template(service, path).await
}

async fn upsert_template_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<String>,
    json: Json<UpsertTemplateRequest>,
) -> Result<Json<TemplateDto>, Problem> {
    handlers::upsert_template(service, path, json).await
}

async fn part_dictionary_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Json<Vec<PartDefinitionDto>> {
    handlers::part_dictionary(service).await
}

async fn upsert_part_definition_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<String>,
    json: Json<UpsertPartDefinitionRequest>,
) -> Result<Json<PartDefinitionDto>, Problem> {
    handlers::upsert_part_definition(service, path, json).await
}

async fn color_mappings_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Json<Vec<ColorMappingDto>> {
    handlers::color_mappings(service).await
}

async fn upsert_color_mapping_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<String>,
    json: Json<UpsertColorMappingRequest>,
) -> Result<Json<ColorMappingDto>, Problem> {
    handlers::upsert_color_mapping(service, path, json).await
}

async fn list_inspections_handler(
    Extension(service): Extension<Arc<Service>>,
    query: Query<handlers::ListInspectionsQuery>,
) -> Result<Json<InspectionListResponse>, Problem> {
    handlers::list_inspections(service, query).await
}

async fn create_inspection_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Json<CreateInspectionRequest>,
) -> Result<(StatusCode, Json<InspectionDto>), Problem> {
    handlers::create_inspection(service, json).await
}

async fn get_inspection_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<Uuid>,
) -> Result<Json<InspectionDto>, Problem> {
    handlers::get_inspection(service, path).await
}

async fn patch_inspection_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<Uuid>,
    json: Json<PatchInspectionRequest>,
) -> Result<Json<InspectionDto>, Problem> {
    handlers::patch_inspection(service, path, json).await
}

async fn delete_inspection_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<Uuid>,
) -> Result<StatusCode, Problem> {
    handlers::delete_inspection(service, path).await
}

async fn finalize_inspection_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<Uuid>,
) -> Result<Json<InspectionDto>, Problem> {
    handlers::finalize_inspection(service, path).await
}

async fn get_diagram_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<(Uuid, String)>,
) -> Result<impl IntoResponse, Problem> {
    handlers::get_diagram(service, path).await
}

async fn get_report_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<Uuid>,
    query: Query<handlers::ReportQuery>,
) -> Result<impl IntoResponse, Problem> {
    handlers::get_report(service, path, query).await
}

async fn unlink_vehicle_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<Uuid>,
) -> Result<Json<UnlinkVehicleResponse>, Problem> {
    handlers::unlink_vehicle(service, path).await
}
