//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    CarTemplate, ColorMapping, DamageRecord, Inspection, InspectionApi, InspectionDetailsUpdate,
    InspectionError, NewInspection, PartDefinition, PartKey,
};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Native client that calls the domain service directly, without HTTP
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl InspectionApi for NativeClient {
    async fn get_template(&self, template_id: &str) -> Result<CarTemplate, InspectionError> {
        self.service.get_template(template_id).await
    }

    async fn part_dictionary(&self) -> Result<Vec<PartDefinition>, InspectionError> {
        Ok(self.service.part_dictionary())
    }

    async fn color_mappings(&self) -> Result<Vec<ColorMapping>, InspectionError> {
        Ok(self.service.color_mappings())
    }

    async fn get_inspection(&self, id: Uuid) -> Result<Inspection, InspectionError> {
        self.service.get_inspection(id).await
    }

    async fn create_inspection(&self, input: NewInspection) -> Result<Inspection, InspectionError> {
        self.service.create_inspection(input).await
    }

    async fn record_damage(
        &self,
        id: Uuid,
        part_key: PartKey,
        record: DamageRecord,
    ) -> Result<Inspection, InspectionError> {
        self.service.record_damage(id, &part_key, record).await
    }

    async fn update_details(
        &self,
        id: Uuid,
        update: InspectionDetailsUpdate,
    ) -> Result<Inspection, InspectionError> {
        self.service.update_details(id, update).await
    }

    async fn finalize_inspection(&self, id: Uuid) -> Result<Inspection, InspectionError> {
        self.service.finalize_inspection(id).await
    }
}
