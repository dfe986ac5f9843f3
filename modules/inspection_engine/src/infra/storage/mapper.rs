//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity::{
    car_template, color_mapping, inspection, inspection_part, part_definition,
    template_part_mapping,
};
use crate::contract::{
    BilingualLabel, CarTemplate, ColorMapping, CustomerInfo, DisplayCondition, Inspection,
    InspectionPart, InspectorInfo, PartDefinition, PartKey, Severity, TemplatePartMapping,
    VehicleInfo, ViewAngle,
};
use anyhow::Result;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

// ===== Inspection Conversions =====

pub fn inspection_from_rows(
    row: inspection::Model,
    parts: Vec<inspection_part::Model>,
) -> Result<Inspection> {
    let parts = parts
        .into_iter()
        .map(|p| {
            let part = InspectionPart::try_from(p)?;
            Ok((part.part_key.clone(), part))
        })
        .collect::<Result<BTreeMap<_, _>>>()?;

    let vehicle: VehicleJson = serde_json::from_value(row.vehicle)?;
    let customer = row
        .customer
        .map(serde_json::from_value::<CustomerJson>)
        .transpose()?;
    let inspector = row
        .inspector
        .map(serde_json::from_value::<InspectorJson>)
        .transpose()?;

    Ok(Inspection {
        id: row.id,
        template_type: row.template_type,
        car_id: row.car_id,
        status: row.status.parse()?,
        vehicle: vehicle.into(),
        customer: customer.map(Into::into),
        inspector: inspector.map(Into::into),
        general_notes: row.general_notes,
        parts,
        created_at: row.created_at,
        updated_at: row.updated_at,
        finalized_at: row.finalized_at,
    })
}

pub fn inspection_active_model(model: &Inspection) -> Result<inspection::ActiveModel> {
    Ok(inspection::ActiveModel {
        id: Set(model.id),
        template_type: Set(model.template_type.clone()),
        car_id: Set(model.car_id),
        status: Set(model.status.as_str().to_string()),
        vehicle: Set(serde_json::to_value(VehicleJson::from(&model.vehicle))?),
        customer: Set(model
            .customer
            .as_ref()
            .map(|c| serde_json::to_value(CustomerJson::from(c)))
            .transpose()?),
        inspector: Set(model
            .inspector
            .as_ref()
            .map(|i| serde_json::to_value(InspectorJson::from(i)))
            .transpose()?),
        general_notes: Set(model.general_notes.clone()),
        created_at: Set(model.created_at),
        updated_at: Set(model.updated_at),
        finalized_at: Set(model.finalized_at),
    })
}

impl TryFrom<inspection_part::Model> for InspectionPart {
    type Error = anyhow::Error;

    fn try_from(row: inspection_part::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            part_key: PartKey::new(row.part_key)?,
            condition: row.condition.parse()?,
            severity: row
                .severity
                .as_deref()
                .map(str::parse::<Severity>)
                .transpose()?,
            notes: row.notes,
            photos: serde_json::from_value(row.photos)?,
            updated_at: row.updated_at,
        })
    }
}

pub fn part_active_model(inspection_id: Uuid, part: &InspectionPart) -> inspection_part::ActiveModel {
    inspection_part::ActiveModel {
        inspection_id: Set(inspection_id),
        part_key: Set(part.part_key.to_string()),
        condition: Set(part.condition.as_str().to_string()),
        severity: Set(part.severity.map(|s| s.as_str().to_string())),
        notes: Set(part.notes.clone()),
        photos: Set(serde_json::Value::from(part.photos.clone())),
        updated_at: Set(part.updated_at),
    }
}

// ===== Template Conversions =====

pub fn template_from_rows(
    row: car_template::Model,
    mappings: Vec<template_part_mapping::Model>,
) -> Result<CarTemplate> {
    let raw: BTreeMap<String, String> = serde_json::from_value(row.diagrams)?;
    let diagrams = raw
        .into_iter()
        .map(|(angle, svg)| Ok((angle.parse::<ViewAngle>()?, svg)))
        .collect::<Result<BTreeMap<_, _>>>()?;

    let parts = mappings
        .into_iter()
        .map(|m| {
            let angles: Vec<String> = serde_json::from_value(m.angles)?;
            Ok(TemplatePartMapping {
                part_key: PartKey::new(m.part_key)?,
                element_id: m.element_id,
                angles: angles
                    .iter()
                    .map(|a| a.parse::<ViewAngle>())
                    .collect::<Result<BTreeSet<_>, _>>()?,
                visible: m.visible,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CarTemplate {
        id: row.id,
        body_type: row.body_type,
        name: BilingualLabel::new(row.name_ar, row.name_en),
        is_active: row.is_active,
        is_default: row.is_default,
        diagrams,
        parts,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

impl From<&CarTemplate> for car_template::ActiveModel {
    fn from(model: &CarTemplate) -> Self {
        Self {
            id: Set(model.id.clone()),
            body_type: Set(model.body_type.clone()),
            name_ar: Set(model.name.ar.clone()),
            name_en: Set(model.name.en.clone()),
            is_active: Set(model.is_active),
            is_default: Set(model.is_default),
            diagrams: Set(serde_json::Value::from_iter(
                model
                    .diagrams
                    .iter()
                    .map(|(angle, svg)| (angle.as_str(), svg.clone())),
            )),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }
}

pub fn mapping_active_model(
    template_id: &str,
    mapping: &TemplatePartMapping,
) -> template_part_mapping::ActiveModel {
    template_part_mapping::ActiveModel {
        template_id: Set(template_id.to_string()),
        part_key: Set(mapping.part_key.to_string()),
        element_id: Set(mapping.element_id.clone()),
        angles: Set(serde_json::Value::from(
            mapping
                .angles
                .iter()
                .map(|a| a.as_str())
                .collect::<Vec<_>>(),
        )),
        visible: Set(mapping.visible),
    }
}

// ===== Catalog Conversions =====

impl TryFrom<part_definition::Model> for PartDefinition {
    type Error = anyhow::Error;

    fn try_from(row: part_definition::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            key: PartKey::new(row.key)?,
            label: BilingualLabel::new(row.label_ar, row.label_en),
            category: row.category.parse()?,
            sort_order: row.sort_order,
        })
    }
}

impl From<&PartDefinition> for part_definition::ActiveModel {
    fn from(model: &PartDefinition) -> Self {
        Self {
            key: Set(model.key.to_string()),
            label_ar: Set(model.label.ar.clone()),
            label_en: Set(model.label.en.clone()),
            category: Set(model.category.as_str().to_string()),
            sort_order: Set(model.sort_order),
        }
    }
}

impl TryFrom<color_mapping::Model> for ColorMapping {
    type Error = anyhow::Error;

    fn try_from(row: color_mapping::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            condition: row.condition.parse::<DisplayCondition>()?,
            color: row.color,
            label: BilingualLabel::new(row.label_ar, row.label_en),
        })
    }
}

impl From<&ColorMapping> for color_mapping::ActiveModel {
    fn from(model: &ColorMapping) -> Self {
        Self {
            condition: Set(model.condition.as_str().to_string()),
            color: Set(model.color.clone()),
            label_ar: Set(model.label.ar.clone()),
            label_en: Set(model.label.en.clone()),
        }
    }
}

// ===== JSON Serialization Helpers =====

/// JSON representation of vehicle details for database storage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct VehicleJson {
    #[serde(default)]
    make: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    vin: Option<String>,
    #[serde(default)]
    plate: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    mileage: Option<u32>,
}

impl From<&VehicleInfo> for VehicleJson {
    fn from(v: &VehicleInfo) -> Self {
        Self {
            make: v.make.clone(),
            model: v.model.clone(),
            year: v.year,
            vin: v.vin.clone(),
            plate: v.plate.clone(),
            color: v.color.clone(),
            mileage: v.mileage,
        }
    }
}

impl From<VehicleJson> for VehicleInfo {
    fn from(v: VehicleJson) -> Self {
        Self {
            make: v.make,
            model: v.model,
            year: v.year,
            vin: v.vin,
            plate: v.plate,
            color: v.color,
            mileage: v.mileage,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CustomerJson {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl From<&CustomerInfo> for CustomerJson {
    fn from(c: &CustomerInfo) -> Self {
        Self {
            name: c.name.clone(),
            phone: c.phone.clone(),
            email: c.email.clone(),
        }
    }
}

impl From<CustomerJson> for CustomerInfo {
    fn from(c: CustomerJson) -> Self {
        Self {
            name: c.name,
            phone: c.phone,
            email: c.email,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct InspectorJson {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl From<&InspectorInfo> for InspectorJson {
    fn from(i: &InspectorInfo) -> Self {
        Self {
            id: i.id.clone(),
            name: i.name.clone(),
        }
    }
}

impl From<InspectorJson> for InspectorInfo {
    fn from(i: InspectorJson) -> Self {
        Self {
            id: i.id,
            name: i.name,
        }
    }
}
