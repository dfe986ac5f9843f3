//! Mapper implementations for converting between DTOs and contract models
//!
//! Outbound conversions are infallible `From` impls; inbound ones parse enum
//! names and part keys and fail with `InspectionError::Validation`.

use super::dto::*;
use crate::contract::{
    BilingualLabel, CarTemplate, ColorMapping, Condition, CustomerInfo, DamageRecord,
    DisplayCondition, Inspection, InspectionDetailsUpdate, InspectionError, InspectionPart,
    InspectorInfo, NewInspection, PartDefinition, PartKey, Severity, TemplatePartMapping,
    TireStatus, VehicleInfo, ViewAngle,
};
use chrono::Utc;
use std::collections::BTreeMap;

// ===== Inspection conversions =====

impl From<Inspection> for InspectionDto {
    fn from(inspection: Inspection) -> Self {
        Self {
            id: inspection.id,
            template_type: inspection.template_type,
            car_id: inspection.car_id,
            status: inspection.status.as_str().to_string(),
            vehicle: inspection.vehicle.into(),
            customer: inspection.customer.map(Into::into),
            inspector: inspection.inspector.map(Into::into),
            parts: inspection.parts.into_values().map(Into::into).collect(),
            general_notes: inspection.general_notes,
            created_at: inspection.created_at,
            updated_at: inspection.updated_at,
            finalized_at: inspection.finalized_at,
        }
    }
}

impl TryFrom<InspectionDto> for Inspection {
    type Error = InspectionError;

    fn try_from(dto: InspectionDto) -> Result<Self, Self::Error> {
        let updated_at = dto.updated_at;
        let mut parts = BTreeMap::new();
        for part in dto.parts {
            let part = part_from_dto(part, updated_at)?;
            if parts.insert(part.part_key.clone(), part).is_some() {
                return Err(InspectionError::validation("duplicate part in inspection"));
            }
        }

        Ok(Self {
            id: dto.id,
            template_type: dto.template_type,
            car_id: dto.car_id,
            status: dto.status.parse()?,
            vehicle: dto.vehicle.into(),
            customer: dto.customer.map(Into::into),
            inspector: dto.inspector.map(Into::into),
            general_notes: dto.general_notes,
            parts,
            created_at: dto.created_at,
            updated_at,
            finalized_at: dto.finalized_at,
        })
    }
}

impl From<InspectionPart> for InspectionPartDto {
    fn from(part: InspectionPart) -> Self {
        Self {
            part_key: part.part_key.to_string(),
            condition: part.condition.as_str().to_string(),
            severity: part.severity.map(|s| s.as_str().to_string()),
            notes: part.notes,
            photos: part.photos,
            updated_at: Some(part.updated_at),
        }
    }
}

fn part_from_dto(
    dto: InspectionPartDto,
    fallback_updated_at: chrono::DateTime<Utc>,
) -> Result<InspectionPart, InspectionError> {
    Ok(InspectionPart {
        part_key: PartKey::new(dto.part_key)?,
        condition: dto.condition.parse()?,
        severity: parse_severity(dto.severity.as_deref())?,
        notes: dto.notes,
        photos: dto.photos,
        updated_at: dto.updated_at.unwrap_or(fallback_updated_at),
    })
}

fn parse_severity(value: Option<&str>) -> Result<Option<Severity>, InspectionError> {
    value
        .filter(|s| !s.is_empty())
        .map(str::parse::<Severity>)
        .transpose()
}

impl From<VehicleInfo> for VehicleDto {
    fn from(v: VehicleInfo) -> Self {
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

impl From<VehicleDto> for VehicleInfo {
    fn from(v: VehicleDto) -> Self {
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

impl From<CustomerInfo> for CustomerDto {
    fn from(c: CustomerInfo) -> Self {
        Self {
            name: c.name,
            phone: c.phone,
            email: c.email,
        }
    }
}

impl From<CustomerDto> for CustomerInfo {
    fn from(c: CustomerDto) -> Self {
        Self {
            name: c.name,
            phone: c.phone,
            email: c.email,
        }
    }
}

impl From<InspectorInfo> for InspectorDto {
    fn from(i: InspectorInfo) -> Self {
        Self {
            id: i.id,
            name: i.name,
        }
    }
}

impl From<InspectorDto> for InspectorInfo {
    fn from(i: InspectorDto) -> Self {
        Self {
            id: i.id,
            name: i.name,
        }
    }
}

impl From<CreateInspectionRequest> for NewInspection {
    fn from(req: CreateInspectionRequest) -> Self {
        Self {
            template_type: req.template_type,
            car_id: req.car_id,
            vehicle: req.vehicle.into(),
            customer: req.customer.map(Into::into),
            inspector: req.inspector.map(Into::into),
            general_notes: req.general_notes,
        }
    }
}

impl From<DetailsUpdateRequest> for InspectionDetailsUpdate {
    fn from(req: DetailsUpdateRequest) -> Self {
        Self {
            vehicle: req.vehicle.map(Into::into),
            customer: req.customer.map(Into::into),
            inspector: req.inspector.map(Into::into),
            general_notes: req.general_notes,
        }
    }
}

impl PartUpdateRequest {
    /// Part key and record; exactly one of `condition` / `tireStatus` must be set
    pub fn into_record(self) -> Result<(PartKey, DamageRecord), InspectionError> {
        let condition = match (self.condition.as_deref(), self.tire_status.as_deref()) {
            (Some(condition), None) => condition.parse::<Condition>()?,
            (None, Some(status)) => status.parse::<TireStatus>()?.condition(),
            (Some(_), Some(_)) => {
                return Err(InspectionError::validation(
                    "send either condition or tireStatus, not both",
                ))
            }
            (None, None) => {
                return Err(InspectionError::validation(
                    "condition or tireStatus is required",
                ))
            }
        };

        let record = DamageRecord {
            condition,
            severity: parse_severity(self.severity.as_deref())?,
            notes: self.notes,
            photos: self.photos,
        };
        Ok((PartKey::new(self.part_key)?, record))
    }
}

// ===== Catalog conversions =====

impl From<PartDefinition> for PartDefinitionDto {
    fn from(part: PartDefinition) -> Self {
        Self {
            key: part.key.to_string(),
            label_ar: part.label.ar,
            label_en: part.label.en,
            category: part.category.as_str().to_string(),
            sort_order: part.sort_order,
        }
    }
}

impl UpsertPartDefinitionRequest {
    pub fn into_definition(self, key: String) -> Result<PartDefinition, InspectionError> {
        Ok(PartDefinition {
            key: PartKey::new(key)?,
            label: BilingualLabel::new(self.label_ar, self.label_en),
            category: self.category.parse()?,
            sort_order: self.sort_order,
        })
    }
}

impl From<ColorMapping> for ColorMappingDto {
    fn from(mapping: ColorMapping) -> Self {
        Self {
            condition: mapping.condition.as_str().to_string(),
            color: mapping.color,
            label_ar: mapping.label.ar,
            label_en: mapping.label.en,
        }
    }
}

impl UpsertColorMappingRequest {
    pub fn into_mapping(self, condition: &str) -> Result<ColorMapping, InspectionError> {
        Ok(ColorMapping {
            condition: condition.parse::<DisplayCondition>()?,
            color: self.color,
            label: BilingualLabel::new(self.label_ar, self.label_en),
        })
    }
}

// ===== Template conversions =====

impl From<CarTemplate> for TemplateDto {
    fn from(template: CarTemplate) -> Self {
        Self {
            id: template.id,
            body_type: template.body_type,
            name_ar: template.name.ar,
            name_en: template.name.en,
            is_active: template.is_active,
            is_default: template.is_default,
            diagrams: template
                .diagrams
                .into_iter()
                .map(|(angle, svg)| (angle.as_str().to_string(), svg))
                .collect(),
            parts: template.parts.into_iter().map(Into::into).collect(),
            created_at: template.created_at,
            updated_at: template.updated_at,
        }
    }
}

impl From<TemplatePartMapping> for TemplatePartMappingDto {
    fn from(mapping: TemplatePartMapping) -> Self {
        Self {
            part_key: mapping.part_key.to_string(),
            element_id: mapping.element_id,
            angles: mapping
                .angles
                .iter()
                .map(|a| a.as_str().to_string())
                .collect(),
            visible: mapping.visible,
        }
    }
}

impl UpsertTemplateRequest {
    pub fn into_template(self, id: String) -> Result<CarTemplate, InspectionError> {
        let diagrams = self
            .diagrams
            .into_iter()
            .map(|(angle, svg)| Ok((angle.parse::<ViewAngle>()?, svg)))
            .collect::<Result<BTreeMap<_, _>, InspectionError>>()?;

        let parts = self
            .parts
            .into_iter()
            .map(|m| {
                Ok(TemplatePartMapping {
                    part_key: PartKey::new(m.part_key)?,
                    element_id: m.element_id,
                    angles: m
                        .angles
                        .iter()
                        .map(|a| a.parse::<ViewAngle>())
                        .collect::<Result<_, _>>()?,
                    visible: m.visible,
                })
            })
            .collect::<Result<Vec<_>, InspectionError>>()?;

        let now = Utc::now();
        Ok(CarTemplate {
            id,
            body_type: self.body_type,
            name: BilingualLabel::new(self.name_ar, self.name_en),
            is_active: self.is_active,
            is_default: self.is_default,
            diagrams,
            parts,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Inspection {
        let mut inspection = Inspection::create(
            NewInspection {
                template_type: "sedan".to_string(),
                car_id: Some(uuid::Uuid::new_v4()),
                vehicle: VehicleInfo {
                    make: Some("Toyota".to_string()),
                    model: Some("Camry".to_string()),
                    year: Some(2021),
                    mileage: Some(42_000),
                    ..Default::default()
                },
                customer: Some(CustomerInfo {
                    name: Some("سارة".to_string()),
                    ..Default::default()
                }),
                inspector: Some(InspectorInfo {
                    id: Some("insp-7".to_string()),
                    name: Some("Omar".to_string()),
                }),
                general_notes: Some("Minor wear".to_string()),
            },
            Utc::now(),
        );
        inspection
            .record_damage(
                &PartKey::new("front_bumper").unwrap(),
                DamageRecord::new(Condition::Scratch)
                    .with_severity(Severity::Light)
                    .with_notes("left corner")
                    .with_photos(vec!["/uploads/a.jpg".to_string()]),
                Utc::now(),
            )
            .unwrap();
        inspection
            .record_damage(
                &PartKey::new("hood").unwrap(),
                DamageRecord::new(Condition::Good),
                Utc::now(),
            )
            .unwrap();
        inspection.finalize(Utc::now()).unwrap();
        inspection
    }

    #[test]
    fn test_wire_shape_round_trip() {
        let original = sample();
        let json = serde_json::to_value(InspectionDto::from(original.clone())).unwrap();

        assert_eq!(json["templateType"], "sedan");
        assert_eq!(json["status"], "finalized");
        assert_eq!(json["vehicle"]["make"], "Toyota");
        assert_eq!(json["inspector"]["id"], "insp-7");
        assert_eq!(json["parts"][0]["partKey"], "front_bumper");
        assert_eq!(json["parts"][0]["severity"], "light");
        assert!(json["finalizedAt"].is_string());

        let dto: InspectionDto = serde_json::from_value(json).unwrap();
        let restored = Inspection::try_from(dto).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_part_update_requires_one_status() {
        let req = PartUpdateRequest {
            part_key: "wheel_front_left".to_string(),
            condition: None,
            tire_status: Some("damaged".to_string()),
            severity: Some("severe".to_string()),
            notes: None,
            photos: vec![],
        };
        let (key, record) = req.clone().into_record().unwrap();
        assert_eq!(key.as_str(), "wheel_front_left");
        assert_eq!(record.condition, Condition::Broken);

        let both = PartUpdateRequest {
            condition: Some("broken".to_string()),
            ..req.clone()
        };
        assert!(matches!(
            both.into_record(),
            Err(InspectionError::Validation { .. })
        ));

        let neither = PartUpdateRequest {
            tire_status: None,
            ..req
        };
        assert!(neither.into_record().is_err());
    }

    #[test]
    fn test_not_inspected_is_not_a_condition() {
        let dto = InspectionPartDto {
            part_key: "hood".to_string(),
            condition: "not_inspected".to_string(),
            severity: None,
            notes: None,
            photos: vec![],
            updated_at: None,
        };
        assert!(part_from_dto(dto, Utc::now()).is_err());
    }
}
