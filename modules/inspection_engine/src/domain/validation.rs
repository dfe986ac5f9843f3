//! Structural validation for catalog entries, templates and damage input

use crate::contract::{
    CarTemplate, ColorMapping, DamageRecord, InspectionError, PartDefinition, ViewAngle,
};
use crate::render::svg::SvgDocument;
use std::collections::HashSet;

/// Validate a `#rrggbb` color string
pub fn validate_hex_color(color: &str) -> Result<(), InspectionError> {
    let digits = color.strip_prefix('#').ok_or_else(|| {
        InspectionError::validation(format!("color '{}' must start with '#'", color))
    })?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(InspectionError::validation(format!(
            "color '{}' must be a 6-digit hex value",
            color
        )));
    }
    Ok(())
}

/// Validate one part dictionary entry
pub fn validate_part_definition(part: &PartDefinition) -> Result<(), InspectionError> {
    if !part.label.is_complete() {
        return Err(InspectionError::validation(format!(
            "part '{}' needs both Arabic and English labels",
            part.key
        )));
    }
    Ok(())
}

/// Validate one color mapping entry
pub fn validate_color_mapping(mapping: &ColorMapping) -> Result<(), InspectionError> {
    validate_hex_color(&mapping.color)?;
    if !mapping.label.is_complete() {
        return Err(InspectionError::validation(format!(
            "color mapping '{}' needs both Arabic and English labels",
            mapping.condition
        )));
    }
    Ok(())
}

/// Validate photo and note limits of a damage record
pub fn validate_damage_record(
    record: &DamageRecord,
    max_photos: usize,
) -> Result<(), InspectionError> {
    if record.photos.len() > max_photos {
        return Err(InspectionError::validation(format!(
            "at most {} photos per part, got {}",
            max_photos,
            record.photos.len()
        )));
    }
    if record.photos.iter().any(|p| p.trim().is_empty()) {
        return Err(InspectionError::validation("photo reference cannot be empty"));
    }
    Ok(())
}

/// Validate a template against its structural invariants
///
/// - all four mandatory diagrams present, non-empty and parseable
/// - one mapping per part, each part known to the dictionary
/// - every mapped element exists in each diagram of the angles it declares
pub fn validate_template(
    template: &CarTemplate,
    known_part: impl Fn(&str) -> bool,
) -> Result<(), InspectionError> {
    let invalid = |details: String| InspectionError::InvalidTemplate {
        template_id: template.id.clone(),
        details,
    };

    if template.body_type.trim().is_empty() {
        return Err(invalid("body type cannot be empty".to_string()));
    }

    for angle in ViewAngle::MANDATORY {
        if template.diagram(angle).is_none() {
            return Err(invalid(format!("missing mandatory '{}' diagram", angle)));
        }
    }

    let mut documents = Vec::new();
    for angle in template.available_angles() {
        let source = template.diagram(angle).unwrap_or_default();
        let document = SvgDocument::parse(source)
            .map_err(|e| invalid(format!("'{}' diagram: {}", angle, e)))?;
        documents.push((angle, document));
    }

    let mut seen = HashSet::new();
    for mapping in &template.parts {
        if !seen.insert(mapping.part_key.as_str()) {
            return Err(invalid(format!("part '{}' mapped twice", mapping.part_key)));
        }
        if !known_part(mapping.part_key.as_str()) {
            return Err(invalid(format!(
                "part '{}' is not in the part dictionary",
                mapping.part_key
            )));
        }
        if mapping.element_id.trim().is_empty() {
            return Err(invalid(format!(
                "part '{}' has no element id",
                mapping.part_key
            )));
        }
        for angle in &mapping.angles {
            let Some((_, document)) = documents.iter().find(|(a, _)| a == angle) else {
                return Err(invalid(format!(
                    "part '{}' declares angle '{}' which has no diagram",
                    mapping.part_key, angle
                )));
            };
            if document.find_by_id(&mapping.element_id).is_none() {
                return Err(invalid(format!(
                    "'{}' diagram has no element '{}' for part '{}'",
                    angle, mapping.element_id, mapping.part_key
                )));
            }
        }
    }

    Ok(())
}
