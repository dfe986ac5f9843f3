//! Inspection state machine
//!
//! `draft -> finalized` is the only transition. Every mutator checks the state
//! before touching anything, so a rejected call leaves the aggregate unchanged.

use crate::contract::{
    DamageRecord, DisplayCondition, Inspection, InspectionDetailsUpdate, InspectionError,
    InspectionPart, InspectionStatus, NewInspection, PartKey,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

impl Inspection {
    /// Start a draft inspection with no part records
    pub fn create(input: NewInspection, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            template_type: input.template_type,
            car_id: input.car_id,
            status: InspectionStatus::Draft,
            vehicle: input.vehicle,
            customer: input.customer.filter(|c| !c.is_empty()),
            inspector: input.inspector.filter(|i| !i.is_empty()),
            general_notes: input.general_notes.filter(|n| !n.trim().is_empty()),
            parts: Default::default(),
            created_at: now,
            updated_at: now,
            finalized_at: None,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.status == InspectionStatus::Finalized
    }

    /// Fail with `InspectionLocked` unless the inspection is still a draft
    pub fn ensure_editable(&self) -> Result<(), InspectionError> {
        if self.is_finalized() {
            return Err(InspectionError::InspectionLocked {
                id: self.id.to_string(),
            });
        }
        Ok(())
    }

    /// Record the observation for one part, replacing any previous record
    ///
    /// A missing severity is stored as missing; a severity supplied with `good`
    /// is dropped since it carries no meaning there.
    pub fn record_damage(
        &mut self,
        part_key: &PartKey,
        record: DamageRecord,
        now: DateTime<Utc>,
    ) -> Result<&InspectionPart, InspectionError> {
        self.ensure_editable()?;

        let severity = if record.condition.requires_severity() {
            record.severity
        } else {
            None
        };
        let part = InspectionPart {
            part_key: part_key.clone(),
            condition: record.condition,
            severity,
            notes: record.notes.filter(|n| !n.trim().is_empty()),
            photos: record.photos,
            updated_at: now,
        };

        self.updated_at = now;
        self.parts.insert(part_key.clone(), part);
        Ok(&self.parts[part_key])
    }

    /// Edit descriptive fields
    pub fn update_details(
        &mut self,
        update: InspectionDetailsUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), InspectionError> {
        self.ensure_editable()?;

        if let Some(vehicle) = update.vehicle {
            self.vehicle = vehicle;
        }
        if let Some(customer) = update.customer {
            self.customer = Some(customer).filter(|c| !c.is_empty());
        }
        if let Some(inspector) = update.inspector {
            self.inspector = Some(inspector).filter(|i| !i.is_empty());
        }
        if let Some(notes) = update.general_notes {
            self.general_notes = Some(notes).filter(|n| !n.trim().is_empty());
        }
        self.updated_at = now;
        Ok(())
    }

    /// Lock the inspection; part records present now are frozen
    pub fn finalize(&mut self, now: DateTime<Utc>) -> Result<(), InspectionError> {
        if self.is_finalized() {
            return Err(InspectionError::AlreadyFinalized {
                id: self.id.to_string(),
            });
        }
        self.status = InspectionStatus::Finalized;
        self.finalized_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Displayed condition for a part, `not_inspected` when absent
    pub fn display_condition(&self, part_key: &str) -> DisplayCondition {
        self.parts
            .get(part_key)
            .map(|p| DisplayCondition::Recorded(p.condition))
            .unwrap_or(DisplayCondition::NotInspected)
    }
}
