//! Domain events for the inspection lifecycle
//!
//! Events are fire-and-forget: a publish failure is logged by the service and
//! never fails the operation that produced the event.

use crate::contract::{Inspection, InspectionPart, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum InspectionEvent {
    /// Draft inspection created
    Created(InspectionCreatedEvent),
    /// A part record was written
    PartRecorded(PartRecordedEvent),
    /// Vehicle, customer, inspector or notes edited
    DetailsUpdated(InspectionRefEvent),
    /// Inspection locked
    Finalized(InspectionRefEvent),
    /// Inspection and its part records removed
    Deleted(InspectionRefEvent),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionCreatedEvent {
    pub inspection_id: Uuid,
    pub template_type: String,
    pub car_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRecordedEvent {
    pub inspection_id: Uuid,
    pub part_key: String,
    pub condition: String,
    pub severity: Option<String>,
    pub photo_count: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionRefEvent {
    pub inspection_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

impl InspectionEvent {
    pub fn created(inspection: &Inspection) -> Self {
        InspectionEvent::Created(InspectionCreatedEvent {
            inspection_id: inspection.id,
            template_type: inspection.template_type.clone(),
            car_id: inspection.car_id,
            timestamp: inspection.created_at,
        })
    }

    pub fn part_recorded(inspection_id: Uuid, part: &InspectionPart) -> Self {
        InspectionEvent::PartRecorded(PartRecordedEvent {
            inspection_id,
            part_key: part.part_key.to_string(),
            condition: part.condition.as_str().to_string(),
            severity: part.severity.as_ref().map(Severity::as_str).map(str::to_string),
            photo_count: part.photos.len(),
            timestamp: part.updated_at,
        })
    }

    pub fn details_updated(inspection: &Inspection) -> Self {
        InspectionEvent::DetailsUpdated(InspectionRefEvent {
            inspection_id: inspection.id,
            timestamp: inspection.updated_at,
        })
    }

    pub fn finalized(inspection: &Inspection) -> Self {
        InspectionEvent::Finalized(InspectionRefEvent {
            inspection_id: inspection.id,
            timestamp: inspection.finalized_at.unwrap_or(inspection.updated_at),
        })
    }

    pub fn deleted(inspection_id: Uuid) -> Self {
        InspectionEvent::Deleted(InspectionRefEvent {
            inspection_id,
            timestamp: Utc::now(),
        })
    }

    pub fn inspection_id(&self) -> Uuid {
        match self {
            InspectionEvent::Created(e) => e.inspection_id,
            InspectionEvent::PartRecorded(e) => e.inspection_id,
            InspectionEvent::DetailsUpdated(e)
            | InspectionEvent::Finalized(e)
            | InspectionEvent::Deleted(e) => e.inspection_id,
        }
    }
}

/// Event publisher trait for publishing domain events
#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: InspectionEvent) -> anyhow::Result<()>;
}

/// No-op event publisher for testing or when events are disabled
pub struct NoOpEventPublisher;

#[async_trait::async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _event: InspectionEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Writes every event to the log as a JSON payload
pub struct TracingEventPublisher;

#[async_trait::async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, event: InspectionEvent) -> anyhow::Result<()> {
        let payload = serde_json::to_string(&event)?;
        tracing::info!(
            target: "inspection_events",
            inspection_id = %event.inspection_id(),
            payload = %payload,
            "Inspection event"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{Condition, PartKey};

    #[test]
    fn test_part_recorded_event_serializes_with_tag() {
        let part = InspectionPart {
            part_key: PartKey::new("front_bumper").unwrap(),
            condition: Condition::Scratch,
            severity: Some(Severity::Light),
            notes: None,
            photos: vec!["/uploads/a.jpg".to_string()],
            updated_at: Utc::now(),
        };
        let id = Uuid::new_v4();
        let event = InspectionEvent::part_recorded(id, &part);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "part_recorded");
        assert_eq!(json["part_key"], "front_bumper");
        assert_eq!(json["severity"], "light");
        assert_eq!(json["photo_count"], 1);
        assert_eq!(event.inspection_id(), id);
    }

    #[tokio::test]
    async fn test_publishers_accept_events() {
        let event = InspectionEvent::deleted(Uuid::new_v4());
        assert!(NoOpEventPublisher.publish(event.clone()).await.is_ok());
        assert!(TracingEventPublisher.publish(event).await.is_ok());
    }
}
