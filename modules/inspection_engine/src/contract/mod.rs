//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.
//! NO serde derives on models - these are pure domain types.

pub mod client;
pub mod error;
pub mod model;

pub use client::InspectionApi;
pub use error::InspectionError;
pub use model::{
    BilingualLabel, CarTemplate, ColorMapping, Condition, CustomerInfo, DamageRecord,
    DisplayCondition, Inspection, InspectionDetailsUpdate, InspectionPart, InspectionStatus,
    InspectorInfo, Language, NewInspection, PartCategory, PartDefinition, PartKey, PhotoRef,
    Severity, StatusInput, TemplatePartMapping, TireStatus, VehicleInfo, ViewAngle,
    TIRE_STATUS_CONDITIONS,
};
