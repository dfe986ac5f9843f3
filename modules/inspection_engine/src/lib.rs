//! Inspection Engine Module
//!
//! Vehicle damage inspections drawn on per body-type SVG diagrams: a part
//! dictionary and color table, a draft/finalized inspection state machine, a
//! damage entry form, and bilingual paginated reports.

// Public exports
pub mod contract;
pub use contract::{
    client::InspectionApi, error::InspectionError, CarTemplate, ColorMapping, Condition,
    DamageRecord, DisplayCondition, Inspection, InspectionPart, InspectionStatus, Language,
    NewInspection, PartDefinition, PartKey, Severity, TireStatus, ViewAngle,
};

pub mod module;
pub use module::InspectionEngineModule;

pub mod render;
pub mod report;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
