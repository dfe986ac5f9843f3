//! Contract models for the inspection engine
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - wire shapes live in the REST DTOs.

use super::error::InspectionError;
use chrono::{DateTime, Utc};
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Declares a fieldless enum with a fixed lowercase wire name per variant.
macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stable wire name
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = InspectionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err(InspectionError::validation(format!(
                        "invalid {} '{}'",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

named_enum! {
    /// Fixed camera perspective a template is drawn from
    pub enum ViewAngle {
        Front => "front",
        Rear => "rear",
        Left => "left",
        Right => "right",
        Top => "top",
    }
}

impl ViewAngle {
    /// Angles every template must provide
    pub const MANDATORY: [ViewAngle; 4] = [
        ViewAngle::Front,
        ViewAngle::Rear,
        ViewAngle::Left,
        ViewAngle::Right,
    ];

    pub fn is_mandatory(&self) -> bool {
        !matches!(self, ViewAngle::Top)
    }
}

named_enum! {
    /// Part grouping in the dictionary
    pub enum PartCategory {
        Front => "front",
        Rear => "rear",
        Left => "left",
        Right => "right",
        Top => "top",
        Wheels => "wheels",
    }
}

named_enum! {
    /// Persistable assessed state of a part
    pub enum Condition {
        Good => "good",
        Scratch => "scratch",
        Bodywork => "bodywork",
        Broken => "broken",
        Painted => "painted",
        Replaced => "replaced",
    }
}

impl Condition {
    /// Every condition except `good` expects a severity
    pub fn requires_severity(&self) -> bool {
        !matches!(self, Condition::Good)
    }
}

named_enum! {
    /// Damage intensity
    pub enum Severity {
        Light => "light",
        Medium => "medium",
        Severe => "severe",
    }
}

named_enum! {
    /// Restricted vocabulary offered for tire/wheel parts
    pub enum TireStatus {
        New => "new",
        PartiallyWorn => "partially_worn",
        Damaged => "damaged",
    }
}

/// Single source of truth for tire status storage.
///
/// Must stay total over `TireStatus`; conditions are distinct so the reverse lookup is unambiguous.
pub const TIRE_STATUS_CONDITIONS: [(TireStatus, Condition); 3] = [
    (TireStatus::New, Condition::Good),
    (TireStatus::PartiallyWorn, Condition::Scratch),
    (TireStatus::Damaged, Condition::Broken),
];

impl TireStatus {
    /// Storage condition for this tire status
    pub fn condition(&self) -> Condition {
        TIRE_STATUS_CONDITIONS
            .iter()
            .find(|(status, _)| status == self)
            .map(|(_, condition)| *condition)
            .unwrap_or(Condition::Good)
    }

    /// Tire status a stored condition was recorded from, if any
    pub fn from_condition(condition: Condition) -> Option<TireStatus> {
        TIRE_STATUS_CONDITIONS
            .iter()
            .find(|(_, c)| *c == condition)
            .map(|(status, _)| *status)
    }
}

/// Status chosen in the damage form, tagged by the vocabulary it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusInput {
    /// Six-value body part vocabulary
    Body(Condition),
    /// Three-value tire vocabulary
    Tire(TireStatus),
}

impl StatusInput {
    /// Condition written to storage
    pub fn condition(&self) -> Condition {
        match self {
            StatusInput::Body(condition) => *condition,
            StatusInput::Tire(status) => status.condition(),
        }
    }

    /// Whether the form must ask for a severity
    pub fn requires_severity(&self) -> bool {
        match self {
            StatusInput::Body(condition) => condition.requires_severity(),
            StatusInput::Tire(_) => false,
        }
    }
}

/// Condition as displayed: either a recorded condition or the render-only default
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DisplayCondition {
    /// No record for the part yet; never accepted as input
    NotInspected,
    Recorded(Condition),
}

impl DisplayCondition {
    pub const ALL: [DisplayCondition; 7] = [
        DisplayCondition::NotInspected,
        DisplayCondition::Recorded(Condition::Good),
        DisplayCondition::Recorded(Condition::Scratch),
        DisplayCondition::Recorded(Condition::Bodywork),
        DisplayCondition::Recorded(Condition::Broken),
        DisplayCondition::Recorded(Condition::Painted),
        DisplayCondition::Recorded(Condition::Replaced),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayCondition::NotInspected => "not_inspected",
            DisplayCondition::Recorded(condition) => condition.as_str(),
        }
    }
}

impl From<Condition> for DisplayCondition {
    fn from(condition: Condition) -> Self {
        DisplayCondition::Recorded(condition)
    }
}

impl fmt::Display for DisplayCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayCondition {
    type Err = InspectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "not_inspected" {
            return Ok(DisplayCondition::NotInspected);
        }
        s.parse::<Condition>().map(DisplayCondition::Recorded)
    }
}

named_enum! {
    /// Report and label language
    pub enum Language {
        Arabic => "ar",
        English => "en",
    }
}

impl Language {
    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Arabic)
    }
}

/// Arabic + English text pair
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BilingualLabel {
    pub ar: String,
    pub en: String,
}

impl BilingualLabel {
    pub fn new(ar: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            ar: ar.into(),
            en: en.into(),
        }
    }

    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::Arabic => &self.ar,
            Language::English => &self.en,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.ar.trim().is_empty() && !self.en.trim().is_empty()
    }
}

/// Stable identifier of one physical vehicle region (lowercase, underscore-separated)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartKey(String);

impl PartKey {
    /// Parse and validate a part key
    pub fn new(key: impl Into<String>) -> Result<Self, InspectionError> {
        let key = key.into();
        let well_formed = !key.is_empty()
            && !key.starts_with('_')
            && !key.ends_with('_')
            && !key.contains("__")
            && key
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !well_formed {
            return Err(InspectionError::validation(format!(
                "part key '{}' must be lowercase and underscore-separated",
                key
            )));
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PartKey {
    type Err = InspectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PartKey::new(s)
    }
}

impl Borrow<str> for PartKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Part dictionary entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartDefinition {
    pub key: PartKey,
    pub label: BilingualLabel,
    pub category: PartCategory,
    pub sort_order: i32,
}

impl PartDefinition {
    /// Tire/wheel parts use the restricted status vocabulary and the wheel palette
    pub fn is_tire(&self) -> bool {
        self.category == PartCategory::Wheels
    }
}

/// Display color and label for one condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorMapping {
    pub condition: DisplayCondition,
    /// `#rrggbb`
    pub color: String,
    pub label: BilingualLabel,
}

/// Binding of a dictionary part to a diagram element within one template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePartMapping {
    pub part_key: PartKey,
    /// `id` of the drawable element in the diagrams
    pub element_id: String,
    /// Angles in which the part is drawn
    pub angles: BTreeSet<ViewAngle>,
    pub visible: bool,
}

impl TemplatePartMapping {
    /// Whether the part becomes an interactive region in this angle
    pub fn is_interactive_in(&self, angle: ViewAngle) -> bool {
        self.visible && self.angles.contains(&angle)
    }
}

/// Per body-type bundle of diagrams and part mappings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarTemplate {
    pub id: String,
    /// Body type tag, e.g. "sedan", "suv", "pickup"
    pub body_type: String,
    pub name: BilingualLabel,
    pub is_active: bool,
    pub is_default: bool,
    /// SVG source per view angle
    pub diagrams: BTreeMap<ViewAngle, String>,
    pub parts: Vec<TemplatePartMapping>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CarTemplate {
    pub fn diagram(&self, angle: ViewAngle) -> Option<&str> {
        self.diagrams
            .get(&angle)
            .map(String::as_str)
            .filter(|svg| !svg.trim().is_empty())
    }

    pub fn mapping(&self, part_key: &str) -> Option<&TemplatePartMapping> {
        self.parts.iter().find(|m| m.part_key.as_str() == part_key)
    }

    /// Angles that have a non-empty diagram, in fixed order
    pub fn available_angles(&self) -> Vec<ViewAngle> {
        ViewAngle::ALL
            .iter()
            .copied()
            .filter(|angle| self.diagram(*angle).is_some())
            .collect()
    }
}

named_enum! {
    /// Inspection lifecycle state; `Finalized` is terminal
    pub enum InspectionStatus {
        Draft => "draft",
        Finalized => "finalized",
    }
}

/// Descriptive vehicle fields
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VehicleInfo {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub vin: Option<String>,
    pub plate: Option<String>,
    pub color: Option<String>,
    pub mileage: Option<u32>,
}

impl VehicleInfo {
    pub fn is_empty(&self) -> bool {
        blank(&self.make)
            && blank(&self.model)
            && self.year.is_none()
            && blank(&self.vin)
            && blank(&self.plate)
            && blank(&self.color)
            && self.mileage.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomerInfo {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl CustomerInfo {
    pub fn is_empty(&self) -> bool {
        blank(&self.name) && blank(&self.phone) && blank(&self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InspectorInfo {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl InspectorInfo {
    pub fn is_empty(&self) -> bool {
        blank(&self.id) && blank(&self.name)
    }
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Reference to a stored photo (URL or storage path)
pub type PhotoRef = String;

/// Recorded observation for one part of one inspection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectionPart {
    pub part_key: PartKey,
    pub condition: Condition,
    pub severity: Option<Severity>,
    pub notes: Option<String>,
    pub photos: Vec<PhotoRef>,
    pub updated_at: DateTime<Utc>,
}

/// Root aggregate: one vehicle inspection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    pub id: Uuid,
    /// Body type / template the inspection is drawn with
    pub template_type: String,
    /// Optional link to a vehicle listing; nulled when the vehicle is deleted
    pub car_id: Option<Uuid>,
    pub status: InspectionStatus,
    pub vehicle: VehicleInfo,
    pub customer: Option<CustomerInfo>,
    pub inspector: Option<InspectorInfo>,
    pub general_notes: Option<String>,
    /// At most one record per part
    pub parts: BTreeMap<PartKey, InspectionPart>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub finalized_at: Option<DateTime<Utc>>,
}

/// Input for creating an inspection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewInspection {
    pub template_type: String,
    pub car_id: Option<Uuid>,
    pub vehicle: VehicleInfo,
    pub customer: Option<CustomerInfo>,
    pub inspector: Option<InspectorInfo>,
    pub general_notes: Option<String>,
}

/// One damage observation as submitted by the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DamageRecord {
    pub condition: Condition,
    pub severity: Option<Severity>,
    pub notes: Option<String>,
    pub photos: Vec<PhotoRef>,
}

impl DamageRecord {
    pub fn new(condition: Condition) -> Self {
        Self {
            condition,
            severity: None,
            notes: None,
            photos: Vec::new(),
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_photos(mut self, photos: Vec<PhotoRef>) -> Self {
        self.photos = photos;
        self
    }
}

/// Descriptive field edits; `None` leaves a field untouched
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InspectionDetailsUpdate {
    pub vehicle: Option<VehicleInfo>,
    pub customer: Option<CustomerInfo>,
    pub inspector: Option<InspectorInfo>,
    pub general_notes: Option<String>,
}

impl InspectionDetailsUpdate {
    pub fn is_empty(&self) -> bool {
        self.vehicle.is_none()
            && self.customer.is_none()
            && self.inspector.is_none()
            && self.general_notes.is_none()
    }
}
