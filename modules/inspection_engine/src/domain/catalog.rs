//! Part dictionary and color mapping table
//!
//! Both tables are loaded once into a [`CatalogCache`] and shared read-only.
//! Admin edits go to the [`CatalogRepository`] and trigger a full reload that swaps
//! in a new snapshot; a published [`Catalog`] is never mutated.

use super::repository::CatalogRepository;
use super::validation::{validate_color_mapping, validate_part_definition};
use crate::contract::{
    BilingualLabel, ColorMapping, Condition, DisplayCondition, InspectionError, PartCategory,
    PartDefinition, PartKey,
};
use arc_swap::ArcSwap;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Fixed palette for wheel/tire parts, independent of the editable body table
pub fn wheel_color(condition: DisplayCondition) -> &'static str {
    match condition {
        DisplayCondition::NotInspected => "#9ca3af",
        DisplayCondition::Recorded(Condition::Good) => "#15803d",
        DisplayCondition::Recorded(Condition::Scratch) => "#ca8a04",
        DisplayCondition::Recorded(Condition::Bodywork) => "#ea580c",
        DisplayCondition::Recorded(Condition::Broken) => "#b91c1c",
        DisplayCondition::Recorded(Condition::Painted) => "#1d4ed8",
        DisplayCondition::Recorded(Condition::Replaced) => "#6d28d9",
    }
}

/// Color mapping table with exactly one entry per display condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    entries: BTreeMap<DisplayCondition, ColorMapping>,
}

impl ColorTable {
    /// Build a table, rejecting duplicates, gaps and malformed colors
    pub fn from_mappings(mappings: Vec<ColorMapping>) -> Result<Self, InspectionError> {
        let mut entries = BTreeMap::new();
        for mapping in mappings {
            validate_color_mapping(&mapping)?;
            let condition = mapping.condition;
            if entries.insert(condition, mapping).is_some() {
                return Err(InspectionError::validation(format!(
                    "duplicate color mapping for '{}'",
                    condition
                )));
            }
        }
        if let Some(missing) = DisplayCondition::ALL
            .iter()
            .find(|c| !entries.contains_key(*c))
        {
            return Err(InspectionError::validation(format!(
                "missing color mapping for '{}'",
                missing
            )));
        }
        Ok(Self { entries })
    }

    pub fn get(&self, condition: DisplayCondition) -> Option<&ColorMapping> {
        self.entries.get(&condition)
    }

    /// Body color for a condition
    pub fn color(&self, condition: DisplayCondition) -> &str {
        self.entries
            .get(&condition)
            .map(|m| m.color.as_str())
            .unwrap_or_else(|| wheel_color(condition))
    }

    pub fn label(&self, condition: DisplayCondition) -> Option<&BilingualLabel> {
        self.entries.get(&condition).map(|m| &m.label)
    }

    /// Entries in display order (`not_inspected` first)
    pub fn iter(&self) -> impl Iterator<Item = &ColorMapping> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immutable snapshot of the part dictionary and color table
#[derive(Debug, Clone)]
pub struct Catalog {
    parts: Vec<PartDefinition>,
    index: HashMap<PartKey, usize>,
    colors: ColorTable,
}

impl Catalog {
    /// Build a catalog; parts are ordered by sort order then key
    pub fn new(
        mut parts: Vec<PartDefinition>,
        colors: ColorTable,
    ) -> Result<Self, InspectionError> {
        if parts.is_empty() {
            return Err(InspectionError::validation("part dictionary is empty"));
        }
        parts.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.key.cmp(&b.key)));

        let mut index = HashMap::with_capacity(parts.len());
        for (position, part) in parts.iter().enumerate() {
            validate_part_definition(part)?;
            if index.insert(part.key.clone(), position).is_some() {
                return Err(InspectionError::validation(format!(
                    "duplicate part key '{}'",
                    part.key
                )));
            }
        }

        Ok(Self {
            parts,
            index,
            colors,
        })
    }

    /// Default dictionary and palette shipped with the engine
    pub fn builtin() -> Self {
        let parts = builtin_parts();
        let colors = ColorTable {
            entries: builtin_colors()
                .into_iter()
                .map(|m| (m.condition, m))
                .collect(),
        };
        let index = parts
            .iter()
            .enumerate()
            .map(|(i, p)| (p.key.clone(), i))
            .collect();
        Self {
            parts,
            index,
            colors,
        }
    }

    /// Parts ordered by sort order
    pub fn parts(&self) -> &[PartDefinition] {
        &self.parts
    }

    pub fn part(&self, key: &str) -> Option<&PartDefinition> {
        self.index.get(key).map(|&i| &self.parts[i])
    }

    pub fn require_part(&self, key: &str) -> Result<&PartDefinition, InspectionError> {
        self.part(key).ok_or_else(|| InspectionError::UnknownPart {
            part_key: key.to_string(),
        })
    }

    pub fn colors(&self) -> &ColorTable {
        &self.colors
    }

    /// Fill color for a part: wheel palette for tires, color table otherwise
    pub fn fill_for(&self, part: &PartDefinition, condition: DisplayCondition) -> &str {
        if part.is_tire() {
            wheel_color(condition)
        } else {
            self.colors.color(condition)
        }
    }
}

/// Process-wide holder of the current catalog snapshot
pub struct CatalogCache {
    current: ArcSwap<Catalog>,
}

impl CatalogCache {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: ArcSwap::from_pointee(catalog),
        }
    }

    /// Current snapshot; stays valid even if a reload happens meanwhile
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.current.load_full()
    }

    /// Invalidate and reload from the backing store
    ///
    /// The previous snapshot stays published if loading or validation fails.
    pub async fn reload(
        &self,
        repo: &dyn CatalogRepository,
    ) -> Result<Arc<Catalog>, InspectionError> {
        let parts = repo.list_parts().await.map_err(|e| {
            tracing::error!("Failed to load part dictionary: {:?}", e);
            InspectionError::Internal
        })?;
        let colors = repo.list_colors().await.map_err(|e| {
            tracing::error!("Failed to load color mappings: {:?}", e);
            InspectionError::Internal
        })?;

        let catalog = Arc::new(Catalog::new(parts, ColorTable::from_mappings(colors)?)?);
        self.current.store(catalog.clone());
        tracing::info!(
            parts = catalog.parts().len(),
            colors = catalog.colors().len(),
            "Catalog reloaded"
        );
        Ok(catalog)
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}

// key, Arabic label, English label, category
const BUILTIN_PARTS: [(&str, &str, &str, PartCategory); 26] = {
    use PartCategory::*;
    [
        ("front_bumper", "الصدام الأمامي", "Front Bumper", Front),
        ("grille", "الشبك الأمامي", "Grille", Front),
        ("hood", "الكبوت", "Hood", Front),
        ("windshield", "الزجاج الأمامي", "Windshield", Front),
        ("headlight_left", "المصباح الأمامي الأيسر", "Left Headlight", Front),
        ("headlight_right", "المصباح الأمامي الأيمن", "Right Headlight", Front),
        ("rear_bumper", "الصدام الخلفي", "Rear Bumper", Rear),
        ("trunk", "الشنطة", "Trunk", Rear),
        ("rear_windshield", "الزجاج الخلفي", "Rear Windshield", Rear),
        ("taillight_left", "المصباح الخلفي الأيسر", "Left Taillight", Rear),
        ("taillight_right", "المصباح الخلفي الأيمن", "Right Taillight", Rear),
        ("front_left_fender", "الرفرف الأمامي الأيسر", "Front Left Fender", Left),
        ("front_left_door", "الباب الأمامي الأيسر", "Front Left Door", Left),
        ("rear_left_door", "الباب الخلفي الأيسر", "Rear Left Door", Left),
        ("rear_left_fender", "الرفرف الخلفي الأيسر", "Rear Left Fender", Left),
        ("left_mirror", "المرآة اليسرى", "Left Mirror", Left),
        ("front_right_fender", "الرفرف الأمامي الأيمن", "Front Right Fender", Right),
        ("front_right_door", "الباب الأمامي الأيمن", "Front Right Door", Right),
        ("rear_right_door", "الباب الخلفي الأيمن", "Rear Right Door", Right),
        ("rear_right_fender", "الرفرف الخلفي الأيمن", "Rear Right Fender", Right),
        ("right_mirror", "المرآة اليمنى", "Right Mirror", Right),
        ("roof", "السقف", "Roof", Top),
        ("wheel_front_left", "الإطار الأمامي الأيسر", "Front Left Wheel", Wheels),
        ("wheel_front_right", "الإطار الأمامي الأيمن", "Front Right Wheel", Wheels),
        ("wheel_rear_left", "الإطار الخلفي الأيسر", "Rear Left Wheel", Wheels),
        ("wheel_rear_right", "الإطار الخلفي الأيمن", "Rear Right Wheel", Wheels),
    ]
};

fn builtin_parts() -> Vec<PartDefinition> {
    let mut parts = Vec::with_capacity(BUILTIN_PARTS.len());
    for ((key, ar, en, category), sort_order) in BUILTIN_PARTS.iter().zip(1..) {
        match PartKey::new(*key) {
            Ok(key) => parts.push(PartDefinition {
                key,
                label: BilingualLabel::new(*ar, *en),
                category: *category,
                sort_order,
            }),
            Err(e) => tracing::error!(key, error = %e, "Skipping malformed built-in part"),
        }
    }
    parts
}

fn builtin_colors() -> Vec<ColorMapping> {
    let rows: [(DisplayCondition, &str, &str, &str); 7] = [
        (DisplayCondition::NotInspected, "#d1d5db", "لم يتم الفحص", "Not Inspected"),
        (Condition::Good.into(), "#22c55e", "سليم", "Good"),
        (Condition::Scratch.into(), "#eab308", "خدش", "Scratch"),
        (Condition::Bodywork.into(), "#f97316", "سمكرة", "Bodywork"),
        (Condition::Broken.into(), "#ef4444", "مكسور", "Broken"),
        (Condition::Painted.into(), "#3b82f6", "مصبوغ", "Painted"),
        (Condition::Replaced.into(), "#8b5cf6", "مستبدل", "Replaced"),
    ];

    rows.into_iter()
        .map(|(condition, color, ar, en)| ColorMapping {
            condition,
            color: color.to_string(),
            label: BilingualLabel::new(ar, en),
        })
        .collect()
}
