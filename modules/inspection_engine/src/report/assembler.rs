//! Report assembler
//!
//! Walks an inspection and produces a language-specific, paginated document:
//! header, vehicle/customer/inspector info, diagrams, legend, damage table,
//! photos, general notes and summary. Sections without data are left out.

use super::i18n::{angle_label, severity_label, tire_status_label, Phrase};
use super::layout::{paginate, Page};
use crate::config::ReportConfig;
use crate::contract::{
    BilingualLabel, CarTemplate, Condition, DisplayCondition, Inspection, InspectionError,
    InspectionPart, Language, PartKey, PhotoRef, TireStatus, ViewAngle,
};
use crate::domain::catalog::Catalog;
use crate::render::diagram::{render, render_placeholder};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageSize {
    A4,
    Letter,
}

impl PageSize {
    /// Value for the CSS `@page size` property
    pub fn css_name(&self) -> &'static str {
        match self {
            PageSize::A4 => "A4",
            PageSize::Letter => "letter",
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PageSize::A4 => "a4",
            PageSize::Letter => "letter",
        })
    }
}

impl FromStr for PageSize {
    type Err = InspectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            other => Err(InspectionError::validation(format!(
                "invalid page size '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub language: Language,
    pub page_size: PageSize,
    /// Diagrams to include, in order
    pub angles: Vec<ViewAngle>,
    pub include_photos: bool,
    pub include_notes: bool,
}

impl ReportOptions {
    pub fn new(language: Language, page_size: PageSize) -> Self {
        Self {
            language,
            page_size,
            angles: ViewAngle::MANDATORY.to_vec(),
            include_photos: true,
            include_notes: true,
        }
    }

    /// Defaults from configuration; unparseable values fall back to Arabic / A4
    pub fn from_config(cfg: &ReportConfig) -> Self {
        let language = cfg.language.parse().unwrap_or(Language::Arabic);
        let page_size = cfg.page_size.parse().unwrap_or(PageSize::A4);
        Self {
            include_photos: cfg.include_photos,
            ..Self::new(language, page_size)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoField {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub condition: DisplayCondition,
    pub color: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DamageRow {
    pub part_key: PartKey,
    pub part_label: String,
    pub condition: Condition,
    pub condition_label: String,
    pub condition_color: String,
    /// `-` when no severity applies
    pub severity_label: String,
    pub notes: String,
    pub photo_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoItem {
    pub part_label: String,
    pub reference: PhotoRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Header {
        title: String,
        /// Inspection number and creation date
        lines: Vec<InfoField>,
        status: String,
    },
    Info {
        title: String,
        fields: Vec<InfoField>,
    },
    Diagram {
        angle: ViewAngle,
        title: String,
        svg: String,
        /// Set when a placeholder was drawn instead of the diagram
        unavailable: Option<String>,
    },
    Legend {
        title: String,
        entries: Vec<LegendEntry>,
    },
    DamageTable {
        title: String,
        columns: Vec<String>,
        rows: Vec<DamageRow>,
        empty_message: String,
    },
    Photos {
        title: String,
        items: Vec<PhotoItem>,
    },
    Notes {
        title: String,
        text: String,
    },
    Summary {
        title: String,
        counts: Vec<(LegendEntry, usize)>,
        inspected_label: String,
        inspected: usize,
        total: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub inspection_id: uuid::Uuid,
    pub title: String,
    pub language: Language,
    pub page_size: PageSize,
    pub is_draft: bool,
    pub sections: Vec<Section>,
    pub pages: Vec<Page>,
}

impl ReportDocument {
    pub fn is_rtl(&self) -> bool {
        self.language.is_rtl()
    }

    pub fn damage_rows(&self) -> &[DamageRow] {
        self.sections
            .iter()
            .find_map(|s| match s {
                Section::DamageTable { rows, .. } => Some(rows.as_slice()),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn legend(&self) -> &[LegendEntry] {
        self.sections
            .iter()
            .find_map(|s| match s {
                Section::Legend { entries, .. } => Some(entries.as_slice()),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn has_section(&self, pred: impl Fn(&Section) -> bool) -> bool {
        self.sections.iter().any(pred)
    }
}

/// Assemble the report for a draft (preview) or finalized inspection
pub fn assemble(
    inspection: &Inspection,
    template: &CarTemplate,
    catalog: &Catalog,
    options: &ReportOptions,
) -> Result<ReportDocument, InspectionError> {
    let lang = options.language;
    let mut sections = vec![header(inspection, lang)];

    for (title, fields) in info_sections(inspection, lang) {
        if !fields.is_empty() {
            sections.push(Section::Info { title, fields });
        }
    }

    let mut rendered = 0;
    for angle in &options.angles {
        let title = format!(
            "{} - {}",
            Phrase::DiagramsSection.text(lang),
            angle_label(*angle, lang)
        );
        match render(template, *angle, &inspection.parts, catalog) {
            Ok(diagram) => {
                rendered += 1;
                sections.push(Section::Diagram {
                    angle: *angle,
                    title,
                    svg: diagram.to_svg_string(),
                    unavailable: None,
                });
            }
            Err(e) => {
                tracing::warn!(
                    inspection_id = %inspection.id,
                    angle = %angle,
                    error = %e,
                    "Diagram unavailable in report, drawing placeholder"
                );
                let message = Phrase::DiagramUnavailable.text(lang);
                sections.push(Section::Diagram {
                    angle: *angle,
                    title,
                    svg: render_placeholder(*angle, message).to_svg_string(),
                    unavailable: Some(e.to_string()),
                });
            }
        }
    }
    if !options.angles.is_empty() && rendered == 0 {
        return Err(InspectionError::ReportGenerationFailed {
            reason: format!(
                "no diagram of template '{}' could be rendered",
                template.id
            ),
        });
    }

    let legend: Vec<LegendEntry> = DisplayCondition::ALL
        .iter()
        .map(|c| legend_entry(catalog, *c, lang))
        .collect();
    sections.push(Section::Legend {
        title: Phrase::LegendSection.text(lang).to_string(),
        entries: legend.clone(),
    });

    let rows = damage_rows(inspection, catalog, lang);
    sections.push(Section::DamageTable {
        title: Phrase::DamageSection.text(lang).to_string(),
        columns: [
            Phrase::PartColumn,
            Phrase::ConditionColumn,
            Phrase::SeverityColumn,
            Phrase::NotesColumn,
            Phrase::PhotosColumn,
        ]
        .iter()
        .map(|p| p.text(lang).to_string())
        .collect(),
        rows,
        empty_message: Phrase::NoDamageRecorded.text(lang).to_string(),
    });

    if options.include_photos {
        let items: Vec<PhotoItem> = ordered_parts(inspection, catalog)
            .flat_map(|(label, part)| {
                let part_label = label.get(lang).to_string();
                part.photos.iter().map(move |reference| PhotoItem {
                    part_label: part_label.clone(),
                    reference: reference.clone(),
                })
            })
            .collect();
        if !items.is_empty() {
            sections.push(Section::Photos {
                title: Phrase::PhotosSection.text(lang).to_string(),
                items,
            });
        }
    }

    if options.include_notes {
        if let Some(notes) = inspection.general_notes.as_deref().filter(|n| !n.trim().is_empty()) {
            sections.push(Section::Notes {
                title: Phrase::GeneralNotesSection.text(lang).to_string(),
                text: notes.to_string(),
            });
        }
    }

    sections.push(summary(inspection, template, legend, lang));

    let pages = paginate(&sections, options.page_size);
    tracing::debug!(
        inspection_id = %inspection.id,
        language = %lang,
        page_size = %options.page_size,
        sections = sections.len(),
        pages = pages.len(),
        "Report assembled"
    );

    Ok(ReportDocument {
        inspection_id: inspection.id,
        title: Phrase::ReportTitle.text(lang).to_string(),
        language: lang,
        page_size: options.page_size,
        is_draft: !inspection.is_finalized(),
        sections,
        pages,
    })
}

fn header(inspection: &Inspection, lang: Language) -> Section {
    let mut lines = vec![
        InfoField {
            label: Phrase::InspectionId.text(lang).to_string(),
            value: inspection.id.to_string(),
        },
        InfoField {
            label: Phrase::CreatedAt.text(lang).to_string(),
            value: inspection.created_at.format("%Y-%m-%d %H:%M").to_string(),
        },
    ];
    if let Some(at) = inspection.finalized_at {
        lines.push(InfoField {
            label: Phrase::FinalizedAt.text(lang).to_string(),
            value: at.format("%Y-%m-%d %H:%M").to_string(),
        });
    }
    let status = if inspection.is_finalized() {
        Phrase::Finalized
    } else {
        Phrase::DraftPreview
    };
    Section::Header {
        title: Phrase::ReportTitle.text(lang).to_string(),
        lines,
        status: status.text(lang).to_string(),
    }
}

fn info_sections(inspection: &Inspection, lang: Language) -> Vec<(String, Vec<InfoField>)> {
    let field = |phrase: Phrase, value: Option<String>| {
        value
            .filter(|v| !v.trim().is_empty())
            .map(|value| InfoField {
                label: phrase.text(lang).to_string(),
                value,
            })
    };

    let v = &inspection.vehicle;
    let vehicle = [
        field(Phrase::Make, v.make.clone()),
        field(Phrase::Model, v.model.clone()),
        field(Phrase::Year, v.year.map(|y| y.to_string())),
        field(Phrase::Vin, v.vin.clone()),
        field(Phrase::Plate, v.plate.clone()),
        field(Phrase::Color, v.color.clone()),
        field(Phrase::Mileage, v.mileage.map(|m| m.to_string())),
    ];

    let customer = inspection
        .customer
        .as_ref()
        .map(|c| {
            vec![
                field(Phrase::Name, c.name.clone()),
                field(Phrase::Phone, c.phone.clone()),
                field(Phrase::Email, c.email.clone()),
            ]
        })
        .unwrap_or_default();

    let inspector = inspection
        .inspector
        .as_ref()
        .map(|i| {
            vec![
                field(Phrase::Name, i.name.clone()),
                field(Phrase::InspectorId, i.id.clone()),
            ]
        })
        .unwrap_or_default();

    vec![
        (
            Phrase::VehicleSection.text(lang).to_string(),
            vehicle.into_iter().flatten().collect(),
        ),
        (
            Phrase::CustomerSection.text(lang).to_string(),
            customer.into_iter().flatten().collect(),
        ),
        (
            Phrase::InspectorSection.text(lang).to_string(),
            inspector.into_iter().flatten().collect(),
        ),
    ]
}

fn legend_entry(catalog: &Catalog, condition: DisplayCondition, lang: Language) -> LegendEntry {
    LegendEntry {
        condition,
        color: catalog.colors().color(condition).to_string(),
        label: catalog
            .colors()
            .label(condition)
            .map(|l| l.get(lang).to_string())
            .unwrap_or_else(|| condition.to_string()),
    }
}

/// Recorded parts in dictionary order; parts since removed from the dictionary go last
fn ordered_parts<'a>(
    inspection: &'a Inspection,
    catalog: &'a Catalog,
) -> impl Iterator<Item = (BilingualLabel, &'a InspectionPart)> + 'a {
    let known = catalog
        .parts()
        .iter()
        .filter_map(move |def| inspection.parts.get(&def.key).map(|p| (def.label.clone(), p)));
    let unknown = inspection
        .parts
        .values()
        .filter(move |p| catalog.part(p.part_key.as_str()).is_none())
        .map(|p| {
            let key = p.part_key.to_string();
            (BilingualLabel::new(key.clone(), key), p)
        });
    known.chain(unknown)
}

fn damage_rows(inspection: &Inspection, catalog: &Catalog, lang: Language) -> Vec<DamageRow> {
    ordered_parts(inspection, catalog)
        .map(|(label, part)| {
            let is_tire = catalog
                .part(part.part_key.as_str())
                .is_some_and(|def| def.is_tire());
            let display = DisplayCondition::Recorded(part.condition);
            let condition_label = match TireStatus::from_condition(part.condition) {
                Some(status) if is_tire => tire_status_label(status, lang).to_string(),
                _ => legend_entry(catalog, display, lang).label,
            };
            let condition_color = match catalog.part(part.part_key.as_str()) {
                Some(def) => catalog.fill_for(def, display).to_string(),
                None => catalog.colors().color(display).to_string(),
            };
            DamageRow {
                part_key: part.part_key.clone(),
                part_label: label.get(lang).to_string(),
                condition: part.condition,
                condition_label,
                condition_color,
                severity_label: part
                    .severity
                    .map(|s| severity_label(s, lang).to_string())
                    .unwrap_or_else(|| "-".to_string()),
                notes: part.notes.clone().unwrap_or_default(),
                photo_count: part.photos.len(),
            }
        })
        .collect()
}

fn summary(
    inspection: &Inspection,
    template: &CarTemplate,
    legend: Vec<LegendEntry>,
    lang: Language,
) -> Section {
    let total = template.parts.iter().filter(|m| m.visible).count();
    let inspected = inspection.parts.len();
    let counts = legend
        .into_iter()
        .map(|entry| {
            let count = match entry.condition {
                DisplayCondition::NotInspected => template
                    .parts
                    .iter()
                    .filter(|m| m.visible && !inspection.parts.contains_key(&m.part_key))
                    .count(),
                DisplayCondition::Recorded(c) => {
                    inspection.parts.values().filter(|p| p.condition == c).count()
                }
            };
            (entry, count)
        })
        .collect();
    Section::Summary {
        title: Phrase::SummarySection.text(lang).to_string(),
        counts,
        inspected_label: Phrase::InspectedParts.text(lang).to_string(),
        inspected,
        total,
    }
}
