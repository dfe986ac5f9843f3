//! Report phrasebook (Arabic / English)
//!
//! Condition labels come from the color mapping table; everything else the
//! report prints is looked up here so both languages cover the whole document.

use crate::contract::{Language, Severity, TireStatus, ViewAngle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phrase {
    ReportTitle,
    DraftPreview,
    Finalized,
    CreatedAt,
    FinalizedAt,
    InspectionId,
    VehicleSection,
    CustomerSection,
    InspectorSection,
    Make,
    Model,
    Year,
    Vin,
    Plate,
    Color,
    Mileage,
    Name,
    Phone,
    Email,
    InspectorId,
    DiagramsSection,
    DiagramUnavailable,
    LegendSection,
    DamageSection,
    PartColumn,
    ConditionColumn,
    SeverityColumn,
    NotesColumn,
    PhotosColumn,
    NoDamageRecorded,
    PhotosSection,
    GeneralNotesSection,
    SummarySection,
    InspectedParts,
    Page,
    Of,
    Continued,
}

impl Phrase {
    fn pair(self) -> (&'static str, &'static str) {
        use Phrase::*;
        match self {
            ReportTitle => ("تقرير فحص المركبة", "Vehicle Inspection Report"),
            DraftPreview => ("مسودة - معاينة", "Draft preview"),
            Finalized => ("معتمد", "Finalized"),
            CreatedAt => ("تاريخ الإنشاء", "Created"),
            FinalizedAt => ("تاريخ الاعتماد", "Finalized at"),
            InspectionId => ("رقم الفحص", "Inspection no."),
            VehicleSection => ("بيانات المركبة", "Vehicle Information"),
            CustomerSection => ("بيانات العميل", "Customer"),
            InspectorSection => ("الفاحص", "Inspector"),
            Make => ("الشركة المصنعة", "Make"),
            Model => ("الطراز", "Model"),
            Year => ("سنة الصنع", "Year"),
            Vin => ("رقم الهيكل", "VIN"),
            Plate => ("رقم اللوحة", "Plate"),
            Color => ("اللون", "Color"),
            Mileage => ("عداد المسافة", "Mileage"),
            Name => ("الاسم", "Name"),
            Phone => ("الهاتف", "Phone"),
            Email => ("البريد الإلكتروني", "Email"),
            InspectorId => ("رقم الفاحص", "Inspector ID"),
            DiagramsSection => ("مخططات المركبة", "Vehicle Diagrams"),
            DiagramUnavailable => ("المخطط غير متوفر", "Diagram unavailable"),
            LegendSection => ("دليل الألوان", "Color Legend"),
            DamageSection => ("جدول الأضرار", "Damage Details"),
            PartColumn => ("القطعة", "Part"),
            ConditionColumn => ("الحالة", "Condition"),
            SeverityColumn => ("الشدة", "Severity"),
            NotesColumn => ("ملاحظات", "Notes"),
            PhotosColumn => ("الصور", "Photos"),
            NoDamageRecorded => ("لم يتم تسجيل أي قطعة", "No parts recorded"),
            PhotosSection => ("صور الأضرار", "Damage Photos"),
            GeneralNotesSection => ("ملاحظات عامة", "General Notes"),
            SummarySection => ("الملخص", "Summary"),
            InspectedParts => ("القطع المفحوصة", "Inspected parts"),
            Page => ("صفحة", "Page"),
            Of => ("من", "of"),
            Continued => ("تابع", "continued"),
        }
    }

    pub fn text(self, language: Language) -> &'static str {
        let (ar, en) = self.pair();
        match language {
            Language::Arabic => ar,
            Language::English => en,
        }
    }
}

pub fn severity_label(severity: Severity, language: Language) -> &'static str {
    match (severity, language) {
        (Severity::Light, Language::Arabic) => "خفيف",
        (Severity::Light, Language::English) => "Light",
        (Severity::Medium, Language::Arabic) => "متوسط",
        (Severity::Medium, Language::English) => "Medium",
        (Severity::Severe, Language::Arabic) => "شديد",
        (Severity::Severe, Language::English) => "Severe",
    }
}

pub fn tire_status_label(status: TireStatus, language: Language) -> &'static str {
    match (status, language) {
        (TireStatus::New, Language::Arabic) => "جديد",
        (TireStatus::New, Language::English) => "New",
        (TireStatus::PartiallyWorn, Language::Arabic) => "مستهلك جزئيا",
        (TireStatus::PartiallyWorn, Language::English) => "Partially worn",
        (TireStatus::Damaged, Language::Arabic) => "تالف",
        (TireStatus::Damaged, Language::English) => "Damaged",
    }
}

pub fn angle_label(angle: ViewAngle, language: Language) -> &'static str {
    match (angle, language) {
        (ViewAngle::Front, Language::Arabic) => "الأمام",
        (ViewAngle::Front, Language::English) => "Front",
        (ViewAngle::Rear, Language::Arabic) => "الخلف",
        (ViewAngle::Rear, Language::English) => "Rear",
        (ViewAngle::Left, Language::Arabic) => "الجانب الأيسر",
        (ViewAngle::Left, Language::English) => "Left side",
        (ViewAngle::Right, Language::Arabic) => "الجانب الأيمن",
        (ViewAngle::Right, Language::English) => "Right side",
        (ViewAngle::Top, Language::Arabic) => "الأعلى",
        (ViewAngle::Top, Language::English) => "Top",
    }
}
