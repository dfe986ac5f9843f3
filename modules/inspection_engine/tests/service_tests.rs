//! Service-level tests over the in-memory engine
//!
//! Covers the inspection lifecycle, tire vocabulary, diagram coloring, the
//! damage entry form, catalog reloads and report assembly.

use async_trait::async_trait;
use inspection_engine::config::Config;
use inspection_engine::contract::{
    BilingualLabel, InspectionDetailsUpdate, StatusInput, TemplatePartMapping,
};
use inspection_engine::domain::{InspectionRepository, NoOpEventPublisher, StatusVocabulary};
use inspection_engine::infra::{
    InMemoryCatalogRepository, InMemoryInspectionRepository, InMemoryPhotoStore,
    InMemoryTemplateRepository,
};
use inspection_engine::render::{render, PointerInput};
use inspection_engine::report::{PageSize, ReportOptions, Section};
use inspection_engine::{
    ColorMapping, Condition, DamageRecord, DisplayCondition, Inspection, InspectionEngineModule,
    InspectionError, InspectionStatus, Language, NewInspection, Severity, TireStatus, ViewAngle,
};
use parking_lot::Mutex;
use std::sync::Arc;
use uuid::Uuid;

mod common;
use common::{
    in_memory_module, in_memory_service, key, print_test_header, sample_new_inspection,
    sample_photo,
};

#[tokio::test]
async fn test_sedan_report_scenario() {
    let service = in_memory_service().await;

    print_test_header(
        "test_sedan_report_scenario",
        &[
            "Record a light scratch on the front bumper and a good hood, finalize,",
            "then check the English A4 report table and legend.",
        ],
    );

    let inspection = service
        .create_inspection(sample_new_inspection(None))
        .await
        .expect("create inspection");
    assert_eq!(inspection.template_type, "sedan");
    assert_eq!(inspection.status, InspectionStatus::Draft);

    service
        .record_damage(
            inspection.id,
            &key("front_bumper"),
            DamageRecord::new(Condition::Scratch).with_severity(Severity::Light),
        )
        .await
        .expect("record front bumper");
    service
        .record_damage(inspection.id, &key("hood"), DamageRecord::new(Condition::Good))
        .await
        .expect("record hood");

    let finalized = service
        .finalize_inspection(inspection.id)
        .await
        .expect("finalize");
    assert_eq!(finalized.status, InspectionStatus::Finalized);
    assert!(finalized.finalized_at.is_some());

    let options = ReportOptions::new(Language::English, PageSize::A4);
    let report = service
        .generate_report(inspection.id, &options)
        .await
        .expect("report");

    println!("\n📝 Report has {} sections on {} pages", report.sections.len(), report.pages.len());
    assert!(!report.is_draft);
    assert!(!report.is_rtl());
    assert!(!report.pages.is_empty());

    let rows = report.damage_rows();
    let bumper = rows
        .iter()
        .find(|r| r.part_key.as_str() == "front_bumper")
        .expect("front bumper row");
    assert_eq!(bumper.condition_label, "Scratch");
    assert_eq!(bumper.severity_label, "Light");

    for row in rows.iter().filter(|r| r.part_key.as_str() == "hood") {
        assert_eq!(row.condition, Condition::Good);
        assert_eq!(row.severity_label, "-");
    }

    let legend = report.legend();
    assert_eq!(legend.len(), 7);
    for condition in DisplayCondition::ALL {
        assert!(legend.iter().any(|e| e.condition == condition));
    }

    let html = service
        .report_html(inspection.id, &options)
        .await
        .expect("html");
    assert!(html.contains("Front Bumper"));
    assert!(html.contains("<svg"));
}

#[tokio::test]
async fn test_recording_twice_keeps_last_record() {
    let service = in_memory_service().await;
    let inspection = service
        .create_inspection(sample_new_inspection(None))
        .await
        .unwrap();
    let bumper = key("front_bumper");

    service
        .record_damage(
            inspection.id,
            &bumper,
            DamageRecord::new(Condition::Broken)
                .with_severity(Severity::Medium)
                .with_notes("cracked on the left"),
        )
        .await
        .unwrap();
    let updated = service
        .record_damage(
            inspection.id,
            &bumper,
            DamageRecord::new(Condition::Broken)
                .with_severity(Severity::Severe)
                .with_notes("split through"),
        )
        .await
        .unwrap();

    assert_eq!(updated.parts.len(), 1);
    let part = &updated.parts[&bumper];
    assert_eq!(part.notes.as_deref(), Some("split through"));
    assert_eq!(part.severity, Some(Severity::Severe));

    let reloaded = service.get_inspection(inspection.id).await.unwrap();
    assert_eq!(reloaded, updated);
}

#[tokio::test]
async fn test_damaged_tire_is_stored_as_broken_without_severity() {
    let service = in_memory_service().await;
    let inspection = service
        .create_inspection(sample_new_inspection(None))
        .await
        .unwrap();
    let wheel = key("wheel_front_left");

    let record = DamageRecord::new(TireStatus::Damaged.condition()).with_severity(Severity::Severe);
    let updated = service
        .record_damage(inspection.id, &wheel, record)
        .await
        .unwrap();

    let part = &updated.parts[&wheel];
    assert_eq!(part.condition, Condition::Broken);
    assert_eq!(part.severity, None);
}

#[tokio::test]
async fn test_tire_rejects_body_only_conditions() {
    let service = in_memory_service().await;
    let inspection = service
        .create_inspection(sample_new_inspection(None))
        .await
        .unwrap();

    let err = service
        .record_damage(
            inspection.id,
            &key("wheel_rear_right"),
            DamageRecord::new(Condition::Painted),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, InspectionError::Validation { .. }));

    let unchanged = service.get_inspection(inspection.id).await.unwrap();
    assert!(unchanged.parts.is_empty());
}

#[tokio::test]
async fn test_unknown_part_is_rejected() {
    let service = in_memory_service().await;
    let inspection = service
        .create_inspection(sample_new_inspection(None))
        .await
        .unwrap();

    let err = service
        .record_damage(inspection.id, &key("sunroof"), DamageRecord::new(Condition::Good))
        .await
        .unwrap_err();
    assert!(matches!(err, InspectionError::UnknownPart { .. }));
}

#[tokio::test]
async fn test_finalized_inspection_is_locked() {
    let service = in_memory_service().await;

    print_test_header(
        "test_finalized_inspection_is_locked",
        &["After finalize, recording and a second finalize both fail without side effects."],
    );

    let inspection = service
        .create_inspection(sample_new_inspection(None))
        .await
        .unwrap();
    service
        .record_damage(
            inspection.id,
            &key("trunk"),
            DamageRecord::new(Condition::Bodywork).with_severity(Severity::Light),
        )
        .await
        .unwrap();
    let finalized = service.finalize_inspection(inspection.id).await.unwrap();

    let err = service
        .record_damage(inspection.id, &key("roof"), DamageRecord::new(Condition::Good))
        .await
        .unwrap_err();
    assert!(matches!(err, InspectionError::InspectionLocked { .. }));
    assert!(!err.is_recoverable());

    let after = service.get_inspection(inspection.id).await.unwrap();
    assert_eq!(after.parts, finalized.parts);

    let err = service.finalize_inspection(inspection.id).await.unwrap_err();
    assert!(matches!(err, InspectionError::AlreadyFinalized { .. }));

    let err = service.open_form(inspection.id, "roof").await.unwrap_err();
    assert!(matches!(err, InspectionError::InspectionLocked { .. }));
}

#[tokio::test]
async fn test_finalized_inspection_is_locked_before_input_checks() {
    let service = in_memory_service().await;

    print_test_header(
        "test_finalized_inspection_is_locked_before_input_checks",
        &["Once finalized, even invalid input reports InspectionLocked."],
    );

    let inspection = service
        .create_inspection(sample_new_inspection(None))
        .await
        .unwrap();
    service.finalize_inspection(inspection.id).await.unwrap();

    let err = service
        .record_damage(
            inspection.id,
            &key("wheel_front_left"),
            DamageRecord::new(Condition::Painted),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, InspectionError::InspectionLocked { .. }));

    let err = service
        .record_damage(inspection.id, &key("spoiler"), DamageRecord::new(Condition::Good))
        .await
        .unwrap_err();
    assert!(matches!(err, InspectionError::InspectionLocked { .. }));

    let err = service
        .record_damage(
            inspection.id,
            &key("hood"),
            DamageRecord::new(Condition::Scratch).with_photos(vec!["x".to_string(); 50]),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, InspectionError::InspectionLocked { .. }));
}

/// Serves a snapshot taken before finalize while writes go to the live store
struct StaleReads {
    live: InMemoryInspectionRepository,
    snapshot: Mutex<Option<Inspection>>,
}

#[async_trait]
impl InspectionRepository for StaleReads {
    async fn save(&self, inspection: &Inspection) -> anyhow::Result<Inspection> {
        self.live.save(inspection).await
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Inspection>> {
        if let Some(stale) = self.snapshot.lock().clone() {
            return Ok(Some(stale));
        }
        self.live.find_by_id(id).await
    }

    async fn list(&self, limit: u64, offset: u64) -> anyhow::Result<Vec<Inspection>> {
        self.live.list(limit, offset).await
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        self.live.delete(id).await
    }

    async fn clear_vehicle_link(&self, car_id: Uuid) -> anyhow::Result<u64> {
        self.live.clear_vehicle_link(car_id).await
    }
}

#[tokio::test]
async fn test_edit_racing_finalize_is_locked() {
    let repo = Arc::new(StaleReads {
        live: InMemoryInspectionRepository::default(),
        snapshot: Mutex::new(None),
    });
    let module = InspectionEngineModule::assemble(
        Config::default(),
        repo.clone(),
        Arc::new(InMemoryTemplateRepository::default()),
        Arc::new(InMemoryCatalogRepository::default()),
        Arc::new(InMemoryPhotoStore::default()),
        Arc::new(NoOpEventPublisher),
    );
    let service = module.service();
    service.seed_defaults().await.unwrap();

    print_test_header(
        "test_edit_racing_finalize_is_locked",
        &["An edit that loaded the draft before a finalize cannot reopen it."],
    );

    let draft = service
        .create_inspection(sample_new_inspection(None))
        .await
        .unwrap();
    *repo.snapshot.lock() = Some(draft.clone());
    let finalized = service.finalize_inspection(draft.id).await.unwrap();

    let err = service
        .record_damage(draft.id, &key("roof"), DamageRecord::new(Condition::Good))
        .await
        .unwrap_err();
    assert!(matches!(err, InspectionError::InspectionLocked { .. }));

    let err = service
        .update_details(
            draft.id,
            InspectionDetailsUpdate {
                general_notes: Some("late edit".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, InspectionError::InspectionLocked { .. }));

    let err = service.finalize_inspection(draft.id).await.unwrap_err();
    assert!(matches!(err, InspectionError::AlreadyFinalized { .. }));

    *repo.snapshot.lock() = None;
    let stored = service.get_inspection(draft.id).await.unwrap();
    assert_eq!(stored.status, InspectionStatus::Finalized);
    assert_eq!(stored.finalized_at, finalized.finalized_at);
    assert!(stored.parts.is_empty());
    assert_eq!(stored.general_notes, draft.general_notes);
}

#[tokio::test]
async fn test_missing_inspection_is_not_found() {
    let service = in_memory_service().await;
    let err = service.get_inspection(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, InspectionError::NotFound { .. }));

    let err = service.delete_inspection(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, InspectionError::NotFound { .. }));
}

#[tokio::test]
async fn test_unknown_body_type_uses_default_template() {
    let service = in_memory_service().await;
    let inspection = service
        .create_inspection(NewInspection {
            template_type: "pickup".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(inspection.template_type, "sedan");

    let blank = service
        .create_inspection(NewInspection::default())
        .await
        .unwrap();
    assert_eq!(blank.template_type, "sedan");
}

#[tokio::test]
async fn test_mandatory_angles_draw_every_mapped_part() {
    let service = in_memory_service().await;
    let catalog = service.catalog();

    for template in service.list_templates().await.unwrap() {
        for angle in ViewAngle::MANDATORY {
            let diagram = render(&template, angle, &Default::default(), &catalog).unwrap();
            for mapping in template.parts.iter().filter(|m| m.is_interactive_in(angle)) {
                assert!(
                    diagram.region(mapping.part_key.as_str()).is_some(),
                    "{} missing from {} diagram of {}",
                    mapping.part_key,
                    angle,
                    template.id
                );
            }
        }
    }
}

#[tokio::test]
async fn test_colors_survive_angle_switches() {
    let service = in_memory_service().await;
    let inspection = service
        .create_inspection(sample_new_inspection(None))
        .await
        .unwrap();
    service
        .record_damage(
            inspection.id,
            &key("front_bumper"),
            DamageRecord::new(Condition::Broken).with_severity(Severity::Severe),
        )
        .await
        .unwrap();
    service
        .record_damage(inspection.id, &key("wheel_front_left"), DamageRecord::new(Condition::Good))
        .await
        .unwrap();

    let first_front = service
        .render_diagram(inspection.id, ViewAngle::Front)
        .await
        .unwrap();
    let first_left = service
        .render_diagram(inspection.id, ViewAngle::Left)
        .await
        .unwrap();
    for angle in [ViewAngle::Rear, ViewAngle::Top, ViewAngle::Right] {
        service.render_diagram(inspection.id, angle).await.unwrap();
    }

    assert_eq!(
        service
            .render_diagram(inspection.id, ViewAngle::Front)
            .await
            .unwrap(),
        first_front
    );
    assert_eq!(
        service
            .render_diagram(inspection.id, ViewAngle::Left)
            .await
            .unwrap(),
        first_left
    );
}

#[tokio::test]
async fn test_each_condition_renders_its_table_color() {
    let service = in_memory_service().await;
    let catalog = service.catalog();
    let template = service.get_template("sedan").await.unwrap();

    for condition in Condition::ALL.iter().copied() {
        let mapping = catalog
            .colors()
            .get(DisplayCondition::Recorded(condition))
            .expect("one mapping per condition");

        let mut inspection = inspection_engine::Inspection {
            id: Uuid::new_v4(),
            template_type: template.id.clone(),
            car_id: None,
            status: InspectionStatus::Draft,
            vehicle: Default::default(),
            customer: None,
            inspector: None,
            general_notes: None,
            parts: Default::default(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            finalized_at: None,
        };
        let severity = condition.requires_severity().then_some(Severity::Medium);
        let mut record = DamageRecord::new(condition);
        record.severity = severity;
        inspection
            .record_damage(&key("hood"), record, chrono::Utc::now())
            .unwrap();

        let diagram = render(&template, ViewAngle::Front, &inspection.parts, &catalog).unwrap();
        assert_eq!(diagram.fill_of("hood"), Some(mapping.color.as_str()));
    }

    let untouched = render(&template, ViewAngle::Front, &Default::default(), &catalog).unwrap();
    assert_eq!(
        untouched.fill_of("hood"),
        Some(catalog.colors().color(DisplayCondition::NotInspected))
    );
}

#[tokio::test]
async fn test_hidden_and_unmapped_parts_have_no_region() {
    let service = in_memory_service().await;
    let catalog = service.catalog();
    let mut template = service.get_template("sedan").await.unwrap();

    template.parts.retain(|m| m.part_key.as_str() != "grille");
    for mapping in template.parts.iter_mut() {
        if mapping.part_key.as_str() == "hood" {
            mapping.visible = false;
        }
    }

    let diagram = render(&template, ViewAngle::Front, &Default::default(), &catalog).unwrap();
    assert!(diagram.region("grille").is_none());
    assert!(diagram.region("hood").is_none());
    assert!(diagram.region("front_bumper").is_some());
    assert_eq!(
        diagram.hit_test(&PointerInput::Target {
            element_id: "hood".to_string()
        }),
        None
    );
}

#[tokio::test]
async fn test_hit_test_selects_bumper_by_element() {
    let service = in_memory_service().await;
    let catalog = service.catalog();
    let template = service.get_template("sedan").await.unwrap();

    let diagram = render(&template, ViewAngle::Top, &Default::default(), &catalog).unwrap();
    let hit = diagram.hit_test(&PointerInput::Target {
        element_id: "front-bumper".to_string(),
    });
    assert_eq!(hit.map(|k| k.as_str()), Some("front_bumper"));

    // Inside the top view's front bumper rect
    let hit = diagram.hit_test(&PointerInput::Touch { x: 150.0, y: 35.0 });
    assert_eq!(hit.map(|k| k.as_str()), Some("front_bumper"));
}

#[tokio::test]
async fn test_unavailable_angle_renders_placeholder() {
    let service = in_memory_service().await;
    let mut template = service.get_template("sedan").await.unwrap();
    template.id = "sedan-lite".to_string();
    template.body_type = "sedan-lite".to_string();
    template.is_default = false;
    template.diagrams.remove(&ViewAngle::Top);
    for mapping in template.parts.iter_mut() {
        mapping.angles.remove(&ViewAngle::Top);
    }
    service.register_template(&template).await.unwrap();

    let inspection = service
        .create_inspection(NewInspection {
            template_type: "sedan-lite".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(inspection.template_type, "sedan-lite");

    let svg = service
        .render_diagram(inspection.id, ViewAngle::Top)
        .await
        .unwrap();
    assert!(svg.contains("diagram-placeholder"));
}

#[tokio::test]
async fn test_register_template_requires_mandatory_angles() {
    let service = in_memory_service().await;
    let mut template = service.get_template("sedan").await.unwrap();
    template.id = "broken".to_string();
    template.is_default = false;
    template.diagrams.remove(&ViewAngle::Rear);

    let err = service.register_template(&template).await.unwrap_err();
    assert!(matches!(err, InspectionError::InvalidTemplate { .. }));
}

#[tokio::test]
async fn test_register_template_rejects_missing_element() {
    let service = in_memory_service().await;
    let mut template = service.get_template("sedan").await.unwrap();
    template.id = "mismatch".to_string();
    template.is_default = false;
    template.parts.retain(|m| m.part_key.as_str() != "grille");
    template.parts.push(TemplatePartMapping {
        part_key: key("grille"),
        element_id: "no-such-element".to_string(),
        angles: [ViewAngle::Rear].into_iter().collect(),
        visible: true,
    });

    let err = service.register_template(&template).await.unwrap_err();
    assert!(matches!(err, InspectionError::InvalidTemplate { .. }));
}

#[tokio::test]
async fn test_form_cancel_leaves_inspection_unchanged() {
    let service = in_memory_service().await;
    let inspection = service
        .create_inspection(sample_new_inspection(None))
        .await
        .unwrap();

    let mut form = service.open_form(inspection.id, "hood").await.unwrap();
    assert_eq!(form.vocabulary(), StatusVocabulary::Body);
    form.select_status(StatusInput::Body(Condition::Bodywork))
        .unwrap();
    form.set_severity(Some(Severity::Medium));
    form.set_notes("dent near the latch");
    assert!(form.is_dirty());
    form.cancel();

    let after = service.get_inspection(inspection.id).await.unwrap();
    assert_eq!(after, inspection);
}

#[tokio::test]
async fn test_form_save_uploads_photos_and_records_once() {
    let module = in_memory_module().await;
    let service = module.service();
    let limits = module.config().photo.clone();
    let inspection = service
        .create_inspection(sample_new_inspection(None))
        .await
        .unwrap();

    let mut form = service
        .open_form(inspection.id, "front_left_door")
        .await
        .unwrap();
    form.select_status(StatusInput::Body(Condition::Scratch))
        .unwrap();
    assert!(form.requires_severity());
    assert!(form.validate().is_err());

    form.set_severity(Some(Severity::Light));
    form.set_notes("key scratch");
    form.attach_photo(&sample_photo(320, 200), &limits).unwrap();
    form.attach_photo(&sample_photo(64, 64), &limits).unwrap();
    assert_eq!(form.photo_count(), 2);

    let outcome = service.save_form(form).await.unwrap();
    assert!(outcome.failed_uploads.is_empty());
    assert_eq!(outcome.part.condition, Condition::Scratch);
    assert_eq!(outcome.part.severity, Some(Severity::Light));
    assert_eq!(outcome.part.photos.len(), 2);
    assert!(outcome.part.photos.iter().all(|p| p.starts_with("/uploads/")));

    let reopened = service
        .open_form(inspection.id, "front_left_door")
        .await
        .unwrap();
    assert_eq!(reopened.status(), Some(StatusInput::Body(Condition::Scratch)));
    assert_eq!(reopened.notes(), "key scratch");
    assert!(!reopened.is_dirty());
}

#[tokio::test]
async fn test_tire_form_round_trips_status() {
    let service = in_memory_service().await;
    let inspection = service
        .create_inspection(sample_new_inspection(None))
        .await
        .unwrap();

    let mut form = service
        .open_form(inspection.id, "wheel_rear_left")
        .await
        .unwrap();
    assert_eq!(form.vocabulary(), StatusVocabulary::Tire);
    assert!(form
        .select_status(StatusInput::Body(Condition::Painted))
        .is_err());
    form.select_status(StatusInput::Tire(TireStatus::PartiallyWorn))
        .unwrap();
    form.set_severity(Some(Severity::Severe));
    assert!(!form.requires_severity());

    let outcome = service.save_form(form).await.unwrap();
    assert_eq!(outcome.part.condition, TireStatus::PartiallyWorn.condition());
    assert_eq!(outcome.part.severity, None);

    let reopened = service
        .open_form(inspection.id, "wheel_rear_left")
        .await
        .unwrap();
    assert_eq!(
        reopened.status(),
        Some(StatusInput::Tire(TireStatus::PartiallyWorn))
    );
}

#[tokio::test]
async fn test_detach_vehicle_keeps_inspections() {
    let service = in_memory_service().await;
    let car = Uuid::new_v4();

    let draft = service
        .create_inspection(sample_new_inspection(Some(car)))
        .await
        .unwrap();
    let done = service
        .create_inspection(sample_new_inspection(Some(car)))
        .await
        .unwrap();
    service.finalize_inspection(done.id).await.unwrap();
    let other = service
        .create_inspection(sample_new_inspection(Some(Uuid::new_v4())))
        .await
        .unwrap();

    let cleared = service.detach_vehicle(car).await.unwrap();
    assert_eq!(cleared, 2);

    assert_eq!(service.get_inspection(draft.id).await.unwrap().car_id, None);
    let done = service.get_inspection(done.id).await.unwrap();
    assert_eq!(done.car_id, None);
    assert_eq!(done.status, InspectionStatus::Finalized);
    assert!(service.get_inspection(other.id).await.unwrap().car_id.is_some());
}

#[tokio::test]
async fn test_catalog_edit_reloads_snapshot() {
    let service = in_memory_service().await;
    let before = service.catalog();

    let mut scratch = service
        .color_mappings()
        .into_iter()
        .find(|m| m.condition == DisplayCondition::Recorded(Condition::Scratch))
        .unwrap();
    scratch.color = "#fde047".to_string();
    service.upsert_color_mapping(&scratch).await.unwrap();

    let after = service.catalog();
    assert_eq!(
        after.colors().color(DisplayCondition::Recorded(Condition::Scratch)),
        "#fde047"
    );
    // Published snapshots are never mutated
    assert_ne!(
        before.colors().color(DisplayCondition::Recorded(Condition::Scratch)),
        "#fde047"
    );

    let bad = ColorMapping {
        condition: DisplayCondition::Recorded(Condition::Broken),
        color: "red".to_string(),
        label: BilingualLabel::new("مكسور", "Broken"),
    };
    let err = service.upsert_color_mapping(&bad).await.unwrap_err();
    assert!(matches!(err, InspectionError::Validation { .. }));

    let mut roof = service
        .part_dictionary()
        .into_iter()
        .find(|p| p.key.as_str() == "roof")
        .unwrap();
    roof.label = BilingualLabel::new("السقف", "Roof Panel");
    service.upsert_part_definition(&roof).await.unwrap();
    let reloaded = service.catalog();
    assert_eq!(reloaded.part("roof").unwrap().label.en, "Roof Panel");
}

#[tokio::test]
async fn test_draft_report_is_arabic_preview_by_default() {
    let service = in_memory_service().await;
    let inspection = service
        .create_inspection(sample_new_inspection(None))
        .await
        .unwrap();

    let report = service
        .generate_report(inspection.id, &service.default_report_options())
        .await
        .unwrap();
    assert!(report.is_draft);
    assert!(report.is_rtl());
    assert_eq!(report.page_size, PageSize::A4);
    assert!(report.damage_rows().is_empty());
    assert!(report.has_section(|s| matches!(s, Section::Notes { .. })));
}

#[tokio::test]
async fn test_report_needs_at_least_one_diagram() {
    let service = in_memory_service().await;
    let inspection = service
        .create_inspection(sample_new_inspection(None))
        .await
        .unwrap();

    let mut options = ReportOptions::new(Language::English, PageSize::Letter);
    options.angles = vec![ViewAngle::Top];
    let report = service.generate_report(inspection.id, &options).await.unwrap();
    assert_eq!(report.page_size, PageSize::Letter);

    let err = service
        .generate_report(Uuid::new_v4(), &options)
        .await
        .unwrap_err();
    assert!(matches!(err, InspectionError::NotFound { .. }));
}

#[tokio::test]
async fn test_list_is_newest_first_and_capped() {
    let service = in_memory_service().await;
    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(
            service
                .create_inspection(sample_new_inspection(None))
                .await
                .unwrap()
                .id,
        );
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let listed = service.list_inspections(10, 0).await.unwrap();
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0].id, ids[2]);

    let page = service.list_inspections(0, 0).await.unwrap();
    assert_eq!(page.len(), 1);
}

#[tokio::test]
async fn test_native_client_matches_service() {
    let module = in_memory_module().await;
    let client = module.client();

    let created = client
        .create_inspection(sample_new_inspection(None))
        .await
        .unwrap();
    let fetched = client.get_inspection(created.id).await.unwrap();
    assert_eq!(created, fetched);

    assert_eq!(client.color_mappings().await.unwrap().len(), 7);
    assert!(!client.part_dictionary().await.unwrap().is_empty());
    assert_eq!(client.get_template("sedan").await.unwrap().id, "sedan");
}
