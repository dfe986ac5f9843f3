//! Damage entry form
//!
//! A short-lived editing session over one part. All edits stay local until
//! `save`, which uploads pending photos and then emits exactly one
//! `record_damage`. Dropping the form (or calling `cancel`) discards everything.

use super::photo::{compress_photo, CompressedPhoto};
use super::repository::PhotoStore;
use crate::config::PhotoConfig;
use crate::contract::{
    Condition, DamageRecord, Inspection, InspectionError, InspectionPart, PartDefinition, PartKey,
    PhotoRef, Severity, StatusInput, TireStatus,
};
use chrono::Utc;
use uuid::Uuid;

/// Which status values the form offers for a part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusVocabulary {
    /// good, scratch, bodywork, broken, painted, replaced
    Body,
    /// new, partially worn, damaged
    Tire,
}

impl StatusVocabulary {
    pub fn for_part(part: &PartDefinition) -> Self {
        if part.is_tire() {
            StatusVocabulary::Tire
        } else {
            StatusVocabulary::Body
        }
    }

    pub fn options(&self) -> Vec<StatusInput> {
        match self {
            StatusVocabulary::Body => Condition::ALL.iter().copied().map(StatusInput::Body).collect(),
            StatusVocabulary::Tire => TireStatus::ALL.iter().copied().map(StatusInput::Tire).collect(),
        }
    }

    fn accepts(&self, input: &StatusInput) -> bool {
        matches!(
            (self, input),
            (StatusVocabulary::Body, StatusInput::Body(_)) | (StatusVocabulary::Tire, StatusInput::Tire(_))
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Fields {
    status: Option<StatusInput>,
    severity: Option<Severity>,
    notes: String,
    photos: Vec<PhotoRef>,
}

/// Result of a save: the stored record plus any photos that failed to upload
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub part: InspectionPart,
    pub failed_uploads: Vec<InspectionError>,
}

/// The single `record_damage` a form produces, ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct FormSubmission {
    pub inspection_id: Uuid,
    pub part_key: PartKey,
    pub record: DamageRecord,
    pub failed_uploads: Vec<InspectionError>,
}

#[derive(Debug)]
pub struct DamageEntryForm {
    inspection_id: Uuid,
    part: PartDefinition,
    vocabulary: StatusVocabulary,
    max_photos: usize,
    initial: Fields,
    current: Fields,
    pending: Vec<CompressedPhoto>,
}

impl DamageEntryForm {
    /// Open the form on a draft inspection, prefilled from any existing record
    pub fn open(
        inspection: &Inspection,
        part: &PartDefinition,
        max_photos: usize,
    ) -> Result<Self, InspectionError> {
        inspection.ensure_editable()?;

        let vocabulary = StatusVocabulary::for_part(part);
        let fields = match inspection.parts.get(&part.key) {
            Some(existing) => Fields {
                status: match vocabulary {
                    StatusVocabulary::Body => Some(StatusInput::Body(existing.condition)),
                    StatusVocabulary::Tire => {
                        TireStatus::from_condition(existing.condition).map(StatusInput::Tire)
                    }
                },
                severity: match vocabulary {
                    StatusVocabulary::Body => existing.severity,
                    StatusVocabulary::Tire => None,
                },
                notes: existing.notes.clone().unwrap_or_default(),
                photos: existing.photos.clone(),
            },
            None => Fields {
                status: None,
                severity: None,
                notes: String::new(),
                photos: Vec::new(),
            },
        };

        Ok(Self {
            inspection_id: inspection.id,
            part: part.clone(),
            vocabulary,
            max_photos,
            initial: fields.clone(),
            current: fields,
            pending: Vec::new(),
        })
    }

    pub fn part(&self) -> &PartDefinition {
        &self.part
    }

    pub fn vocabulary(&self) -> StatusVocabulary {
        self.vocabulary
    }

    pub fn status(&self) -> Option<StatusInput> {
        self.current.status
    }

    pub fn select_status(&mut self, status: StatusInput) -> Result<(), InspectionError> {
        if !self.vocabulary.accepts(&status) {
            return Err(InspectionError::validation(format!(
                "status does not belong to the {:?} vocabulary of part '{}'",
                self.vocabulary, self.part.key
            )));
        }
        self.current.status = Some(status);
        Ok(())
    }

    /// Whether the severity field is shown and required
    pub fn requires_severity(&self) -> bool {
        self.vocabulary == StatusVocabulary::Body
            && self.current.status.is_some_and(|s| s.requires_severity())
    }

    pub fn severity(&self) -> Option<Severity> {
        self.current.severity
    }

    /// Ignored for tire parts
    pub fn set_severity(&mut self, severity: Option<Severity>) {
        if self.vocabulary == StatusVocabulary::Body {
            self.current.severity = severity;
        }
    }

    pub fn notes(&self) -> &str {
        &self.current.notes
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.current.notes = notes.into();
    }

    pub fn photo_count(&self) -> usize {
        self.current.photos.len() + self.pending.len()
    }

    pub fn existing_photos(&self) -> &[PhotoRef] {
        &self.current.photos
    }

    pub fn pending_photos(&self) -> &[CompressedPhoto] {
        &self.pending
    }

    /// Compress and queue a photo for upload on save
    pub fn attach_photo(&mut self, bytes: &[u8], limits: &PhotoConfig) -> Result<(), InspectionError> {
        if self.photo_count() >= self.max_photos {
            return Err(InspectionError::validation(format!(
                "at most {} photos per part",
                self.max_photos
            )));
        }
        let photo = compress_photo(bytes, limits)
            .map_err(|e| InspectionError::validation(format!("photo rejected: {}", e)))?;
        self.pending.push(photo);
        Ok(())
    }

    /// Remove an already-uploaded photo reference
    pub fn remove_existing_photo(&mut self, index: usize) -> Option<PhotoRef> {
        (index < self.current.photos.len()).then(|| self.current.photos.remove(index))
    }

    pub fn remove_pending_photo(&mut self, index: usize) -> Option<CompressedPhoto> {
        (index < self.pending.len()).then(|| self.pending.remove(index))
    }

    pub fn is_dirty(&self) -> bool {
        self.current != self.initial || !self.pending.is_empty()
    }

    /// Check required fields without sending anything
    pub fn validate(&self) -> Result<StatusInput, InspectionError> {
        let status = self.current.status.ok_or_else(|| {
            InspectionError::validation(format!("choose a status for part '{}'", self.part.key))
        })?;
        if self.requires_severity() && self.current.severity.is_none() {
            return Err(InspectionError::validation(format!(
                "severity is required when part '{}' is {}",
                self.part.key,
                status.condition()
            )));
        }
        Ok(status)
    }

    /// Upload pending photos and build the record
    ///
    /// A failed upload is reported in `failed_uploads` and the photo is left
    /// out; the remaining fields are still submitted.
    pub async fn submit(self, store: &dyn PhotoStore) -> Result<FormSubmission, InspectionError> {
        let status = self.validate()?;

        let mut photos = self.current.photos;
        let mut failed_uploads = Vec::new();
        for (index, photo) in self.pending.iter().enumerate() {
            match store.upload(&photo.jpeg).await {
                Ok(reference) => photos.push(reference),
                Err(e) => {
                    tracing::warn!(
                        part_key = %self.part.key,
                        index,
                        error = %e,
                        "Photo upload failed, saving the rest of the form"
                    );
                    failed_uploads.push(InspectionError::PhotoUploadFailed {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let mut record = DamageRecord::new(status.condition()).with_photos(photos);
        if status.requires_severity() {
            record.severity = self.current.severity;
        }
        if !self.current.notes.trim().is_empty() {
            record.notes = Some(self.current.notes);
        }

        Ok(FormSubmission {
            inspection_id: self.inspection_id,
            part_key: self.part.key,
            record,
            failed_uploads,
        })
    }

    /// Submit and apply to the in-memory inspection in one `record_damage`
    pub async fn save(
        self,
        inspection: &mut Inspection,
        store: &dyn PhotoStore,
    ) -> Result<SaveOutcome, InspectionError> {
        if inspection.id != self.inspection_id {
            return Err(InspectionError::validation(
                "form was opened on a different inspection",
            ));
        }
        inspection.ensure_editable()?;
        let submission = self.submit(store).await?;
        let part = inspection
            .record_damage(&submission.part_key, submission.record, Utc::now())?
            .clone();
        Ok(SaveOutcome {
            part,
            failed_uploads: submission.failed_uploads,
        })
    }

    /// Discard local edits
    pub fn cancel(self) {}
}
