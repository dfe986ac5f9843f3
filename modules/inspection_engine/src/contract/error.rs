//! Contract error types for the inspection engine
//!
//! These errors are transport-agnostic and used for inter-module communication.

use super::model::ViewAngle;

/// Inspection engine domain errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectionError {
    /// Requested view angle is not drawn by the template
    ViewAngleUnavailable {
        /// Template identifier
        template_id: String,
        /// Requested angle
        angle: ViewAngle,
    },
    /// No active template for the body type and no default to fall back to
    TemplateNotFound {
        /// Requested template id or body type
        template: String,
    },
    /// Mutation attempted on a finalized inspection
    InspectionLocked {
        /// Inspection identifier
        id: String,
    },
    /// Finalize attempted on an already finalized inspection
    AlreadyFinalized {
        /// Inspection identifier
        id: String,
    },
    /// One photo could not be uploaded
    PhotoUploadFailed {
        /// Position of the photo in the form's pending list
        index: usize,
        /// Failure details
        reason: String,
    },
    /// Report could not be produced; callers may retry
    ReportGenerationFailed {
        /// Failure details
        reason: String,
    },
    /// Inspection or other resource not found
    NotFound {
        /// Resource type (inspection, part_definition, color_mapping)
        resource: String,
        /// Resource identifier
        id: String,
    },
    /// Part key is not in the part dictionary
    UnknownPart {
        /// Offending key
        part_key: String,
    },
    /// Template violates a structural invariant
    InvalidTemplate {
        /// Template identifier
        template_id: String,
        /// Violation details
        details: String,
    },
    /// Validation error
    Validation {
        /// Validation error message
        message: String,
    },
    /// Internal error
    Internal,
}

impl InspectionError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether the caller can recover by falling back or retrying.
    ///
    /// State-machine violations (`InspectionLocked`, `AlreadyFinalized`) are usage
    /// errors and must always be surfaced.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ViewAngleUnavailable { .. }
                | Self::TemplateNotFound { .. }
                | Self::PhotoUploadFailed { .. }
                | Self::ReportGenerationFailed { .. }
                | Self::Internal
        )
    }
}

impl std::fmt::Display for InspectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ViewAngleUnavailable { template_id, angle } => {
                write!(f, "View angle '{}' unavailable in template {}", angle, template_id)
            }
            Self::TemplateNotFound { template } => {
                write!(f, "Template not found: {}", template)
            }
            Self::InspectionLocked { id } => {
                write!(f, "Inspection {} is finalized and cannot be modified", id)
            }
            Self::AlreadyFinalized { id } => {
                write!(f, "Inspection {} is already finalized", id)
            }
            Self::PhotoUploadFailed { index, reason } => {
                write!(f, "Photo #{} upload failed: {}", index + 1, reason)
            }
            Self::ReportGenerationFailed { reason } => {
                write!(f, "Report generation failed: {}", reason)
            }
            Self::NotFound { resource, id } => {
                write!(f, "{} not found: {}", resource, id)
            }
            Self::UnknownPart { part_key } => {
                write!(f, "Unknown part: {}", part_key)
            }
            Self::InvalidTemplate {
                template_id,
                details,
            } => {
                write!(f, "Invalid template '{}': {}", template_id, details)
            }
            Self::Validation { message } => {
                write!(f, "Validation error: {}", message)
            }
            Self::Internal => {
                write!(f, "Internal error")
            }
        }
    }
}

impl std::error::Error for InspectionError {}
