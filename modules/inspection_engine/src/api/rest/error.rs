//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::InspectionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Serialize)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// A URI reference that identifies the specific occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Whether repeating the request may succeed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            retryable: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    pub fn retryable(mut self) -> Self {
        self.retryable = Some(true);
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/problem+json")],
            Json(self),
        )
            .into_response()
    }
}

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: InspectionError) -> Problem {
    let detail = error.to_string();
    match error {
        InspectionError::NotFound { resource, .. } => {
            Problem::new(StatusCode::NOT_FOUND, format!("{} Not Found", resource))
                .with_detail(detail)
        }

        InspectionError::TemplateNotFound { .. } => {
            Problem::new(StatusCode::NOT_FOUND, "Template Not Found").with_detail(detail)
        }

        InspectionError::ViewAngleUnavailable { .. } => {
            Problem::new(StatusCode::NOT_FOUND, "View Angle Unavailable").with_detail(detail)
        }

        InspectionError::InspectionLocked { id } => {
            Problem::new(StatusCode::CONFLICT, "Inspection Locked")
                .with_detail(detail)
                .with_instance(format!("/inspections/{}", id))
        }

        InspectionError::AlreadyFinalized { id } => {
            Problem::new(StatusCode::CONFLICT, "Already Finalized")
                .with_detail(detail)
                .with_instance(format!("/inspections/{}", id))
        }

        InspectionError::UnknownPart { .. } => {
            Problem::new(StatusCode::BAD_REQUEST, "Unknown Part").with_detail(detail)
        }

        InspectionError::InvalidTemplate { .. } => {
            Problem::new(StatusCode::BAD_REQUEST, "Invalid Template").with_detail(detail)
        }

        InspectionError::Validation { message } => {
            Problem::new(StatusCode::BAD_REQUEST, "Validation Error").with_detail(message)
        }

        InspectionError::PhotoUploadFailed { .. } => {
            Problem::new(StatusCode::BAD_GATEWAY, "Photo Upload Failed")
                .with_detail(detail)
                .retryable()
        }

        InspectionError::ReportGenerationFailed { .. } => {
            Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Report Generation Failed")
                .with_detail(detail)
                .retryable()
        }

        InspectionError::Internal => {
            Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                .with_detail("An unexpected error occurred")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_machine_errors_are_conflicts() {
        let locked = map_domain_error(InspectionError::InspectionLocked { id: "x".into() });
        assert_eq!(locked.status, 409);
        assert_eq!(locked.instance.as_deref(), Some("/inspections/x"));

        let twice = map_domain_error(InspectionError::AlreadyFinalized { id: "x".into() });
        assert_eq!(twice.status, 409);
        assert_eq!(twice.retryable, None);
    }

    #[test]
    fn test_report_failure_is_retryable() {
        let problem = map_domain_error(InspectionError::ReportGenerationFailed {
            reason: "no diagram".into(),
        });
        assert_eq!(problem.status, 500);
        assert_eq!(problem.retryable, Some(true));
    }
}
