use serde_json::{json, Value};

use crate::contract::EmployeeRecord;

/// Terminal states of one authentication invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthenticationOutcome {
    Authenticated {
        employee: EmployeeRecord,
        signed_url: Option<String>,
    },
    PersonNotFound {
        signed_url: Option<String>,
    },
    ObjectNotFound {
        object_key: String,
    },
    InvalidRequest {
        message: String,
    },
    InternalError {
        error: String,
    },
}

impl AuthenticationOutcome {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Authenticated { .. } => 200,
            Self::InvalidRequest { .. } => 400,
            Self::PersonNotFound { .. } => 403,
            Self::ObjectNotFound { .. } => 404,
            Self::InternalError { .. } => 500,
        }
    }

    pub fn body(&self) -> Value {
        match self {
            Self::Authenticated {
                employee,
                signed_url,
            } => json!({
                "message": "Success",
                "signedUrl": signed_url,
                "rekognitionid": employee.face_id,
                "firstName": employee.first_name,
                "lastName": employee.last_name,
            }),
            Self::PersonNotFound { signed_url } => json!({
                "message": "Person Not Found",
                "signedUrl": signed_url,
            }),
            Self::ObjectNotFound { object_key } => json!({
                "message": "File not found in S3",
                "objectKey": object_key,
            }),
            Self::InvalidRequest { message } => json!({ "message": message }),
            Self::InternalError { error } => json!({
                "message": "Internal Server Error",
                "error": error,
            }),
        }
    }
}

/// Terminal states of one registration invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationOutcome {
    Registered { employee: EmployeeRecord },
    InvalidEvent { message: String },
    NoFaceDetected,
    IndexingFailed { status_code: u16 },
    Failed { object_key: String, error: String },
}

impl RegistrationOutcome {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Registered { .. } => 200,
            Self::NoFaceDetected => 400,
            Self::InvalidEvent { .. } | Self::IndexingFailed { .. } | Self::Failed { .. } => 500,
        }
    }

    /// Plain-text body; registration responses are not JSON.
    pub fn message(&self) -> String {
        match self {
            Self::Registered { .. } => "Employee registered successfully.".to_string(),
            Self::InvalidEvent { message } => format!("Invalid S3 event: {message}"),
            Self::NoFaceDetected => "No faces detected in the image.".to_string(),
            Self::IndexingFailed { .. } => "Failed to index image.".to_string(),
            Self::Failed { object_key, error } => {
                format!("Error processing image {object_key}: {error}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee() -> EmployeeRecord {
        EmployeeRecord {
            face_id: "face-1".to_string(),
            first_name: "jane".to_string(),
            last_name: "doe".to_string(),
        }
    }

    #[test]
    fn authenticated_body_merges_employee_and_link() {
        let outcome = AuthenticationOutcome::Authenticated {
            employee: employee(),
            signed_url: Some("https://example.test/visitor.jpeg?sig".to_string()),
        };

        assert_eq!(outcome.status_code(), 200);
        assert_eq!(
            outcome.body(),
            json!({
                "message": "Success",
                "signedUrl": "https://example.test/visitor.jpeg?sig",
                "rekognitionid": "face-1",
                "firstName": "jane",
                "lastName": "doe",
            })
        );
    }

    #[test]
    fn missing_link_serializes_as_null() {
        let outcome = AuthenticationOutcome::PersonNotFound { signed_url: None };

        assert_eq!(outcome.status_code(), 403);
        assert_eq!(outcome.body()["signedUrl"], Value::Null);
        assert_eq!(outcome.body()["message"], "Person Not Found");
    }

    #[test]
    fn error_outcomes_map_to_taxonomy_codes() {
        let cases = [
            (
                AuthenticationOutcome::InvalidRequest {
                    message: "bad".to_string(),
                },
                400,
            ),
            (
                AuthenticationOutcome::ObjectNotFound {
                    object_key: "k".to_string(),
                },
                404,
            ),
            (
                AuthenticationOutcome::InternalError {
                    error: "boom".to_string(),
                },
                500,
            ),
        ];

        for (outcome, expected) in cases {
            assert_eq!(outcome.status_code(), expected);
        }
    }

    #[test]
    fn internal_error_surfaces_message() {
        let outcome = AuthenticationOutcome::InternalError {
            error: "throttled".to_string(),
        };
        assert_eq!(
            outcome.body(),
            json!({"message": "Internal Server Error", "error": "throttled"})
        );
    }

    #[test]
    fn registration_failure_names_the_object() {
        let outcome = RegistrationOutcome::Failed {
            object_key: "janedoe.jpeg".to_string(),
            error: "no underscore".to_string(),
        };

        assert_eq!(outcome.status_code(), 500);
        assert_eq!(
            outcome.message(),
            "Error processing image janedoe.jpeg: no underscore"
        );
    }

    #[test]
    fn malformed_event_is_an_internal_error() {
        let outcome = RegistrationOutcome::InvalidEvent {
            message: "S3 event must include a non-empty Records array".to_string(),
        };
        assert_eq!(outcome.status_code(), 500);
        assert!(outcome.message().starts_with("Invalid S3 event:"));
    }

    #[test]
    fn registration_success_message() {
        let outcome = RegistrationOutcome::Registered {
            employee: employee(),
        };
        assert_eq!(outcome.status_code(), 200);
        assert_eq!(outcome.message(), "Employee registered successfully.");
    }
}
