use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_COLLECTION_ID: &str = "employees";
pub const DEFAULT_EMPLOYEE_TABLE: &str = "employee";
pub const DEFAULT_VISITOR_BUCKET: &str = "s3-vistor-pics";
pub const DEFAULT_PRESIGNED_URL_TTL_SECS: u64 = 300;

pub const FACE_ID_ATTRIBUTE: &str = "rekognitionid";
pub const FIRST_NAME_ATTRIBUTE: &str = "firstName";
pub const LAST_NAME_ATTRIBUTE: &str = "lastName";

/// Employee row stored in the employee table, keyed by the face id the face
/// service issued at registration time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmployeeRecord {
    #[serde(rename = "rekognitionid")]
    pub face_id: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
}

impl EmployeeRecord {
    pub fn new(face_id: impl Into<String>, name: EmployeeName) -> Self {
        Self {
            face_id: face_id.into(),
            first_name: name.first_name,
            last_name: name.last_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeName {
    pub first_name: String,
    pub last_name: String,
}

/// A candidate returned by a collection search. Candidates keep the order the
/// face service returned them in.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceMatch {
    pub face_id: String,
    pub similarity: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("object key '{key}' does not follow the firstname_lastname.ext convention")]
pub struct NameParseError {
    pub key: String,
}

/// Derives the employee name from an uploaded photo key such as
/// `jane_doe.jpeg`.
///
/// Everything from the first `.` on is dropped, the remainder is split on
/// `_`, and the first two segments become first and last name. Extra
/// segments are ignored.
pub fn parse_employee_name(object_key: &str) -> Result<EmployeeName, NameParseError> {
    let stem = object_key.split('.').next().unwrap_or(object_key);
    let mut segments = stem.split('_');

    let (Some(first_name), Some(last_name)) = (segments.next(), segments.next()) else {
        return Err(NameParseError {
            key: object_key.to_string(),
        });
    };

    Ok(EmployeeName {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
    })
}
