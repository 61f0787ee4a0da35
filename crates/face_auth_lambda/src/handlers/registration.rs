use face_auth_core::contract::{parse_employee_name, EmployeeRecord, NameParseError};
use face_auth_core::events::{decode_storage_event, StorageObjectRef};
use face_auth_core::outcome::RegistrationOutcome;
use serde_json::{json, Value};
use thiserror::Error;

use crate::adapters::employee_table::{EmployeeTable, EmployeeTableError};
use crate::adapters::face_index::{FaceIndex, FaceServiceError};
use crate::handlers::response::{registration_response, RegistrationResponse};
use crate::logging::{log_error, log_info};

const COMPONENT: &str = "registration_handler";

/// Clients the registration handler needs, built once per cold start.
pub struct RegistrationContext<F, T> {
    pub faces: F,
    pub employees: T,
}

#[derive(Debug, Error)]
enum RegistrationError {
    #[error(transparent)]
    FaceService(#[from] FaceServiceError),
    #[error(transparent)]
    Name(#[from] NameParseError),
    #[error(transparent)]
    Table(#[from] EmployeeTableError),
}

pub fn handle_registration_event<F, T>(
    event: &Value,
    context: &RegistrationContext<F, T>,
) -> RegistrationResponse
where
    F: FaceIndex,
    T: EmployeeTable,
{
    registration_response(&register_employee(event, context))
}

/// Indexes the uploaded photo and stores the employee it names.
///
/// There is no rollback: when the name cannot be parsed or the table write
/// fails, the face stays indexed in the collection without a record.
pub fn register_employee<F, T>(
    event: &Value,
    context: &RegistrationContext<F, T>,
) -> RegistrationOutcome
where
    F: FaceIndex,
    T: EmployeeTable,
{
    log_info(COMPONENT, "event_received", json!({ "event": event }));

    let object = match decode_storage_event(event) {
        Ok(value) => value,
        Err(error) => {
            log_error(
                COMPONENT,
                "invalid_event",
                json!({ "error": error.message() }),
            );
            return RegistrationOutcome::InvalidEvent {
                message: error.message().to_string(),
            };
        }
    };
    log_info(
        COMPONENT,
        "processing_object",
        json!({ "bucket": object.bucket.clone(), "key": object.key.clone() }),
    );

    match index_and_store(&object, context) {
        Ok(outcome) => outcome,
        Err(RegistrationError::FaceService(FaceServiceError::Rejected {
            status_code,
            message,
        })) => {
            log_error(
                COMPONENT,
                "indexing_failed",
                json!({
                    "key": object.key.clone(),
                    "status_code": status_code,
                    "error": message,
                }),
            );
            RegistrationOutcome::IndexingFailed { status_code }
        }
        Err(error) => {
            log_error(
                COMPONENT,
                "registration_failed",
                json!({
                    "bucket": object.bucket.clone(),
                    "key": object.key.clone(),
                    "error": error.to_string(),
                }),
            );
            RegistrationOutcome::Failed {
                object_key: object.key,
                error: error.to_string(),
            }
        }
    }
}

fn index_and_store<F, T>(
    object: &StorageObjectRef,
    context: &RegistrationContext<F, T>,
) -> Result<RegistrationOutcome, RegistrationError>
where
    F: FaceIndex,
    T: EmployeeTable,
{
    let face_ids = context.faces.index_faces(object)?;
    log_info(
        COMPONENT,
        "faces_indexed",
        json!({ "key": object.key.clone(), "face_ids": face_ids.clone() }),
    );

    let Some(face_id) = face_ids.into_iter().next() else {
        log_info(COMPONENT, "no_face_detected", json!({ "key": object.key.clone() }));
        return Ok(RegistrationOutcome::NoFaceDetected);
    };

    let name = parse_employee_name(&object.key)?;
    let employee = EmployeeRecord::new(face_id, name);
    context.employees.put_employee(&employee)?;

    log_info(
        COMPONENT,
        "employee_registered",
        json!({
            "face_id": employee.face_id.clone(),
            "first_name": employee.first_name.clone(),
            "last_name": employee.last_name.clone(),
        }),
    );
    Ok(RegistrationOutcome::Registered { employee })
}
