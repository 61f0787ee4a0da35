use face_auth_core::contract::{EmployeeRecord, FaceMatch};
use face_auth_core::events::decode_authentication_request;
use face_auth_core::outcome::AuthenticationOutcome;
use serde_json::{json, Value};

use crate::adapters::employee_table::{EmployeeTable, EmployeeTableError};
use crate::adapters::face_index::FaceIndex;
use crate::adapters::object_store::{ObjectStore, ObjectStoreError};
use crate::config::HandlerSettings;
use crate::handlers::response::{authentication_response, ApiGatewayResponse};
use crate::logging::{log_error, log_info, log_warn};

const COMPONENT: &str = "authentication_handler";

/// Settings and clients the authentication handler needs, built once per
/// cold start and shared by every invocation.
pub struct AuthenticationContext<S, F, T> {
    pub settings: HandlerSettings,
    pub storage: S,
    pub faces: F,
    pub employees: T,
}

pub fn handle_authentication_event<S, F, T>(
    event: &Value,
    context: &AuthenticationContext<S, F, T>,
) -> ApiGatewayResponse
where
    S: ObjectStore,
    F: FaceIndex,
    T: EmployeeTable,
{
    authentication_response(&authenticate_visitor(event, context))
}

/// Runs one authentication request to a terminal outcome.
///
/// Only presigned link generation is allowed to fail softly; every other
/// failure ends the request.
pub fn authenticate_visitor<S, F, T>(
    event: &Value,
    context: &AuthenticationContext<S, F, T>,
) -> AuthenticationOutcome
where
    S: ObjectStore,
    F: FaceIndex,
    T: EmployeeTable,
{
    log_info(COMPONENT, "event_received", json!({ "event": event }));

    let request = match decode_authentication_request(event) {
        Ok(value) => value,
        Err(error) => {
            log_error(
                COMPONENT,
                "validation_failed",
                json!({ "error": error.message() }),
            );
            return AuthenticationOutcome::InvalidRequest {
                message: error.message().to_string(),
            };
        }
    };
    let object_key = request.object_key();
    log_info(
        COMPONENT,
        "object_resolved",
        json!({
            "object_key": object_key,
            "source": request.source(),
            "event_bucket": request.event_bucket(),
            "read_bucket": context.settings.visitor_bucket.clone(),
        }),
    );

    if context.settings.log_bucket_listing {
        log_bucket_listing(&context.storage, &context.settings.visitor_bucket);
    }

    let signed_url = presign_visitor_photo(context, object_key);

    let image = match context.storage.get_object(object_key) {
        Ok(bytes) => bytes,
        Err(ObjectStoreError::NotFound { .. }) => {
            log_warn(
                COMPONENT,
                "object_missing",
                json!({ "object_key": object_key }),
            );
            return AuthenticationOutcome::ObjectNotFound {
                object_key: object_key.to_string(),
            };
        }
        Err(error) => return internal_error("object_read_failed", error.to_string()),
    };

    let candidates = match context.faces.search_faces_by_image(&image) {
        Ok(value) => value,
        Err(error) => return internal_error("face_search_failed", error.to_string()),
    };
    log_info(
        COMPONENT,
        "faces_searched",
        json!({
            "object_key": object_key,
            "candidates": candidates
                .iter()
                .map(|candidate| json!({
                    "face_id": candidate.face_id.clone(),
                    "similarity": candidate.similarity,
                }))
                .collect::<Vec<_>>(),
        }),
    );

    match find_first_known_employee(&candidates, &context.employees) {
        Ok(Some(employee)) => {
            log_info(
                COMPONENT,
                "employee_matched",
                json!({ "object_key": object_key, "face_id": employee.face_id.clone() }),
            );
            AuthenticationOutcome::Authenticated {
                employee,
                signed_url,
            }
        }
        Ok(None) => {
            log_info(
                COMPONENT,
                "person_not_found",
                json!({ "object_key": object_key, "candidates": candidates.len() }),
            );
            AuthenticationOutcome::PersonNotFound { signed_url }
        }
        Err(error) => internal_error("employee_lookup_failed", error.to_string()),
    }
}

/// Resolves search candidates to an employee, first match wins.
///
/// Candidates are tried in the order the face service ranked them and the
/// scan stops at the first one that has a record. No similarity cut-off is
/// applied here; any threshold is the face service's.
pub fn find_first_known_employee(
    candidates: &[FaceMatch],
    employees: &impl EmployeeTable,
) -> Result<Option<EmployeeRecord>, EmployeeTableError> {
    for candidate in candidates {
        if let Some(employee) = employees.get_employee(&candidate.face_id)? {
            return Ok(Some(employee));
        }
    }
    Ok(None)
}

fn presign_visitor_photo<S, F, T>(
    context: &AuthenticationContext<S, F, T>,
    object_key: &str,
) -> Option<String>
where
    S: ObjectStore,
{
    match context
        .storage
        .presign_get(object_key, context.settings.presigned_url_ttl)
    {
        Ok(url) => Some(url),
        Err(error) => {
            log_warn(
                COMPONENT,
                "presign_failed",
                json!({ "object_key": object_key, "error": error.to_string() }),
            );
            None
        }
    }
}

fn log_bucket_listing(storage: &impl ObjectStore, bucket: &str) {
    match storage.list_keys() {
        Ok(keys) => log_info(
            COMPONENT,
            "bucket_listing",
            json!({ "bucket": bucket, "keys": keys }),
        ),
        Err(error) => log_warn(
            COMPONENT,
            "bucket_listing_failed",
            json!({ "bucket": bucket, "error": error.to_string() }),
        ),
    }
}

fn internal_error(event: &str, error: String) -> AuthenticationOutcome {
    log_error(COMPONENT, event, json!({ "error": error.clone() }));
    AuthenticationOutcome::InternalError { error }
}
