use serde_json::Value;

use crate::contract::ValidationError;

pub const S3_EVENT_SOURCE: &str = "aws:s3";
pub const OBJECT_KEY_PARAMETER: &str = "objectKey";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageObjectRef {
    pub bucket: String,
    pub key: String,
}

/// The two request shapes the authentication handler accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationRequest {
    /// API Gateway request with `?objectKey=...`.
    ApiQuery { object_key: String },
    /// S3 upload notification; the bucket is informational only.
    StorageUpload {
        bucket: Option<String>,
        object_key: String,
    },
}

impl AuthenticationRequest {
    pub fn object_key(&self) -> &str {
        match self {
            Self::ApiQuery { object_key } | Self::StorageUpload { object_key, .. } => object_key,
        }
    }

    /// Bucket named by an upload notification, if any. Reads always go to
    /// the configured visitor bucket; this is kept for diagnostics.
    pub fn event_bucket(&self) -> Option<&str> {
        match self {
            Self::ApiQuery { .. } => None,
            Self::StorageUpload { bucket, .. } => bucket.as_deref(),
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            Self::ApiQuery { .. } => "api_query",
            Self::StorageUpload { .. } => "storage_upload",
        }
    }
}

/// Decodes an authentication invocation payload.
///
/// A non-empty `queryStringParameters` object takes precedence over
/// `Records`. Any shape other than the two accepted ones is rejected.
pub fn decode_authentication_request(
    event: &Value,
) -> Result<AuthenticationRequest, ValidationError> {
    if let Some(parameters) = query_parameters(event) {
        let object_key = parameters
            .get(OBJECT_KEY_PARAMETER)
            .and_then(Value::as_str)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ValidationError::new(format!(
                    "Missing required query parameter: {OBJECT_KEY_PARAMETER}"
                ))
            })?;
        return Ok(AuthenticationRequest::ApiQuery {
            object_key: object_key.to_string(),
        });
    }

    if let Some(record) = first_s3_record(event) {
        let object_key = record
            .pointer("/s3/object/key")
            .and_then(Value::as_str)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ValidationError::new("S3 event record must include s3.object.key"))?;
        let bucket = record
            .pointer("/s3/bucket/name")
            .and_then(Value::as_str)
            .map(str::to_string);
        return Ok(AuthenticationRequest::StorageUpload {
            bucket,
            object_key: object_key.to_string(),
        });
    }

    Err(ValidationError::new(
        "Unsupported event type or missing required parameters",
    ))
}

/// Decodes the bucket and key of the first record of an S3 notification.
pub fn decode_storage_event(event: &Value) -> Result<StorageObjectRef, ValidationError> {
    let record = event
        .get("Records")
        .and_then(Value::as_array)
        .and_then(|records| records.first())
        .ok_or_else(|| ValidationError::new("S3 event must include a non-empty Records array"))?;

    let bucket = record
        .pointer("/s3/bucket/name")
        .and_then(Value::as_str)
        .ok_or_else(|| ValidationError::new("S3 event record must include s3.bucket.name"))?;
    let key = record
        .pointer("/s3/object/key")
        .and_then(Value::as_str)
        .ok_or_else(|| ValidationError::new("S3 event record must include s3.object.key"))?;

    Ok(StorageObjectRef {
        bucket: bucket.to_string(),
        key: key.to_string(),
    })
}

fn query_parameters(event: &Value) -> Option<&serde_json::Map<String, Value>> {
    event
        .get("queryStringParameters")
        .and_then(Value::as_object)
        .filter(|parameters| !parameters.is_empty())
}

fn first_s3_record(event: &Value) -> Option<&Value> {
    event
        .get("Records")
        .and_then(Value::as_array)
        .and_then(|records| records.first())
        .filter(|record| {
            record
                .get("eventSource")
                .and_then(Value::as_str)
                .map(|source| source == S3_EVENT_SOURCE)
                .unwrap_or(false)
        })
}
