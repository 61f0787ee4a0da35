use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_rekognition::config::http::HttpResponse;
use aws_sdk_rekognition::error::SdkError;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::{Image, S3Object};
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::presigning::PresigningConfig;
use face_auth_core::contract::{
    EmployeeRecord, FaceMatch, FACE_ID_ATTRIBUTE, FIRST_NAME_ATTRIBUTE, LAST_NAME_ATTRIBUTE,
};
use face_auth_core::events::StorageObjectRef;

use crate::adapters::employee_table::{EmployeeTable, EmployeeTableError};
use crate::adapters::face_index::{FaceIndex, FaceServiceError};
use crate::adapters::object_store::{ObjectStore, ObjectStoreError};

pub const FALLBACK_REGION: &str = "us-east-1";

/// Loads the shared SDK configuration once per cold start. The region comes
/// from the default provider chain, falling back to `us-east-1`.
pub async fn load_sdk_config() -> SdkConfig {
    let region = RegionProviderChain::default_provider().or_else(Region::new(FALLBACK_REGION));
    aws_config::defaults(BehaviorVersion::latest())
        .region(region)
        .load()
        .await
}

// Adapter traits are synchronous; SDK calls run on the current
// multi-threaded runtime.
fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

pub struct S3ObjectStore {
    bucket: String,
    s3_client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(s3_client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            s3_client,
        }
    }

    async fn presign(&self, key: &str, expires_in: Duration) -> Result<String, ObjectStoreError> {
        let presigning = PresigningConfig::expires_in(expires_in).map_err(|error| {
            ObjectStoreError::Backend(format!("invalid presigning config: {error}"))
        })?;
        let request = self
            .s3_client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|error| {
                ObjectStoreError::Backend(format!(
                    "failed to presign s3 object: {}",
                    DisplayErrorContext(&error)
                ))
            })?;
        Ok(request.uri().to_string())
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        let output = match self
            .s3_client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(error) => return Err(object_read_error(key, error)),
        };

        let body = output.body.collect().await.map_err(|error| {
            ObjectStoreError::Backend(format!("failed to read s3 object body: {error}"))
        })?;
        Ok(body.into_bytes().to_vec())
    }

    async fn list(&self) -> Result<Vec<String>, ObjectStoreError> {
        let output = self
            .s3_client
            .list_objects_v2()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|error| {
                ObjectStoreError::Backend(format!(
                    "failed to list s3 objects: {}",
                    DisplayErrorContext(&error)
                ))
            })?;
        Ok(output
            .contents()
            .iter()
            .filter_map(|object| object.key())
            .map(str::to_string)
            .collect())
    }
}

impl ObjectStore for S3ObjectStore {
    fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, ObjectStoreError> {
        block_on(self.presign(key, expires_in))
    }

    fn get_object(&self, key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        block_on(self.fetch(key))
    }

    fn list_keys(&self) -> Result<Vec<String>, ObjectStoreError> {
        block_on(self.list())
    }
}

/// Only `NoSuchKey` counts as a missing object; every other failure,
/// including access denied, is a backend error.
fn object_read_error(key: &str, error: SdkError<GetObjectError, HttpResponse>) -> ObjectStoreError {
    let missing = error
        .as_service_error()
        .map(GetObjectError::is_no_such_key)
        .unwrap_or(false);
    if missing {
        return ObjectStoreError::NotFound {
            key: key.to_string(),
        };
    }
    ObjectStoreError::Backend(format!(
        "failed to read object from s3: {}",
        DisplayErrorContext(&error)
    ))
}

pub struct RekognitionFaceIndex {
    collection_id: String,
    face_match_threshold: Option<f32>,
    rekognition_client: aws_sdk_rekognition::Client,
}

impl RekognitionFaceIndex {
    pub fn new(
        rekognition_client: aws_sdk_rekognition::Client,
        collection_id: impl Into<String>,
        face_match_threshold: Option<f32>,
    ) -> Self {
        Self {
            collection_id: collection_id.into(),
            face_match_threshold,
            rekognition_client,
        }
    }

    async fn index(&self, object: &StorageObjectRef) -> Result<Vec<String>, FaceServiceError> {
        let image = Image::builder()
            .s3_object(
                S3Object::builder()
                    .bucket(&object.bucket)
                    .name(&object.key)
                    .build(),
            )
            .build();

        let output = self
            .rekognition_client
            .index_faces()
            .collection_id(&self.collection_id)
            .image(image)
            .send()
            .await
            .map_err(face_service_error)?;

        Ok(output
            .face_records()
            .iter()
            .filter_map(|record| record.face())
            .filter_map(|face| face.face_id())
            .map(str::to_string)
            .collect())
    }

    async fn search(&self, image: &[u8]) -> Result<Vec<FaceMatch>, FaceServiceError> {
        let image = Image::builder().bytes(Blob::new(image.to_vec())).build();

        let output = self
            .rekognition_client
            .search_faces_by_image()
            .collection_id(&self.collection_id)
            .image(image)
            .set_face_match_threshold(self.face_match_threshold)
            .send()
            .await
            .map_err(face_service_error)?;

        Ok(output
            .face_matches()
            .iter()
            .filter_map(|candidate| {
                let face_id = candidate.face().and_then(|face| face.face_id())?;
                Some(FaceMatch {
                    face_id: face_id.to_string(),
                    similarity: candidate.similarity(),
                })
            })
            .collect())
    }
}

impl FaceIndex for RekognitionFaceIndex {
    fn index_faces(&self, object: &StorageObjectRef) -> Result<Vec<String>, FaceServiceError> {
        block_on(self.index(object))
    }

    fn search_faces_by_image(&self, image: &[u8]) -> Result<Vec<FaceMatch>, FaceServiceError> {
        block_on(self.search(image))
    }
}

fn face_service_error<E>(error: SdkError<E, HttpResponse>) -> FaceServiceError
where
    E: std::error::Error + 'static,
{
    match &error {
        SdkError::ServiceError(context) => FaceServiceError::Rejected {
            status_code: context.raw().status().as_u16(),
            message: DisplayErrorContext(context.err()).to_string(),
        },
        _ => FaceServiceError::Backend(format!(
            "face service request failed: {}",
            DisplayErrorContext(&error)
        )),
    }
}

pub struct DynamoEmployeeTable {
    table_name: String,
    dynamodb_client: aws_sdk_dynamodb::Client,
}

impl DynamoEmployeeTable {
    pub fn new(dynamodb_client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            dynamodb_client,
        }
    }

    async fn get(&self, face_id: &str) -> Result<Option<EmployeeRecord>, EmployeeTableError> {
        let output = self
            .dynamodb_client
            .get_item()
            .table_name(&self.table_name)
            .key(FACE_ID_ATTRIBUTE, AttributeValue::S(face_id.to_string()))
            .send()
            .await
            .map_err(|error| {
                EmployeeTableError::Backend(format!(
                    "failed to read employee from dynamodb: {}",
                    DisplayErrorContext(&error)
                ))
            })?;

        output
            .item()
            .map(|item| employee_from_item(face_id, item))
            .transpose()
    }

    async fn put(&self, record: &EmployeeRecord) -> Result<(), EmployeeTableError> {
        self.dynamodb_client
            .put_item()
            .table_name(&self.table_name)
            .item(FACE_ID_ATTRIBUTE, AttributeValue::S(record.face_id.clone()))
            .item(
                FIRST_NAME_ATTRIBUTE,
                AttributeValue::S(record.first_name.clone()),
            )
            .item(LAST_NAME_ATTRIBUTE, AttributeValue::S(record.last_name.clone()))
            .send()
            .await
            .map(|_| ())
            .map_err(|error| {
                EmployeeTableError::Backend(format!(
                    "failed to write employee to dynamodb: {}",
                    DisplayErrorContext(&error)
                ))
            })
    }
}

impl EmployeeTable for DynamoEmployeeTable {
    fn get_employee(&self, face_id: &str) -> Result<Option<EmployeeRecord>, EmployeeTableError> {
        block_on(self.get(face_id))
    }

    fn put_employee(&self, record: &EmployeeRecord) -> Result<(), EmployeeTableError> {
        block_on(self.put(record))
    }
}

/// Converts a raw table item into a typed record. Every attribute must be
/// present and of string type.
pub fn employee_from_item(
    face_id: &str,
    item: &HashMap<String, AttributeValue>,
) -> Result<EmployeeRecord, EmployeeTableError> {
    let attribute = |name: &str| {
        item.get(name)
            .and_then(|value| value.as_s().ok())
            .cloned()
            .ok_or_else(|| EmployeeTableError::Decode {
                face_id: face_id.to_string(),
                reason: format!("missing string attribute '{name}'"),
            })
    };

    Ok(EmployeeRecord {
        face_id: attribute(FACE_ID_ATTRIBUTE)?,
        first_name: attribute(FIRST_NAME_ATTRIBUTE)?,
        last_name: attribute(LAST_NAME_ATTRIBUTE)?,
    })
}
