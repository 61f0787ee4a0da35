use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use face_auth_core::contract::{EmployeeRecord, FaceMatch};
use face_auth_core::events::StorageObjectRef;

use crate::adapters::employee_table::{EmployeeTable, EmployeeTableError};
use crate::adapters::face_index::{FaceIndex, FaceServiceError};
use crate::adapters::object_store::{ObjectStore, ObjectStoreError};

#[derive(Default)]
pub struct MemoryObjectStore {
    objects: HashMap<String, Vec<u8>>,
    presign_error: Option<String>,
    read_error: Option<String>,
    listing_error: Option<String>,
    presigned: Mutex<Vec<(String, Duration)>>,
    listings: Mutex<usize>,
}

impl MemoryObjectStore {
    pub fn with_object(mut self, key: &str, body: &[u8]) -> Self {
        self.objects.insert(key.to_string(), body.to_vec());
        self
    }

    pub fn failing_presign(mut self, message: &str) -> Self {
        self.presign_error = Some(message.to_string());
        self
    }

    pub fn failing_reads(mut self, message: &str) -> Self {
        self.read_error = Some(message.to_string());
        self
    }

    pub fn failing_listing(mut self, message: &str) -> Self {
        self.listing_error = Some(message.to_string());
        self
    }

    pub fn presigned(&self) -> Vec<(String, Duration)> {
        self.presigned.lock().expect("poisoned mutex").clone()
    }

    pub fn listings(&self) -> usize {
        *self.listings.lock().expect("poisoned mutex")
    }
}

impl ObjectStore for MemoryObjectStore {
    fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, ObjectStoreError> {
        if let Some(message) = &self.presign_error {
            return Err(ObjectStoreError::Backend(message.clone()));
        }
        self.presigned
            .lock()
            .expect("poisoned mutex")
            .push((key.to_string(), expires_in));
        Ok(format!(
            "https://visitors.example.test/{key}?X-Amz-Expires={}",
            expires_in.as_secs()
        ))
    }

    fn get_object(&self, key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        if let Some(message) = &self.read_error {
            return Err(ObjectStoreError::Backend(message.clone()));
        }
        self.objects
            .get(key)
            .cloned()
            .ok_or_else(|| ObjectStoreError::NotFound {
                key: key.to_string(),
            })
    }

    fn list_keys(&self) -> Result<Vec<String>, ObjectStoreError> {
        *self.listings.lock().expect("poisoned mutex") += 1;
        if let Some(message) = &self.listing_error {
            return Err(ObjectStoreError::Backend(message.clone()));
        }
        let mut keys: Vec<String> = self.objects.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

pub struct ScriptedFaceIndex {
    index_result: Result<Vec<String>, FaceServiceError>,
    search_result: Result<Vec<FaceMatch>, FaceServiceError>,
    indexed: Mutex<Vec<StorageObjectRef>>,
    searched: Mutex<Vec<Vec<u8>>>,
}

impl Default for ScriptedFaceIndex {
    fn default() -> Self {
        Self {
            index_result: Ok(Vec::new()),
            search_result: Ok(Vec::new()),
            indexed: Mutex::new(Vec::new()),
            searched: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedFaceIndex {
    pub fn indexing(mut self, result: Result<Vec<String>, FaceServiceError>) -> Self {
        self.index_result = result;
        self
    }

    pub fn searching(mut self, result: Result<Vec<FaceMatch>, FaceServiceError>) -> Self {
        self.search_result = result;
        self
    }

    pub fn indexed(&self) -> Vec<StorageObjectRef> {
        self.indexed.lock().expect("poisoned mutex").clone()
    }

    pub fn searched(&self) -> Vec<Vec<u8>> {
        self.searched.lock().expect("poisoned mutex").clone()
    }
}

impl FaceIndex for ScriptedFaceIndex {
    fn index_faces(&self, object: &StorageObjectRef) -> Result<Vec<String>, FaceServiceError> {
        self.indexed
            .lock()
            .expect("poisoned mutex")
            .push(object.clone());
        self.index_result.clone()
    }

    fn search_faces_by_image(&self, image: &[u8]) -> Result<Vec<FaceMatch>, FaceServiceError> {
        self.searched
            .lock()
            .expect("poisoned mutex")
            .push(image.to_vec());
        self.search_result.clone()
    }
}

#[derive(Default)]
pub struct MemoryEmployeeTable {
    records: Mutex<HashMap<String, EmployeeRecord>>,
    lookups: Mutex<Vec<String>>,
    put_error: Option<String>,
    get_error: Option<String>,
}

impl MemoryEmployeeTable {
    pub fn with_employee(self, face_id: &str, first_name: &str, last_name: &str) -> Self {
        self.records.lock().expect("poisoned mutex").insert(
            face_id.to_string(),
            EmployeeRecord {
                face_id: face_id.to_string(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            },
        );
        self
    }

    pub fn failing_puts(mut self, message: &str) -> Self {
        self.put_error = Some(message.to_string());
        self
    }

    pub fn failing_gets(mut self, message: &str) -> Self {
        self.get_error = Some(message.to_string());
        self
    }

    pub fn records(&self) -> HashMap<String, EmployeeRecord> {
        self.records.lock().expect("poisoned mutex").clone()
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().expect("poisoned mutex").clone()
    }
}

impl EmployeeTable for MemoryEmployeeTable {
    fn get_employee(&self, face_id: &str) -> Result<Option<EmployeeRecord>, EmployeeTableError> {
        self.lookups
            .lock()
            .expect("poisoned mutex")
            .push(face_id.to_string());
        if let Some(message) = &self.get_error {
            return Err(EmployeeTableError::Backend(message.clone()));
        }
        Ok(self
            .records
            .lock()
            .expect("poisoned mutex")
            .get(face_id)
            .cloned())
    }

    fn put_employee(&self, record: &EmployeeRecord) -> Result<(), EmployeeTableError> {
        if let Some(message) = &self.put_error {
            return Err(EmployeeTableError::Backend(message.clone()));
        }
        self.records
            .lock()
            .expect("poisoned mutex")
            .insert(record.face_id.clone(), record.clone());
        Ok(())
    }
}
