use face_auth_core::contract::EmployeeRecord;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmployeeTableError {
    #[error("{0}")]
    Backend(String),
    #[error("employee item for face id {face_id} is malformed: {reason}")]
    Decode { face_id: String, reason: String },
}

pub trait EmployeeTable {
    fn get_employee(&self, face_id: &str) -> Result<Option<EmployeeRecord>, EmployeeTableError>;

    fn put_employee(&self, record: &EmployeeRecord) -> Result<(), EmployeeTableError>;
}
