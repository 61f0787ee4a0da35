use face_auth_core::contract::FaceMatch;
use face_auth_core::events::StorageObjectRef;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FaceServiceError {
    /// The service answered with a non-success HTTP status.
    #[error("face service returned HTTP {status_code}: {message}")]
    Rejected { status_code: u16, message: String },
    #[error("{0}")]
    Backend(String),
}

/// A face collection held by the face-recognition service.
pub trait FaceIndex {
    /// Indexes every face detected in a stored image and returns their face
    /// ids in the order the service reported them.
    fn index_faces(&self, object: &StorageObjectRef) -> Result<Vec<String>, FaceServiceError>;

    fn search_faces_by_image(&self, image: &[u8]) -> Result<Vec<FaceMatch>, FaceServiceError>;
}
