//! Shared employee face-authentication domain primitives.
//!
//! This crate owns request decoding, the employee record contract and the
//! response outcomes of both handlers. It intentionally excludes AWS SDK and
//! Lambda runtime concerns; those live in `face_auth_lambda`.

pub mod contract;
pub mod events;
pub mod outcome;
