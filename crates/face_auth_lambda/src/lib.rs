//! AWS-oriented adapters and handlers for employee face registration and
//! visitor authentication.
//!
//! This crate owns runtime integration details (Lambda handlers, S3,
//! Rekognition and DynamoDB adapters, configuration and logging). Request
//! decoding and response contracts come from `face_auth_core`.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod logging;
