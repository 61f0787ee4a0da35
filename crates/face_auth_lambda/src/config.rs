use std::time::Duration;

use face_auth_core::contract::{
    DEFAULT_COLLECTION_ID, DEFAULT_EMPLOYEE_TABLE, DEFAULT_PRESIGNED_URL_TTL_SECS,
    DEFAULT_VISITOR_BUCKET,
};
use thiserror::Error;

pub const VISITOR_BUCKET_VAR: &str = "VISITOR_BUCKET";
pub const COLLECTION_ID_VAR: &str = "FACE_COLLECTION_ID";
pub const EMPLOYEE_TABLE_VAR: &str = "EMPLOYEE_TABLE";
pub const PRESIGNED_URL_TTL_VAR: &str = "PRESIGNED_URL_TTL_SECS";
pub const FACE_MATCH_THRESHOLD_VAR: &str = "FACE_MATCH_THRESHOLD";
pub const LOG_BUCKET_LISTING_VAR: &str = "LOG_BUCKET_LISTING";

/// S3 refuses to presign for longer than one week.
pub const MAX_PRESIGNED_URL_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Deployment settings shared by both handlers, read once per cold start.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerSettings {
    pub visitor_bucket: String,
    pub collection_id: String,
    pub employee_table: String,
    pub presigned_url_ttl: Duration,
    /// Forwarded to the face search as its minimum similarity. `None` leaves
    /// the service default in place; matches are never filtered locally.
    pub face_match_threshold: Option<f32>,
    pub log_bucket_listing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name} has invalid value '{value}': {reason}")]
pub struct SettingsError {
    pub name: &'static str,
    pub value: String,
    pub reason: &'static str,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            visitor_bucket: DEFAULT_VISITOR_BUCKET.to_string(),
            collection_id: DEFAULT_COLLECTION_ID.to_string(),
            employee_table: DEFAULT_EMPLOYEE_TABLE.to_string(),
            presigned_url_ttl: Duration::from_secs(DEFAULT_PRESIGNED_URL_TTL_SECS),
            face_match_threshold: None,
            log_bucket_listing: false,
        }
    }
}

impl HandlerSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let presigned_url_ttl = match read(PRESIGNED_URL_TTL_VAR) {
            Some(value) => match value.parse::<u64>() {
                Ok(seconds) if (1..=MAX_PRESIGNED_URL_TTL_SECS).contains(&seconds) => {
                    Duration::from_secs(seconds)
                }
                _ => {
                    return Err(SettingsError {
                        name: PRESIGNED_URL_TTL_VAR,
                        value,
                        reason: "expected 1..=604800 seconds",
                    })
                }
            },
            None => defaults.presigned_url_ttl,
        };

        let face_match_threshold = match read(FACE_MATCH_THRESHOLD_VAR) {
            Some(value) => match value.parse::<f32>() {
                Ok(threshold) if (0.0..=100.0).contains(&threshold) => Some(threshold),
                _ => {
                    return Err(SettingsError {
                        name: FACE_MATCH_THRESHOLD_VAR,
                        value,
                        reason: "expected a similarity between 0 and 100",
                    })
                }
            },
            None => None,
        };

        let log_bucket_listing = match read(LOG_BUCKET_LISTING_VAR) {
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(SettingsError {
                        name: LOG_BUCKET_LISTING_VAR,
                        value,
                        reason: "expected true or false",
                    })
                }
            },
            None => defaults.log_bucket_listing,
        };

        Ok(Self {
            visitor_bucket: read(VISITOR_BUCKET_VAR).unwrap_or(defaults.visitor_bucket),
            collection_id: read(COLLECTION_ID_VAR).unwrap_or(defaults.collection_id),
            employee_table: read(EMPLOYEE_TABLE_VAR).unwrap_or(defaults.employee_table),
            presigned_url_ttl,
            face_match_threshold,
            log_bucket_listing,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<HandlerSettings, SettingsError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        HandlerSettings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_match_deployed_resources() {
        let settings = settings_from(&[]).expect("empty environment should load");

        assert_eq!(settings.visitor_bucket, "s3-vistor-pics");
        assert_eq!(settings.collection_id, "employees");
        assert_eq!(settings.employee_table, "employee");
        assert_eq!(settings.presigned_url_ttl, Duration::from_secs(300));
        assert_eq!(settings.face_match_threshold, None);
        assert!(!settings.log_bucket_listing);
    }

    #[test]
    fn reads_overrides() {
        let settings = settings_from(&[
            (VISITOR_BUCKET_VAR, "visitors-prod"),
            (COLLECTION_ID_VAR, "staff"),
            (EMPLOYEE_TABLE_VAR, "staff-table"),
            (PRESIGNED_URL_TTL_VAR, "60"),
            (FACE_MATCH_THRESHOLD_VAR, "90.5"),
            (LOG_BUCKET_LISTING_VAR, "TRUE"),
        ])
        .expect("overrides should load");

        assert_eq!(settings.visitor_bucket, "visitors-prod");
        assert_eq!(settings.collection_id, "staff");
        assert_eq!(settings.employee_table, "staff-table");
        assert_eq!(settings.presigned_url_ttl, Duration::from_secs(60));
        assert_eq!(settings.face_match_threshold, Some(90.5));
        assert!(settings.log_bucket_listing);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let settings = settings_from(&[(VISITOR_BUCKET_VAR, "  "), (PRESIGNED_URL_TTL_VAR, "")])
            .expect("blank values should load");

        assert_eq!(settings.visitor_bucket, "s3-vistor-pics");
        assert_eq!(settings.presigned_url_ttl, Duration::from_secs(300));
    }

    #[test]
    fn rejects_zero_ttl() {
        let error = settings_from(&[(PRESIGNED_URL_TTL_VAR, "0")]).expect_err("zero ttl");
        assert_eq!(error.name, PRESIGNED_URL_TTL_VAR);
    }

    #[test]
    fn rejects_ttl_beyond_presign_limit() {
        let error =
            settings_from(&[(PRESIGNED_URL_TTL_VAR, "700000")]).expect_err("ttl over one week");
        assert_eq!(error.name, PRESIGNED_URL_TTL_VAR);
        assert_eq!(error.reason, "expected 1..=604800 seconds");
    }

    #[test]
    fn accepts_ttl_at_presign_limit() {
        let settings =
            settings_from(&[(PRESIGNED_URL_TTL_VAR, "604800")]).expect("one week should load");
        assert_eq!(
            settings.presigned_url_ttl,
            Duration::from_secs(MAX_PRESIGNED_URL_TTL_SECS)
        );
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let error =
            settings_from(&[(FACE_MATCH_THRESHOLD_VAR, "120")]).expect_err("threshold > 100");
        assert!(error.to_string().contains("between 0 and 100"));
    }

    #[test]
    fn rejects_unrecognized_flag() {
        let error = settings_from(&[(LOG_BUCKET_LISTING_VAR, "sometimes")]).expect_err("flag");
        assert_eq!(error.value, "sometimes");
    }
}
