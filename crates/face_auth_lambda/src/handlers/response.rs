use face_auth_core::outcome::{AuthenticationOutcome, RegistrationOutcome};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Proxy-integration response returned to API Gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

/// Registration responses carry a plain-text body and no headers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistrationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

pub fn authentication_response(outcome: &AuthenticationOutcome) -> ApiGatewayResponse {
    json_response(outcome.status_code(), outcome.body())
}

pub fn registration_response(outcome: &RegistrationOutcome) -> RegistrationResponse {
    RegistrationResponse {
        status_code: outcome.status_code(),
        body: outcome.message(),
    }
}

fn json_response(status_code: u16, payload: Value) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json!({
            "Content-Type": "application/json",
            "Access-Control-Allow-Origin": "*",
        }),
        body: payload.to_string(),
    }
}
