// src/shared/shared_structs.rs

use serde::{Deserialize, Serialize};

/// Body returned for every failed request, whatever the failure.
/// `error` carries the canonical reason phrase for the status code and
/// `message` the human-readable cause.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status_code: u16,
    pub error: String,
    pub message: String,
}

/// Payload served from `GET /` so a caller can discover the service.
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub paths: String,
}
