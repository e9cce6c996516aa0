use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::ApiError;
use crate::store::Factor;
use crate::validate::{ValidateRequest, Violations};

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub crop: String,
    pub region: String,
}

impl ValidateRequest for PredictRequest {
    fn validate(&mut self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        v.require_non_empty("crop", &self.crop);
        v.require_non_empty("region", &self.region);
        v.finish()
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    pub crop: String,
    pub region: String,
    #[serde(rename = "yieldEstimate")]
    pub yield_estimate: f64,
    pub confidence: f64,
    pub unit: &'static str,
    pub factors: Vec<Factor>,
    pub recommendations: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}
