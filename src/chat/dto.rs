use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::validate::{ValidateRequest, Violations};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

impl ValidateRequest for ChatRequest {
    fn validate(&mut self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        v.require_len_between("message", &self.message, 1, 500);
        v.finish()
    }
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: &'static str,
    pub category: &'static str,
}
