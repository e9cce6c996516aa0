use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::store::{Role, User};
use crate::validate::{normalize_email, ValidateRequest, Violations};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl ValidateRequest for RegisterRequest {
    fn validate(&mut self) -> Result<(), ApiError> {
        self.email = normalize_email(&self.email);
        let mut v = Violations::new();
        v.require_non_empty("name", &self.name);
        v.require_email("email", &self.email);
        v.require_min_len("password", &self.password, 6);
        v.finish()
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ValidateRequest for LoginRequest {
    fn validate(&mut self) -> Result<(), ApiError> {
        self.email = normalize_email(&self.email);
        let mut v = Violations::new();
        v.require_email("email", &self.email);
        v.require_non_empty("password", &self.password);
        v.finish()
    }
}

/// Public part of the user returned to the client; never carries the hash.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: PublicUser,
    #[serde(rename = "expiresIn")]
    pub expires_in: u64,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: PublicUser,
}
