use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Role;

/// JWT payload: the identity embedded at login plus issue/expiry timestamps.
/// Tokens are stateless; logout does not revoke them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,    // user ID
    pub email: String,
    pub name: String,
    pub role: Role,
    pub iat: usize,   // issued at (unix timestamp)
    pub exp: usize,   // expires at (iat + ttl)
}
