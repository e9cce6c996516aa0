use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::state::AppState;
use crate::store::User;

use super::Claims;

/// Verification failure kinds. Expired tokens get a distinct 401 telling the
/// client to log in again; anything else (bad signature, garbage input) is a
/// malformed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    Malformed,
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let jwt = &state.config.jwt;
        Self {
            encoding: EncodingKey::from_secret(jwt.secret.as_bytes()),
            decoding: DecodingKey::from_secret(jwt.secret.as_bytes()),
            ttl: Duration::from_secs((jwt.ttl_minutes as u64) * 60),
        }
    }
}

impl JwtKeys {
    /// Sign a token carrying the user's identity, expiring ttl from now.
    pub fn issue(&self, user: &User) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user.id, "jwt issued");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        // Zero leeway: expiry is exact, a token is invalid the second it lapses.
        validation.leeway = 0;
        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => {
                debug!(user_id = %data.claims.sub, "jwt verified");
                Ok(data.claims)
            }
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => Err(TokenError::Expired),
                _ => Err(TokenError::Malformed),
            },
        }
    }

    pub fn expires_in_secs(&self) -> u64 {
        self.ttl.as_secs()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::AppConfig;
    use crate::store::Role;
    use uuid::Uuid;

    fn make_keys() -> JwtKeys {
        let state = AppState::in_memory(Arc::new(AppConfig::test_default()));
        JwtKeys::from_ref(&state)
    }

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ama Mensah".into(),
            email: "ama@example.com".into(),
            password_hash: "$argon2id$fake".into(),
            role: Role::Farmer,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn encode_with(keys: &JwtKeys, claims: &Claims) -> String {
        encode(&Header::default(), claims, &keys.encoding).expect("encode")
    }

    #[tokio::test]
    async fn issue_and_verify_roundtrip() {
        let keys = make_keys();
        let user = sample_user();
        let token = keys.issue(&user).expect("issue");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "ama@example.com");
        assert_eq!(claims.role, Role::Farmer);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[tokio::test]
    async fn token_is_valid_just_before_expiry() {
        let keys = make_keys();
        let user = sample_user();
        // Issued 23h59m ago with a 24h window: one minute of life left.
        let iat = OffsetDateTime::now_utc() - TimeDuration::minutes(23 * 60 + 59);
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            iat: iat.unix_timestamp() as usize,
            exp: (iat + TimeDuration::hours(24)).unix_timestamp() as usize,
        };
        let token = encode_with(&keys, &claims);
        assert!(keys.verify(&token).is_ok());
    }

    #[tokio::test]
    async fn token_is_rejected_just_after_expiry() {
        let keys = make_keys();
        let user = sample_user();
        // Issued 24h01m ago: one minute past the window.
        let iat = OffsetDateTime::now_utc() - TimeDuration::minutes(24 * 60 + 1);
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            iat: iat.unix_timestamp() as usize,
            exp: (iat + TimeDuration::hours(24)).unix_timestamp() as usize,
        };
        let token = encode_with(&keys, &claims);
        assert_eq!(keys.verify(&token).unwrap_err(), TokenError::Expired);
    }

    #[tokio::test]
    async fn tampered_token_is_malformed() {
        let keys = make_keys();
        let token = keys.issue(&sample_user()).expect("issue");
        let mut tampered = token.clone();
        tampered.push('x');
        assert_eq!(keys.verify(&tampered).unwrap_err(), TokenError::Malformed);
        assert_eq!(keys.verify("garbage").unwrap_err(), TokenError::Malformed);
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_malformed() {
        let keys = make_keys();
        let other = JwtKeys {
            encoding: EncodingKey::from_secret(b"other-secret"),
            decoding: DecodingKey::from_secret(b"other-secret"),
            ttl: keys.ttl,
        };
        let token = other.issue(&sample_user()).expect("issue");
        assert_eq!(keys.verify(&token).unwrap_err(), TokenError::Malformed);
    }
}
