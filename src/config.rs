use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests per minute per caller across /api.
    pub per_minute: u32,
    /// Tighter budget for login and register.
    pub auth_per_minute: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// When unset the server runs against in-memory stores (demo mode).
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    pub environment: Environment,
    pub rate_limit: RateLimitConfig,
}

fn env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
        };
        let environment = match std::env::var("APP_ENV").as_deref() {
            Ok("production") => Environment::Production,
            _ => Environment::Development,
        };
        Ok(Self {
            database_url: std::env::var("DATABASE_URL").ok(),
            jwt,
            environment,
            rate_limit: RateLimitConfig {
                per_minute: env_u32("RATE_LIMIT_PER_MINUTE", 100),
                auth_per_minute: env_u32("AUTH_RATE_LIMIT_PER_MINUTE", 10),
            },
        })
    }

    /// Fixed config for unit tests; generous rate budget so tests that are not
    /// about throttling never trip it.
    pub fn test_default() -> Self {
        Self {
            database_url: None,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                ttl_minutes: 60 * 24,
            },
            environment: Environment::Development,
            rate_limit: RateLimitConfig {
                per_minute: 10_000,
                auth_per_minute: 10_000,
            },
        }
    }
}
