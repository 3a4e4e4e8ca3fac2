use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    /// Token validity window in hours; defaults to one day.
    pub ttl_hours: i64,
}

/// Bootstrap admin account created at startup when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            ttl_hours: std::env::var("JWT_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(24),
        };
        let admin = AdminConfig {
            email: std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".into()),
            password: std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into()),
        };
        Ok(Self {
            database_url,
            jwt,
            admin,
        })
    }
}
