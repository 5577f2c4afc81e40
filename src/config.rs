use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub cors_allow_origin: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "barbershop.db".to_string()),
            cors_allow_origin: env::var("CORS_ALLOW_ORIGIN")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }
}
