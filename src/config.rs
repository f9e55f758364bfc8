use std::env;

use crate::models::Availability;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub business_name: String,
    pub business_domain: String,
    pub event_location: String,
    /// Raw JSON schedule; the built-in schedule is used when unset.
    pub availability: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "warmbook.db".to_string()),
            business_name: env::var("BUSINESS_NAME").unwrap_or_else(|_| "WarmBook".to_string()),
            business_domain: env::var("BUSINESS_DOMAIN")
                .unwrap_or_else(|_| "warmbook.com".to_string()),
            event_location: env::var("EVENT_LOCATION").unwrap_or_else(|_| "Online".to_string()),
            availability: env::var("AVAILABILITY").ok().filter(|v| !v.trim().is_empty()),
        }
    }

    pub fn load_availability(&self) -> anyhow::Result<Availability> {
        match &self.availability {
            Some(json) => Availability::from_json(json),
            None => Ok(Availability::default()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: ":memory:".to_string(),
            business_name: "WarmBook".to_string(),
            business_domain: "warmbook.com".to_string(),
            event_location: "Online".to_string(),
            availability: None,
        }
    }
}
