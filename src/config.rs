use crate::time_utils::{self, AppTimezone};
use anyhow::{anyhow, Context};
use base64::{engine::general_purpose, Engine as _};

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` runs against the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub bind_addr: String,
    pub session_key: Vec<u8>,
    pub timezone: AppTimezone,
    pub seed_on_start: bool,
    pub dev_login: bool,
    pub cors_allow_any: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let session_key_b64 = lookup("SESSION_KEY").ok_or_else(|| anyhow!("SESSION_KEY missing"))?;
        let session_key = general_purpose::STANDARD
            .decode(session_key_b64.trim())
            .context("SESSION_KEY must be base64")?;
        if session_key.is_empty() {
            return Err(anyhow!("SESSION_KEY must not be empty"));
        }

        let timezone = match lookup("APP_TIMEZONE") {
            Some(raw) => time_utils::parse_timezone(&raw)
                .ok_or_else(|| anyhow!("APP_TIMEZONE {raw:?} is not a known zone or offset"))?,
            None => AppTimezone::default(),
        };

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS {raw:?} is not a number"))?,
            None => 10,
        };

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| {
            let port = lookup("PORT").unwrap_or_else(|| "3000".to_string());
            format!("0.0.0.0:{}", port)
        });

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            db_max_connections,
            bind_addr,
            session_key,
            timezone,
            seed_on_start: flag(lookup("SEED_ON_START")),
            dev_login: flag(lookup("DEV_LOGIN")),
            cors_allow_any: flag(lookup("CORS_ALLOW_ANY")),
        })
    }
}

fn flag(raw: Option<String>) -> bool {
    matches!(
        raw.as_deref().map(str::trim).map(str::to_ascii_lowercase).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[("SESSION_KEY", "c2VjcmV0LWtleQ==")]).unwrap();
        assert_eq!(cfg.session_key, b"secret-key");
        assert_eq!(cfg.bind_addr, "0.0.0.0:3000");
        assert_eq!(cfg.db_max_connections, 10);
        assert_eq!(cfg.timezone, AppTimezone::default());
        assert!(cfg.database_url.is_none());
        assert!(!cfg.dev_login && !cfg.seed_on_start && !cfg.cors_allow_any);
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("SESSION_KEY", "c2VjcmV0LWtleQ=="),
            ("PORT", "8080"),
            ("APP_TIMEZONE", "Europe/Berlin"),
            ("DEV_LOGIN", "true"),
            ("SEED_ON_START", "1"),
            ("DATABASE_URL", "postgres://localhost/tracker"),
        ])
        .unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080");
        assert!(matches!(cfg.timezone, AppTimezone::Named(_)));
        assert!(cfg.dev_login && cfg.seed_on_start);
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/tracker"));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(config(&[]).is_err());
        assert!(config(&[("SESSION_KEY", "not base64!")]).is_err());
        assert!(config(&[("SESSION_KEY", "c2VjcmV0LWtleQ=="), ("APP_TIMEZONE", "Mars/Olympus")]).is_err());
        assert!(config(&[("SESSION_KEY", "c2VjcmV0LWtleQ=="), ("DB_MAX_CONNECTIONS", "many")]).is_err());
    }
}
