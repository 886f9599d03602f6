use std::{net::SocketAddr, time::Duration};

use anyhow::{anyhow, Context};
use chrono_tz::Tz;
use geocast_core::utils::time_utils::{parse_tz, DEFAULT_REPORTING_TZ};

pub const DEFAULT_TRACKING_FALLBACK_URL: &str = "https://example.com/";

#[derive(Clone, Debug)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Raw `GC_JWT_SECRET`; a random key is generated when unset.
    pub jwt_secret: Option<String>,
    pub session_ttl: Duration,
    pub session_cookie: String,
    pub tracking_fallback_url: String,
    pub timezone: Tz,
    pub age_reference_year: Option<i32>,
    pub admin: Option<AdminBootstrap>,
    pub delivery_recovery_interval: Duration,
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let listen_addr: SocketAddr = get("GC_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid GC_LISTEN_ADDR")?;
        let db_path = get("GC_DB_PATH").unwrap_or_else(|| "./db/app.db".into());
        let cors_allow = get("GC_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = parse_or("GC_REQUEST_TIMEOUT_MS", get("GC_REQUEST_TIMEOUT_MS"), 30_000)?;
        let session_ttl_secs: u64 =
            parse_or("GC_SESSION_TTL_SECS", get("GC_SESSION_TTL_SECS"), 86_400)?;
        let recovery_secs: u64 =
            parse_or("GC_DELIVERY_RECOVERY_SECS", get("GC_DELIVERY_RECOVERY_SECS"), 60)?;
        if recovery_secs == 0 {
            return Err(anyhow!("GC_DELIVERY_RECOVERY_SECS must be positive"));
        }

        let timezone = match get("GC_TIMEZONE") {
            Some(name) => parse_tz(&name).ok_or_else(|| anyhow!("Unknown GC_TIMEZONE '{}'", name))?,
            None => DEFAULT_REPORTING_TZ,
        };
        let age_reference_year = get("GC_AGE_REFERENCE_YEAR")
            .map(|v| v.parse::<i32>())
            .transpose()
            .context("Invalid GC_AGE_REFERENCE_YEAR")?;

        let admin = match (get("GC_ADMIN_EMAIL"), get("GC_ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminBootstrap { email, password }),
            (None, None) => None,
            _ => {
                return Err(anyhow!(
                    "GC_ADMIN_EMAIL and GC_ADMIN_PASSWORD must be set together"
                ))
            }
        };

        let log_format = get("GC_LOG_FORMAT").unwrap_or_else(|| "text".into());
        if !log_format.eq_ignore_ascii_case("text") && !log_format.eq_ignore_ascii_case("json") {
            return Err(anyhow!("GC_LOG_FORMAT must be 'text' or 'json'"));
        }

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            jwt_secret: get("GC_JWT_SECRET"),
            session_ttl: Duration::from_secs(session_ttl_secs),
            session_cookie: get("GC_SESSION_COOKIE").unwrap_or_else(|| "gc_session".into()),
            tracking_fallback_url: get("GC_TRACKING_FALLBACK_URL")
                .unwrap_or_else(|| DEFAULT_TRACKING_FALLBACK_URL.into()),
            timezone,
            age_reference_year,
            admin,
            delivery_recovery_interval: Duration::from_secs(recovery_secs),
            log_format,
        })
    }
}

fn parse_or(key: &str, raw: Option<String>, default: u64) -> anyhow::Result<u64> {
    match raw {
        Some(v) => v.parse().with_context(|| format!("Invalid {}", key)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.listen_addr.port(), 8080);
        assert_eq!(cfg.session_cookie, "gc_session");
        assert_eq!(cfg.timezone, chrono_tz::Asia::Seoul);
        assert_eq!(cfg.session_ttl, Duration::from_secs(86_400));
        assert!(cfg.admin.is_none());
        assert_eq!(cfg.cors_allow, vec!["*".to_string()]);
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(config(&[("GC_TIMEZONE", "Mars/Olympus")]).is_err());
        assert!(config(&[("GC_REQUEST_TIMEOUT_MS", "soon")]).is_err());
        assert!(config(&[("GC_ADMIN_EMAIL", "admin@example.com")]).is_err());
        assert!(config(&[("GC_LOG_FORMAT", "xml")]).is_err());
    }

    #[test]
    fn reference_year_can_be_pinned() {
        let cfg = config(&[("GC_AGE_REFERENCE_YEAR", "2025"), ("GC_TIMEZONE", "UTC")]).unwrap();
        assert_eq!(cfg.age_reference_year, Some(2025));
        assert_eq!(cfg.timezone, chrono_tz::UTC);
    }
}
