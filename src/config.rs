use crate::error::ConfigError;
use crate::i18n::Language;
use chrono::FixedOffset;
use log::warn;
use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite:kiosk_vote.db";
const DEFAULT_BRAND_NAME: &str = "Cellshop Duty Free";
const DEFAULT_BRAND_SLUG: &str = "cellshop";
// Paraguay / southern Brazil, where the kiosks stand.
const DEFAULT_UTC_OFFSET_SECONDS: i32 = -3 * 3600;

/// Branding stamped on kiosk screens and reports.
#[derive(Debug, Clone)]
pub struct Brand {
    pub name: String,
    /// Lower-case prefix for exported file names.
    pub slug: String,
}

impl Default for Brand {
    fn default() -> Self {
        Self {
            name: DEFAULT_BRAND_NAME.to_string(),
            slug: DEFAULT_BRAND_SLUG.to_string(),
        }
    }
}

/// Seed credentials for the administrator account.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub discord_token: String,
    pub database_url: String,
    pub admin_seed: Option<AdminSeed>,
    pub default_language: Language,
    /// Local time of the deployment; date filters are interpreted in it.
    pub utc_offset: FixedOffset,
    pub brand: Brand,
}

impl AppConfig {
    /// Reads the configuration from the process environment. Call
    /// `dotenvy::dotenv()` first so a local `.env` file is honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let admin_seed = match (lookup("ADMIN_EMAIL"), lookup("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed { email, password }),
            (Some(_), None) | (None, Some(_)) => {
                warn!("ADMIN_EMAIL and ADMIN_PASSWORD must be set together; skipping admin seed");
                None
            }
            (None, None) => None,
        };

        let default_language = match lookup("KIOSK_DEFAULT_LANGUAGE") {
            Some(code) => Language::from_code(&code).ok_or_else(|| ConfigError::Invalid {
                key: "KIOSK_DEFAULT_LANGUAGE",
                value: code.clone(),
            })?,
            None => Language::Pt,
        };

        let utc_offset = match lookup("KIOSK_UTC_OFFSET") {
            Some(raw) => parse_utc_offset(&raw).ok_or(ConfigError::Invalid {
                key: "KIOSK_UTC_OFFSET",
                value: raw.clone(),
            })?,
            None => FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECONDS)
                .ok_or(ConfigError::Invalid {
                    key: "KIOSK_UTC_OFFSET",
                    value: DEFAULT_UTC_OFFSET_SECONDS.to_string(),
                })?,
        };

        let mut brand = Brand::default();
        if let Some(name) = lookup("KIOSK_BRAND_NAME") {
            brand.name = name;
        }
        if let Some(slug) = lookup("KIOSK_BRAND_SLUG") {
            brand.slug = slug.to_lowercase();
        }

        Ok(Self {
            discord_token,
            database_url,
            admin_seed,
            default_language,
            utc_offset,
            brand,
        })
    }
}

/// Parses `+HH:MM` / `-HH:MM` (or a bare `-3`) into a fixed offset.
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    let (sign, rest) = match raw.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h.parse::<i32>().ok()?, m.parse::<i32>().ok()?),
        None => (rest.parse::<i32>().ok()?, 0),
    };
    if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn token_is_required() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DISCORD_TOKEN")));
    }

    #[test]
    fn defaults_apply() {
        let config = AppConfig::from_lookup(lookup_from(&[("DISCORD_TOKEN", "abc")])).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.default_language, Language::Pt);
        assert_eq!(config.utc_offset.local_minus_utc(), -3 * 3600);
        assert_eq!(config.brand.slug, "cellshop");
        assert!(config.admin_seed.is_none());
    }

    #[test]
    fn overrides_are_read() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("KIOSK_DEFAULT_LANGUAGE", "ES"),
            ("KIOSK_UTC_OFFSET", "+05:30"),
            ("KIOSK_BRAND_SLUG", "Acme"),
            ("ADMIN_EMAIL", "admin@example.com"),
            ("ADMIN_PASSWORD", "hunter2"),
        ]))
        .unwrap();
        assert_eq!(config.default_language, Language::Es);
        assert_eq!(config.utc_offset.local_minus_utc(), 5 * 3600 + 30 * 60);
        assert_eq!(config.brand.slug, "acme");
        assert_eq!(config.admin_seed.unwrap().email, "admin@example.com");
    }

    #[test]
    fn bad_language_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("KIOSK_DEFAULT_LANGUAGE", "klingon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "KIOSK_DEFAULT_LANGUAGE", .. }));
    }

    #[test]
    fn offsets_parse() {
        assert_eq!(parse_utc_offset("-3").unwrap().local_minus_utc(), -10800);
        assert_eq!(parse_utc_offset("-03:00").unwrap().local_minus_utc(), -10800);
        assert_eq!(parse_utc_offset("0").unwrap().local_minus_utc(), 0);
        assert!(parse_utc_offset("+25:00").is_none());
        assert!(parse_utc_offset("abc").is_none());
    }
}
