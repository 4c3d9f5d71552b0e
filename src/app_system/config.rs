use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use super::ConfigError;

const DEFAULT_JWT_SECRET: &str = "supersecretkey";
/// A century; keeps token expiry well inside chrono's range.
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 100;

/// Credentials for the admin account created at startup.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub actor_buffer: usize,
    pub invoice_tax_rate: f64,
    pub admin: Option<AdminSeed>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; `load` uses the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            warn!("JWT_SECRET not set, using the built-in development secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        let admin = match (lookup("ADMIN_EMAIL"), lookup("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed {
                name: lookup("ADMIN_NAME").unwrap_or_else(|| "Administrator".to_string()),
                email,
                password,
            }),
            (None, None) => None,
            _ => {
                warn!("ADMIN_EMAIL and ADMIN_PASSWORD must both be set, skipping admin seed");
                None
            }
        };

        let config = Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: try_load(&lookup, "PORT", "5000")?,
            jwt_secret,
            token_ttl_hours: try_load(&lookup, "TOKEN_TTL_HOURS", "24")?,
            actor_buffer: try_load(&lookup, "ACTOR_BUFFER", "32")?,
            invoice_tax_rate: try_load(&lookup, "INVOICE_TAX_RATE", "0")?,
            admin,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.token_ttl_hours <= 0 {
            return Err(invalid("TOKEN_TTL_HOURS", self.token_ttl_hours, "must be positive"));
        }
        if self.token_ttl_hours > MAX_TOKEN_TTL_HOURS {
            return Err(invalid(
                "TOKEN_TTL_HOURS",
                self.token_ttl_hours,
                &format!("must be at most {MAX_TOKEN_TTL_HOURS}"),
            ));
        }
        if self.actor_buffer == 0 {
            return Err(invalid("ACTOR_BUFFER", self.actor_buffer, "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.invoice_tax_rate) {
            return Err(invalid("INVOICE_TAX_RATE", self.invoice_tax_rate, "must be between 0 and 1"));
        }
        Ok(())
    }

    pub fn token_ttl(&self) -> Option<chrono::Duration> {
        chrono::Duration::try_hours(self.token_ttl_hours)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn invalid(key: &'static str, value: impl Display, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        invalid(key, &raw, &e.to_string())
    })
}
