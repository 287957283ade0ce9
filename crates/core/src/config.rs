// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking configuration loaded once at startup.

use thiserror::Error;
use time::Duration;
use tracing::info;

/// Environment variable holding the booking time-to-live in seconds.
pub const BOOKING_TTL_ENV: &str = "BOOKING_TTL";

/// Longest accepted booking TTL: one year.
pub const MAX_BOOKING_TTL_SECONDS: i64 = 365 * 24 * 60 * 60;

/// Errors raised while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The variable is unset or empty.
    #[error("{0} is not set")]
    Missing(&'static str),
    /// The variable is not an integer.
    #[error("{name} must be an integer number of seconds, got '{value}'")]
    Parse {
        name: &'static str,
        value: String,
    },
    /// The variable is a negative integer.
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: i64 },
    /// The variable exceeds [`MAX_BOOKING_TTL_SECONDS`].
    #[error("{name} must be at most {max} seconds, got {value}")]
    TooLarge {
        name: &'static str,
        value: i64,
        max: i64,
    },
}

/// Settings consumed by the booking service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingConfig {
    ttl: Duration,
}

impl BookingConfig {
    /// Creates a configuration from a TTL in whole seconds.
    ///
    /// # Errors
    ///
    /// * `ConfigError::Negative` if `seconds` is below zero
    /// * `ConfigError::TooLarge` if `seconds` exceeds [`MAX_BOOKING_TTL_SECONDS`]
    pub const fn from_seconds(seconds: i64) -> Result<Self, ConfigError> {
        if seconds < 0 {
            return Err(ConfigError::Negative {
                name: BOOKING_TTL_ENV,
                value: seconds,
            });
        }
        if seconds > MAX_BOOKING_TTL_SECONDS {
            return Err(ConfigError::TooLarge {
                name: BOOKING_TTL_ENV,
                value: seconds,
                max: MAX_BOOKING_TTL_SECONDS,
            });
        }
        Ok(Self {
            ttl: Duration::seconds(seconds),
        })
    }

    /// Parses the raw value of [`BOOKING_TTL_ENV`].
    ///
    /// # Errors
    ///
    /// * `ConfigError::Missing` if the value is absent or empty
    /// * `ConfigError::Parse` if it is not an integer
    /// * `ConfigError::Negative` if it is below zero
    /// * `ConfigError::TooLarge` if it exceeds [`MAX_BOOKING_TTL_SECONDS`]
    pub fn parse(raw: Option<&str>) -> Result<Self, ConfigError> {
        let raw = raw
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing(BOOKING_TTL_ENV))?;

        let seconds: i64 = raw.parse().map_err(|_| ConfigError::Parse {
            name: BOOKING_TTL_ENV,
            value: raw.to_string(),
        })?;

        Self::from_seconds(seconds)
    }

    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`BookingConfig::parse`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var(BOOKING_TTL_ENV).ok();
        let config = Self::parse(raw.as_deref())?;
        info!(ttl_seconds = config.ttl.whole_seconds(), "Loaded booking configuration");
        Ok(config)
    }

    /// How long a booking may stay pending.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }
}
