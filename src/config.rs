//! Configuration constants and environment defaults for req
//!
//! There is no config file. A handful of environment variables seed the
//! request draft once at startup and are never consulted again.

use crate::draft::Format;
use crate::error::Result;

/// Environment variable holding the default host
pub const HOST_ENV_VAR: &str = "REQ_HOST";

/// Environment variable holding the default slash-separated path prefix
pub const PATH_ENV_VAR: &str = "REQ_PATH";

/// Environment variable holding the default body format (`json` or `form`)
pub const FORMAT_ENV_VAR: &str = "REQ_FORMAT";

/// Environment variable holding the tracing filter directive
pub const LOG_ENV_VAR: &str = "REQ_LOG";

/// Log filter used when `REQ_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Scheme used unless `--scheme` overrides it
pub const DEFAULT_SCHEME: &str = "http";

/// Value of the `User-Agent` header every request starts with
pub const USER_AGENT: &str = concat!("req/", env!("CARGO_PKG_VERSION"));

/// Request defaults captured from the environment at process start
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    pub host: String,
    pub path: String,
    pub format: Format,
}

impl Defaults {
    /// Read `REQ_HOST`, `REQ_PATH` and `REQ_FORMAT` from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| {
            std::env::var_os(name)
                .and_then(|val| val.into_string().ok())
                .unwrap_or_default()
        })
    }

    /// Build defaults from an arbitrary lookup; unset variables map to `""`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> String,
    {
        let defaults = Self {
            host: lookup(HOST_ENV_VAR),
            path: lookup(PATH_ENV_VAR),
            format: Format::from_env_value(&lookup(FORMAT_ENV_VAR))?,
        };
        tracing::debug!(?defaults, "captured environment defaults");
        Ok(defaults)
    }
}
