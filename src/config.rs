//! Server configuration, loaded from environment variables at startup.

use std::path::PathBuf;
use std::time::Duration;

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "cdr-converter";

/// Runtime configuration for cdr-converter.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:5000"`).
    pub bind_address: String,

    /// Staging directory for uploaded `.cdr` files (default: `"/tmp/uploads"`).
    pub upload_dir: PathBuf,

    /// Staging directory for rendered `.png` files (default: `"/tmp/outputs"`).
    pub output_dir: PathBuf,

    /// Inkscape executable; resolved via `PATH` unless absolute
    /// (default: `"inkscape"`).
    pub inkscape_bin: String,

    /// Wall-clock bound on a single conversion, in seconds (default: 60).
    /// The child process is killed when it expires.
    pub convert_timeout_secs: u64,

    /// Maximum accepted upload size in MiB (default: 50).
    pub max_upload_size_mb: usize,

    /// Comma-separated CORS origin allowlist; `None` means any origin.
    pub cors_allowed_origins: Option<String>,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("CDR_BIND", "0.0.0.0:5000"),
            upload_dir: PathBuf::from(env_or("CDR_UPLOAD_DIR", "/tmp/uploads")),
            output_dir: PathBuf::from(env_or("CDR_OUTPUT_DIR", "/tmp/outputs")),
            inkscape_bin: env_or("CDR_INKSCAPE_BIN", "inkscape"),
            convert_timeout_secs: parse_env("CDR_CONVERT_TIMEOUT_SECS", 60),
            max_upload_size_mb: parse_env("CDR_MAX_UPLOAD_SIZE_MB", 50),
            cors_allowed_origins: std::env::var("CDR_CORS_ORIGINS").ok(),
            log_level: env_or("CDR_LOG", "info"),
            log_json: std::env::var("CDR_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// Conversion timeout as a [`Duration`].
    pub fn convert_timeout(&self) -> Duration {
        Duration::from_secs(self.convert_timeout_secs)
    }

    /// Upload size cap in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_size_mb * 1024 * 1024
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    /// Built explicitly so the assertions never depend on whatever `CDR_*`
    /// variables happen to be set in the test environment.
    fn default_config() -> Config {
        Config {
            bind_address: "0.0.0.0:5000".into(),
            upload_dir: PathBuf::from("/tmp/uploads"),
            output_dir: PathBuf::from("/tmp/outputs"),
            inkscape_bin: "inkscape".into(),
            convert_timeout_secs: 60,
            max_upload_size_mb: 50,
            cors_allowed_origins: None,
            log_level: "info".into(),
            log_json: false,
        }
    }

    #[test]
    fn env_or_falls_back_when_unset() {
        assert_eq!(env_or("CDR_TEST_DOES_NOT_EXIST", "fallback"), "fallback");
    }

    #[test]
    fn parse_env_falls_back_when_unset() {
        assert_eq!(parse_env("CDR_TEST_DOES_NOT_EXIST", 42_u64), 42);
    }

    #[test]
    fn convert_timeout_is_in_seconds() {
        assert_eq!(default_config().convert_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn upload_cap_is_in_bytes() {
        assert_eq!(default_config().max_upload_bytes(), 50 * 1024 * 1024);
    }
}
