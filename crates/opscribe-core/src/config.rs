use crate::error::ConfigError;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub poll: PollConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_language_code")]
    pub language_code: String,

    /// Per-call deadline applied to the submit RPC and each poll RPC.
    #[serde(default = "default_rpc_deadline_ms")]
    pub rpc_deadline_ms: u64,

    /// Transport backend: "grpc" for the real service, "null" for an
    /// offline dry run.
    #[serde(default = "default_transport")]
    pub transport: String,

    /// Polls the null transport answers "in progress" before completing.
    /// Only consulted when `transport = "null"`.
    #[serde(default = "default_null_polls_before_done")]
    pub null_polls_before_done: u32,
}

impl ServiceConfig {
    pub fn rpc_deadline(&self) -> Duration {
        Duration::from_millis(self.rpc_deadline_ms)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            language_code: default_language_code(),
            rpc_deadline_ms: default_rpc_deadline_ms(),
            transport: default_transport(),
            null_polls_before_done: default_null_polls_before_done(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Literal bearer token, or a `${VAR}` reference resolved at load time.
    #[serde(default)]
    pub token: String,

    /// Environment variable consulted when `token` is empty.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl AuthConfig {
    /// The bearer token to present, if any source provides one.
    pub fn resolve_token(&self) -> Option<String> {
        if !self.token.is_empty() {
            return Some(self.token.clone());
        }
        std::env::var(&self.token_env)
            .ok()
            .filter(|token| !token.is_empty())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            token_env: default_token_env(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollConfig {
    /// Wait this long before every status query, including the first.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Multiplier applied to the interval after each query. 1.0 keeps the
    /// fixed cadence.
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,

    /// Ceiling for the interval once backoff is in play.
    #[serde(default = "default_max_interval_ms")]
    pub max_interval_ms: u64,

    /// Bound on total wall-clock wait across all iterations. 0 disables the
    /// bound and the loop runs until the operation finishes.
    #[serde(default = "default_max_wait_ms")]
    pub max_wait_ms: u64,
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval_ms)
    }

    pub fn max_wait(&self) -> Option<Duration> {
        if self.max_wait_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.max_wait_ms))
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            backoff_factor: default_backoff_factor(),
            max_interval_ms: default_max_interval_ms(),
            max_wait_ms: default_max_wait_ms(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_endpoint() -> String {
    "https://speech.googleapis.com".to_string()
}

fn default_language_code() -> String {
    "en-US".to_string()
}

fn default_rpc_deadline_ms() -> u64 {
    10_000
}

fn default_transport() -> String {
    "grpc".to_string()
}

fn default_null_polls_before_done() -> u32 {
    2
}

fn default_token_env() -> String {
    "SPEECH_ACCESS_TOKEN".to_string()
}

fn default_interval_ms() -> u64 {
    1_000
}

fn default_backoff_factor() -> f64 {
    1.0
}

fn default_max_interval_ms() -> u64 {
    15_000
}

fn default_max_wait_ms() -> u64 {
    300_000
}

/// Interpolate `${VAR}` patterns with environment variable values.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([^}]+)\}").unwrap();
    let mut result = input.to_string();
    let mut errors = Vec::new();

    for cap in re.captures_iter(input) {
        let var_name = &cap[1];
        match std::env::var(var_name) {
            Ok(val) => {
                result = result.replace(&cap[0], &val);
            }
            Err(_) => {
                errors.push(var_name.to_string());
            }
        }
    }

    if let Some(first_missing) = errors.into_iter().next() {
        return Err(ConfigError::EnvVarNotFound(first_missing));
    }

    Ok(result)
}

impl AppConfig {
    /// Load configuration from a TOML file, with environment variable interpolation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let interpolated = interpolate_env_vars(&content)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        Ok(config)
    }

    /// Parse configuration from a TOML string (for testing).
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let interpolated = interpolate_env_vars(s)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        Ok(config)
    }
}
