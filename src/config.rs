use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub places: PlacesSettings,
    #[serde(default)]
    pub openai: OpenAiSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// Google Places API (New) settings
#[derive(Debug, Clone, Deserialize)]
pub struct PlacesSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_places_base_url")]
    pub base_url: String,
    #[serde(default = "default_radius_m")]
    pub radius_m: f64,
    #[serde(default = "default_max_results")]
    pub max_results: u8,
    #[serde(default = "default_places_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PlacesSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_places_base_url(),
            radius_m: default_radius_m(),
            max_results: default_max_results(),
            timeout_secs: default_places_timeout_secs(),
        }
    }
}

/// Upper bound on `maxResultCount` accepted by nearby search
pub const MAX_PLACES_RESULTS: u8 = 20;
/// Upper bound on the nearby search circle radius
pub const MAX_PLACES_RADIUS_M: f64 = 50_000.0;

fn default_places_base_url() -> String { "https://places.googleapis.com".to_string() }
fn default_radius_m() -> f64 { 5000.0 }
fn default_max_results() -> u8 { 20 }
fn default_places_timeout_secs() -> u64 { 10 }

/// OpenAI chat completions settings
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_openai_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_openai_base_url(),
            model: default_model(),
            timeout_secs: default_openai_timeout_secs(),
        }
    }
}

fn default_openai_base_url() -> String { "https://api.openai.com/v1".to_string() }
fn default_model() -> String { "gpt-4o-mini".to_string() }
fn default_openai_timeout_secs() -> u64 { 30 }

/// Credentials for inbound HTTP basic auth
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

/// Output shape of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl LoggingSettings {
    /// Parsed `format`; unrecognised values fall back to compact text
    pub fn log_format(&self) -> LogFormat {
        match self.format.to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Compact,
        }
    }
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with CAFE__)
    /// 5. Well-known variables (GOOGLE_PLACES_API_KEY, OPENAI_API_KEY,
    ///    APP_BASIC_USER, APP_BASIC_PASS, LOG_LEVEL, LOG_FORMAT)
    ///
    /// Fails if a provider key or an auth credential is missing.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., CAFE__PLACES__API_KEY -> places.api_key
            .add_source(
                Environment::with_prefix("CAFE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_well_known_env(settings)?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject configurations missing a required credential or carrying
    /// search limits the Places API would not honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("places.api_key", &self.places.api_key),
            ("openai.api_key", &self.openai.api_key),
            ("auth.username", &self.auth.username),
            ("auth.password", &self.auth.password),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(key, _)| *key)
            .collect();

        if !missing.is_empty() {
            return Err(ConfigError::Message(format!(
                "missing required configuration: {}",
                missing.join(", ")
            )));
        }

        if !(1..=MAX_PLACES_RESULTS).contains(&self.places.max_results) {
            return Err(ConfigError::Message(format!(
                "places.max_results must be within 1..={}, got {}",
                MAX_PLACES_RESULTS, self.places.max_results
            )));
        }

        if !self.places.radius_m.is_finite()
            || self.places.radius_m <= 0.0
            || self.places.radius_m > MAX_PLACES_RADIUS_M
        {
            return Err(ConfigError::Message(format!(
                "places.radius_m must be within (0, {}], got {}",
                MAX_PLACES_RADIUS_M, self.places.radius_m
            )));
        }

        Ok(())
    }
}

/// Override config values from conventional environment variables
fn apply_well_known_env(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("GOOGLE_PLACES_API_KEY", "places.api_key"),
        ("OPENAI_API_KEY", "openai.api_key"),
        ("APP_BASIC_USER", "auth.username"),
        ("APP_BASIC_PASS", "auth.password"),
        ("LOG_LEVEL", "logging.level"),
        ("LOG_FORMAT", "logging.format"),
    ];

    let mut builder = Config::builder().add_source(settings);

    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
