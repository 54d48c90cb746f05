use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr};
use url::Url;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

/// Which store backs the repositories.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default = "default_store")]
    pub store: StoreKind,

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default = "default_media_base_url")]
    pub media_base_url: String,

    #[serde(default = "default_language")]
    pub default_language: String,

    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    #[serde(default = "default_localization_enabled")]
    pub localization_enabled: bool,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-Content-API".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_store() -> StoreKind {
    StoreKind::Postgres
}
fn default_db_max_connections() -> u32 {
    20
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_media_base_url() -> String {
    "http://127.0.0.1:8000/media/".to_string()
}
fn default_language() -> String {
    "en".to_string()
}
fn default_languages() -> Vec<String> {
    vec!["en".to_string()]
}
fn default_localization_enabled() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            env: default_env(),
            name: default_name(),
            port: default_port(),
            host: default_host(),
            worker_count: 1,
            store: default_store(),
            database_url: String::new(),
            db_max_connections: default_db_max_connections(),
            cors_allowed_origins: default_cors_origins(),
            media_base_url: default_media_base_url(),
            default_language: default_language(),
            languages: default_languages(),
            localization_enabled: default_localization_enabled(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .with_list_parse_key("languages")
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        if config.store == StoreKind::Postgres {
            config.database_url = fill_or_env(config.database_url, "DATABASE_URL")?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.store == StoreKind::Postgres && self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty".to_string());
        }
        match Url::parse(&self.media_base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            _ => errors.push("MEDIA_BASE_URL must be an absolute http(s) URL".to_string()),
        }
        if self.supported_languages().is_empty() {
            errors.push("LANGUAGES must list at least one language".to_string());
        }
        if !self.supported_languages().contains(&self.default_language.to_lowercase()) {
            errors.push(format!(
                "DEFAULT_LANGUAGE '{}' is not among LANGUAGES",
                self.default_language
            ));
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        split_list(&self.cors_allowed_origins)
    }

    pub fn supported_languages(&self) -> Vec<String> {
        split_list(&self.languages)
            .into_iter()
            .map(|l| l.to_lowercase())
            .collect()
    }
}

fn split_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

/// Hides credentials embedded in a connection string.
fn redact_database_url(raw: &str) -> String {
    if raw.trim().is_empty() {
        return "[MISSING]".to_string();
    }
    match Url::parse(raw) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("REDACTED"));
            }
            url.to_string()
        }
        Err(_) => "[REDACTED]".to_string(),
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("store", &self.store)
            .field("database_url", &redact_database_url(&self.database_url))
            .field("db_max_connections", &self.db_max_connections)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("media_base_url", &self.media_base_url)
            .field("default_language", &self.default_language)
            .field("languages", &self.languages)
            .field("localization_enabled", &self.localization_enabled)
            .finish()
    }
}
