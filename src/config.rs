use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub api_key: String,
    pub port: u16,
    pub templates_dir: String,
    pub static_dir: String,
    pub media_dir: String,
    pub media_url: String,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "{key} environment variable must be set and non-empty"),
            Self::Invalid(key, value) => write!(f, "{key} has an invalid value: {value}"),
        }
    }
}

impl Config {
    /// Reads settings from the process environment, loading `.env` first.
    pub fn init() -> Result<Config, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid("PORT", raw))?,
            None => 8080,
        };

        let mut media_url = or_default("MEDIA_URL", "/media/");
        if !media_url.ends_with('/') {
            media_url.push('/');
        }

        Ok(Config {
            database_url: required("DATABASE_URL")?,
            api_key: required("API_KEY")?,
            port,
            templates_dir: or_default("TEMPLATES_DIR", "templates"),
            static_dir: or_default("STATIC_DIR", "static"),
            media_dir: or_default("MEDIA_DIR", "media"),
            media_url,
        })
    }
}
