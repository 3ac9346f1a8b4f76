use std::net::SocketAddr;

#[derive(Clone, Debug, PartialEq)]
pub enum Env {
    Dev,
    Staging,
    Production,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug)]
pub struct ServerConfig {
    pub env: Env,
    pub listen_addr: SocketAddr,
    pub cors_allowed_origins: Vec<String>,
    pub log_format: LogFormat,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Could not get the environment variable `{0}` due to unicode error")]
    NotUnicode(&'static str),

    #[error("Invalid value `{value}` for environment variable `{key}`")]
    Invalid { key: &'static str, value: String },
}

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

fn var(key: &'static str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(env) => Ok(Some(env)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(key)),
    }
}

impl ServerConfig {
    pub fn new_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(var)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Result<Option<String>, ConfigError>,
    {
        let env = match lookup("ENVIRONMENT")?.as_deref() {
            None | Some("dev") => Env::Dev,
            Some("staging") => Env::Staging,
            Some("production") => Env::Production,
            Some(other) => {
                tracing::warn!("Unknown ENVIRONMENT `{other}`, falling back to dev");
                Env::Dev
            }
        };

        let listen_addr = lookup("LISTEN_ADDR")?.unwrap_or_else(|| DEFAULT_LISTEN_ADDR.into());
        let listen_addr = listen_addr.parse::<SocketAddr>().map_err(|_| ConfigError::Invalid {
            key: "LISTEN_ADDR",
            value: listen_addr.clone(),
        })?;

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")?
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let log_format = match lookup("LOG_FORMAT")?.as_deref() {
            Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            None if env == Env::Dev => LogFormat::Pretty,
            None => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "LOG_FORMAT",
                    value: other.into(),
                });
            }
        };

        Ok(ServerConfig {
            env,
            listen_addr,
            cors_allowed_origins,
            log_format,
        })
    }
}
