use std::env;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Local,
    Lambda,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub run_mode: RunMode,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let run_mode = match lookup("RUN_MODE").as_deref() {
            None | Some("LOCAL") => RunMode::Local,
            Some("LAMBDA") => RunMode::Lambda,
            Some(other) => {
                return Err(AppError::Config(format!("Invalid RUN_MODE: {other}")));
            }
        };

        let port = match lookup("PORT") {
            Some(port) => port
                .parse::<u16>()
                .map_err(|e| AppError::Config(format!("Invalid PORT {port:?}: {e}")))?,
            None => 8080,
        };

        Ok(Config {
            run_mode,
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
