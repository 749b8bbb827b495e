use std::env;
use anyhow::{Context, Result, bail};

/// Spanner connection settings
#[derive(Debug, Clone)]
pub struct SpannerConfig {
    pub emulator_host: Option<String>,
    pub project: String,
    pub instance: String,
    pub database: String,
}

/// Which record store backs the patient service
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Spanner(SpannerConfig),
    Memory,
}

impl StoreConfig {
    /// Value of `PATIENT_STORE` that selects this backend
    pub fn backend_name(&self) -> &'static str {
        match self {
            StoreConfig::Spanner(_) => "spanner",
            StoreConfig::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = lookup("PATIENT_STORE").unwrap_or_else(|| "spanner".to_string());

        let store = match backend.as_str() {
            "spanner" => StoreConfig::Spanner(SpannerConfig {
                emulator_host: lookup("SPANNER_EMULATOR_HOST"),
                project: lookup("SPANNER_PROJECT")
                    .context("SPANNER_PROJECT environment variable is required")?,
                instance: lookup("SPANNER_INSTANCE")
                    .context("SPANNER_INSTANCE environment variable is required")?,
                database: lookup("SPANNER_DATABASE")
                    .context("SPANNER_DATABASE environment variable is required")?,
            }),
            "memory" => StoreConfig::Memory,
            other => bail!("PATIENT_STORE must be one of: spanner, memory, got '{}'", other),
        };

        let service_port = lookup("SERVICE_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = lookup("SERVICE_HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(Config {
            store,
            service_port,
            service_host,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        match &self.store {
            StoreConfig::Spanner(spanner) => {
                tracing::info!("  Patient store: spanner");
                tracing::info!("  Spanner emulator: {}",
                    spanner.emulator_host.as_deref().unwrap_or("disabled (using production)"));
                tracing::info!("  Spanner project: {}", spanner.project);
                tracing::info!("  Spanner instance: {}", spanner.instance);
                tracing::info!("  Spanner database: {}", spanner.database);
            }
            StoreConfig::Memory => {
                tracing::info!("  Patient store: memory (records are lost on restart)");
            }
        }
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}
