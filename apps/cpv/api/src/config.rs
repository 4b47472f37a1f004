use core_config::{FromEnv, env_parse, server::ServerConfig};
use domain_cpv::{FastEmbedConfig, LanceConfig, pool::DEFAULT_WORKERS};

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Query service configuration
/// Composes shared config components from the `core_config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: Environment,
    pub server: ServerConfig,
    pub lance: LanceConfig,
    pub model: FastEmbedConfig,
    /// Threads in the encode pool (`CPV_ENCODE_WORKERS`)
    pub encode_workers: usize,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // HOST=0.0.0.0, PORT=8000
        let lance = LanceConfig::from_env()?; // CPV_DB_PATH=./lancedb
        let model = FastEmbedConfig::from_env()?;
        let encode_workers = env_parse("CPV_ENCODE_WORKERS", DEFAULT_WORKERS)?;

        if encode_workers == 0 {
            eyre::bail!("CPV_ENCODE_WORKERS must be at least 1");
        }

        Ok(Self {
            environment,
            server,
            lance,
            model,
            encode_workers,
        })
    }
}
