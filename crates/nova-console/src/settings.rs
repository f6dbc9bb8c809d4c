//! Console settings.
//!
//! Precedence: `NOVA__*` environment variables > `nova.toml` (or the file
//! named by `NOVA_CONFIG`) > built-in defaults.

use std::path::PathBuf;

use nova_access::AccessConfig;
use nova_store::StoreConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    /// Directory holding the slot documents.
    pub data_dir: PathBuf,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Emit log lines as JSON.
    pub log_json: bool,
    pub email_domain: String,
    pub max_failed_admin_attempts: u32,
    pub lockout_duration_secs: u64,
}

impl ConsoleConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path = std::env::var("NOVA_CONFIG").unwrap_or_else(|_| "nova".to_string());
        let access = AccessConfig::default();

        config::Config::builder()
            .set_default("data_dir", "./nova-data")?
            .set_default("log_filter", "nova=info")?
            .set_default("log_json", false)?
            .set_default("email_domain", access.allowed_email_domain)?
            .set_default(
                "max_failed_admin_attempts",
                i64::from(access.max_failed_admin_attempts),
            )?
            .set_default("lockout_duration_secs", access.lockout_duration_secs)?
            .add_source(config::File::with_name(&config_path).required(false))
            .add_source(config::Environment::with_prefix("NOVA").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn store(&self) -> StoreConfig {
        StoreConfig {
            data_dir: self.data_dir.clone(),
        }
    }

    pub fn access(&self) -> AccessConfig {
        AccessConfig {
            allowed_email_domain: self.email_domain.clone(),
            max_failed_admin_attempts: self.max_failed_admin_attempts,
            lockout_duration_secs: self.lockout_duration_secs,
            ..AccessConfig::default()
        }
    }
}
