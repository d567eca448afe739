//! Application configuration

mod app_config;

pub use app_config::{
    AccountsConfig, AppConfig, LogFormat, LoggingConfig, SearchConfig, StorageBackend,
    StorageConfig, DEFAULT_ROLE_ID,
};
