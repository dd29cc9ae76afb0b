pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_from_str, BASE_URL_ENV};
pub use schema::{Config, HttpConfig, PollingConfig, StoreConfig};
