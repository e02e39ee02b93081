pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_from_str, resolve_config, validate_config};
pub use schema::{Config, ConfigOverrides, LogConfig, LogFormat};
