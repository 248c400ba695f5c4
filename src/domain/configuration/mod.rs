pub mod app_config;
pub mod loader;

pub use app_config::{ApiConfig, AppConfig, GenerationConfig};
pub use loader::parse_config_content;
