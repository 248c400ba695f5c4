//! Home-directory configuration and environment loading.
//!
//! Pure schema parsing lives in `domain::configuration`; this module only
//! locates files and reads the process environment.

mod load_config;
mod load_env;

pub use load_config::{CONFIG_FILE, config_dir, load_config, load_config_from};
pub use load_env::{api_key, load_dotenv};
