//! Configuration file loading for orchestra
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `ORCHESTRA_<SECTION>__<KEY>`, e.g. `ORCHESTRA_AZURE_OPENAI__KEY`
//! 2. `--config <path>` specified file
//! 3. Project root: `./orchestra.toml` or `./.orchestra.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/orchestra/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAzureOpenAiConfig, FileConfig, FileHttpConfig, FileOutputConfig,
    FilePlannerConfig, FileWeatherstackConfig,
};
pub use loader::ConfigLoader;
