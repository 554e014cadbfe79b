//! HTTP client configuration from TOML (`[http]` section)

use super::ConfigValidationError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw HTTP configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileHttpConfig {
    /// Per-request timeout shared by every adapter
    pub timeout_seconds: u64,
}

impl Default for FileHttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 60,
        }
    }
}

impl FileHttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn validate(&self) -> Vec<ConfigValidationError> {
        if self.timeout_seconds == 0 {
            vec![ConfigValidationError::ZeroValue("http.timeout_seconds")]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_timeout_rejected() {
        let config = FileHttpConfig { timeout_seconds: 0 };
        assert_eq!(
            config.validate(),
            vec![ConfigValidationError::ZeroValue("http.timeout_seconds")]
        );
        assert_eq!(FileHttpConfig::default().timeout(), Duration::from_secs(60));
    }
}
