//! Weatherstack current-weather source
//!
//! `GET {base_url}/current?query=<city>&access_key=<key>`. The raw JSON body
//! is handed to the caller untouched; only failures are interpreted.

use async_trait::async_trait;
use orchestra_application::{WeatherServiceError, WeatherSource};
use serde_json::Value;
use std::fmt;
use tracing::debug;

pub struct WeatherstackSource {
    http: reqwest::Client,
    base_url: String,
    access_key: String,
}

impl WeatherstackSource {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        access_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_key: access_key.into(),
        }
    }

    fn current_url(&self) -> String {
        format!("{}/current", self.base_url)
    }
}

impl fmt::Debug for WeatherstackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherstackSource")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Reject payloads that report an API failure with a 2xx status.
///
/// Weatherstack answers errors such as an invalid key or an unknown city
/// with `{"success": false, "error": {"code": .., "info": ..}}`.
pub fn check_payload(body: &str) -> Result<(), WeatherServiceError> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return Ok(());
    };
    if value.get("success").and_then(Value::as_bool) != Some(false) {
        return Ok(());
    }

    let error = value.get("error");
    let code = error
        .and_then(|e| e.get("code"))
        .and_then(Value::as_i64)
        .unwrap_or_default();
    let info = error
        .and_then(|e| e.get("info").or_else(|| e.get("type")))
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
        .to_string();
    Err(WeatherServiceError::Api { code, info })
}

#[async_trait]
impl WeatherSource for WeatherstackSource {
    async fn current(&self, city: &str) -> Result<String, WeatherServiceError> {
        debug!("Fetching current weather for {}", city);

        let response = self
            .http
            .get(self.current_url())
            .query(&[("query", city), ("access_key", self.access_key.as_str())])
            .send()
            .await
            .map_err(|e| WeatherServiceError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WeatherServiceError::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            return Err(WeatherServiceError::Status {
                code: status.as_u16(),
                body,
            });
        }

        check_payload(&body)?;
        Ok(body)
    }
}
