use crate::error::VoiceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

fn default_token_ttl_seconds() -> u64 {
    8 * 60 * 60
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LiveKitConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default, skip_serializing)]
    pub api_secret: String,
    /// JWT token TTL in seconds for LiveKit join tokens. Default: 28800 (8 hours).
    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: u64,
}

impl Default for LiveKitConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            token_ttl_seconds: default_token_ttl_seconds(),
        }
    }
}

impl fmt::Debug for LiveKitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveKitConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

impl LiveKitConfig {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            token_ttl_seconds: default_token_ttl_seconds(),
        }
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_seconds)
    }

    /// Checks that the key pair needed for signing is present.
    pub fn require_credentials(&self) -> Result<(), VoiceError> {
        if self.api_key.trim().is_empty() {
            return Err(VoiceError::Config("LiveKit API key is not set".to_string()));
        }
        if self.api_secret.trim().is_empty() {
            return Err(VoiceError::Config(
                "LiveKit API secret is not set".to_string(),
            ));
        }
        if self.token_ttl_seconds == 0 {
            return Err(VoiceError::Config(
                "token TTL must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Checks credentials plus the server URL needed for Room Service calls.
    pub fn require_service(&self) -> Result<(), VoiceError> {
        if self.url.trim().is_empty() {
            return Err(VoiceError::Config("LiveKit URL is not set".to_string()));
        }
        self.require_credentials()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ttl_is_eight_hours() {
        assert_eq!(LiveKitConfig::default().token_ttl(), Duration::from_secs(28_800));
    }

    #[test]
    fn debug_redacts_secret() {
        let config = LiveKitConfig::new("ws://localhost:7880", "key", "hunter2");
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn missing_secret_is_a_config_error() {
        let config = LiveKitConfig::new("ws://localhost:7880", "key", "");
        assert!(matches!(
            config.require_credentials(),
            Err(VoiceError::Config(msg)) if msg.contains("secret")
        ));
    }

    #[test]
    fn service_calls_need_a_url() {
        let config = LiveKitConfig::new("", "key", "secret");
        assert!(config.require_credentials().is_ok());
        assert!(matches!(config.require_service(), Err(VoiceError::Config(_))));
    }
}
