//! Configuration for the composition client.
//!
//! The document-service credential is env-provided only; it is never
//! embedded in source or in the checked-in configuration file.

use config::{Config as Cfg, File};
use secrecy::Secret;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub seller: SellerSettings,
    pub document_service: DocumentServiceSettings,
}

/// Seller jurisdiction settings for the intrastate/interstate tax split.
#[derive(Debug, Deserialize, Clone)]
pub struct SellerSettings {
    #[serde(default = "default_home_state")]
    pub home_state: String,
}

impl Default for SellerSettings {
    fn default() -> Self {
        Self {
            home_state: default_home_state(),
        }
    }
}

fn default_home_state() -> String {
    "BIHAR".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct DocumentServiceSettings {
    /// Base URL of the document service API.
    pub url: String,
    /// Bearer credential, supplied via `APP__DOCUMENT_SERVICE__API_TOKEN`.
    pub api_token: Secret<String>,
}

impl Settings {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_state_defaults_when_absent() {
        let settings: Settings = Cfg::builder()
            .set_override("document_service.url", "http://localhost:8000/api")
            .unwrap()
            .set_override("document_service.api_token", "test-token")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .expect("Failed to deserialize settings");

        assert_eq!(settings.seller.home_state, "BIHAR");
    }

    #[test]
    fn home_state_override_is_honored() {
        let settings: Settings = Cfg::builder()
            .set_override("seller.home_state", "Karnataka")
            .unwrap()
            .set_override("document_service.url", "http://localhost:8000/api")
            .unwrap()
            .set_override("document_service.api_token", "test-token")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .expect("Failed to deserialize settings");

        assert_eq!(settings.seller.home_state, "Karnataka");
    }
}
