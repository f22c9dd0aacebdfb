//! Messenger deep-link configuration
//!
//! The result screen offers a consultation hand-off as a WhatsApp deep
//! link. This is pure string templating over the lead's result; there is
//! no protocol handshake behind it.

use serde::{Deserialize, Serialize};
use std::path::Path;

use funnel_core::RiskCategory;

use crate::constants::messaging;
use crate::ConfigError;

/// Messaging configuration loaded from messaging.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// Destination phone in international format, digits only
    #[serde(default = "default_whatsapp_phone")]
    pub whatsapp_phone: String,

    /// Message template; `{name}`, `{score}`, and `{category}` are
    /// substituted
    #[serde(default = "default_share_template")]
    pub share_template: String,
}

fn default_whatsapp_phone() -> String {
    messaging::WHATSAPP_PHONE.to_string()
}

fn default_share_template() -> String {
    messaging::SHARE_TEMPLATE.to_string()
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            whatsapp_phone: default_whatsapp_phone(),
            share_template: default_share_template(),
        }
    }
}

impl MessagingConfig {
    /// Load from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Build the deep link for a completed assessment
    pub fn share_link(&self, name: &str, score: u32, category: RiskCategory) -> String {
        let message = self
            .share_template
            .replace("{name}", name)
            .replace("{score}", &score.to_string())
            .replace("{category}", category.display_name());

        format!(
            "https://wa.me/{}?text={}",
            self.whatsapp_phone,
            urlencoding::encode(&message)
        )
    }
}
