// config.rs

use bevy::prelude::*;

/// Chat proxy used when `CHAT_API_URL` is not set
pub const DEFAULT_CHAT_API_URL: &str = "http://localhost:8000/chat";
/// Multiplier applied to base positions when the graph is exploded
pub const DEFAULT_EXPLOSION_FACTOR: f32 = 3.0;

/// Runtime configuration, read once at startup
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub chat_api_url: String,
    pub explosion_factor: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            chat_api_url: DEFAULT_CHAT_API_URL.to_string(),
            explosion_factor: DEFAULT_EXPLOSION_FACTOR,
        }
    }
}

impl SceneConfig {
    /// Build from `CHAT_API_URL` and `NEURON_EXPLOSION_FACTOR`, falling back
    /// to defaults for missing or unusable values
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("CHAT_API_URL").ok(),
            std::env::var("NEURON_EXPLOSION_FACTOR").ok(),
        )
    }

    fn from_vars(chat_api_url: Option<String>, explosion_factor: Option<String>) -> Self {
        let mut config = SceneConfig::default();

        if let Some(url) = chat_api_url.filter(|url| !url.trim().is_empty()) {
            config.chat_api_url = url.trim().to_string();
        }

        if let Some(raw) = explosion_factor {
            match raw.trim().parse::<f32>() {
                Ok(factor) if factor.is_finite() && factor > 0.0 => config.explosion_factor = factor,
                _ => warn!(
                    "Ignoring NEURON_EXPLOSION_FACTOR={:?}, using {}",
                    raw, DEFAULT_EXPLOSION_FACTOR
                ),
            }
        }

        config
    }
}
