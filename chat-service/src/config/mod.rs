use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Default Gemini model; fast enough for interactive chat.
const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// `None` when `GEMINI_API_KEY` is absent. The server still starts;
    /// the relay answers every chat call with the not-initialized error
    /// until the key is configured.
    pub api_key: Option<Secret<String>>,
    pub model: String,
}

impl ChatConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(Secret::new);

        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_TEXT_MODEL.to_string());

        Ok(ChatConfig {
            common,
            gemini: GeminiSettings { api_key, model },
        })
    }
}
