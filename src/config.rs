use std::env;

const DEFAULT_MODEL: &str = "gpt-4";
const DEFAULT_API_BASE_URL: &str = "https://api.openai.com";

/// Runtime settings for the chat request. The defaults are the production
/// endpoint and model; the env overrides exist for tests and local
/// gateways.
#[derive(Debug, Clone)]
pub struct Config {
    pub model: String,
    pub api_base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_env_with(|key| env::var(key).ok())
    }

    fn from_env_with(mut get_var: impl FnMut(&str) -> Option<String>) -> Self {
        Self {
            model: non_empty(get_var("CLAI_MODEL")).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base_url: non_empty(get_var("CLAI_API_BASE_URL"))
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        }
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
