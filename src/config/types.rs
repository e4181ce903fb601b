use crate::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default)]
    pub key_tier: KeyTier,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Filled from the environment by `config::load`, never from YAML.
    #[serde(skip)]
    pub api_keys: ApiKeys,
}

/// Settings for the JSON schedule generator behind `/chat-api`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_schedule_model")]
    pub model: String,
    #[serde(default = "default_schedule_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_time_range")]
    pub default_time_range: String,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Which of the two provisioned API keys authorises outbound calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyTier {
    #[default]
    Paid,
    Free,
}

#[derive(Clone, Default)]
pub struct ApiKeys {
    pub paid: Option<String>,
    pub free: Option<String>,
}

// Keep secrets out of debug logs.
impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys")
            .field("paid", &self.paid.as_ref().map(|_| "<redacted>"))
            .field("free", &self.free.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl KeyTier {
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::Paid => "PAID_API_KEY",
            Self::Free => "FREE_API_KEY",
        }
    }
}

impl LlmConfig {
    /// Returns the key selected by `key_tier`, failing if it was not provided.
    pub fn active_api_key(&self) -> Result<&str> {
        let key = match self.key_tier {
            KeyTier::Paid => self.api_keys.paid.as_deref(),
            KeyTier::Free => self.api_keys.free.as_deref(),
        };

        match key.map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(Error::config(format!(
                "{} is not set but key_tier is '{:?}'",
                self.key_tier.env_var(),
                self.key_tier
            ))),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            system_prompt: default_system_prompt(),
            key_tier: KeyTier::default(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_input_chars: default_max_input_chars(),
            schedule: ScheduleConfig::default(),
            api_keys: ApiKeys::default(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            model: default_schedule_model(),
            system_prompt: default_schedule_system_prompt(),
            default_time_range: default_time_range(),
            max_tokens: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logs: LogsConfig::default(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_max_tokens() -> u32 {
    100
}

fn default_system_prompt() -> String {
    "You are PlanMyDayGPT.".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_input_chars() -> usize {
    4000
}

fn default_schedule_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_schedule_system_prompt() -> String {
    "You are a silent, efficient JSON-only schedule generator.
You will be given a time range (e.g., \"8am-10pm\") and a list of tasks.
Your ONLY job is to create a schedule for that exact time range, including the user's tasks and creatively filling any empty gaps with logical activities (like 'Lunch', 'Work Block', 'Break').

CRITICAL RULES:
- Your entire output MUST be a single, valid JSON object.
- Do NOT include any text, greetings, explanations, or markdown formatting.
- The JSON object must have a \"date\" (YYYY-MM-DD) and an \"events\" array.
- Each event in the array must have an \"id\", \"title\", \"startTime\" (HH:mm), \"endTime\" (HH:mm), and a \"description\".
- Adhere strictly to the provided time range."
        .to_string()
}

fn default_time_range() -> String {
    "9am-10pm".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}
