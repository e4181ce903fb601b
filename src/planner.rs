use crate::{
    Error, Result,
    config::{LlmConfig, ScheduleConfig},
    llm::{ChatCompletionRequest, ChatMessage, LlmClient, OpenAiClient, ResponseFormat},
};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tracing::{debug, info, warn};

/// Turns a free-text request into a single chat completion and returns its trimmed text.
///
/// Holds no per-request state, so one instance is shared by every handler.
pub struct DayPlanner {
    llm_client: Arc<dyn LlmClient>,
    model: String,
    system_prompt: String,
    max_tokens: u32,
    request_timeout: Duration,
    max_input_chars: usize,
    schedule: ScheduleConfig,
}

/// What a schedule request asks for. A refinement carries the client's current
/// schedule, so nothing is kept between calls.
#[derive(Debug, Clone, Copy)]
pub enum ScheduleBrief<'a> {
    Generate {
        time_range: Option<&'a str>,
        tasks: &'a str,
    },
    Refine {
        existing: &'a Value,
        instruction: &'a str,
    },
}

impl DayPlanner {
    pub fn new(llm_client: Arc<dyn LlmClient>, config: &LlmConfig) -> Self {
        Self {
            llm_client,
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            max_tokens: config.max_tokens,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            max_input_chars: config.max_input_chars,
            schedule: config.schedule.clone(),
        }
    }

    /// Wires an OpenAI client authorised with the key selected by `config.key_tier`.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config.active_api_key()?;
        let llm_client = OpenAiClient::new(config, api_key)?;

        info!(
            "Day planner using model {} with {:?} key (max_tokens={}, timeout={}s)",
            config.model, config.key_tier, config.max_tokens, config.request_timeout_secs
        );

        Ok(Self::new(Arc::new(llm_client), config))
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn validate_input(&self, input: &str) -> Result<()> {
        self.validate_field("input", input)
    }

    fn validate_field(&self, field: &str, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(Error::invalid_input(format!("`{}` must not be empty", field)));
        }

        let chars = text.chars().count();
        if chars > self.max_input_chars {
            return Err(Error::invalid_input(format!(
                "`{}` is {} characters long, the limit is {}",
                field, chars, self.max_input_chars
            )));
        }

        Ok(())
    }

    /// The system persona followed by the user's text, verbatim.
    pub fn build_request(&self, input: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(self.system_prompt.clone()),
                ChatMessage::user(input),
            ],
            max_tokens: Some(self.max_tokens),
            response_format: None,
        }
    }

    /// The schedule generator persona followed by a generate or refine instruction.
    pub fn build_schedule_request(&self, brief: &ScheduleBrief<'_>) -> ChatCompletionRequest {
        let user_prompt = match *brief {
            ScheduleBrief::Generate { time_range, tasks } => {
                let time_range = time_range
                    .map(str::trim)
                    .filter(|range| !range.is_empty())
                    .unwrap_or(&self.schedule.default_time_range);
                format!(
                    "Generate a schedule for the time range \"{}\". The tasks to include are: \"{}\".",
                    time_range, tasks
                )
            }
            ScheduleBrief::Refine {
                existing,
                instruction,
            } => format!(
                "Refine the following schedule: {}. The user's new instruction is: \"{}\". Generate the complete, updated schedule.",
                existing, instruction
            ),
        };

        ChatCompletionRequest {
            model: self.schedule.model.clone(),
            messages: vec![
                ChatMessage::system(self.schedule.system_prompt.clone()),
                ChatMessage::user(user_prompt),
            ],
            max_tokens: self.schedule.max_tokens,
            response_format: Some(ResponseFormat::JsonObject),
        }
    }

    pub async fn plan(&self, input: &str) -> Result<String> {
        self.validate_input(input)?;

        self.complete(self.build_request(input)).await
    }

    /// Asks for a JSON schedule and returns it parsed. The model's reply must be
    /// an object with an `events` array.
    pub async fn schedule(&self, brief: &ScheduleBrief<'_>) -> Result<Value> {
        match *brief {
            ScheduleBrief::Generate { time_range, tasks } => {
                self.validate_field("tasks", tasks)?;
                if let Some(range) = time_range {
                    if range.chars().count() > self.max_input_chars {
                        return Err(Error::invalid_input(format!(
                            "`timeRange` is longer than {} characters",
                            self.max_input_chars
                        )));
                    }
                }
            }
            ScheduleBrief::Refine { instruction, .. } => {
                self.validate_field("tasks", instruction)?;
            }
        }

        let text = self.complete(self.build_schedule_request(brief)).await?;

        let schedule: Value = serde_json::from_str(&text).map_err(|e| {
            Error::upstream(format!("Completion service returned invalid JSON: {}", e))
        })?;

        if !schedule.get("events").is_some_and(Value::is_array) {
            return Err(Error::upstream(
                "Completion service returned a schedule without an `events` list",
            ));
        }

        Ok(schedule)
    }

    async fn complete(&self, request: ChatCompletionRequest) -> Result<String> {
        let response = tokio::time::timeout(
            self.request_timeout,
            self.llm_client.create_chat_completion(request),
        )
        .await
        .map_err(|_| {
            warn!("Completion call exceeded {:?}", self.request_timeout);
            Error::UpstreamTimeout(self.request_timeout)
        })??;

        if let Some(ref usage) = response.usage {
            debug!(
                "Completion {} used {} prompt + {} completion tokens",
                response.id, usage.prompt_tokens, usage.completion_tokens
            );
        }

        let text = response
            .first_text()
            .ok_or_else(|| Error::upstream("Completion service returned no choices"))?
            .trim();

        if text.is_empty() {
            return Err(Error::upstream("Completion service returned an empty message"));
        }

        Ok(text.to_string())
    }
}
