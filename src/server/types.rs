use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub input: String,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub output: String,
}

/// Body of `/chat-api`. `existingSchedule` switches from generating to refining.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    #[serde(default)]
    pub time_range: Option<String>,
    #[serde(default)]
    pub tasks: Option<String>,
    #[serde(default)]
    pub existing_schedule: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
