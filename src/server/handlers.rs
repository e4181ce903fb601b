use super::types::{ErrorResponse, PlanRequest, PlanResponse, ScheduleRequest};
use crate::{
    Error,
    planner::{DayPlanner, ScheduleBrief},
};
use axum::{
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Json},
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

const INDEX_HTML: &str = include_str!("../../templates/index.html");
const SCRIPT_JS: &str = include_str!("../../static/js/script.js");

#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<DayPlanner>,
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        SCRIPT_JS,
    )
}

pub async fn plan_my_day(
    State(state): State<AppState>,
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> Result<Json<PlanResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request_id = Uuid::new_v4();

    let Json(request) =
        payload.map_err(|rejection| error_response(request_id, rejected(rejection)))?;

    info!(
        %request_id,
        "Received plan request with {} characters of input",
        request.input.chars().count()
    );

    match state.planner.plan(&request.input).await {
        Ok(output) => {
            info!(%request_id, "Successfully planned request");
            Ok(Json(PlanResponse { output }))
        }
        Err(e) => Err(error_response(request_id, e)),
    }
}

pub async fn chat_api(
    State(state): State<AppState>,
    payload: Result<Json<ScheduleRequest>, JsonRejection>,
) -> Result<Json<Value>, (StatusCode, Json<ErrorResponse>)> {
    let request_id = Uuid::new_v4();

    let Json(request) =
        payload.map_err(|rejection| error_response(request_id, rejected(rejection)))?;

    let Some(tasks) = request.tasks.as_deref() else {
        return Err(error_response(
            request_id,
            Error::invalid_input("Missing tasks in the request body."),
        ));
    };

    let brief = match request.existing_schedule.as_ref() {
        Some(existing) if !existing.is_null() => ScheduleBrief::Refine {
            existing,
            instruction: tasks,
        },
        _ => ScheduleBrief::Generate {
            time_range: request.time_range.as_deref(),
            tasks,
        },
    };

    info!(
        %request_id,
        refine = matches!(brief, ScheduleBrief::Refine { .. }),
        "Received schedule request"
    );

    match state.planner.schedule(&brief).await {
        Ok(schedule) => {
            info!(%request_id, "Successfully generated schedule");
            Ok(Json(schedule))
        }
        Err(e) => Err(error_response(request_id, e)),
    }
}

fn rejected(rejection: JsonRejection) -> Error {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge(rejection.body_text())
    } else {
        Error::invalid_input(rejection.body_text())
    }
}

fn error_response(request_id: Uuid, e: Error) -> (StatusCode, Json<ErrorResponse>) {
    let status = e.status_code();

    if e.is_client_error() {
        warn!(%request_id, "Rejected request: {}", e);
    } else {
        error!(%request_id, "Failed to process request: {}", e);
    }

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}
