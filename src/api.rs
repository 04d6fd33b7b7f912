use std::time::{SystemTime, UNIX_EPOCH};

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::words::WordEntry;
use crate::AppState;

/// Number of candidate words offered for pre-round selection.
const WORDS_PER_PICK: usize = 3;

/// Common JSON envelope with request timing, shared by all endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub resp_start_time: i64,
    pub resp_end_time: i64,
    pub net_resp_time: i64,
    pub data: T,
}

impl<T> ApiResponse<T> {
    fn finish(start: i64, data: T) -> Self {
        let end = now_millis();
        Self {
            status_code: StatusCode::OK.as_u16(),
            resp_start_time: start,
            resp_end_time: end,
            net_resp_time: end - start,
            data,
        }
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Health-check endpoint.
pub async fn healthz() -> Json<ApiResponse<Value>> {
    let start = now_millis();
    Json(ApiResponse::finish(start, json!({ "status": "healthy" })))
}

/// Pick a few unique random words for a selection UI.
pub async fn get_random_words(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<WordEntry>>>, (StatusCode, String)> {
    let start = now_millis();
    let words = state
        .words
        .pick_unique(WORDS_PER_PICK)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(ApiResponse::finish(start, words)))
}
