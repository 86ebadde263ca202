use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;

use crate::{model::presence::RosterSnapshot, utils::response::Metadata, AppState};

#[derive(Serialize)]
struct RosterResponse {
    teachers: RosterSnapshot,
    #[serde(rename = "_metadata")]
    metadata: Metadata,
}

pub async fn get(State(state): State<AppState>) -> impl IntoResponse {
    let teachers = state.presence.lock().await.snapshot();
    Json(RosterResponse {
        metadata: Metadata {
            total_count: Some(teachers.len() as i64),
            ..Default::default()
        },
        teachers,
    })
}
