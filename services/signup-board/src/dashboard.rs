//! Web dashboard serving the rendered board and the patch endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;

use crate::render;
use crate::status::{StatusKind, StatusMessage};
use crate::synchronizer::{removal_alert, ViewSynchronizer};
use crate::view::SignupForm as SubmittedForm;
use crate::BoardError;

/// Dashboard application state
#[derive(Clone)]
pub struct DashboardState {
    pub sync: Arc<ViewSynchronizer>,
}

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub activity: String,
}

#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    pub activity: String,
    pub email: String,
}

/// Build the dashboard axum router
pub fn build_router(sync: Arc<ViewSynchronizer>) -> Router {
    let dashboard_state = DashboardState { sync };

    Router::new()
        .route("/", get(index_handler))
        .route("/api/board", get(board_handler))
        .route("/api/signup", post(signup_handler))
        .route("/api/remove", post(remove_handler))
        .route("/health", get(health_handler))
        .with_state(dashboard_state)
}

async fn index_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let board = dashboard.sync.board().read().await;
    Html(render::render_page(&board, dashboard.sync.hide_after_ms()))
}

async fn board_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let board = dashboard.sync.board().read().await;
    Json(board.clone())
}

async fn signup_handler(
    State(dashboard): State<DashboardState>,
    Form(form): Form<SignupForm>,
) -> impl IntoResponse {
    let sync = &dashboard.sync;
    match sync.submit_signup(&form.email, &form.activity).await {
        Ok(outcome) => {
            let card_html = sync.card_html(&form.activity).await;
            let status_html = render::render_status(&outcome.status);
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "activity": form.activity,
                    "status": outcome.status,
                    "status_html": status_html,
                    "card_html": card_html,
                    "form": outcome.form,
                    "hide_after_ms": sync.hide_after_ms(),
                })),
            )
        }
        Err(e) => {
            // Refused before reaching the backend; only this submitter sees it
            let status = StatusMessage::Visible {
                kind: StatusKind::Error,
                text: e.to_string(),
            };
            let status_html = render::render_status(&status);
            (
                refusal_status(&e),
                Json(serde_json::json!({
                    "activity": form.activity,
                    "error": e.to_string(),
                    "status": status,
                    "status_html": status_html,
                    "form": SubmittedForm::new(&form.email, &form.activity),
                    "hide_after_ms": sync.hide_after_ms(),
                })),
            )
        }
    }
}

async fn remove_handler(
    State(dashboard): State<DashboardState>,
    Form(form): Form<RemoveForm>,
) -> impl IntoResponse {
    let sync = &dashboard.sync;
    match sync.remove_participant(&form.activity, &form.email).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "activity": form.activity,
                "card_html": sync.card_html(&form.activity).await,
            })),
        ),
        Err(e) => {
            let alert = match &e {
                BoardError::Busy(_)
                | BoardError::UnknownActivity(_)
                | BoardError::UnknownParticipant { .. } => e.to_string(),
                _ => removal_alert(&e),
            };
            (refusal_status(&e), Json(serde_json::json!({ "alert": alert })))
        }
    }
}

fn refusal_status(err: &BoardError) -> StatusCode {
    match err {
        BoardError::Busy(_) => StatusCode::CONFLICT,
        BoardError::UnknownActivity(_) | BoardError::UnknownParticipant { .. } => {
            StatusCode::NOT_FOUND
        }
        BoardError::Api { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        _ => StatusCode::BAD_GATEWAY,
    }
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}
