use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Redirect, Response};

use crate::errors::AppError;
use crate::services::calendar::{generate_ics, INVITE_FILENAME};
use crate::services::store::load_or_discard;
use crate::state::AppState;

pub async fn download_invite(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let Some(booking) = load_or_discard(state.store.as_ref())? else {
        return Ok(Redirect::to("/").into_response());
    };

    let ics = generate_ics(&booking, &state.config, chrono::Utc::now());

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{INVITE_FILENAME}\""),
            ),
        ],
        ics,
    )
        .into_response())
}
