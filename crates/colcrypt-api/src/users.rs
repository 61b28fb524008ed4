use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{AppState, convert, with_db};

pub async fn get_users(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let rows = with_db(&state, "User listing", |db| db.list_users()).await?;
    Ok(Json(rows.into_iter().map(convert::user).collect::<Vec<_>>()))
}
