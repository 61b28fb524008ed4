use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use colcrypt_db::filter::StudentFilter;
use colcrypt_types::api::StudentQuery;

use crate::{AppState, convert, with_db};

/// Students with a liked or hated course whose name contains `name`.
pub async fn get_students(
    State(state): State<AppState>,
    Query(query): Query<StudentQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let filter = StudentFilter { name: query.name };

    let rows = with_db(&state, "Student search", move |db| db.search_students(&filter)).await?;
    Ok(Json(rows.into_iter().map(convert::student).collect::<Vec<_>>()))
}

pub async fn get_courses(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let rows = with_db(&state, "Course listing", |db| db.list_courses()).await?;
    Ok(Json(rows.into_iter().map(convert::course).collect::<Vec<_>>()))
}
