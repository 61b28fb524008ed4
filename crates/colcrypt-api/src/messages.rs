use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use colcrypt_db::filter::MessageFilter;
use colcrypt_types::api::MessageQuery;

use crate::{AppState, convert, with_db};

/// Messages whose sender or recipient matches every given name filter.
pub async fn get_messages(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let filter = MessageFilter {
        firstname: query.firstname,
        lastname: query.lastname,
    };

    let rows = with_db(&state, "Message search", move |db| db.search_messages(&filter)).await?;
    Ok(Json(rows.into_iter().map(convert::message).collect::<Vec<_>>()))
}
