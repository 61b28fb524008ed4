pub mod convert;
pub mod messages;
pub mod students;
pub mod users;

use std::sync::Arc;

use axum::{Router, http::StatusCode, routing::get};
use tracing::error;

use colcrypt_db::Database;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

/// All routes of the service, without transport layers.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/users", get(users::get_users))
        .route("/messages", get(messages::get_messages))
        .route("/students", get(students::get_students))
        .route("/courses", get(students::get_courses))
        .with_state(state)
}

/// Run a blocking DB call off the async runtime. Any failure, including a
/// column that will not decrypt, becomes a 500.
pub(crate) async fn with_db<F, T>(state: &AppState, what: &'static str, f: F) -> Result<T, StatusCode>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("{} failed: {:#}", what, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use colcrypt_crypto::ColumnCipher;
    use colcrypt_crypto::keys::generate_column_key;
    use colcrypt_types::api::{CourseResponse, MessageResponse, StudentResponse, UserResponse};
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    fn state() -> AppState {
        let db = Database::open_in_memory(ColumnCipher::new(&generate_column_key())).unwrap();
        colcrypt_db::seed::run(&db).unwrap();
        Arc::new(AppStateInner { db })
    }

    async fn get_json<T: DeserializeOwned>(state: &AppState, uri: &str) -> T {
        let response = routes(state.clone())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn contents(messages: &[MessageResponse]) -> Vec<&str> {
        let mut out: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        out.sort();
        out
    }

    #[tokio::test]
    async fn lists_users_in_plaintext() {
        let state = state();
        let users: Vec<UserResponse> = get_json(&state, "/users").await;

        let mut names: Vec<(&str, &str)> = users
            .iter()
            .map(|u| (u.firstname.as_str(), u.lastname.as_str()))
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![("Anıl1", "Senocak1"), ("Anıl2", "Senocak2"), ("Anıl3", "Senocak3")]
        );
    }

    #[tokio::test]
    async fn messages_filter_by_lastname() {
        let state = state();
        let all: Vec<MessageResponse> = get_json(&state, "/messages").await;
        let hits: Vec<MessageResponse> = get_json(&state, "/messages?lastname=SENOCAK2").await;
        assert_eq!(contents(&hits), contents(&all));
        assert_eq!(hits.len(), 4);
    }

    #[tokio::test]
    async fn messages_filter_by_both_names() {
        let state = state();
        // firstname=anıl1, percent-encoded
        let hits: Vec<MessageResponse> =
            get_json(&state, "/messages?firstname=an%C4%B1l1&lastname=senocak2").await;
        assert_eq!(contents(&hits), vec!["1to2-1", "1to2-2", "1to2-3"]);
        assert!(hits.iter().all(|m| m.from.firstname == "Anıl1" && m.to.firstname == "Anıl2"));
    }

    #[tokio::test]
    async fn ascii_and_turkish_spellings_match_alike() {
        let state = state();
        // firstname=anıl, percent-encoded
        let turkish: Vec<MessageResponse> = get_json(&state, "/messages?firstname=an%C4%B1l").await;
        let ascii: Vec<MessageResponse> = get_json(&state, "/messages?firstname=ANIL").await;
        assert_eq!(turkish.len(), 4);
        assert_eq!(contents(&ascii), contents(&turkish));
    }

    #[tokio::test]
    async fn empty_params_mean_no_filter() {
        let state = state();
        let hits: Vec<MessageResponse> = get_json(&state, "/messages?firstname=&lastname=").await;
        assert_eq!(hits.len(), 4);

        let none: Vec<MessageResponse> = get_json(&state, "/messages?firstname=zzz").await;
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn students_filter_by_course() {
        let state = state();
        let hits: Vec<StudentResponse> = get_json(&state, "/students?name=course2").await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Student2");

        let all: Vec<StudentResponse> = get_json(&state, "/students").await;
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn courses_include_likes() {
        let state = state();
        let courses: Vec<CourseResponse> = get_json(&state, "/courses").await;
        let course1 = courses.iter().find(|c| c.name == "Course1").unwrap();
        assert_eq!(course1.likes.len(), 2);
    }

    #[tokio::test]
    async fn undecryptable_data_is_internal_error() {
        let state = state();
        state
            .db
            .with_conn(|conn| {
                conn.execute("UPDATE users SET firstname = X'00'", [])?;
                Ok(())
            })
            .unwrap();

        for uri in ["/users", "/messages", "/messages?firstname=a"] {
            let response = routes(state.clone())
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
        }
    }
}
