//! Row → response conversion. Stored ids and timestamps are produced by the
//! storage layer, so a parse failure means corruption: it is logged and
//! replaced with a default rather than failing the whole listing.

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use colcrypt_db::models::{CourseRow, MessageRow, StudentRow, UserRow};
use colcrypt_types::api::{CourseResponse, MessageResponse, StudentResponse, UserResponse};

fn parse_id(raw: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt id '{}': {}", raw, e);
        Uuid::default()
    })
}

fn parse_timestamp(raw: &str, id: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on '{}': {}", raw, id, e);
            DateTime::default()
        })
}

pub fn user(row: UserRow) -> UserResponse {
    UserResponse {
        id: parse_id(&row.id),
        created_at: parse_timestamp(&row.created_at, &row.id),
        firstname: row.firstname,
        lastname: row.lastname,
    }
}

pub fn message(row: MessageRow) -> MessageResponse {
    MessageResponse {
        id: parse_id(&row.id),
        created_at: parse_timestamp(&row.created_at, &row.id),
        from: user(row.from),
        to: user(row.to),
        content: row.content,
    }
}

pub fn student(row: StudentRow) -> StudentResponse {
    StudentResponse {
        id: parse_id(&row.id),
        created_at: parse_timestamp(&row.created_at, &row.id),
        name: row.name,
    }
}

pub fn course(row: CourseRow) -> CourseResponse {
    CourseResponse {
        id: parse_id(&row.id),
        created_at: parse_timestamp(&row.created_at, &row.id),
        name: row.name,
        likes: row.likes.into_iter().map(student).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_valid_row() {
        let id = Uuid::new_v4();
        let out = user(UserRow {
            id: id.to_string(),
            firstname: "Anıl1".into(),
            lastname: "Senocak1".into(),
            created_at: "2024-05-01T10:20:30.123456Z".into(),
        });
        assert_eq!(out.id, id);
        assert_eq!(out.created_at.timestamp(), 1714558830);
    }

    #[test]
    fn corrupt_fields_fall_back_to_defaults() {
        let out = student(StudentRow {
            id: "not-a-uuid".into(),
            name: "Student1".into(),
            created_at: "yesterday".into(),
        });
        assert_eq!(out.id, Uuid::nil());
        assert_eq!(out.created_at, DateTime::<Utc>::default());
        assert_eq!(out.name, "Student1");
    }
}
