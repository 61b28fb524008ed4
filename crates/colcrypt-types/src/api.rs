use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- Query parameters --

/// `GET /messages` filters. Every field is optional; empty means absent.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

/// `GET /students` filter on liked/hated course name.
#[derive(Debug, Default, Deserialize)]
pub struct StudentQuery {
    pub name: Option<String>,
}

// -- Responses --
// Field values are plaintext: decryption happens in the storage layer.

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: Uuid,
    pub from: UserResponse,
    pub to: UserResponse,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Course sets are deliberately not serialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Students that like this course.
    pub likes: Vec<StudentResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn responses_use_camel_case() {
        let user = UserResponse {
            id: Uuid::nil(),
            firstname: "Anıl1".into(),
            lastname: "Senocak1".into(),
            created_at: DateTime::default(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["firstname"], "Anıl1");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn query_fields_are_optional() {
        let q: MessageQuery = serde_json::from_str("{}").unwrap();
        assert!(q.firstname.is_none() && q.lastname.is_none());
    }
}
