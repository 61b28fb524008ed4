/// Database row types, holding plaintext already decrypted by the column
/// transforms. Distinct from colcrypt-types API models to keep the DB layer
/// independent.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRow {
    pub id: String,
    pub from: UserRow,
    pub to: UserRow,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRow {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRow {
    pub id: String,
    pub name: String,
    pub created_at: String,
    /// Students that like this course.
    pub likes: Vec<StudentRow>,
}
