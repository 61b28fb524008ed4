//! Encrypted column declarations.
//!
//! Each encrypted attribute is stored as an opaque BLOB. Queries never name
//! such a column directly: they go through [`EncryptedColumn::read`] on the
//! way out and [`EncryptedColumn::write`] on the way in, which wrap the
//! column in the SQL functions from [`crate::functions`].

use crate::functions::{FOLD_CASE, SYM_DECRYPT, SYM_ENCRYPT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncryptedColumn {
    pub table: &'static str,
    pub column: &'static str,
}

impl EncryptedColumn {
    pub const fn new(table: &'static str, column: &'static str) -> Self {
        Self { table, column }
    }

    /// Decrypting read expression for the column under `alias`.
    pub fn read(&self, alias: &str) -> String {
        format!("{}({}.{})", SYM_DECRYPT, alias, self.column)
    }

    /// Encrypting write expression around a bound parameter such as `?2`.
    pub fn write(&self, placeholder: &str) -> String {
        format!("{}({})", SYM_ENCRYPT, placeholder)
    }

    /// Case-folded plaintext, the form used for searching.
    pub fn folded(&self, alias: &str) -> String {
        format!("{}({})", FOLD_CASE, self.read(alias))
    }
}

pub const USER_FIRSTNAME: EncryptedColumn = EncryptedColumn::new("users", "firstname");
pub const USER_LASTNAME: EncryptedColumn = EncryptedColumn::new("users", "lastname");
pub const MESSAGE_CONTENT: EncryptedColumn = EncryptedColumn::new("messages", "content");
pub const STUDENT_NAME: EncryptedColumn = EncryptedColumn::new("student", "name");
pub const COURSE_NAME: EncryptedColumn = EncryptedColumn::new("course", "name");

pub const ALL: [EncryptedColumn; 5] = [
    USER_FIRSTNAME,
    USER_LASTNAME,
    MESSAGE_CONTENT,
    STUDENT_NAME,
    COURSE_NAME,
];
