use std::collections::HashMap;

use crate::filter::{HATED, LIKED, MessageFilter, RECIPIENT, SENDER, StudentFilter};
use crate::mapping::{COURSE_NAME, MESSAGE_CONTENT, STUDENT_NAME, USER_FIRSTNAME, USER_LASTNAME};
use crate::models::{CourseRow, MessageRow, StudentRow, UserRow};
use crate::Database;
use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, Row, params, params_from_iter};
use tracing::debug;
use uuid::Uuid;

impl Database {
    // -- Users --

    pub fn create_user(&self, firstname: &str, lastname: &str) -> Result<UserRow> {
        self.with_conn(|conn| insert_user(conn, firstname, lastname))
    }

    pub fn list_users(&self) -> Result<Vec<UserRow>> {
        self.with_conn(query_users)
    }

    /// Delete a user; messages sent or received by them go with it.
    /// Returns false when no such user exists.
    pub fn delete_user(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
            Ok(n > 0)
        })
    }

    // -- Messages --

    pub fn create_message(&self, from: &UserRow, to: &UserRow, content: &str) -> Result<MessageRow> {
        self.with_conn(|conn| insert_message(conn, from, to, content))
    }

    pub fn search_messages(&self, filter: &MessageFilter) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| query_messages(conn, filter))
    }

    // -- Students & courses --

    pub fn create_student(&self, name: &str) -> Result<StudentRow> {
        self.with_conn(|conn| insert_student(conn, name))
    }

    pub fn create_course(&self, name: &str) -> Result<CourseRow> {
        self.with_conn(|conn| insert_course(conn, name))
    }

    pub fn like_course(&self, student_id: &str, course_id: &str) -> Result<()> {
        self.with_conn(|conn| link_course(conn, "course_like", student_id, course_id))
    }

    pub fn hate_course(&self, student_id: &str, course_id: &str) -> Result<()> {
        self.with_conn(|conn| link_course(conn, "course_hate", student_id, course_id))
    }

    pub fn search_students(&self, filter: &StudentFilter) -> Result<Vec<StudentRow>> {
        self.with_conn(|conn| query_students(conn, filter))
    }

    pub fn list_courses(&self) -> Result<Vec<CourseRow>> {
        self.with_conn(query_courses)
    }

    /// Remove every row from every table.
    pub fn clear(&self) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            clear_all(&tx)?;
            tx.commit()?;
            Ok(())
        })
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn clear_all(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        DELETE FROM course_like;
        DELETE FROM course_hate;
        DELETE FROM messages;
        DELETE FROM users;
        DELETE FROM student;
        DELETE FROM course;
        ",
    )?;
    Ok(())
}

pub(crate) fn insert_user(conn: &Connection, firstname: &str, lastname: &str) -> Result<UserRow> {
    let user = UserRow {
        id: new_id(),
        firstname: firstname.to_string(),
        lastname: lastname.to_string(),
        created_at: now(),
    };

    conn.execute(
        &format!(
            "INSERT INTO users (id, firstname, lastname, created_at) VALUES (?1, {}, {}, ?4)",
            USER_FIRSTNAME.write("?2"),
            USER_LASTNAME.write("?3"),
        ),
        params![user.id, user.firstname, user.lastname, user.created_at],
    )?;

    Ok(user)
}

pub(crate) fn insert_message(
    conn: &Connection,
    from: &UserRow,
    to: &UserRow,
    content: &str,
) -> Result<MessageRow> {
    let message = MessageRow {
        id: new_id(),
        from: from.clone(),
        to: to.clone(),
        content: content.to_string(),
        created_at: now(),
    };

    conn.execute(
        &format!(
            "INSERT INTO messages (id, user_from_id, user_to_id, content, created_at)
             VALUES (?1, ?2, ?3, {}, ?5)",
            MESSAGE_CONTENT.write("?4"),
        ),
        params![message.id, from.id, to.id, message.content, message.created_at],
    )?;

    Ok(message)
}

pub(crate) fn insert_student(conn: &Connection, name: &str) -> Result<StudentRow> {
    let (id, created_at) = insert_named(conn, "student", STUDENT_NAME.write("?2"), name)?;
    Ok(StudentRow {
        id,
        name: name.to_string(),
        created_at,
    })
}

pub(crate) fn insert_course(conn: &Connection, name: &str) -> Result<CourseRow> {
    let (id, created_at) = insert_named(conn, "course", COURSE_NAME.write("?2"), name)?;
    Ok(CourseRow {
        id,
        name: name.to_string(),
        created_at,
        likes: vec![],
    })
}

/// student and course share the (id, name, created_at) shape.
/// Returns the assigned id and creation timestamp.
fn insert_named(conn: &Connection, table: &str, name_expr: String, name: &str) -> Result<(String, String)> {
    let id = new_id();
    let created_at = now();

    conn.execute(
        &format!("INSERT INTO {} (id, name, created_at) VALUES (?1, {}, ?3)", table, name_expr),
        params![id, name, created_at],
    )?;

    Ok((id, created_at))
}

pub(crate) fn link_course(conn: &Connection, table: &str, student_id: &str, course_id: &str) -> Result<()> {
    conn.execute(
        &format!("INSERT OR IGNORE INTO {} (student_id, course_id) VALUES (?1, ?2)", table),
        params![student_id, course_id],
    )?;
    Ok(())
}

fn user_select(alias: &str) -> String {
    format!(
        "{a}.id, {}, {}, {a}.created_at",
        USER_FIRSTNAME.read(alias),
        USER_LASTNAME.read(alias),
        a = alias,
    )
}

/// Map four consecutive columns starting at `base` to a user.
fn user_at(row: &Row<'_>, base: usize) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(base)?,
        firstname: row.get(base + 1)?,
        lastname: row.get(base + 2)?,
        created_at: row.get(base + 3)?,
    })
}

fn student_at(row: &Row<'_>, base: usize) -> rusqlite::Result<StudentRow> {
    Ok(StudentRow {
        id: row.get(base)?,
        name: row.get(base + 1)?,
        created_at: row.get(base + 2)?,
    })
}

fn query_users(conn: &Connection) -> Result<Vec<UserRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM users u ORDER BY u.created_at, u.rowid",
        user_select("u")
    ))?;

    let rows = stmt
        .query_map([], |row| user_at(row, 0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_messages(conn: &Connection, filter: &MessageFilter) -> Result<Vec<MessageRow>> {
    let restriction = filter.specification().to_restriction();
    debug!("Message search restriction: {:?}", restriction);

    let sql = format!(
        "SELECT DISTINCT m.id, {content}, m.created_at, {sender}, {recipient}
         FROM messages m
         LEFT JOIN users {s} ON {s}.id = m.user_from_id
         LEFT JOIN users {r} ON {r}.id = m.user_to_id{where_clause}
         ORDER BY m.created_at, m.id",
        content = MESSAGE_CONTENT.read("m"),
        sender = user_select(SENDER),
        recipient = user_select(RECIPIENT),
        s = SENDER,
        r = RECIPIENT,
        where_clause = restriction.where_clause(),
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(restriction.params.iter()), |row| {
            Ok(MessageRow {
                id: row.get(0)?,
                content: row.get(1)?,
                created_at: row.get(2)?,
                from: user_at(row, 3)?,
                to: user_at(row, 7)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_students(conn: &Connection, filter: &StudentFilter) -> Result<Vec<StudentRow>> {
    let restriction = filter.specification().to_restriction();
    debug!("Student search restriction: {:?}", restriction);

    // DISTINCT: the two many-to-many joins multiply each student row.
    let sql = format!(
        "SELECT DISTINCT s.id, {name}, s.created_at
         FROM student s
         LEFT JOIN course_like cl ON cl.student_id = s.id
         LEFT JOIN course {l} ON {l}.id = cl.course_id
         LEFT JOIN course_hate ch ON ch.student_id = s.id
         LEFT JOIN course {h} ON {h}.id = ch.course_id{where_clause}
         ORDER BY s.created_at, s.id",
        name = STUDENT_NAME.read("s"),
        l = LIKED,
        h = HATED,
        where_clause = restriction.where_clause(),
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(restriction.params.iter()), |row| student_at(row, 0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_courses(conn: &Connection) -> Result<Vec<CourseRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT c.id, {}, c.created_at FROM course c ORDER BY c.created_at, c.rowid",
        COURSE_NAME.read("c")
    ))?;
    let mut courses = stmt
        .query_map([], |row| {
            Ok(CourseRow {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: row.get(2)?,
                likes: vec![],
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    // Batch-fetch the like back-reference for all courses at once.
    let mut stmt = conn.prepare(&format!(
        "SELECT cl.course_id, s.id, {}, s.created_at
         FROM course_like cl
         JOIN student s ON s.id = cl.student_id
         ORDER BY s.created_at, s.rowid",
        STUDENT_NAME.read("s")
    ))?;
    let mut likes: HashMap<String, Vec<StudentRow>> = HashMap::new();
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, student_at(row, 1)?)))?;
    for row in rows {
        let (course_id, student) = row?;
        likes.entry(course_id).or_default().push(student);
    }

    for course in &mut courses {
        course.likes = likes.remove(&course.id).unwrap_or_default();
    }

    Ok(courses)
}
