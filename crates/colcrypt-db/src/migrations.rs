use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id          TEXT PRIMARY KEY,
                firstname   BLOB NOT NULL,
                lastname    BLOB NOT NULL,
                created_at  TEXT NOT NULL
            );

            CREATE TABLE messages (
                id              TEXT PRIMARY KEY,
                user_from_id    TEXT NOT NULL
                    CONSTRAINT fk_user_message_user_from_id REFERENCES users(id) ON DELETE CASCADE,
                user_to_id      TEXT NOT NULL
                    CONSTRAINT fk_user_message_user_to_id REFERENCES users(id) ON DELETE CASCADE,
                content         BLOB NOT NULL,
                created_at      TEXT NOT NULL
            );

            CREATE INDEX idx_messages_from ON messages(user_from_id);
            CREATE INDEX idx_messages_to ON messages(user_to_id);

            CREATE TABLE student (
                id          TEXT PRIMARY KEY,
                name        BLOB NOT NULL,
                created_at  TEXT NOT NULL
            );

            CREATE TABLE course (
                id          TEXT PRIMARY KEY,
                name        BLOB NOT NULL,
                created_at  TEXT NOT NULL
            );

            CREATE TABLE course_like (
                student_id  TEXT NOT NULL REFERENCES student(id) ON DELETE CASCADE,
                course_id   TEXT NOT NULL REFERENCES course(id) ON DELETE CASCADE,
                PRIMARY KEY (student_id, course_id)
            );

            CREATE TABLE course_hate (
                student_id  TEXT NOT NULL REFERENCES student(id) ON DELETE CASCADE,
                course_id   TEXT NOT NULL REFERENCES course(id) ON DELETE CASCADE,
                PRIMARY KEY (student_id, course_id)
            );

            CREATE INDEX idx_course_like_course ON course_like(course_id);
            CREATE INDEX idx_course_hate_course ON course_hate(course_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
