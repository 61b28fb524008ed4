use anyhow::Result;
use tracing::info;

use crate::Database;
use crate::queries::{clear_all, insert_course, insert_message, insert_student, insert_user, link_course};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub messages: usize,
    pub students: usize,
    pub courses: usize,
}

/// Wipe all data and load the demo fixtures in one transaction.
pub fn run(db: &Database) -> Result<SeedSummary> {
    let summary = db.with_conn_mut(|conn| {
        let tx = conn.transaction()?;
        clear_all(&tx)?;

        let user1 = insert_user(&tx, "Anıl1", "Senocak1")?;
        let user2 = insert_user(&tx, "Anıl2", "Senocak2")?;
        let user3 = insert_user(&tx, "Anıl3", "Senocak3")?;

        insert_message(&tx, &user1, &user2, "1to2-1")?;
        insert_message(&tx, &user1, &user2, "1to2-2")?;
        insert_message(&tx, &user1, &user2, "1to2-3")?;
        insert_message(&tx, &user2, &user3, "2to3-1")?;

        let course1 = insert_course(&tx, "Course1")?;
        let course2 = insert_course(&tx, "Course2")?;
        let course3 = insert_course(&tx, "Course3")?;

        let student1 = insert_student(&tx, "Student1")?;
        link_course(&tx, "course_like", &student1.id, &course1.id)?;
        link_course(&tx, "course_hate", &student1.id, &course1.id)?;

        let student2 = insert_student(&tx, "Student2")?;
        link_course(&tx, "course_like", &student2.id, &course1.id)?;
        link_course(&tx, "course_like", &student2.id, &course2.id)?;
        link_course(&tx, "course_hate", &student2.id, &course2.id)?;
        link_course(&tx, "course_hate", &student2.id, &course3.id)?;

        tx.commit()?;
        Ok(SeedSummary {
            users: 3,
            messages: 4,
            students: 2,
            courses: 3,
        })
    })?;

    info!(
        "Seeded {} users, {} messages, {} students, {} courses",
        summary.users, summary.messages, summary.students, summary.courses
    );
    Ok(summary)
}
