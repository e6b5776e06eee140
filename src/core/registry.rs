//! Student registry: barcode ID → student.

use crate::errors::{AppError, AppResult};
use crate::models::student::{Student, normalize_optional, validate_barcode, validate_name};
use rusqlite::{Connection, OptionalExtension, Row, params};

/// Result of [`Registry::upsert_mapping`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
}

pub struct Registry<'c> {
    conn: &'c Connection,
}

fn map_student(row: &Row) -> rusqlite::Result<Student> {
    Ok(Student {
        barcode_id: row.get("id")?,
        name: row.get("name")?,
        class_label: row.get("klass")?,
        roster_id: row.get("untis_student_id")?,
    })
}

fn is_primary_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

impl<'c> Registry<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Insert a new student. The primary key is the uniqueness check, so two
    /// concurrent registrations of one barcode end with one `DuplicateKey`.
    pub fn register(&self, barcode_id: &str, name: &str) -> AppResult<()> {
        let barcode_id = validate_barcode(barcode_id)?;
        let name = validate_name(name)?;

        match self.conn.execute(
            "INSERT INTO students (id, name) VALUES (?1, ?2)",
            params![barcode_id, name],
        ) {
            Ok(_) => {
                tracing::debug!(barcode = %barcode_id, "student registered");
                Ok(())
            }
            Err(e) if is_primary_key_violation(&e) => Err(AppError::DuplicateKey(barcode_id)),
            Err(e) => Err(e.into()),
        }
    }

    pub fn lookup(&self, barcode_id: &str) -> AppResult<Option<String>> {
        let name = self
            .conn
            .query_row(
                "SELECT name FROM students WHERE id = ?1",
                [barcode_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(name)
    }

    pub fn get(&self, barcode_id: &str) -> AppResult<Option<Student>> {
        let student = self
            .conn
            .query_row(
                "SELECT id, name, klass, untis_student_id FROM students WHERE id = ?1",
                [barcode_id],
                map_student,
            )
            .optional()?;
        Ok(student)
    }

    /// Returns the number of updated rows; 0 means the barcode is unknown.
    pub fn rename(&self, barcode_id: &str, new_name: &str) -> AppResult<usize> {
        let new_name = validate_name(new_name)?;
        let n = self.conn.execute(
            "UPDATE students SET name = ?1 WHERE id = ?2",
            params![new_name, barcode_id],
        )?;
        Ok(n)
    }

    /// Idempotent: removing an unknown barcode affects 0 rows and succeeds.
    pub fn remove(&self, barcode_id: &str) -> AppResult<usize> {
        let n = self
            .conn
            .execute("DELETE FROM students WHERE id = ?1", [barcode_id])?;
        Ok(n)
    }

    /// All students by name, barcode as tie-breaker.
    pub fn list_all(&self) -> AppResult<Vec<Student>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, klass, untis_student_id FROM students
             ORDER BY name ASC, id ASC",
        )?;

        let rows = stmt.query_map([], map_student)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// Insert or update a roster mapping. A `None` class or roster id keeps
    /// the value already stored for that barcode.
    pub fn upsert_mapping(
        &self,
        barcode_id: &str,
        name: &str,
        class_label: Option<&str>,
        roster_id: Option<&str>,
    ) -> AppResult<Upsert> {
        let barcode_id = validate_barcode(barcode_id)?;
        let name = validate_name(name)?;
        let class_label = normalize_optional(class_label);
        let roster_id = normalize_optional(roster_id);

        let existed = self.get(&barcode_id)?.is_some();

        self.conn.execute(
            "INSERT INTO students (id, name, klass, untis_student_id)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 klass = COALESCE(excluded.klass, students.klass),
                 untis_student_id = COALESCE(excluded.untis_student_id, students.untis_student_id)",
            params![barcode_id, name, class_label, roster_id],
        )?;

        Ok(if existed {
            Upsert::Updated
        } else {
            Upsert::Inserted
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::DbPool;

    #[test]
    fn lookup_never_crosses_keys() {
        let pool = DbPool::in_memory().unwrap();
        let reg = Registry::new(&pool.conn);
        reg.register("a", "Anna").unwrap();
        reg.register("b", "Bernd").unwrap();
        reg.register("ab", "Clara").unwrap();

        assert_eq!(reg.lookup("a").unwrap().as_deref(), Some("Anna"));
        assert_eq!(reg.lookup("b").unwrap().as_deref(), Some("Bernd"));
        assert_eq!(reg.lookup("ab").unwrap().as_deref(), Some("Clara"));
        assert_eq!(reg.lookup("A").unwrap(), None);
        assert_eq!(reg.lookup("c").unwrap(), None);
    }

    #[test]
    fn duplicate_registration_keeps_first_name() {
        let pool = DbPool::in_memory().unwrap();
        let reg = Registry::new(&pool.conn);
        reg.register("123", "Anna Muster").unwrap();

        let err = reg.register("123", "Someone Else").unwrap_err();
        assert!(matches!(err, AppError::DuplicateKey(ref b) if b == "123"));
        assert_eq!(reg.lookup("123").unwrap().as_deref(), Some("Anna Muster"));
    }

    #[test]
    fn register_rejects_blank_fields() {
        let pool = DbPool::in_memory().unwrap();
        let reg = Registry::new(&pool.conn);
        assert!(matches!(
            reg.register("  ", "Anna"),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            reg.register("1", " "),
            Err(AppError::InvalidInput(_))
        ));
        assert!(reg.list_all().unwrap().is_empty());
    }

    #[test]
    fn rename_reports_zero_rows_for_unknown_barcode() {
        let pool = DbPool::in_memory().unwrap();
        let reg = Registry::new(&pool.conn);
        reg.register("123", "Anna").unwrap();

        assert_eq!(reg.rename("123", "Anna Muster").unwrap(), 1);
        assert_eq!(reg.lookup("123").unwrap().as_deref(), Some("Anna Muster"));
        assert_eq!(reg.rename("999", "Nobody").unwrap(), 0);
    }

    #[test]
    fn remove_is_idempotent() {
        let pool = DbPool::in_memory().unwrap();
        let reg = Registry::new(&pool.conn);
        reg.register("123", "Anna").unwrap();

        assert_eq!(reg.remove("never-registered").unwrap(), 0);
        assert_eq!(reg.list_all().unwrap().len(), 1);
        assert_eq!(reg.remove("123").unwrap(), 1);
        assert_eq!(reg.remove("123").unwrap(), 0);
        assert!(reg.list_all().unwrap().is_empty());
    }

    #[test]
    fn list_all_sorted_by_name() {
        let pool = DbPool::in_memory().unwrap();
        let reg = Registry::new(&pool.conn);
        reg.register("3", "Clara").unwrap();
        reg.register("1", "Anna").unwrap();
        reg.register("2", "Bernd").unwrap();

        let names: Vec<String> = reg.list_all().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["Anna", "Bernd", "Clara"]);
    }

    #[test]
    fn upsert_mapping_inserts_then_updates_without_dropping_fields() {
        let pool = DbPool::in_memory().unwrap();
        let reg = Registry::new(&pool.conn);

        let first = reg
            .upsert_mapping("555", "Anna Muster", Some("5a"), Some("4711"))
            .unwrap();
        assert_eq!(first, Upsert::Inserted);

        let second = reg.upsert_mapping("555", "Anna M.", None, None).unwrap();
        assert_eq!(second, Upsert::Updated);

        let s = reg.get("555").unwrap().unwrap();
        assert_eq!(s.name, "Anna M.");
        assert_eq!(s.class_label.as_deref(), Some("5a"));
        assert_eq!(s.roster_id.as_deref(), Some("4711"));

        reg.upsert_mapping("555", "Anna M.", Some("6b"), Some(" "))
            .unwrap();
        let s = reg.get("555").unwrap().unwrap();
        assert_eq!(s.class_label.as_deref(), Some("6b"));
        assert_eq!(s.roster_id.as_deref(), Some("4711"));
    }

    #[test]
    fn upsert_mapping_on_plain_registration_adds_roster_data() {
        let pool = DbPool::in_memory().unwrap();
        let reg = Registry::new(&pool.conn);
        reg.register("777", "Bernd").unwrap();

        let r = reg
            .upsert_mapping("777", "Bernd Beispiel", Some("7c"), None)
            .unwrap();
        assert_eq!(r, Upsert::Updated);
        let s = reg.get("777").unwrap().unwrap();
        assert_eq!(s.name, "Bernd Beispiel");
        assert_eq!(s.class_label.as_deref(), Some("7c"));
        assert_eq!(s.roster_id, None);
    }
}
