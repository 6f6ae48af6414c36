/// Database module for persisting timetable administration data

mod error;
mod types;

pub use error::{StorageError, StorageResult};
pub use types::{
    BreakPeriod, CollegeTime, Faculty, GeneratedScheduleSummary, NewBreak, NewFaculty, NewRoom,
    NewSubject, NewUser, Role, Room, Subject, User,
};

use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

use crate::scheduler::types::CollegeHours;
use crate::scheduler::ScheduleSnapshot;

const SCHEMA_SQL: &str = include_str!("../../../../sql/init_timetable.sql");

/// Path that selects a private in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

/// Everything the API needs from persistence.
///
/// Updates replace the stored fields with the given ones; deletes report
/// whether a record was removed.
pub trait Storage: Send + Sync {
    fn create_user(&self, user: &NewUser) -> StorageResult<User>;
    fn find_user_by_username(&self, username: &str) -> StorageResult<Option<User>>;
    fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>>;
    fn find_user_by_id(&self, id: &str) -> StorageResult<Option<User>>;

    fn list_faculty(&self) -> StorageResult<Vec<Faculty>>;
    fn get_faculty(&self, id: &str) -> StorageResult<Option<Faculty>>;
    fn create_faculty(&self, faculty: &NewFaculty) -> StorageResult<Faculty>;
    fn update_faculty(&self, id: &str, faculty: &NewFaculty) -> StorageResult<Option<Faculty>>;
    fn delete_faculty(&self, id: &str) -> StorageResult<bool>;

    fn list_subjects(&self) -> StorageResult<Vec<Subject>>;
    fn get_subject(&self, id: &str) -> StorageResult<Option<Subject>>;
    fn create_subject(&self, subject: &NewSubject) -> StorageResult<Subject>;
    fn update_subject(&self, id: &str, subject: &NewSubject) -> StorageResult<Option<Subject>>;
    fn delete_subject(&self, id: &str) -> StorageResult<bool>;

    fn list_rooms(&self) -> StorageResult<Vec<Room>>;
    fn get_room(&self, id: &str) -> StorageResult<Option<Room>>;
    fn create_room(&self, room: &NewRoom) -> StorageResult<Room>;
    fn update_room(&self, id: &str, room: &NewRoom) -> StorageResult<Option<Room>>;
    fn delete_room(&self, id: &str) -> StorageResult<bool>;

    fn list_breaks(&self) -> StorageResult<Vec<BreakPeriod>>;
    fn get_break(&self, id: &str) -> StorageResult<Option<BreakPeriod>>;
    fn create_break(&self, period: &NewBreak) -> StorageResult<BreakPeriod>;
    fn update_break(&self, id: &str, period: &NewBreak) -> StorageResult<Option<BreakPeriod>>;
    fn delete_break(&self, id: &str) -> StorageResult<bool>;

    fn get_college_time(&self) -> StorageResult<Option<CollegeTime>>;
    /// Replaces any existing college time; there is at most one.
    fn set_college_time(&self, hours: &CollegeHours) -> StorageResult<CollegeTime>;

    /// Stores an externally generated schedule verbatim, replacing one with the same name.
    fn save_generated_schedule(&self, name: &str, data: &Value) -> StorageResult<()>;
    fn get_generated_schedule(&self, name: &str) -> StorageResult<Option<Value>>;
    fn list_generated_schedules(&self) -> StorageResult<Vec<GeneratedScheduleSummary>>;

    /// Loads the current entities needed to derive room and faculty views.
    fn snapshot(&self) -> StorageResult<ScheduleSnapshot> {
        Ok(ScheduleSnapshot {
            college_time: self.get_college_time()?,
            breaks: self.list_breaks()?,
            rooms: self.list_rooms()?,
            faculty: self.list_faculty()?,
            subjects: self.list_subjects()?,
        })
    }
}

/// SQLite-backed [`Storage`].
pub struct SqliteStorage {
    db: Mutex<Connection>,
}

impl SqliteStorage {
    /// Opens (or creates) the database at `db_path` and initializes the schema.
    ///
    /// [`MEMORY_PATH`] opens a fresh in-memory database.
    pub fn open(db_path: &str) -> StorageResult<Self> {
        let conn = if db_path == MEMORY_PATH {
            Connection::open_in_memory()?
        } else {
            Connection::open(db_path)?
        };

        conn.execute_batch(SCHEMA_SQL)?;
        info!(path = %db_path, "Opened timetable database");

        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> StorageResult<Self> {
        Self::open(MEMORY_PATH)
    }

    /// Closes the underlying connection, surfacing any error from SQLite.
    pub fn close(self) -> StorageResult<()> {
        let conn = self.db.into_inner().map_err(|_| StorageError::Poisoned)?;
        conn.close().map_err(|(_, e)| StorageError::from(e))?;
        info!("Closed timetable database");
        Ok(())
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.db.lock().map_err(|_| StorageError::Poisoned)
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Reads a JSON text column.
fn json_column<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Reads a text column through `FromStr`.
fn parsed_column<T: FromStr<Err = String>>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

const USER_COLUMNS: &str = "id, username, email, password_hash, role, created_at";

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: parsed_column(row, 4)?,
        created_at: row.get(5)?,
    })
}

fn row_to_faculty(row: &Row<'_>) -> rusqlite::Result<Faculty> {
    Ok(Faculty {
        id: row.get(0)?,
        name: row.get(1)?,
        availability: json_column(row, 2)?,
        created_at: row.get(3)?,
    })
}

fn row_to_subject(row: &Row<'_>) -> rusqlite::Result<Subject> {
    Ok(Subject {
        id: row.get(0)?,
        name: row.get(1)?,
        duration: row.get(2)?,
        no_of_classes_per_week: row.get(3)?,
        faculty_ids: json_column(row, 4)?,
        created_at: row.get(5)?,
    })
}

fn row_to_room(row: &Row<'_>) -> rusqlite::Result<Room> {
    Ok(Room {
        id: row.get(0)?,
        name: row.get(1)?,
        capacity: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn row_to_break(row: &Row<'_>) -> rusqlite::Result<BreakPeriod> {
    Ok(BreakPeriod {
        id: row.get(0)?,
        day: parsed_column(row, 1)?,
        start_time: row.get(2)?,
        end_time: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn select_user(conn: &Connection, column: &str, value: &str) -> StorageResult<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1");
    Ok(conn.query_row(&sql, [value], row_to_user).optional()?)
}

fn select_faculty(conn: &Connection, id: &str) -> StorageResult<Option<Faculty>> {
    Ok(conn
        .query_row(
            "SELECT id, name, availability, created_at FROM faculty WHERE id = ?1",
            [id],
            row_to_faculty,
        )
        .optional()?)
}

fn select_subject(conn: &Connection, id: &str) -> StorageResult<Option<Subject>> {
    Ok(conn
        .query_row(
            "SELECT id, name, duration, no_of_classes_per_week, faculty_ids, created_at
             FROM subjects WHERE id = ?1",
            [id],
            row_to_subject,
        )
        .optional()?)
}

fn select_room(conn: &Connection, id: &str) -> StorageResult<Option<Room>> {
    Ok(conn
        .query_row(
            "SELECT id, name, capacity, created_at FROM rooms WHERE id = ?1",
            [id],
            row_to_room,
        )
        .optional()?)
}

fn select_break(conn: &Connection, id: &str) -> StorageResult<Option<BreakPeriod>> {
    Ok(conn
        .query_row(
            "SELECT id, day, start_time, end_time, created_at FROM breaks WHERE id = ?1",
            [id],
            row_to_break,
        )
        .optional()?)
}

impl Storage for SqliteStorage {
    fn create_user(&self, user: &NewUser) -> StorageResult<User> {
        let db = self.conn()?;
        let id = new_id();

        db.execute(
            "INSERT INTO users (id, username, email, password_hash, role, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                &id,
                &user.username,
                &user.email,
                &user.password_hash,
                user.role.to_string(),
                now(),
            ),
        )?;

        select_user(&db, "id", &id)?.ok_or(StorageError::Database(
            rusqlite::Error::QueryReturnedNoRows,
        ))
    }

    fn find_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        select_user(&*self.conn()?, "username", username)
    }

    fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        select_user(&*self.conn()?, "email", email)
    }

    fn find_user_by_id(&self, id: &str) -> StorageResult<Option<User>> {
        select_user(&*self.conn()?, "id", id)
    }

    fn list_faculty(&self) -> StorageResult<Vec<Faculty>> {
        let db = self.conn()?;
        let mut stmt =
            db.prepare("SELECT id, name, availability, created_at FROM faculty ORDER BY rowid")?;
        let faculty = stmt
            .query_map([], row_to_faculty)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(faculty)
    }

    fn get_faculty(&self, id: &str) -> StorageResult<Option<Faculty>> {
        select_faculty(&*self.conn()?, id)
    }

    fn create_faculty(&self, faculty: &NewFaculty) -> StorageResult<Faculty> {
        let db = self.conn()?;
        let id = faculty.id.clone().unwrap_or_else(new_id);
        let created_at = now();

        db.execute(
            "INSERT INTO faculty (id, name, availability, created_at) VALUES (?1, ?2, ?3, ?4)",
            (
                &id,
                &faculty.name,
                serde_json::to_string(&faculty.availability)?,
                &created_at,
            ),
        )?;

        Ok(Faculty {
            id,
            name: faculty.name.clone(),
            availability: faculty.availability.clone(),
            created_at,
        })
    }

    fn update_faculty(&self, id: &str, faculty: &NewFaculty) -> StorageResult<Option<Faculty>> {
        let db = self.conn()?;
        let changed = db.execute(
            "UPDATE faculty SET name = ?1, availability = ?2 WHERE id = ?3",
            (
                &faculty.name,
                serde_json::to_string(&faculty.availability)?,
                id,
            ),
        )?;

        if changed == 0 {
            return Ok(None);
        }
        select_faculty(&db, id)
    }

    fn delete_faculty(&self, id: &str) -> StorageResult<bool> {
        let db = self.conn()?;
        Ok(db.execute("DELETE FROM faculty WHERE id = ?1", [id])? > 0)
    }

    fn list_subjects(&self) -> StorageResult<Vec<Subject>> {
        let db = self.conn()?;
        let mut stmt = db.prepare(
            "SELECT id, name, duration, no_of_classes_per_week, faculty_ids, created_at
             FROM subjects ORDER BY rowid",
        )?;
        let subjects = stmt
            .query_map([], row_to_subject)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(subjects)
    }

    fn get_subject(&self, id: &str) -> StorageResult<Option<Subject>> {
        select_subject(&*self.conn()?, id)
    }

    fn create_subject(&self, subject: &NewSubject) -> StorageResult<Subject> {
        let db = self.conn()?;
        let id = new_id();
        let created_at = now();

        db.execute(
            "INSERT INTO subjects (id, name, duration, no_of_classes_per_week, faculty_ids, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                &id,
                &subject.name,
                subject.duration,
                subject.no_of_classes_per_week,
                serde_json::to_string(&subject.faculty_ids)?,
                &created_at,
            ),
        )?;

        Ok(Subject {
            id,
            name: subject.name.clone(),
            duration: subject.duration,
            no_of_classes_per_week: subject.no_of_classes_per_week,
            faculty_ids: subject.faculty_ids.clone(),
            created_at,
        })
    }

    fn update_subject(&self, id: &str, subject: &NewSubject) -> StorageResult<Option<Subject>> {
        let db = self.conn()?;
        let changed = db.execute(
            "UPDATE subjects SET name = ?1, duration = ?2, no_of_classes_per_week = ?3, faculty_ids = ?4
             WHERE id = ?5",
            (
                &subject.name,
                subject.duration,
                subject.no_of_classes_per_week,
                serde_json::to_string(&subject.faculty_ids)?,
                id,
            ),
        )?;

        if changed == 0 {
            return Ok(None);
        }
        select_subject(&db, id)
    }

    fn delete_subject(&self, id: &str) -> StorageResult<bool> {
        let db = self.conn()?;
        Ok(db.execute("DELETE FROM subjects WHERE id = ?1", [id])? > 0)
    }

    fn list_rooms(&self) -> StorageResult<Vec<Room>> {
        let db = self.conn()?;
        let mut stmt = db.prepare("SELECT id, name, capacity, created_at FROM rooms ORDER BY rowid")?;
        let rooms = stmt
            .query_map([], row_to_room)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rooms)
    }

    fn get_room(&self, id: &str) -> StorageResult<Option<Room>> {
        select_room(&*self.conn()?, id)
    }

    fn create_room(&self, room: &NewRoom) -> StorageResult<Room> {
        let db = self.conn()?;
        let id = room.id.clone().unwrap_or_else(new_id);
        let created_at = now();

        db.execute(
            "INSERT INTO rooms (id, name, capacity, created_at) VALUES (?1, ?2, ?3, ?4)",
            (&id, &room.name, room.capacity, &created_at),
        )?;

        Ok(Room {
            id,
            name: room.name.clone(),
            capacity: room.capacity,
            created_at,
        })
    }

    fn update_room(&self, id: &str, room: &NewRoom) -> StorageResult<Option<Room>> {
        let db = self.conn()?;
        let changed = db.execute(
            "UPDATE rooms SET name = ?1, capacity = ?2 WHERE id = ?3",
            (&room.name, room.capacity, id),
        )?;

        if changed == 0 {
            return Ok(None);
        }
        select_room(&db, id)
    }

    fn delete_room(&self, id: &str) -> StorageResult<bool> {
        let db = self.conn()?;
        Ok(db.execute("DELETE FROM rooms WHERE id = ?1", [id])? > 0)
    }

    fn list_breaks(&self) -> StorageResult<Vec<BreakPeriod>> {
        let db = self.conn()?;
        let mut stmt = db.prepare(
            "SELECT id, day, start_time, end_time, created_at FROM breaks ORDER BY rowid",
        )?;
        let breaks = stmt
            .query_map([], row_to_break)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(breaks)
    }

    fn get_break(&self, id: &str) -> StorageResult<Option<BreakPeriod>> {
        select_break(&*self.conn()?, id)
    }

    fn create_break(&self, period: &NewBreak) -> StorageResult<BreakPeriod> {
        let db = self.conn()?;
        let id = new_id();
        let created_at = now();

        db.execute(
            "INSERT INTO breaks (id, day, start_time, end_time, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                &id,
                period.day.as_str(),
                &period.start_time,
                &period.end_time,
                &created_at,
            ),
        )?;

        Ok(BreakPeriod {
            id,
            day: period.day,
            start_time: period.start_time.clone(),
            end_time: period.end_time.clone(),
            created_at,
        })
    }

    fn update_break(&self, id: &str, period: &NewBreak) -> StorageResult<Option<BreakPeriod>> {
        let db = self.conn()?;
        let changed = db.execute(
            "UPDATE breaks SET day = ?1, start_time = ?2, end_time = ?3 WHERE id = ?4",
            (period.day.as_str(), &period.start_time, &period.end_time, id),
        )?;

        if changed == 0 {
            return Ok(None);
        }
        select_break(&db, id)
    }

    fn delete_break(&self, id: &str) -> StorageResult<bool> {
        let db = self.conn()?;
        Ok(db.execute("DELETE FROM breaks WHERE id = ?1", [id])? > 0)
    }

    fn get_college_time(&self) -> StorageResult<Option<CollegeTime>> {
        let db = self.conn()?;
        Ok(db
            .query_row(
                "SELECT start_time, end_time, created_at FROM college_time
                 ORDER BY rowid DESC LIMIT 1",
                [],
                |row| {
                    Ok(CollegeTime {
                        start_time: row.get(0)?,
                        end_time: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                },
            )
            .optional()?)
    }

    fn set_college_time(&self, hours: &CollegeHours) -> StorageResult<CollegeTime> {
        let mut db = self.conn()?;
        let created_at = now();

        let tx = db.transaction()?;
        tx.execute("DELETE FROM college_time", [])?;
        tx.execute(
            "INSERT INTO college_time (id, start_time, end_time, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            (new_id(), &hours.start_time, &hours.end_time, &created_at),
        )?;
        tx.commit()?;

        Ok(CollegeTime {
            start_time: hours.start_time.clone(),
            end_time: hours.end_time.clone(),
            created_at,
        })
    }

    fn save_generated_schedule(&self, name: &str, data: &Value) -> StorageResult<()> {
        let db = self.conn()?;
        db.execute(
            "INSERT INTO generated_schedules (name, schedule_data, created_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET
                schedule_data = excluded.schedule_data,
                created_at = excluded.created_at",
            (name, serde_json::to_string(data)?, now()),
        )?;
        Ok(())
    }

    fn get_generated_schedule(&self, name: &str) -> StorageResult<Option<Value>> {
        let db = self.conn()?;
        let raw: Option<String> = db
            .query_row(
                "SELECT schedule_data FROM generated_schedules WHERE name = ?1",
                [name],
                |row| row.get(0),
            )
            .optional()?;

        Ok(raw.map(|r| serde_json::from_str(&r)).transpose()?)
    }

    fn list_generated_schedules(&self) -> StorageResult<Vec<GeneratedScheduleSummary>> {
        let db = self.conn()?;
        let mut stmt = db.prepare(
            "SELECT name, created_at FROM generated_schedules ORDER BY created_at DESC",
        )?;
        let summaries = stmt
            .query_map([], |row| {
                Ok(GeneratedScheduleSummary {
                    name: row.get(0)?,
                    created_at: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::types::{AvailabilityWindow, BreakDay, Weekday};
    use serde_json::json;

    fn storage() -> SqliteStorage {
        SqliteStorage::in_memory().unwrap()
    }

    fn new_faculty(id: Option<&str>, name: &str) -> NewFaculty {
        NewFaculty {
            id: id.map(str::to_string),
            name: name.to_string(),
            availability: vec![AvailabilityWindow {
                day: Weekday::Monday,
                start_time: "09:00".to_string(),
                end_time: "11:00".to_string(),
            }],
        }
    }

    #[test]
    fn test_faculty_crud() {
        let db = storage();

        let created = db.create_faculty(&new_faculty(Some("F1"), "Ada")).unwrap();
        assert_eq!(created.id, "F1");
        assert_eq!(db.get_faculty("F1").unwrap(), Some(created.clone()));

        let generated = db.create_faculty(&new_faculty(None, "Grace")).unwrap();
        assert!(!generated.id.is_empty());
        assert_eq!(db.list_faculty().unwrap().len(), 2);

        let mut changes = new_faculty(None, "Ada Lovelace");
        changes.availability.clear();
        let updated = db.update_faculty("F1", &changes).unwrap().unwrap();
        assert_eq!(updated.name, "Ada Lovelace");
        assert!(updated.availability.is_empty());
        assert_eq!(updated.created_at, created.created_at);

        assert!(db.update_faculty("missing", &changes).unwrap().is_none());
        assert!(db.delete_faculty("F1").unwrap());
        assert!(!db.delete_faculty("F1").unwrap());
        assert!(db.get_faculty("F1").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_faculty_id_is_rejected() {
        let db = storage();
        db.create_faculty(&new_faculty(Some("F1"), "Ada")).unwrap();
        let err = db.create_faculty(&new_faculty(Some("F1"), "Other")).unwrap_err();
        assert!(matches!(err, StorageError::Duplicate(_)));
    }

    #[test]
    fn test_subject_and_room_round_trip() {
        let db = storage();

        let subject = db
            .create_subject(&NewSubject {
                name: "Math".to_string(),
                duration: 50,
                no_of_classes_per_week: 3,
                faculty_ids: vec!["F1".to_string(), "F2".to_string()],
            })
            .unwrap();
        assert_eq!(db.get_subject(&subject.id).unwrap(), Some(subject.clone()));

        let room = db
            .create_room(&NewRoom {
                id: Some("R1".to_string()),
                name: "Lecture Hall".to_string(),
                capacity: None,
            })
            .unwrap();
        assert_eq!(db.list_rooms().unwrap(), vec![room]);

        let updated = db
            .update_room(
                "R1",
                &NewRoom {
                    id: None,
                    name: "Lecture Hall A".to_string(),
                    capacity: Some(120),
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.capacity, Some(120));
        assert!(db.delete_subject(&subject.id).unwrap());
    }

    #[test]
    fn test_break_day_is_preserved() {
        let db = storage();
        let created = db
            .create_break(&NewBreak {
                day: BreakDay::AllDays,
                start_time: "13:00".to_string(),
                end_time: "13:30".to_string(),
            })
            .unwrap();

        let loaded = db.get_break(&created.id).unwrap().unwrap();
        assert_eq!(loaded.day, BreakDay::AllDays);
        assert_eq!(db.list_breaks().unwrap().len(), 1);
    }

    #[test]
    fn test_college_time_is_a_singleton() {
        let db = storage();
        assert!(db.get_college_time().unwrap().is_none());

        for (start, end) in [("09:00", "17:00"), ("08:30", "16:30")] {
            db.set_college_time(&CollegeHours {
                start_time: start.to_string(),
                end_time: end.to_string(),
            })
            .unwrap();
        }

        let current = db.get_college_time().unwrap().unwrap();
        assert_eq!(current.start_time, "08:30");
        let count: i64 = db
            .conn()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM college_time", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_generated_schedule_upsert() {
        let db = storage();
        db.save_generated_schedule("latest", &json!({ "version": 1 }))
            .unwrap();
        db.save_generated_schedule("latest", &json!({ "version": 2 }))
            .unwrap();

        assert_eq!(
            db.get_generated_schedule("latest").unwrap(),
            Some(json!({ "version": 2 }))
        );
        assert!(db.get_generated_schedule("other").unwrap().is_none());
        assert_eq!(db.list_generated_schedules().unwrap().len(), 1);
    }

    #[test]
    fn test_users_are_unique() {
        let db = storage();
        let user = NewUser {
            username: "alice".to_string(),
            email: "alice@example.edu".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Admin,
        };

        let created = db.create_user(&user).unwrap();
        assert_eq!(created.role, Role::Admin);
        assert_eq!(
            db.find_user_by_email("alice@example.edu").unwrap().unwrap().id,
            created.id
        );
        assert!(matches!(
            db.create_user(&user).unwrap_err(),
            StorageError::Duplicate(_)
        ));
    }

    #[test]
    fn test_single_record_reads() {
        let db = storage();
        let user = db
            .create_user(&NewUser {
                username: "bob".to_string(),
                email: "bob@example.edu".to_string(),
                password_hash: "hash".to_string(),
                role: Role::User,
            })
            .unwrap();
        assert_eq!(db.find_user_by_username("bob").unwrap().unwrap().id, user.id);
        assert_eq!(db.find_user_by_id(&user.id).unwrap().unwrap().username, "bob");
        assert!(db.find_user_by_id("missing").unwrap().is_none());

        let room = db
            .create_room(&NewRoom {
                id: Some("R1".to_string()),
                name: "Lab".to_string(),
                capacity: None,
            })
            .unwrap();
        assert_eq!(db.get_room("R1").unwrap(), Some(room));
        assert!(db.get_room("R2").unwrap().is_none());
        assert!(db.get_faculty("F9").unwrap().is_none());
    }

    #[test]
    fn test_close_releases_connection() {
        let db = storage();
        db.create_faculty(&new_faculty(Some("F1"), "Ada")).unwrap();
        db.close().unwrap();
    }
}
