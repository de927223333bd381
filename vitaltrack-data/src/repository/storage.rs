use tracing::debug;

use crate::database::DatabasePool;
use crate::models::{HealthEntryRecord, PersonRecord};

use super::errors::RepositoryError;
use super::health_entry::EntryFilter;

const ENTRY_COLUMNS: &str = "id, person_id, systolic, diastolic, heart_rate, tags, timestamp";

// The checked u16 conversion makes out-of-range stored values surface
// as an error instead of silently truncating.
fn row_to_entry(row: &rusqlite::Row<'_>) -> Result<HealthEntryRecord, rusqlite::Error> {
    Ok(HealthEntryRecord {
        id: row.get(0)?,
        person_id: row.get(1)?,
        systolic: row.get::<_, u16>(2)?,
        diastolic: row.get::<_, u16>(3)?,
        heart_rate: row.get::<_, u16>(4)?,
        tags: row.get(5)?,
        timestamp: row.get(6)?,
    })
}

fn row_to_person(row: &rusqlite::Row<'_>) -> Result<PersonRecord, rusqlite::Error> {
    Ok(PersonRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get::<_, u16>(2)?,
        gender: row.get(3)?,
        description: row.get(4)?,
    })
}

/// Database storage operations for health entries and persons
pub struct DatabaseStorage;

impl DatabaseStorage {
    /// Store an entry in the database
    pub async fn store_entry(
        pool: &DatabasePool,
        entry: &HealthEntryRecord,
    ) -> Result<(), RepositoryError> {
        debug!("Storing health entry in database: id={}", entry.id);

        let conn = pool.get()?;

        conn.execute(
            "INSERT INTO health_entries
             (id, person_id, systolic, diastolic, heart_rate, tags, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                &entry.id,
                &entry.person_id,
                entry.systolic,
                entry.diastolic,
                entry.heart_rate,
                &entry.tags,
                &entry.timestamp,
            ),
        )?;

        Ok(())
    }

    /// Update an existing entry, reporting whether it existed
    pub async fn update_entry(
        pool: &DatabasePool,
        entry: &HealthEntryRecord,
    ) -> Result<bool, RepositoryError> {
        debug!("Updating health entry in database: id={}", entry.id);

        let conn = pool.get()?;

        let changed = conn.execute(
            "UPDATE health_entries
             SET person_id = ?2, systolic = ?3, diastolic = ?4,
                 heart_rate = ?5, tags = ?6, timestamp = ?7
             WHERE id = ?1",
            (
                &entry.id,
                &entry.person_id,
                entry.systolic,
                entry.diastolic,
                entry.heart_rate,
                &entry.tags,
                &entry.timestamp,
            ),
        )?;

        Ok(changed > 0)
    }

    /// Get filtered entries together with the pre-pagination total
    pub async fn get_entries(
        pool: &DatabasePool,
        filter: &EntryFilter,
    ) -> Result<(Vec<HealthEntryRecord>, usize), RepositoryError> {
        debug!("Getting filtered health entries from database");

        let conn = pool.get()?;

        let sort_direction = if filter.sort_desc.unwrap_or(true) {
            "DESC"
        } else {
            "ASC"
        };
        // LIMIT -1 means unlimited in SQLite
        let limit = filter.limit.map(|l| l as i64).unwrap_or(-1);
        let offset = filter.offset.unwrap_or(0);

        let mut query = format!("SELECT {} FROM health_entries", ENTRY_COLUMNS);

        let mut where_clauses = Vec::new();
        let mut params: Vec<&dyn rusqlite::ToSql> = Vec::new();

        if let Some(ref person_id) = filter.person_id {
            where_clauses.push("person_id = ?");
            params.push(person_id as &dyn rusqlite::ToSql);
        }

        if let Some(ref start) = filter.start_date {
            where_clauses.push("timestamp >= ?");
            params.push(start as &dyn rusqlite::ToSql);
        }

        if let Some(ref end) = filter.end_date {
            where_clauses.push("timestamp <= ?");
            params.push(end as &dyn rusqlite::ToSql);
        }

        if !where_clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&where_clauses.join(" AND "));
        }

        query.push_str(&format!(" ORDER BY timestamp {}", sort_direction));
        query.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));

        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params.iter()), row_to_entry)?;

        let mut result = Vec::new();
        for entry in rows {
            result.push(entry?);
        }

        let mut count_query = String::from("SELECT COUNT(*) FROM health_entries");
        if !where_clauses.is_empty() {
            count_query.push_str(" WHERE ");
            count_query.push_str(&where_clauses.join(" AND "));
        }

        let mut count_stmt = conn.prepare(&count_query)?;
        let total: i64 =
            count_stmt.query_row(rusqlite::params_from_iter(params.iter()), |row| row.get(0))?;

        Ok((result, total as usize))
    }

    /// Get an entry by id from the database
    pub async fn get_entry_by_id(
        pool: &DatabasePool,
        id: &str,
    ) -> Result<Option<HealthEntryRecord>, RepositoryError> {
        debug!("Getting health entry by id from database: id={}", id);

        let conn = pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM health_entries WHERE id = ?",
            ENTRY_COLUMNS
        ))?;

        match stmt.query_row([id], row_to_entry) {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(RepositoryError::Sqlite(e)),
        }
    }

    /// Delete an entry by id, reporting whether it existed
    pub async fn delete_entry(pool: &DatabasePool, id: &str) -> Result<bool, RepositoryError> {
        debug!("Deleting health entry from database: id={}", id);

        let conn = pool.get()?;
        let deleted = conn.execute("DELETE FROM health_entries WHERE id = ?", [id])?;

        Ok(deleted > 0)
    }

    /// Check whether a person already has an entry at the given timestamp
    pub async fn entry_exists_at(
        pool: &DatabasePool,
        person_id: &str,
        timestamp: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, RepositoryError> {
        let conn = pool.get()?;

        let count: i64 = match exclude_id {
            Some(exclude) => conn.query_row(
                "SELECT COUNT(*) FROM health_entries
                 WHERE person_id = ?1 AND timestamp = ?2 AND id != ?3",
                [person_id, timestamp, exclude],
                |row| row.get(0),
            )?,
            None => conn.query_row(
                "SELECT COUNT(*) FROM health_entries
                 WHERE person_id = ?1 AND timestamp = ?2",
                [person_id, timestamp],
                |row| row.get(0),
            )?,
        };

        Ok(count > 0)
    }

    /// Store a person in the database
    pub async fn store_person(
        pool: &DatabasePool,
        person: &PersonRecord,
    ) -> Result<(), RepositoryError> {
        debug!("Storing person in database: id={}", person.id);

        let conn = pool.get()?;

        conn.execute(
            "INSERT INTO persons (id, name, age, gender, description)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                &person.id,
                &person.name,
                person.age,
                &person.gender,
                &person.description,
            ),
        )?;

        Ok(())
    }

    /// Get all persons from the database, sorted by name
    pub async fn get_persons(pool: &DatabasePool) -> Result<Vec<PersonRecord>, RepositoryError> {
        debug!("Getting all persons from database");

        let conn = pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, name, age, gender, description FROM persons ORDER BY name ASC",
        )?;

        let rows = stmt.query_map([], row_to_person)?;

        let mut result = Vec::new();
        for person in rows {
            result.push(person?);
        }

        Ok(result)
    }

    /// Get a person by id from the database
    pub async fn get_person_by_id(
        pool: &DatabasePool,
        id: &str,
    ) -> Result<Option<PersonRecord>, RepositoryError> {
        debug!("Getting person by id from database: id={}", id);

        let conn = pool.get()?;

        let mut stmt =
            conn.prepare("SELECT id, name, age, gender, description FROM persons WHERE id = ?")?;

        match stmt.query_row([id], row_to_person) {
            Ok(person) => Ok(Some(person)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(RepositoryError::Sqlite(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::new_isolated_pool;

    // Satisfies the health_entries.person_id foreign key for fixtures
    // that reference "person-1".
    fn seed_person(pool: &crate::database::DatabasePool) {
        let conn = pool.get().unwrap();
        conn.execute(
            "INSERT INTO persons (id, name, age, gender, description)
             VALUES ('person-1', 'Test Person', 30, 'other', NULL)",
            [],
        )
        .unwrap();
    }

    fn entry(id: &str, timestamp: &str) -> HealthEntryRecord {
        HealthEntryRecord {
            id: id.to_string(),
            person_id: "person-1".to_string(),
            systolic: 120,
            diastolic: 80,
            heart_rate: 72,
            tags: None,
            timestamp: timestamp.to_string(),
        }
    }

    #[tokio::test]
    async fn test_store_and_read_back_entry() {
        let pool = new_isolated_pool();
        seed_person(&pool);
        let stored = entry("entry-1", "2024-01-01T08:00:00+00:00");

        DatabaseStorage::store_entry(&pool, &stored).await.unwrap();

        let loaded = DatabaseStorage::get_entry_by_id(&pool, "entry-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.systolic, 120);
        assert_eq!(loaded.timestamp, "2024-01-01T08:00:00+00:00");
    }

    #[tokio::test]
    async fn test_out_of_range_stored_value_is_an_error() {
        let pool = new_isolated_pool();
        seed_person(&pool);

        // Write a systolic value no valid entry could produce
        let conn = pool.get().unwrap();
        conn.execute(
            "INSERT INTO health_entries
             (id, person_id, systolic, diastolic, heart_rate, tags, timestamp)
             VALUES ('entry-bad', 'person-1', 70000, 80, 72, NULL,
                     '2024-01-01T08:00:00+00:00')",
            [],
        )
        .unwrap();
        drop(conn);

        let result = DatabaseStorage::get_entry_by_id(&pool, "entry-bad").await;
        assert!(matches!(result, Err(RepositoryError::Sqlite(_))));
    }
}
