//! rusqlite-backed implementation of [`RuleStore`].

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::decision::types::{AirlineRule, Color, Disposition, Shape, StickerReference};
use crate::store::RuleStore;
use crate::store::error::{StoreError, StoreResult};

/// Airline rules and sticker references in a single SQLite database.
///
/// The connection is owned behind a mutex so one store instance can be shared
/// across request handlers; reads are short single statements.
#[derive(Clone)]
pub struct SqliteRuleStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRuleStore {
    /// Opens (creating if needed) the database at `db_path`.
    pub fn open(db_path: &str) -> StoreResult<Self> {
        Self::from_connection(Connection::open(db_path)?)
    }

    /// An empty in-memory store, used by tests and one-shot runs.
    pub fn in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.ensure_tables()?;
        Ok(store)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| StoreError::Lock(e.to_string()))
    }

    fn ensure_tables(&self) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS airlines (
              id INTEGER PRIMARY KEY,
              name TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS bottle_rules (
              id INTEGER PRIMARY KEY,
              airline_id INTEGER NOT NULL REFERENCES airlines(id),
              empty TEXT NOT NULL,
              partial TEXT NOT NULL,
              full TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS stickers (
              id INTEGER PRIMARY KEY,
              shape TEXT NOT NULL,
              color TEXT NOT NULL,
              caducity_date TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS flights (
              id INTEGER PRIMARY KEY,
              airline_id INTEGER NOT NULL REFERENCES airlines(id),
              flight_number TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Inserts an airline and returns its row id. Seeding only.
    pub fn insert_airline(&self, name: &str) -> StoreResult<i64> {
        let conn = self.lock()?;
        conn.execute("INSERT INTO airlines (name) VALUES (?1)", params![name])?;
        Ok(conn.last_insert_rowid())
    }

    /// Inserts the rule row for an airline. Seeding only.
    pub fn insert_bottle_rule(
        &self,
        airline_id: i64,
        empty: Disposition,
        partial: Disposition,
        full: Disposition,
    ) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO bottle_rules (airline_id, empty, partial, full) VALUES (?1, ?2, ?3, ?4)",
            params![airline_id, empty.label(), partial.label(), full.label()],
        )?;
        Ok(())
    }

    /// Inserts a sticker reference row. Seeding only.
    pub fn insert_sticker_reference(&self, reference: &StickerReference) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO stickers (shape, color, caducity_date) VALUES (?1, ?2, ?3)",
            params![
                reference.shape.label(),
                reference.color.label(),
                reference.expires_on.format("%Y-%m-%d").to_string(),
            ],
        )?;
        Ok(())
    }

    /// Inserts a flight number for an airline. Seeding only.
    pub fn insert_flight(&self, airline_id: i64, flight_number: &str) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO flights (airline_id, flight_number) VALUES (?1, ?2)",
            params![airline_id, flight_number],
        )?;
        Ok(())
    }
}

impl RuleStore for SqliteRuleStore {
    fn find_airline_rule(&self, airline_name: &str) -> StoreResult<Option<AirlineRule>> {
        let conn = self.lock()?;
        let row: Option<(i64, String, String, String, String)> = conn
            .query_row(
                r#"
                SELECT a.id, a.name, r.empty, r.partial, r.full
                FROM airlines a
                JOIN bottle_rules r ON r.airline_id = a.id
                WHERE a.name = ?1
                ORDER BY r.id
                LIMIT 1
                "#,
                params![airline_name],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(airline_id, name, empty, partial, full)| {
            Ok(AirlineRule {
                airline_id,
                airline_name: name,
                empty: parse_disposition("empty", &empty)?,
                partial: parse_disposition("partial", &partial)?,
                full: parse_disposition("full", &full)?,
            })
        })
        .transpose()
    }

    fn list_sticker_references(&self) -> StoreResult<Vec<StickerReference>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT shape, color, caducity_date FROM stickers ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, NaiveDate>(2)?,
            ))
        })?;

        let mut references = Vec::new();
        for row in rows {
            let (shape, color, expires_on) = row?;
            references.push(StickerReference {
                shape: Shape::from_label(&shape).ok_or_else(|| StoreError::FieldValue {
                    field: "shape",
                    value: shape.clone(),
                })?,
                color: Color::from_label(&color).ok_or_else(|| StoreError::FieldValue {
                    field: "color",
                    value: color.clone(),
                })?,
                expires_on,
            });
        }
        Ok(references)
    }

    fn find_airline_for_flight(&self, flight_code: &str) -> StoreResult<Option<String>> {
        let prefix: String = flight_code.chars().take(2).collect::<String>().to_uppercase();
        if prefix.len() < 2 {
            return Ok(None);
        }

        let conn = self.lock()?;
        let name = conn
            .query_row(
                r#"
                SELECT a.name
                FROM flights f
                JOIN airlines a ON a.id = f.airline_id
                WHERE upper(substr(f.flight_number, 1, 2)) = ?1
                ORDER BY f.id
                LIMIT 1
                "#,
                params![prefix],
                |row| row.get(0),
            )
            .optional()?;
        Ok(name)
    }

    fn health_check(&self) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }
}

fn parse_disposition(field: &'static str, value: &str) -> StoreResult<Disposition> {
    Disposition::from_label(value).ok_or_else(|| StoreError::FieldValue {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed::seed_defaults;

    fn seeded_store() -> SqliteRuleStore {
        let store = SqliteRuleStore::in_memory().unwrap();
        seed_defaults(&store).unwrap();
        store
    }

    #[test]
    fn test_find_airline_rule_round_trips_typed_fields() {
        let store = seeded_store();

        let rule = store.find_airline_rule("Volaris").unwrap().unwrap();

        assert_eq!(rule.airline_name, "Volaris");
        assert_eq!(rule.empty, Disposition::Discard);
        assert_eq!(rule.partial, Disposition::Discard);
        assert_eq!(rule.full, Disposition::Keep);
    }

    #[test]
    fn test_airline_lookup_is_case_sensitive() {
        let store = seeded_store();

        assert!(store.find_airline_rule("volaris").unwrap().is_none());
        assert!(store.find_airline_rule("Volaris").unwrap().is_some());
    }

    #[test]
    fn test_unknown_airline_yields_none() {
        let store = seeded_store();
        assert!(store.find_airline_rule("Ryanair").unwrap().is_none());
    }

    #[test]
    fn test_references_come_back_in_row_order() {
        let store = SqliteRuleStore::in_memory().unwrap();
        let first = StickerReference {
            shape: Shape::Circle,
            color: Color::Red,
            expires_on: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        };
        let second = StickerReference {
            shape: Shape::Circle,
            color: Color::Red,
            expires_on: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
        };
        store.insert_sticker_reference(&first).unwrap();
        store.insert_sticker_reference(&second).unwrap();

        let references = store.list_sticker_references().unwrap();

        assert_eq!(references, vec![first, second]);
    }

    #[test]
    fn test_flight_prefix_resolves_airline() {
        let store = seeded_store();

        assert_eq!(
            store.find_airline_for_flight("AM512").unwrap().as_deref(),
            Some("Aeroméxico")
        );
        assert_eq!(
            store.find_airline_for_flight("aa99").unwrap().as_deref(),
            Some("American Airlines")
        );
        assert!(store.find_airline_for_flight("ZZ123").unwrap().is_none());
        assert!(store.find_airline_for_flight("A").unwrap().is_none());
    }

    #[test]
    fn test_open_creates_database_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.db");

        let store = SqliteRuleStore::open(path.to_str().unwrap()).unwrap();
        store.health_check().unwrap();

        assert!(path.exists());
    }
}
