//! SQLite-backed contact collection.
//!
//! Contacts live in a single `contacts` table whose `id` column is the
//! `INTEGER PRIMARY KEY`, so uniqueness of the contact id is enforced by the
//! database itself. Rows are returned in rowid order, which for this table
//! is id order.

use super::document::Filter;
use super::{ContactStore, Cursor, DeleteResult, InsertOneResult, UpdateResult, create_file_parent};
use crate::domain::contact::{Contact, FieldUpdate};
use crate::errors::AppError;
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params, params_from_iter};
use std::path::Path;

const CONTACT_COLUMNS: &str = "id, name, age, phone, email";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create the database file, creating its parent directory if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        create_file_parent(path)?;

        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        tracing::debug!(path = %path.display(), "sqlite store opened");

        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, AppError> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS contacts (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            age INTEGER NOT NULL,
            phone TEXT NOT NULL,
            email TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_contacts_name ON contacts(name);
        "#,
    )
}

// The filter as a SQL condition with its bound values, numbered from ?1.
fn condition(filter: &Filter) -> (&'static str, Vec<SqlValue>) {
    match filter {
        Filter::All => ("1 = 1", Vec::new()),
        Filter::Id(id) => ("id = ?1", vec![SqlValue::Integer(*id)]),
        Filter::Name(name) => ("name = ?1", vec![SqlValue::Text(name.clone())]),
    }
}

fn contact_from_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        phone: row.get(3)?,
        email: row.get(4)?,
    })
}

// Column type mismatches mean a row that is not a full contact.
fn decode_error(err: rusqlite::Error) -> AppError {
    match err {
        rusqlite::Error::InvalidColumnType(idx, name, ty) => AppError::MalformedDocument(format!(
            "column {idx} ({name}) holds {ty}"
        )),
        rusqlite::Error::FromSqlConversionFailure(idx, ty, source) => {
            AppError::MalformedDocument(format!("column {idx} holds {ty}: {source}"))
        }
        other => AppError::Sqlite(other),
    }
}

fn sql_value(update: &FieldUpdate) -> SqlValue {
    match update {
        FieldUpdate::Age(age) => SqlValue::Integer(*age),
        FieldUpdate::Name(s) | FieldUpdate::Phone(s) | FieldUpdate::Email(s) => {
            SqlValue::Text(s.clone())
        }
    }
}

/// Lazy cursor over matching rows. Each step fetches the next row after the
/// last rowid seen, so rows are read only as the caller advances.
pub struct SqliteCursor<'a> {
    conn: &'a Connection,
    filter: Filter,
    last_rowid: i64,
    done: bool,
}

impl Iterator for SqliteCursor<'_> {
    type Item = Result<Contact, AppError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let (cond, mut values) = condition(&self.filter);
        values.push(SqlValue::Integer(self.last_rowid));
        let sql = format!(
            "SELECT {CONTACT_COLUMNS}, rowid FROM contacts \
             WHERE {cond} AND rowid > ?{} ORDER BY rowid LIMIT 1",
            values.len()
        );

        let row = self
            .conn
            .query_row(&sql, params_from_iter(values), |row| {
                Ok((row.get::<_, i64>(5)?, contact_from_row(row)))
            })
            .optional();

        match row {
            Ok(Some((rowid, contact))) => {
                self.last_rowid = rowid;
                Some(contact.map_err(decode_error))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e.into()))
            }
        }
    }
}

impl ContactStore for SqliteStore {
    fn insert_one(&mut self, contact: &Contact) -> Result<InsertOneResult, AppError> {
        let inserted = self.conn.execute(
            "INSERT INTO contacts (id, name, age, phone, email) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                contact.id,
                contact.name,
                contact.age,
                contact.phone,
                contact.email
            ],
        );

        match inserted {
            Ok(_) => Ok(InsertOneResult {
                acknowledged: true,
                inserted_id: contact.id,
            }),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(AppError::DuplicateIdentifier(contact.id))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn find_one(&self, filter: &Filter) -> Result<Option<Contact>, AppError> {
        let (cond, values) = condition(filter);
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE {cond} ORDER BY rowid LIMIT 1");

        self.conn
            .query_row(&sql, params_from_iter(values), contact_from_row)
            .optional()
            .map_err(decode_error)
    }

    fn find(&self, filter: &Filter) -> Result<Cursor<'_>, AppError> {
        Ok(Box::new(SqliteCursor {
            conn: &self.conn,
            filter: filter.clone(),
            last_rowid: i64::MIN,
            done: false,
        }))
    }

    fn update_one(
        &mut self,
        filter: &Filter,
        update: &FieldUpdate,
    ) -> Result<UpdateResult, AppError> {
        let (cond, mut values) = condition(filter);
        values.push(sql_value(update));
        let key = update.field().key();
        let value_idx = values.len();

        // Rows already holding the value are left alone, so changes() is the modified count.
        let sql = format!(
            "UPDATE contacts SET {key} = ?{value_idx} \
             WHERE rowid = (SELECT rowid FROM contacts WHERE {cond} ORDER BY rowid LIMIT 1) \
             AND {key} IS NOT ?{value_idx}"
        );
        let modified_count = self.conn.execute(&sql, params_from_iter(values))? as u64;

        let matched_count = if modified_count > 0 {
            modified_count
        } else {
            self.count(filter)?.min(1)
        };

        Ok(UpdateResult {
            acknowledged: true,
            matched_count,
            modified_count,
        })
    }

    fn delete_one(&mut self, filter: &Filter) -> Result<DeleteResult, AppError> {
        let (cond, values) = condition(filter);
        let sql = format!(
            "DELETE FROM contacts WHERE rowid = \
             (SELECT rowid FROM contacts WHERE {cond} ORDER BY rowid LIMIT 1)"
        );

        let deleted = self.conn.execute(&sql, params_from_iter(values))?;
        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: deleted as u64,
        })
    }

    fn count(&self, filter: &Filter) -> Result<u64, AppError> {
        let (cond, values) = condition(filter);
        let sql = format!("SELECT COUNT(*) FROM contacts WHERE {cond}");

        let count: i64 = self
            .conn
            .query_row(&sql, params_from_iter(values), |row| row.get(0))?;
        Ok(count as u64)
    }

    fn get_medium(&self) -> &str {
        "sqlite"
    }
}
