pub mod document;
pub mod json;
pub mod memory;
pub mod sqlite;

use crate::domain::contact::{Contact, FieldUpdate};
use crate::errors::AppError;
use std::fs;
use std::path::Path;

pub use document::Filter;
pub use json::JsonStore;
pub use memory::MemStore;
pub use sqlite::SqliteStore;

/// Lazy sequence of decoded contacts produced by a find.
pub type Cursor<'a> = Box<dyn Iterator<Item = Result<Contact, AppError>> + 'a>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// A document collection holding contacts.
///
/// Implementations own uniqueness of the contact id: `insert_one` must fail
/// with [`AppError::DuplicateIdentifier`] when the id is already stored.
/// Every contact handed out is fully decoded; partial documents surface as
/// [`AppError::MalformedDocument`].
pub trait ContactStore {
    fn insert_one(&mut self, contact: &Contact) -> Result<InsertOneResult, AppError>;

    fn find_one(&self, filter: &Filter) -> Result<Option<Contact>, AppError>;

    fn find(&self, filter: &Filter) -> Result<Cursor<'_>, AppError>;

    /// Replaces one field of the first document matching `filter`.
    fn update_one(&mut self, filter: &Filter, update: &FieldUpdate)
    -> Result<UpdateResult, AppError>;

    fn delete_one(&mut self, filter: &Filter) -> Result<DeleteResult, AppError>;

    fn count(&self, filter: &Filter) -> Result<u64, AppError>;

    fn get_medium(&self) -> &str;
}

impl<S: ContactStore + ?Sized> ContactStore for Box<S> {
    fn insert_one(&mut self, contact: &Contact) -> Result<InsertOneResult, AppError> {
        (**self).insert_one(contact)
    }

    fn find_one(&self, filter: &Filter) -> Result<Option<Contact>, AppError> {
        (**self).find_one(filter)
    }

    fn find(&self, filter: &Filter) -> Result<Cursor<'_>, AppError> {
        (**self).find(filter)
    }

    fn update_one(
        &mut self,
        filter: &Filter,
        update: &FieldUpdate,
    ) -> Result<UpdateResult, AppError> {
        (**self).update_one(filter, update)
    }

    fn delete_one(&mut self, filter: &Filter) -> Result<DeleteResult, AppError> {
        (**self).delete_one(filter)
    }

    fn count(&self, filter: &Filter) -> Result<u64, AppError> {
        (**self).count(filter)
    }

    fn get_medium(&self) -> &str {
        (**self).get_medium()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMediums {
    Mem,
    Json,
    Sqlite,
}

impl StorageMediums {
    pub fn is_which(&self) -> &str {
        match self {
            StorageMediums::Mem => "mem",
            StorageMediums::Json => "json",
            StorageMediums::Sqlite => "sqlite",
        }
    }

    pub fn from(str: &str) -> Result<Self, AppError> {
        match str.trim().to_lowercase().as_str() {
            "mem" => Ok(StorageMediums::Mem),
            "json" => Ok(StorageMediums::Json),
            "sqlite" => Ok(StorageMediums::Sqlite),
            _ => Err(AppError::Validation(format!(
                "Not a recognized storage medium: {}",
                str
            ))),
        }
    }
}

/// Opens the store selected by `medium`, using the matching path.
pub fn open_store(
    medium: StorageMediums,
    json_path: &Path,
    sqlite_path: &Path,
) -> Result<Box<dyn ContactStore>, AppError> {
    let store: Box<dyn ContactStore> = match medium {
        StorageMediums::Mem => Box::new(MemStore::new()),
        StorageMediums::Json => Box::new(JsonStore::open(json_path)?),
        StorageMediums::Sqlite => Box::new(SqliteStore::open(sqlite_path)?),
    };
    tracing::info!(medium = medium.is_which(), "store opened");
    Ok(store)
}

pub fn create_file_parent(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
