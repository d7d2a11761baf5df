use super::document::{self, Document, Filter};
use super::memory::MemStore;
use super::{
    ContactStore, Cursor, DeleteResult, InsertOneResult, UpdateResult, create_file_parent,
};
use crate::domain::contact::{Contact, FieldUpdate};
use crate::errors::AppError;
use serde_json::Value;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Document collection persisted as a JSON array of documents.
///
/// Documents are loaded and decoded once on open. A write that changes the
/// collection is flushed back to the file before the call returns; if the
/// flush fails the collection is restored to its state before the write.
pub struct JsonStore {
    pub path: PathBuf,
    collection: MemStore,
}

impl JsonStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();
        let collection = MemStore::from_documents(load_documents(&path)?);
        tracing::debug!(path = %path.display(), documents = collection.data.len(), "json store loaded");

        Ok(Self { path, collection })
    }

    fn save(&self) -> Result<(), AppError> {
        create_file_parent(&self.path)?;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;

        let json_contacts = serde_json::to_string_pretty(&self.collection.data)?;
        file.write_all(json_contacts.as_bytes())?;
        Ok(())
    }

    // Keeps memory and file in step: a failed save rolls back to `before`.
    fn save_or_restore(&mut self, before: MemStore) -> Result<(), AppError> {
        if let Err(e) = self.save() {
            tracing::error!(path = %self.path.display(), error = %e, "json store save failed, write rolled back");
            self.collection = before;
            return Err(e);
        }
        Ok(())
    }
}

fn load_documents(path: &Path) -> Result<Vec<Document>, AppError> {
    if !fs::exists(path)? {
        return Ok(Vec::new());
    }

    let mut data = String::new();
    fs::File::open(path)?.read_to_string(&mut data)?;

    // serde_json will give an error if data is empty
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }

    let Value::Array(values) = serde_json::from_str::<Value>(&data)? else {
        return Err(AppError::MalformedDocument(format!(
            "expected an array of documents in {}",
            path.display()
        )));
    };

    let mut docs: Vec<Document> = Vec::with_capacity(values.len());
    let mut ids = HashSet::with_capacity(values.len());

    for value in values {
        let doc = match value {
            Value::Object(doc) => doc,
            other => {
                return Err(AppError::MalformedDocument(format!(
                    "expected an object in {}, found {other}",
                    path.display()
                )));
            }
        };

        // every document must be a full contact with a unique id
        let contact = document::decode(&doc)?;
        if !ids.insert(contact.id) {
            return Err(AppError::MalformedDocument(format!(
                "id {} appears more than once in {}",
                contact.id,
                path.display()
            )));
        }
        docs.push(doc);
    }

    Ok(docs)
}

impl ContactStore for JsonStore {
    fn insert_one(&mut self, contact: &Contact) -> Result<InsertOneResult, AppError> {
        let before = self.collection.clone();
        let result = self.collection.insert_one(contact)?;
        self.save_or_restore(before)?;
        Ok(result)
    }

    fn find_one(&self, filter: &Filter) -> Result<Option<Contact>, AppError> {
        self.collection.find_one(filter)
    }

    fn find(&self, filter: &Filter) -> Result<Cursor<'_>, AppError> {
        self.collection.find(filter)
    }

    fn update_one(
        &mut self,
        filter: &Filter,
        update: &FieldUpdate,
    ) -> Result<UpdateResult, AppError> {
        let before = self.collection.clone();
        let result = self.collection.update_one(filter, update)?;
        if result.modified_count > 0 {
            self.save_or_restore(before)?;
        }
        Ok(result)
    }

    fn delete_one(&mut self, filter: &Filter) -> Result<DeleteResult, AppError> {
        let before = self.collection.clone();
        let result = self.collection.delete_one(filter)?;
        if result.deleted_count > 0 {
            self.save_or_restore(before)?;
        }
        Ok(result)
    }

    fn count(&self, filter: &Filter) -> Result<u64, AppError> {
        self.collection.count(filter)
    }

    fn get_medium(&self) -> &str {
        "json"
    }
}
