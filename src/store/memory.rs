use super::document::{self, Document, Filter};
use super::{ContactStore, Cursor, DeleteResult, InsertOneResult, UpdateResult};
use crate::domain::contact::{Contact, FieldUpdate};
use crate::errors::AppError;

/// Insertion-ordered in-process collection.
#[derive(Debug, Clone)]
pub struct MemStore {
    pub(crate) data: Vec<Document>,
    acknowledged: bool,
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            acknowledged: true,
        }
    }

    /// A store whose writes are applied but never acknowledged.
    /// Duplicate inserts are dropped without an error, as nothing is reported back.
    pub fn unacknowledged() -> Self {
        Self {
            data: Vec::new(),
            acknowledged: false,
        }
    }

    pub fn from_documents(data: Vec<Document>) -> Self {
        Self {
            data,
            acknowledged: true,
        }
    }

    pub fn iter(&self, filter: &Filter) -> MemStoreIter<'_> {
        MemStoreIter {
            inner: &self.data,
            filter: filter.clone(),
            idx: 0,
        }
    }

    fn position(&self, filter: &Filter) -> Option<usize> {
        self.data.iter().position(|doc| filter.matches(doc))
    }
}

pub struct MemStoreIter<'a> {
    inner: &'a [Document],
    filter: Filter,
    idx: usize,
}

impl Iterator for MemStoreIter<'_> {
    type Item = Result<Contact, AppError>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.idx < self.inner.len() {
            let doc = &self.inner[self.idx];
            self.idx += 1;
            if self.filter.matches(doc) {
                return Some(document::decode(doc));
            }
        }
        None
    }
}

impl ContactStore for MemStore {
    fn insert_one(&mut self, contact: &Contact) -> Result<InsertOneResult, AppError> {
        if self.position(&Filter::Id(contact.id)).is_some() {
            if self.acknowledged {
                return Err(AppError::DuplicateIdentifier(contact.id));
            }
            tracing::warn!(id = contact.id, "unacknowledged insert dropped duplicate id");
            return Ok(InsertOneResult {
                acknowledged: false,
                inserted_id: contact.id,
            });
        }

        self.data.push(document::to_document(contact)?);
        Ok(InsertOneResult {
            acknowledged: self.acknowledged,
            inserted_id: contact.id,
        })
    }

    fn find_one(&self, filter: &Filter) -> Result<Option<Contact>, AppError> {
        self.iter(filter).next().transpose()
    }

    fn find(&self, filter: &Filter) -> Result<Cursor<'_>, AppError> {
        Ok(Box::new(self.iter(filter)))
    }

    fn update_one(
        &mut self,
        filter: &Filter,
        update: &FieldUpdate,
    ) -> Result<UpdateResult, AppError> {
        let (matched_count, modified_count) = match self.position(filter) {
            Some(idx) => (1, u64::from(document::apply_update(&mut self.data[idx], update))),
            None => (0, 0),
        };

        Ok(UpdateResult {
            acknowledged: self.acknowledged,
            matched_count,
            modified_count,
        })
    }

    fn delete_one(&mut self, filter: &Filter) -> Result<DeleteResult, AppError> {
        let deleted_count = match self.position(filter) {
            Some(idx) => {
                self.data.remove(idx);
                1
            }
            None => 0,
        };

        Ok(DeleteResult {
            acknowledged: self.acknowledged,
            deleted_count,
        })
    }

    fn count(&self, filter: &Filter) -> Result<u64, AppError> {
        Ok(self.data.iter().filter(|doc| filter.matches(doc)).count() as u64)
    }

    fn get_medium(&self) -> &str {
        "mem"
    }
}
