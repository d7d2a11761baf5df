//! Document representation shared by the in-memory and JSON file stores.
//!
//! Contacts are kept as JSON objects keyed by the collection field names
//! (`_id`, `name`, `age`, `phone`, `email`). Filters and single-field
//! updates operate on these objects, and every read decodes the object back
//! into a [`Contact`] before it leaves the store.

use crate::domain::contact::{Contact, FieldUpdate, ID_KEY, NAME_KEY};
use crate::errors::AppError;
use serde_json::{Map, Value};

pub type Document = Map<String, Value>;

/// Equality filter over stored contacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    Id(i64),
    Name(String),
}

impl Filter {
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Id(id) => document_id(doc) == Some(*id),
            Filter::Name(name) => doc.get(NAME_KEY).and_then(Value::as_str) == Some(name.as_str()),
        }
    }
}

pub fn to_document(contact: &Contact) -> Result<Document, AppError> {
    match serde_json::to_value(contact)? {
        Value::Object(doc) => Ok(doc),
        other => Err(AppError::MalformedDocument(format!(
            "contact serialized to {other}"
        ))),
    }
}

pub fn decode(doc: &Document) -> Result<Contact, AppError> {
    serde_json::from_value(Value::Object(doc.clone())).map_err(|e| {
        let id = doc
            .get(ID_KEY)
            .map(Value::to_string)
            .unwrap_or_else(|| "<missing>".to_string());
        AppError::MalformedDocument(format!("document {ID_KEY}={id}: {e}"))
    })
}

pub fn document_id(doc: &Document) -> Option<i64> {
    doc.get(ID_KEY).and_then(Value::as_i64)
}

/// Sets one field on the document. Returns whether the stored value changed.
pub fn apply_update(doc: &mut Document, update: &FieldUpdate) -> bool {
    let key = update.field().key();
    let value = update.to_json();

    if doc.get(key) == Some(&value) {
        return false;
    }
    doc.insert(key.to_string(), value);
    true
}
