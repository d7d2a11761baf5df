use crate::domain::contact::{Contact, FieldUpdate, normalize};
use crate::errors::AppError;
use crate::store::{ContactStore, Cursor, DeleteResult, Filter, InsertOneResult, UpdateResult};

/// Result of listing every contact.
///
/// The emptiness check happens before any enumeration so callers can print
/// a "no data" message without touching a cursor.
pub enum Listing<'a> {
    Empty,
    Contacts(Cursor<'a>),
}

/// Facade over a contact store. The store is injected and owned here.
pub struct ContactManager<S: ContactStore> {
    storage: S,
}

impl<S: ContactStore> ContactManager<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn medium(&self) -> &str {
        self.storage.get_medium()
    }

    /// Persists a new contact. Fails with `DuplicateIdentifier` when the store
    /// already holds the id.
    pub fn insert(&mut self, contact: &Contact) -> Result<InsertOneResult, AppError> {
        match self.storage.insert_one(contact) {
            Ok(result) => {
                if result.acknowledged {
                    tracing::info!(id = result.inserted_id, "contact inserted");
                } else {
                    tracing::warn!(id = result.inserted_id, "insert not acknowledged");
                }
                Ok(result)
            }
            Err(AppError::DuplicateIdentifier(id)) => {
                tracing::warn!(id, "insert rejected, id already exists");
                Err(AppError::DuplicateIdentifier(id))
            }
            Err(e) => Err(e),
        }
    }

    /// First contact with this name in store order.
    pub fn find_by_name(&self, name: &str) -> Result<Option<Contact>, AppError> {
        let name = normalize(name);
        let found = self.storage.find_one(&Filter::Name(name.clone()))?;
        tracing::debug!(%name, found = found.is_some(), "find by name");
        Ok(found)
    }

    pub fn find_all_by_name(&self, name: &str) -> Result<Vec<Contact>, AppError> {
        self.storage
            .find(&Filter::Name(normalize(name)))?
            .collect()
    }

    pub fn find_all(&self) -> Result<Listing<'_>, AppError> {
        if self.storage.count(&Filter::All)? == 0 {
            return Ok(Listing::Empty);
        }
        Ok(Listing::Contacts(self.storage.find(&Filter::All)?))
    }

    pub fn update_field(&mut self, id: i64, update: &FieldUpdate) -> Result<UpdateResult, AppError> {
        let result = self.storage.update_one(&Filter::Id(id), update)?;
        tracing::info!(
            id,
            field = update.field().key(),
            matched = result.matched_count,
            modified = result.modified_count,
            acknowledged = result.acknowledged,
            "contact updated"
        );
        Ok(result)
    }

    pub fn delete_by_id(&mut self, id: i64) -> Result<DeleteResult, AppError> {
        let result = self.storage.delete_one(&Filter::Id(id))?;
        tracing::info!(
            id,
            deleted = result.deleted_count,
            acknowledged = result.acknowledged,
            "contact deleted"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;

    fn ana() -> Contact {
        Contact::new(1, "ana", 30, "555-1111", "ana@x.com")
    }

    fn manager_with(contacts: &[Contact]) -> Result<ContactManager<MemStore>, AppError> {
        let mut manager = ContactManager::new(MemStore::new());
        for contact in contacts {
            manager.insert(contact)?;
        }
        Ok(manager)
    }

    #[test]
    fn finds_by_name_case_insensitively() -> Result<(), AppError> {
        let manager = manager_with(&[ana()])?;

        assert_eq!(manager.find_by_name("Ana")?, Some(ana()));
        assert_eq!(manager.find_by_name("  ANA ")?, Some(ana()));
        assert_eq!(manager.find_by_name("bob")?, None);
        Ok(())
    }

    #[test]
    fn duplicate_insert_keeps_first() -> Result<(), AppError> {
        let mut manager = manager_with(&[ana()])?;

        let result = manager.insert(&Contact::new(1, "bob", 40, "555-2222", "bob@x.com"));
        assert!(matches!(result, Err(AppError::DuplicateIdentifier(1))));
        assert_eq!(manager.find_by_name("bob")?, None);
        assert_eq!(manager.find_by_name("ana")?, Some(ana()));
        Ok(())
    }

    #[test]
    fn empty_store_lists_nothing() -> Result<(), AppError> {
        let manager = manager_with(&[])?;

        assert!(matches!(manager.find_all()?, Listing::Empty));
        Ok(())
    }

    #[test]
    fn listing_yields_every_contact() -> Result<(), AppError> {
        let bob = Contact::new(2, "bob", 40, "555-2222", "bob@x.com");
        let manager = manager_with(&[ana(), bob.clone()])?;

        let Listing::Contacts(cursor) = manager.find_all()? else {
            panic!("expected contacts");
        };
        let contacts = cursor.collect::<Result<Vec<_>, _>>()?;
        assert_eq!(contacts, vec![ana(), bob]);
        Ok(())
    }

    #[test]
    fn update_changes_one_field() -> Result<(), AppError> {
        let mut manager = manager_with(&[ana()])?;

        let result = manager.update_field(1, &FieldUpdate::Email("ana@y.com".to_string()))?;
        assert_eq!(result.matched_count, 1);
        assert!(result.acknowledged);

        let updated = manager.find_by_name("ana")?;
        assert_eq!(
            updated,
            Some(Contact::new(1, "ana", 30, "555-1111", "ana@y.com"))
        );
        Ok(())
    }

    #[test]
    fn renaming_moves_the_lookup_key() -> Result<(), AppError> {
        let mut manager = manager_with(&[ana()])?;

        manager.update_field(1, &FieldUpdate::Name("anna".to_string()))?;
        assert_eq!(manager.find_by_name("ana")?, None);
        assert_eq!(manager.find_by_name("anna")?.map(|c| c.id), Some(1));
        Ok(())
    }

    #[test]
    fn duplicate_names_are_all_returned() -> Result<(), AppError> {
        let twin = Contact::new(2, "ana", 50, "555-3333", "ana2@x.com");
        let manager = manager_with(&[ana(), twin.clone()])?;

        assert_eq!(manager.find_all_by_name("Ana")?, vec![ana(), twin]);
        assert_eq!(manager.find_by_name("ana")?.map(|c| c.id), Some(1));
        Ok(())
    }

    #[test]
    fn delete_then_not_found() -> Result<(), AppError> {
        let mut manager = manager_with(&[ana()])?;

        assert_eq!(manager.delete_by_id(1)?.deleted_count, 1);
        assert_eq!(manager.find_by_name("ana")?, None);
        assert!(matches!(manager.find_all()?, Listing::Empty));
        Ok(())
    }
}
