use rusty_agenda::prelude::*;
use tempfile::tempdir;

fn ana() -> Contact {
    Contact::new(1, "Ana", 30, "555-1111", "ana@x.com")
}

fn bob() -> Contact {
    Contact::new(2, "Bob", 41, "555-2222", "bob@x.com")
}

fn listed<S: ContactStore>(manager: &ContactManager<S>) -> Result<Vec<Contact>, AppError> {
    match manager.find_all()? {
        Listing::Empty => Ok(Vec::new()),
        Listing::Contacts(cursor) => cursor.collect(),
    }
}

fn check_store<S: ContactStore>(storage: S) -> Result<(), AppError> {
    let mut manager = ContactManager::new(storage);
    assert!(matches!(manager.find_all()?, Listing::Empty));

    assert_eq!(manager.insert(&ana())?.inserted_id, 1);
    assert_eq!(manager.insert(&bob())?.inserted_id, 2);

    // the id stays unique and the first contact is untouched
    let duplicate = Contact::new(1, "Carl", 50, "555-3333", "carl@x.com");
    assert!(matches!(
        manager.insert(&duplicate),
        Err(AppError::DuplicateIdentifier(1))
    ));
    assert_eq!(manager.find_by_name("carl")?, None);
    assert_eq!(listed(&manager)?, vec![ana(), bob()]);

    assert_eq!(manager.find_by_name("  ANA ")?, Some(ana()));

    let result = manager.update_field(1, &FieldUpdate::Age(31))?;
    assert_eq!((result.matched_count, result.modified_count), (1, 1));
    assert_eq!(manager.find_by_name("ana")?.map(|c| c.age), Some(31));

    let result = manager.update_field(1, &FieldUpdate::Age(31))?;
    assert_eq!((result.matched_count, result.modified_count), (1, 0));

    let result = manager.update_field(9, &FieldUpdate::Age(31))?;
    assert_eq!(result.matched_count, 0);

    // each single-field update leaves the other fields and contacts alone
    manager.update_field(1, &FieldUpdate::Phone("555-9999".to_string()))?;
    assert_eq!(
        manager.find_by_name("ana")?,
        Some(Contact::new(1, "ana", 31, "555-9999", "ana@x.com"))
    );

    manager.update_field(1, &FieldUpdate::Name("anna".to_string()))?;
    assert_eq!(manager.find_by_name("ana")?, None);
    assert_eq!(
        manager.find_by_name("anna")?,
        Some(Contact::new(1, "anna", 31, "555-9999", "ana@x.com"))
    );
    assert_eq!(manager.find_by_name("bob")?, Some(bob()));

    assert_eq!(manager.delete_by_id(2)?.deleted_count, 1);
    assert_eq!(manager.delete_by_id(2)?.deleted_count, 0);
    assert_eq!(manager.find_by_name("bob")?, None);
    assert_eq!(listed(&manager)?.len(), 1);
    Ok(())
}

#[test]
fn mem_store_honours_the_contract() -> Result<(), AppError> {
    check_store(MemStore::new())
}

#[test]
fn json_store_honours_the_contract() -> Result<(), AppError> {
    let dir = tempdir()?;
    check_store(JsonStore::open(dir.path().join("contacts.json"))?)
}

#[test]
fn sqlite_store_honours_the_contract() -> Result<(), AppError> {
    check_store(SqliteStore::open_in_memory()?)
}

#[test]
fn boxed_stores_honour_the_contract() -> Result<(), AppError> {
    let dir = tempdir()?;
    let json_path = dir.path().join("data").join("contacts.json");
    let sqlite_path = dir.path().join("data").join("contacts.db");

    for medium in ["mem", "json", "sqlite"] {
        let storage = open_store(StorageMediums::from(medium)?, &json_path, &sqlite_path)?;
        assert_eq!(storage.get_medium(), medium);
        check_store(storage)?;
    }
    Ok(())
}

#[test]
fn file_stores_survive_reopen() -> Result<(), AppError> {
    let dir = tempdir()?;
    let json_path = dir.path().join("contacts.json");
    let sqlite_path = dir.path().join("contacts.db");

    {
        let mut json = ContactManager::new(JsonStore::open(&json_path)?);
        json.insert(&ana())?;
        json.update_field(1, &FieldUpdate::Email("ana@y.com".to_string()))?;

        let mut sqlite = ContactManager::new(SqliteStore::open(&sqlite_path)?);
        sqlite.insert(&ana())?;
        sqlite.update_field(1, &FieldUpdate::Email("ana@y.com".to_string()))?;
    }

    let expected = Contact::new(1, "ana", 30, "555-1111", "ana@y.com");

    let json = ContactManager::new(JsonStore::open(&json_path)?);
    assert_eq!(json.find_by_name("Ana")?, Some(expected.clone()));

    let sqlite = ContactManager::new(SqliteStore::open(&sqlite_path)?);
    assert_eq!(sqlite.find_by_name("Ana")?, Some(expected));
    Ok(())
}

fn walk_scenario<S: ContactStore>(storage: S) -> Result<(), AppError> {
    let mut manager = ContactManager::new(storage);
    manager.insert(&Contact::new(1, "ana", 30, "555-1111", "ana@x.com"))?;

    assert_eq!(manager.find_by_name("Ana")?.map(|c| c.age), Some(30));

    let field = "age".parse::<ContactField>()?;
    manager.update_field(1, &field.parse_value("31")?)?;
    assert_eq!(
        manager.find_by_name("ana")?,
        Some(Contact::new(1, "ana", 31, "555-1111", "ana@x.com"))
    );

    assert!(matches!(
        "id".parse::<ContactField>(),
        Err(AppError::ImmutableField(_))
    ));

    manager.delete_by_id(1)?;
    assert_eq!(manager.find_by_name("ana")?, None);
    Ok(())
}

#[test]
fn scenario_runs_on_every_store() -> Result<(), AppError> {
    let dir = tempdir()?;

    walk_scenario(MemStore::new())?;
    walk_scenario(JsonStore::open(dir.path().join("contacts.json"))?)?;
    walk_scenario(SqliteStore::open_in_memory()?)
}
