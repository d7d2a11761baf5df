pub use crate::cli::{Console, command::Cli, run::run_app, run::run_menu};
pub use crate::domain::{Command, Contact, ContactField, ContactManager, FieldUpdate, Listing};
pub use crate::errors::AppError;
pub use crate::store::{
    self, ContactStore, Filter, JsonStore, MemStore, SqliteStore, StorageMediums, open_store,
};
