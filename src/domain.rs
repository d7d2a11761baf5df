pub mod contact;
pub mod manager;

pub use contact::{Contact, ContactField, FieldUpdate};
pub use manager::{ContactManager, Listing};

/// Menu options, numbered as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    Create,
    Search,
    ShowAll,
    Update,
    Delete,
}

impl Command {
    pub fn from_option(option: i64) -> Option<Self> {
        match option {
            0 => Some(Command::Exit),
            1 => Some(Command::Create),
            2 => Some(Command::Search),
            3 => Some(Command::ShowAll),
            4 => Some(Command::Update),
            5 => Some(Command::Delete),
            _ => None,
        }
    }
}
