use std::fmt;
use std::str::FromStr;

use crate::errors::AppError;
use serde::{Deserialize, Serialize};

pub const ID_KEY: &str = "_id";
pub const NAME_KEY: &str = "name";
pub const AGE_KEY: &str = "age";
pub const PHONE_KEY: &str = "phone";
pub const EMAIL_KEY: &str = "email";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub phone: String,
    pub email: String,
}

impl Contact {
    /// Builds a contact with its free-text fields normalized the way they are stored.
    pub fn new(id: i64, name: &str, age: i64, phone: &str, email: &str) -> Self {
        Contact {
            id,
            name: normalize(name),
            age,
            phone: normalize(phone),
            email: normalize(email),
        }
    }

    /// Name with the first letter upper-cased, for display.
    pub fn display_name(&self) -> String {
        capitalize(&self.name)
    }

    pub fn with_update(mut self, update: &FieldUpdate) -> Self {
        match update {
            FieldUpdate::Name(name) => self.name = name.clone(),
            FieldUpdate::Age(age) => self.age = *age,
            FieldUpdate::Phone(phone) => self.phone = phone.clone(),
            FieldUpdate::Email(email) => self.email = email.clone(),
        }
        self
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID:    {}\n\
            Name:  {}\n\
            Age:   {}\n\
            Phone: {}\n\
            Email: {}",
            self.id,
            self.display_name(),
            self.age,
            self.phone,
            self.email
        )
    }
}

/// The fields of a contact that may be replaced after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Age,
    Phone,
    Email,
}

impl ContactField {
    pub fn key(&self) -> &'static str {
        match self {
            ContactField::Name => NAME_KEY,
            ContactField::Age => AGE_KEY,
            ContactField::Phone => PHONE_KEY,
            ContactField::Email => EMAIL_KEY,
        }
    }

    /// Turns the raw console value into an update for this field.
    pub fn parse_value(&self, raw: &str) -> Result<FieldUpdate, AppError> {
        let update = match self {
            ContactField::Name => FieldUpdate::Name(normalize(raw)),
            ContactField::Age => FieldUpdate::Age(raw.trim().parse::<i64>()?),
            ContactField::Phone => FieldUpdate::Phone(normalize(raw)),
            ContactField::Email => FieldUpdate::Email(normalize(raw)),
        };
        Ok(update)
    }
}

impl FromStr for ContactField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = s.trim().to_lowercase();

        match field.as_str() {
            "id" | ID_KEY => Err(AppError::ImmutableField(field)),
            NAME_KEY => Ok(ContactField::Name),
            AGE_KEY => Ok(ContactField::Age),
            PHONE_KEY | "phone number" => Ok(ContactField::Phone),
            EMAIL_KEY | "e-mail" => Ok(ContactField::Email),
            _ => Err(AppError::UnknownField(field)),
        }
    }
}

/// A replacement value for exactly one contact field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Name(String),
    Age(i64),
    Phone(String),
    Email(String),
}

impl FieldUpdate {
    pub fn field(&self) -> ContactField {
        match self {
            FieldUpdate::Name(_) => ContactField::Name,
            FieldUpdate::Age(_) => ContactField::Age,
            FieldUpdate::Phone(_) => ContactField::Phone,
            FieldUpdate::Email(_) => ContactField::Email,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldUpdate::Age(age) => serde_json::Value::from(*age),
            FieldUpdate::Name(s) | FieldUpdate::Phone(s) | FieldUpdate::Email(s) => {
                serde_json::Value::from(s.as_str())
            }
        }
    }
}

pub fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
