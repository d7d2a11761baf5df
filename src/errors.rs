use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error while accessing a file or resource: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid number format: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    #[error("Unrecognized command: '{0}'")]
    ParseCommand(String),

    #[error("The id {0} already exists")]
    DuplicateIdentifier(i64),

    #[error("{0} Not found")]
    NotFound(String),

    /// The `id` of a contact can never be changed.
    #[error("Field '{0}' is immutable")]
    ImmutableField(String),

    #[error("Field {0} does not exist")]
    UnknownField(String),

    /// A stored document could not be decoded into a full contact.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Console input reached end of stream.
    #[error("Input closed")]
    InputClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_parse_int_error_message() {
        let wrong_string = "abc".parse::<i64>().unwrap_err();
        let err = AppError::ParseInt(wrong_string);

        assert!(format!("{}", err).contains("Invalid number format: "));
    }

    #[test]
    fn duplicate_identifier_names_the_id() {
        let err = AppError::DuplicateIdentifier(7);

        assert_eq!(format!("{}", err), "The id 7 already exists");
    }

    #[test]
    fn confirm_not_found_message() {
        let err = AppError::NotFound("Contact".to_string());

        assert_eq!(format!("{}", err), "Contact Not found");
    }
}
