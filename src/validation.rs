use thiserror::Error;

pub const MAX_QUERY_CHARS: usize = 100;

// Characters that are rejected outright, never stripped
pub const FORBIDDEN_CHARS: [char; 5] = ['<', '>', '"', '\'', '&'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Query must be a string")]
    TypeMismatch,

    #[error("Query too long (max 100 characters)")]
    TooLong,

    #[error("Invalid characters in query")]
    IllegalCharacters,
}

/// Checks a raw search query before it is allowed anywhere near the dataset.
///
/// Length is counted in UTF-16 code units, so characters outside the BMP
/// count twice. `TypeMismatch` is produced by
/// the endpoint when the `q` parameter cannot be read as a single string.
pub fn validate(query: &str) -> Result<(), ValidationError> {
    if query.encode_utf16().count() > MAX_QUERY_CHARS {
        return Err(ValidationError::TooLong);
    }

    if query.contains(FORBIDDEN_CHARS) {
        return Err(ValidationError::IllegalCharacters);
    }

    Ok(())
}
