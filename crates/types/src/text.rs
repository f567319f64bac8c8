/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The trimmed input is shorter than the required number of characters
    #[error("Text must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },
}

/// Search text that is trimmed and long enough to be worth sending to the backend.
///
/// Length is counted in characters, not bytes, so a query such as `"हृदय"` is measured the
/// way a user typing it would count it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryText(String);

impl QueryText {
    /// Creates a new `QueryText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. An empty result returns
    /// [`TextError::Empty`]; a result with fewer than `min_chars` characters returns
    /// [`TextError::TooShort`].
    pub fn new(input: impl AsRef<str>, min_chars: usize) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        let actual = trimmed.chars().count();
        if actual < min_chars {
            return Err(TextError::TooShort {
                min: min_chars,
                actual,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QueryText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for QueryText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for QueryText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}
