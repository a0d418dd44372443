use derive_more::Display;

/// A validated exercise name as entered by the user.
#[derive(Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub const MAX_LEN: usize = 64;

    pub fn new(name: &str) -> Result<Self, NameError> {
        let name = name.trim();
        match name.chars().count() {
            0 => Err(NameError::Empty),
            len if len > Self::MAX_LEN => Err(NameError::TooLong(len)),
            _ => Ok(Name(name.to_string())),
        }
    }
}

impl From<Name> for String {
    fn from(value: Name) -> Self {
        value.0
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("Exercise name must not be empty")]
    Empty,
    #[error("Exercise name must be 64 characters or fewer ({0} > 64)")]
    TooLong(usize),
}
