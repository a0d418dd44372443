use crate::NameError;

#[derive(thiserror::Error, Debug)]
pub enum CreateError {
    #[error("conflict")]
    Conflict,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(thiserror::Error, Debug)]
pub enum UpdateError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(thiserror::Error, Debug)]
pub enum ImportError {
    #[error("malformed import: {0}")]
    Malformed(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("failed to serialize {0}")]
    Serialization(String),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error(transparent)]
    InvalidName(#[from] NameError),
    #[error("Weight and reps must both be greater than zero")]
    NoWork,
}

#[derive(thiserror::Error, Debug)]
pub enum SaveError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("conflict")]
    Conflict,
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<CreateError> for SaveError {
    fn from(value: CreateError) -> Self {
        match value {
            CreateError::Conflict => SaveError::Conflict,
            CreateError::Storage(storage) => SaveError::Storage(storage),
        }
    }
}

impl From<UpdateError> for SaveError {
    fn from(value: UpdateError) -> Self {
        match value {
            UpdateError::NotFound => SaveError::NotFound,
            UpdateError::Storage(storage) => SaveError::Storage(storage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_error_from_create_error() {
        assert!(matches!(
            SaveError::from(CreateError::Conflict),
            SaveError::Conflict
        ));
        assert!(matches!(
            SaveError::from(CreateError::Storage(StorageError::Other("foo".into()))),
            SaveError::Storage(StorageError::Other(error)) if error.to_string() == "foo"
        ));
    }

    #[test]
    fn test_save_error_from_update_error() {
        assert!(matches!(
            SaveError::from(UpdateError::NotFound),
            SaveError::NotFound
        ));
        assert!(matches!(
            SaveError::from(UpdateError::Storage(StorageError::Serialization(
                "workouts".to_string()
            ))),
            SaveError::Storage(StorageError::Serialization(key)) if key == "workouts"
        ));
    }

    #[test]
    fn test_save_error_from_validation_error() {
        assert!(matches!(
            SaveError::from(ValidationError::NoWork),
            SaveError::Validation(ValidationError::NoWork)
        ));
    }
}
