/// A location's inputs can't be scored.
///
/// This is the only hard failure in scoring. Out-of-range indicator values are
/// clamped instead and never produce one of these.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{location}: name must not be empty")]
    EmptyName { location: String },

    #[error("{location}: missing required field '{field}'")]
    Missing { location: String, field: &'static str },

    #[error("{location}: field '{field}' is not numeric ('{value}')")]
    NotNumeric {
        location: String,
        field: &'static str,
        value: String,
    },

    #[error("{location}: field '{field}' is not a finite number")]
    NotFinite { location: String, field: &'static str },

    #[error("{location}: field '{field}' = {value} is outside the valid range")]
    OutOfRange {
        location: String,
        field: &'static str,
        value: f64,
    },
}

impl ValidationError {
    /// The offending field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyName { .. } => "name",
            ValidationError::Missing { field, .. }
            | ValidationError::NotNumeric { field, .. }
            | ValidationError::NotFinite { field, .. }
            | ValidationError::OutOfRange { field, .. } => field,
        }
    }
}
