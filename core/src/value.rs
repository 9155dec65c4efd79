//! Optional value container with a fallible accessor.

use crate::error::InvalidValueError;

/// A value that may not have been reported yet.
///
/// Unlike a bare `Option`, reading an absent value through [`ValidValue::get`]
/// is treated as a contract violation and yields [`InvalidValueError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidValue<T> {
    #[default]
    Absent,
    Present(T),
}

impl<T> ValidValue<T> {
    pub fn new(value: T) -> Self {
        ValidValue::Present(value)
    }

    pub fn absent() -> Self {
        ValidValue::Absent
    }

    /// Store `value`, replacing anything already present.
    pub fn set(&mut self, value: T) {
        *self = ValidValue::Present(value);
    }

    pub fn is_present(&self) -> bool {
        matches!(self, ValidValue::Present(_))
    }

    pub fn get(&self) -> Result<&T, InvalidValueError> {
        match self {
            ValidValue::Present(value) => Ok(value),
            ValidValue::Absent => Err(InvalidValueError),
        }
    }

    pub fn into_inner(self) -> Result<T, InvalidValueError> {
        match self {
            ValidValue::Present(value) => Ok(value),
            ValidValue::Absent => Err(InvalidValueError),
        }
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            ValidValue::Present(value) => Some(value),
            ValidValue::Absent => None,
        }
    }
}

impl<T> From<Option<T>> for ValidValue<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => ValidValue::Present(v),
            None => ValidValue::Absent,
        }
    }
}

impl<T> From<ValidValue<T>> for Option<T> {
    fn from(value: ValidValue<T>) -> Self {
        match value {
            ValidValue::Present(v) => Some(v),
            ValidValue::Absent => None,
        }
    }
}
