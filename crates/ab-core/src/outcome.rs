//! Ordinary results of board operations.
//!
//! Each variant renders as the exact plain-text body clients expect.

use std::fmt;

/// Status of a report or delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Reported,
    Success,
    IncorrectPassword,
    ThreadNotFound,
    ReplyNotFound,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Reported => "reported",
            Outcome::Success => "success",
            Outcome::IncorrectPassword => "incorrect password",
            Outcome::ThreadNotFound => "Thread not found",
            Outcome::ReplyNotFound => "Reply not found",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an operation that returns a document when its thread exists.
#[derive(Debug, Clone, PartialEq)]
pub enum Found<T> {
    Found(T),
    ThreadNotFound,
}

impl<T> Found<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Found::Found(value) => Some(value),
            Found::ThreadNotFound => None,
        }
    }
}

impl<T> From<Option<T>> for Found<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Found::Found(value),
            None => Found::ThreadNotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_render_client_text() {
        assert_eq!(Outcome::Reported.to_string(), "reported");
        assert_eq!(Outcome::Success.to_string(), "success");
        assert_eq!(Outcome::IncorrectPassword.to_string(), "incorrect password");
        assert_eq!(Outcome::ThreadNotFound.to_string(), "Thread not found");
        assert_eq!(Outcome::ReplyNotFound.to_string(), "Reply not found");
    }
}
