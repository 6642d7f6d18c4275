use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    NotFound,
    AlreadyExists,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    id: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            id: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(id) = &self.id {
            write!(f, " (id: {id})")?;
        }
        Ok(())
    }
}

impl StdError for Error {}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn display_includes_message_and_id() {
        let err = Error::new(ErrorKind::AlreadyExists)
            .with_message("record already present")
            .with_id("id42");
        let rendered = err.to_string();
        assert!(rendered.contains("AlreadyExists"));
        assert!(rendered.contains("record already present"));
        assert!(rendered.contains("id42"));
    }

    #[test]
    fn kind_is_preserved() {
        let err = Error::new(ErrorKind::NotFound);
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
