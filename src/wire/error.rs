use std::io;

/// Errors raised by a [`WireWriter`](super::WireWriter) when it is driven out of order
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    /// A value was written inside a document without a preceding field name
    #[error("a field name must be written before a value inside a document")]
    NameExpected,

    /// A field name was written while not inside a document
    #[error("field name '{name}' written outside of a document")]
    UnexpectedName { name: String },

    /// A field name was written, or a document closed, while a name still waits for its value
    #[error("field '{name}' has no value")]
    ValueExpected { name: String },

    /// The same field name was written twice in one document
    #[error("field '{name}' appears more than once in a document")]
    DuplicateName { name: String },

    /// An end call that does not match the innermost open container
    #[error("cannot end {requested}: innermost open container is {open}")]
    UnbalancedEnd {
        requested: &'static str,
        open: &'static str,
    },

    /// A second top-level value was written
    #[error("a top-level value has already been written")]
    RootAlreadyWritten,

    /// The output was taken while containers were still open or before anything was written
    #[error("output is incomplete: {open} container(s) still open")]
    Incomplete { open: usize },

    /// The underlying sink failed
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl WriteError {
    /// Create an UnexpectedName error
    pub fn unexpected_name(name: impl Into<String>) -> Self {
        Self::UnexpectedName { name: name.into() }
    }

    /// Create a ValueExpected error
    pub fn value_expected(name: impl Into<String>) -> Self {
        Self::ValueExpected { name: name.into() }
    }

    /// Create a DuplicateName error
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName { name: name.into() }
    }

    /// Create an UnbalancedEnd error
    pub fn unbalanced_end(requested: &'static str, open: &'static str) -> Self {
        Self::UnbalancedEnd { requested, open }
    }
}

impl From<io::Error> for WriteError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}
