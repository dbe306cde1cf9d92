//! Transform errors.

use thiserror::Error;

/// What made an input token sequence impossible to transform.
///
/// Using a code enum keeps the error `Copy` and allocation-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MalformedKind {
    /// `ArrayEnd` with no open array on top of the stack
    UnmatchedArrayEnd = 0,
    /// `ObjectEnd` with no open object on top of the stack
    UnmatchedObjectEnd,
    /// `Property` outside an object
    PropertyOutsideObject,
    /// `Property` followed by another property or the object end
    MissingPropertyValue,
    /// Value directly inside an object with no preceding `Property`
    ValueWithoutProperty,
    /// Input ended with containers still open
    UnclosedContainer,
}

impl MalformedKind {
    /// Get a human-readable message for this error code.
    pub fn message(self) -> &'static str {
        match self {
            Self::UnmatchedArrayEnd => "array end without matching array begin",
            Self::UnmatchedObjectEnd => "object end without matching object begin",
            Self::PropertyOutsideObject => "property outside object",
            Self::MissingPropertyValue => "property without value",
            Self::ValueWithoutProperty => "object value without property",
            Self::UnclosedContainer => "unclosed container at end of input",
        }
    }
}

impl std::fmt::Display for MalformedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Error returned by the transformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransformError {
    /// A required argument was absent.
    #[error("invalid argument: `{param}` must not be absent")]
    InvalidArgument { param: &'static str },

    /// The input token sequence broke the data grammar.
    ///
    /// `index` is the zero-based position of the offending token, or the
    /// input length when the error was detected at end of input.
    #[error("malformed input at token {index}: {kind}")]
    MalformedInput { index: usize, kind: MalformedKind },
}

impl TransformError {
    /// The malformed-input code, if this is a grammar error.
    pub fn malformed_kind(&self) -> Option<MalformedKind> {
        match self {
            TransformError::MalformedInput { kind, .. } => Some(*kind),
            TransformError::InvalidArgument { .. } => None,
        }
    }
}
