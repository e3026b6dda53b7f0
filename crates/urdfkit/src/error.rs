//! Error types for urdfkit

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn at(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }

    /// Whether the span points into source text
    pub const fn is_empty(&self) -> bool {
        self.start.line == 0
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Type name or tag that the registry does not know
    UnknownElementType { type_name: String },
    /// Required attribute, child, choice group or text is absent
    MissingRequiredField { element: String, field: String },
    /// Child that the parent's schema does not allow in this position
    UnexpectedChild { parent: String, child: String },
    /// Value that cannot be read as the declared kind
    TypeMismatch {
        element: String,
        field: String,
        expected: String,
        found: String,
    },
    /// Attribute that the element's schema does not declare
    UnknownAttribute { element: String, attribute: String },
    /// Value that has the right shape but breaks a domain rule
    InvalidValue { field: String, reason: String },
    /// Syntax error before tag structure can be recovered
    MalformedDocument,
    MaxDepthExceeded { max: u16 },
    MaxSizeExceeded { max: usize },
    InvalidIndentation { max: usize },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownElementType { type_name } => {
                write!(f, "unknown element type: {type_name}")
            }
            Self::MissingRequiredField { element, field } => {
                write!(f, "<{element}> is missing required {field}")
            }
            Self::UnexpectedChild { parent, child } => {
                write!(f, "unexpected <{child}> inside <{parent}>")
            }
            Self::TypeMismatch {
                element,
                field,
                expected,
                found,
            } => write!(
                f,
                "<{element}> {field}: expected {expected}, found {found:?}"
            ),
            Self::UnknownAttribute { element, attribute } => {
                write!(f, "<{element}> has no attribute {attribute:?}")
            }
            Self::InvalidValue { field, reason } => write!(f, "invalid {field}: {reason}"),
            Self::MalformedDocument => write!(f, "malformed document"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
            Self::InvalidIndentation { max } => {
                write!(f, "indentation exceeds maximum of {max} spaces")
            }
        }
    }
}

/// Main error type for urdfkit
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Create error without a source position
    pub fn detached(kind: ErrorKind) -> Self {
        Self::new(kind, Span::empty())
    }

    /// Create a malformed-document error at a position
    pub fn malformed(pos: Pos, message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::MalformedDocument, Span::at(pos), message)
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Attach a source position if the error has none yet
    #[must_use]
    pub fn or_at(mut self, pos: Pos) -> Self {
        if self.span.is_empty() {
            self.span = Span::at(pos);
        }
        self
    }

    pub(crate) fn unknown_type(type_name: &str) -> Self {
        Self::detached(ErrorKind::UnknownElementType {
            type_name: type_name.to_string(),
        })
    }

    pub(crate) fn missing(element: &str, field: impl Into<String>) -> Self {
        Self::detached(ErrorKind::MissingRequiredField {
            element: element.to_string(),
            field: field.into(),
        })
    }

    pub(crate) fn unexpected_child(parent: &str, child: &str) -> Self {
        Self::detached(ErrorKind::UnexpectedChild {
            parent: parent.to_string(),
            child: child.to_string(),
        })
    }

    pub(crate) fn type_mismatch(
        element: &str,
        field: &str,
        expected: impl fmt::Display,
        found: impl Into<String>,
    ) -> Self {
        Self::detached(ErrorKind::TypeMismatch {
            element: element.to_string(),
            field: field.to_string(),
            expected: expected.to_string(),
            found: found.into(),
        })
    }

    pub(crate) fn unknown_attribute(element: &str, attribute: &str) -> Self {
        Self::detached(ErrorKind::UnknownAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        })
    }

    pub(crate) fn invalid_value(field: &str, reason: impl Into<String>) -> Self {
        Self::detached(ErrorKind::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "error at {}: {}", self.span.start, self.message)
        }
    }
}

/// Result type alias for urdfkit
pub type Result<T> = std::result::Result<T, Error>;
