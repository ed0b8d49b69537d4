//! Generation-time failures. Any of these aborts the validator of the
//! structure being generated; nothing emitted for that structure is usable.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodegenError {
    /// Type category the generator cannot validate, or an integer width
    /// outside {8, 16, 32, 64}.
    #[error("validator error: unsupported type: {ty}")]
    UnsupportedType { ty: String },

    /// Only `len` is a known rule function.
    #[error("validator error: unsupported function: {name}")]
    UnsupportedFunction { name: String },

    #[error("unknown validation rule `{key}`")]
    UnknownRule { key: String },

    #[error("annotation `{key}` is malformed: {reason}")]
    MalformedAnnotation { key: String, reason: String },

    #[error("rule {rule} cannot be applied to {ty}")]
    InapplicableRule { rule: &'static str, ty: String },

    #[error("rule {rule}: `{value}` is not a valid {expected}")]
    InvalidLiteral {
        rule: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("literal {value} does not fit in a {width}-bit integer")]
    LiteralOutOfRange { value: i64, width: u8 },

    #[error("rule {rule}: invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        rule: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// `$name` points at a field the enclosing struct does not declare.
    #[error("reference to unknown field `{field}`")]
    UnknownField { field: String },

    #[error("rule {rule}: field `{field}` must be {expected}")]
    InvalidReference {
        rule: &'static str,
        field: String,
        expected: &'static str,
    },

    #[error("{strukt}.{field}: {source}")]
    Field {
        strukt: String,
        field: String,
        #[source]
        source: Box<CodegenError>,
    },
}

impl CodegenError {
    pub(crate) fn in_field(self, strukt: &str, field: &str) -> Self {
        CodegenError::Field {
            strukt: strukt.to_string(),
            field: field.to_string(),
            source: Box::new(self),
        }
    }
}

pub type Result<T, E = CodegenError> = std::result::Result<T, E>;
