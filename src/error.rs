use thiserror::Error;

use crate::{
    dialect::{Dialect, Operation},
    schema::FieldType,
};

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("{0}")]
    Parse(String),

    #[error("field `{0}` is not in schema")]
    UnknownField(String),

    #[error("field `{field}` of type {ty}: {reason}")]
    TypeMismatch {
        field: String,
        ty: FieldType,
        reason: String,
    },

    #[error("field `{field}`: phrase fuzzy query `{value}` is not supported")]
    UnsupportedFuzzyPhrase { field: String, value: String },

    #[error("{dialect} does not support {op} query `{value}` on field `{field}`")]
    DialectUnsupportedOperation {
        dialect: Dialect,
        op: Operation,
        field: String,
        value: String,
    },

    #[error("field `{field}`: invalid date `{value}`: {reason}")]
    DateParseFailure {
        field: String,
        value: String,
        reason: String,
    },

    #[error("malformed query: {0}")]
    MalformedQuery(String),

    #[error("invalid mapping: {0}")]
    Mapping(String),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("failed to write query: `{0}`")]
    Format(#[from] std::fmt::Error),
}

impl<'a> From<crate::parser::Error<&'a str>> for Error {
    fn from(e: crate::parser::Error<&'a str>) -> Self {
        Self::Parse(e.into_stack_trace())
    }
}

impl Error {
    pub(crate) fn type_mismatch<R: Into<String>>(field: &str, ty: FieldType, reason: R) -> Self {
        Self::TypeMismatch {
            field: field.to_string(),
            ty,
            reason: reason.into(),
        }
    }
}
