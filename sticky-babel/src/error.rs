use crate::common::flat_to_nested::ConversionError;
use crate::ir::nodes::TreeError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("unknown format '{0}'")]
    FormatNotFound(String),
    #[error("cannot read input: {0}")]
    ParseError(String),
    #[error("cannot write output: {0}")]
    SerializationError(String),
    #[error("format '{format}' cannot {operation}")]
    NotSupported {
        format: String,
        operation: &'static str,
    },
}

impl FormatError {
    pub(crate) fn cannot_parse(format: &str) -> Self {
        FormatError::NotSupported {
            format: format.to_string(),
            operation: "parse",
        }
    }

    pub(crate) fn cannot_serialize(format: &str) -> Self {
        FormatError::NotSupported {
            format: format.to_string(),
            operation: "serialize",
        }
    }
}

/// A reader whose event stream the assembler rejects produced unusable input.
impl From<ConversionError> for FormatError {
    fn from(err: ConversionError) -> Self {
        FormatError::ParseError(err.to_string())
    }
}

/// Writers refuse trees that fail validation.
impl From<TreeError> for FormatError {
    fn from(err: TreeError) -> Self {
        FormatError::SerializationError(err.to_string())
    }
}
