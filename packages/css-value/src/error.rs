use thiserror::Error;
use webwriter_common::CommonError;
use webwriter_parser::{Location, ParseError};

pub type ValueResult<T> = Result<T, ValueError>;

/// Failure to interpret a concrete CSS value
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Unknown CSS function '{name}' at {location}")]
    UnknownFunction { name: String, location: Location },

    #[error("Invalid arguments to '{function}()': {message}")]
    InvalidArguments { function: String, message: String },

    #[error("Invalid color '{0}'")]
    InvalidColor(String),

    #[error("Invalid number '{0}'")]
    InvalidNumber(String),

    #[error("Unknown CSS property '{0}'")]
    UnknownProperty(String),
}

impl ValueError {
    pub fn invalid_arguments(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            function: function.into(),
            message: message.into(),
        }
    }
}

impl From<ValueError> for CommonError {
    fn from(error: ValueError) -> Self {
        match error {
            ValueError::Parse(e) => CommonError::Parse(e),
            other => CommonError::Value(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CssCompositeValue;

    #[test]
    fn test_into_common_error() {
        let error = CssCompositeValue::parse("1px ) 2px").expect_err("stray paren");
        assert!(matches!(CommonError::from(error), CommonError::Parse(_)));

        let error = CssCompositeValue::parse("#zz").expect_err("bad hex");
        assert!(matches!(CommonError::from(error), CommonError::Value(message) if message.contains("zz")));
    }
}
