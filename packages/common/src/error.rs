use thiserror::Error;
use webwriter_parser::ParseError;

/// Error of any webwriter stage, for callers that chain them
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Resolve error: {0}")]
    Resolve(String),

    #[error("Value error: {0}")]
    Value(String),
}

pub type CommonResult<T> = Result<T, CommonError>;
