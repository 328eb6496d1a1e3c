use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MalformedInput,
    ReferentialIntegrity,
    EmptyGraph,
    NumericInstability,
    Internal,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCode::MalformedInput => "MALFORMED_INPUT",
            ErrorCode::ReferentialIntegrity => "REFERENTIAL_INTEGRITY",
            ErrorCode::EmptyGraph => "EMPTY_GRAPH",
            ErrorCode::NumericInstability => "NUMERIC_INSTABILITY",
            ErrorCode::Internal => "INTERNAL",
        };
        write!(f, "{}", s)
    }
}

pub trait ChainsightError: std::error::Error {
    fn error_code(&self) -> ErrorCode;
}
