use thiserror::Error;

use crate::sheet::labels::TemplateError;

/// Parser entry points, as named in error reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ParseParticipants,
    ParseFamilies,
    ParseRegistrations,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::ParseParticipants => write!(f, "parse_participants"),
            Operation::ParseFamilies => write!(f, "parse_families"),
            Operation::ParseRegistrations => write!(f, "parse_registrations"),
        }
    }
}

/// Failure that aborts a whole parse. Rows that merely lack data are
/// skipped and never reported through this type.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("{operation} failed: {source}")]
    InvalidPattern {
        operation: Operation,
        #[source]
        source: TemplateError,
    },
}

impl ParseError {
    pub fn operation(&self) -> Operation {
        match self {
            ParseError::InvalidPattern { operation, .. } => *operation,
        }
    }
}
