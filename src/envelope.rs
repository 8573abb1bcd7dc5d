use serde::Serialize;

use crate::error::DataError;

/// `{data, error}` shape returned by read and write endpoints.
#[derive(Debug, Serialize, PartialEq)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }
}

impl<T> From<Result<T, DataError>> for Envelope<T> {
    fn from(res: Result<T, DataError>) -> Self {
        match res {
            Ok(data) => Self::ok(data),
            Err(e) => Self {
                data: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// `{success, error}` shape returned by deletes.
#[derive(Debug, Serialize, PartialEq)]
pub struct Outcome {
    pub success: bool,
    pub error: Option<String>,
}

impl Outcome {
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }
}

impl From<Result<(), DataError>> for Outcome {
    fn from(res: Result<(), DataError>) -> Self {
        match res {
            Ok(()) => Self::success(),
            Err(e) => Self {
                success: false,
                error: Some(e.to_string()),
            },
        }
    }
}
