//! Error types and error codes for Featgate
//!
//! This module defines:
//! - `FeatureMgtError`: Feature management error enum
//! - `ErrorCode`: Stable error codes attached to every error kind

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::key::FeatureKey;

/// Boxed store-level cause carried by server errors
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, FeatureMgtError>;

/// Feature management error types
#[derive(thiserror::Error, Debug)]
pub enum FeatureMgtError {
    #[error("feature not found for {key}")]
    NotFound { key: FeatureKey },

    #[error("feature already exists for {key}")]
    AlreadyExists { key: FeatureKey },

    #[error("caused: {0}")]
    IllegalArgument(String),

    #[error("{code} ({key})")]
    ServerError {
        code: ErrorCode<'static>,
        key: FeatureKey,
        #[source]
        source: BoxError,
    },
}

impl FeatureMgtError {
    pub fn not_found(key: &FeatureKey) -> Self {
        FeatureMgtError::NotFound { key: key.clone() }
    }

    pub fn already_exists(key: &FeatureKey) -> Self {
        FeatureMgtError::AlreadyExists { key: key.clone() }
    }

    /// Wrap a store failure with its error code and the operation's key
    pub fn server(code: ErrorCode<'static>, key: &FeatureKey, source: impl Into<BoxError>) -> Self {
        FeatureMgtError::ServerError {
            code,
            key: key.clone(),
            source: source.into(),
        }
    }

    /// Stable code for this error, whatever its kind
    pub fn error_code(&self) -> ErrorCode<'static> {
        match self {
            FeatureMgtError::NotFound { .. } => FEATURE_NOT_FOUND,
            FeatureMgtError::AlreadyExists { .. } => FEATURE_ALREADY_EXISTS,
            FeatureMgtError::IllegalArgument(_) => ILLEGAL_ARGUMENT,
            FeatureMgtError::ServerError { code, .. } => *code,
        }
    }

    /// Key the failed operation targeted, when there was one
    pub fn key(&self) -> Option<&FeatureKey> {
        match self {
            FeatureMgtError::NotFound { key }
            | FeatureMgtError::AlreadyExists { key }
            | FeatureMgtError::ServerError { key, .. } => Some(key),
            FeatureMgtError::IllegalArgument(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FeatureMgtError::NotFound { .. })
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, FeatureMgtError::ServerError { .. })
    }
}

/// Error code structure shared by every error kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: &'a str,
    pub message: &'a str,
}

impl Display for ErrorCode<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} : {}", self.code, self.message)
    }
}

// Store operation errors
pub const INSERT_FEATURE: ErrorCode<'static> = ErrorCode {
    code: "FM_001",
    message: "error occurred while adding the feature",
};

pub const SELECT_FEATURE_BY_ID: ErrorCode<'static> = ErrorCode {
    code: "FM_002",
    message: "error occurred while retrieving the feature from DB",
};

pub const UPDATE_FEATURE: ErrorCode<'static> = ErrorCode {
    code: "FM_003",
    message: "error occurred while updating the feature",
};

pub const DELETE_FEATURE: ErrorCode<'static> = ErrorCode {
    code: "FM_004",
    message: "error occurred while deleting the feature from DB",
};

pub const EXPIRE_FEATURE: ErrorCode<'static> = ErrorCode {
    code: "FM_005",
    message: "error occurred while releasing an expired feature lock",
};

pub const DECODE_FEATURE: ErrorCode<'static> = ErrorCode {
    code: "FM_006",
    message: "stored feature data could not be decoded",
};

pub const ENCODE_FEATURE: ErrorCode<'static> = ErrorCode {
    code: "FM_007",
    message: "feature data could not be encoded for storage",
};

// Caller-facing errors
pub const FEATURE_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: "FM_010",
    message: "feature not found",
};

pub const FEATURE_ALREADY_EXISTS: ErrorCode<'static> = ErrorCode {
    code: "FM_011",
    message: "feature already exists",
};

pub const ILLEGAL_ARGUMENT: ErrorCode<'static> = ErrorCode {
    code: "FM_012",
    message: "illegal argument",
};
