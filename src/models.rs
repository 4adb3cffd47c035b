//! Wire representation of library errors.
//!
//! The structured record is the machine contract. Metrics buckets, alerting
//! and cross-process error reporting read these fields, never the formatted
//! string:
//!
//! ```json
//! {"code":41005,"tryable":true,"status":429,"msg":"...","detail":"..."}
//! ```
//!
//! Decoding a record back into a [`ClientLibraryError`] goes through the local
//! registry. Unknown codes are rejected, and so are records whose
//! classification disagrees with this build's taxonomy: a peer must not be
//! able to turn a fatal error into a retryable one.

use crate::{ClientLibraryError, ErrorCode, REGISTRY, Retryable};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Owned wire record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Numeric error code.
    pub code: i32,
    /// Retry classification.
    #[serde(rename = "tryable")]
    pub retryable: bool,
    /// HTTP-style severity status.
    pub status: u16,
    /// Message, canonical or replaced by the call site.
    #[serde(rename = "msg")]
    pub message: String,
    /// Accumulated detail.
    #[serde(default)]
    pub detail: String,
}

impl From<&ClientLibraryError> for ErrorRecord {
    fn from(err: &ClientLibraryError) -> Self {
        Self {
            code: err.code().raw(),
            retryable: err.is_retryable(),
            status: err.status(),
            message: err.message().to_owned(),
            detail: err.detail().to_owned(),
        }
    }
}

impl ClientLibraryError {
    /// Snapshot the structured fields.
    pub fn to_record(&self) -> ErrorRecord {
        ErrorRecord::from(self)
    }
}

impl Serialize for ClientLibraryError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ClientLibraryError", 5)?;
        state.serialize_field("code", &self.code())?;
        state.serialize_field("tryable", &self.is_retryable())?;
        state.serialize_field("status", &self.status())?;
        state.serialize_field("msg", self.message())?;
        state.serialize_field("detail", self.detail())?;
        state.end()
    }
}

impl TryFrom<ErrorRecord> for ClientLibraryError {
    type Error = RecordError;

    fn try_from(record: ErrorRecord) -> Result<Self, Self::Error> {
        let descriptor = REGISTRY
            .lookup(record.code)
            .ok_or(RecordError::UnknownCode { code: record.code })?;

        if descriptor.retryable() != record.retryable || descriptor.status() != record.status {
            return Err(RecordError::ClassificationMismatch {
                code: descriptor.code(),
                retryable: record.retryable,
                status: record.status,
            });
        }

        let mut err = ClientLibraryError::from_descriptor(descriptor);
        if record.message != descriptor.message() {
            err = err.with_message(record.message);
        }
        if !record.detail.is_empty() {
            err = err.with_detail(record.detail);
        }
        Ok(err)
    }
}

/// Why a wire record could not be turned back into an error value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The code is not registered in this build.
    UnknownCode {
        /// Raw code from the record.
        code: i32,
    },
    /// The record's retry flag or status disagrees with the registry.
    ClassificationMismatch {
        /// The registered code.
        code: ErrorCode,
        /// Retry flag carried by the record.
        retryable: bool,
        /// Status carried by the record.
        status: u16,
    },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCode { code } => {
                write!(f, "Error code {} is not registered", code)
            }
            Self::ClassificationMismatch { code, retryable, status } => {
                write!(
                    f,
                    "Record for error code {} claims tryable={} status={}, registry says tryable={} status={}",
                    code,
                    retryable,
                    status,
                    code.is_retryable(),
                    code.status()
                )
            }
        }
    }
}

impl std::error::Error for RecordError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::new_error;
    use serde_json::json;

    #[test]
    fn error_serializes_to_wire_fields() {
        let err = new_error(ErrorCode::ThrottlingError).with_detail("retry after 200ms");
        let value = serde_json::to_value(&err).unwrap();

        assert_eq!(
            value,
            json!({
                "code": 41005,
                "tryable": true,
                "status": 429,
                "msg": "Requests are throttled by a service (e.g. DynamoDB when storing a checkpoint).",
                "detail": "retry after 200ms"
            })
        );
    }

    #[test]
    fn record_matches_error_serialization() {
        let err = new_error(ErrorCode::LeasingInvalidStateError)
            .with_message("lease table is being deleted")
            .with_detail("table=orders-app");

        let from_error = serde_json::to_value(&err).unwrap();
        let from_record = serde_json::to_value(err.to_record()).unwrap();
        assert_eq!(from_error, from_record);
    }

    #[test]
    fn descriptor_serializes_without_detail() {
        let value = serde_json::to_value(ErrorCode::IllegalArgumentError.descriptor()).unwrap();
        assert_eq!(value["code"], 41302);
        assert_eq!(value["tryable"], false);
        assert_eq!(value["status"], 400);
        assert!(value.get("detail").is_none());
    }

    #[test]
    fn record_decodes_back_into_error() {
        let wire = r#"{"code":41203,"tryable":false,"status":503,
                       "msg":"custom","detail":"table=orders-app"}"#;
        let record: ErrorRecord = serde_json::from_str(wire).unwrap();
        let err = ClientLibraryError::try_from(record).unwrap();

        assert_eq!(err.code(), ErrorCode::LeasingProvisionedThroughputError);
        assert_eq!(err.message(), "custom");
        assert_eq!(err.detail(), "table=orders-app");
        assert!(err.is_fatal());
    }

    #[test]
    fn missing_detail_defaults_to_empty() {
        let wire = r#"{"code":41301,"tryable":false,"status":501,"msg":"Not Implemented"}"#;
        let record: ErrorRecord = serde_json::from_str(wire).unwrap();
        let err = ClientLibraryError::try_from(record).unwrap();
        assert!(err.detail().is_empty());
        assert_eq!(err.to_string(), "NonRetryable Error [41301]: Not Implemented");
    }

    #[test]
    fn unknown_code_is_rejected() {
        let record = ErrorRecord {
            code: 41099,
            retryable: true,
            status: 503,
            message: "future code".into(),
            detail: String::new(),
        };
        assert_eq!(
            ClientLibraryError::try_from(record).unwrap_err(),
            RecordError::UnknownCode { code: 41099 }
        );
    }

    #[test]
    fn reclassification_is_rejected() {
        let mut record = new_error(ErrorCode::IllegalArgumentError).to_record();
        record.retryable = true;

        let err = ClientLibraryError::try_from(record).unwrap_err();
        assert!(matches!(
            err,
            RecordError::ClassificationMismatch { code: ErrorCode::IllegalArgumentError, retryable: true, .. }
        ));
        assert!(err.to_string().contains("registry says tryable=false status=400"));
    }
}
