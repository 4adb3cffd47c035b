//! # KCL Errors
//!
//! Unified error taxonomy and shutdown signaling for shard-based stream
//! record processors.
//!
//! ## Design Philosophy
//!
//! 1. **Every failure has a stable numeric identity** inside a reserved range
//! 2. **Retry classification is decided once**, at code definition time
//! 3. **Call sites add context, never reclassify**: only message and detail change
//! 4. **The structured fields are the machine contract**; the formatted string is for humans
//! 5. **Shutdown reasons are a closed set** that decides whether a final checkpoint is safe
//!
//! This crate never retries, never backs off and never transmits anything. It
//! classifies and formats; policy layers elsewhere act on the result.
//!
//! ## Quick Start
//!
//! ```rust
//! use kcl_errors::{ErrorCode, Result, Retryable, lib_err};
//!
//! fn store_checkpoint(attempt: u32) -> Result<()> {
//!     Err(lib_err!(ErrorCode::ThrottlingError, "attempt {}", attempt))
//! }
//!
//! let err = store_checkpoint(3).unwrap_err();
//! assert!(err.is_retryable());
//! assert_eq!(err.status(), 429);
//! assert_eq!(
//!     err.to_string(),
//!     "Retryable Error [41005]: Requests are throttled by a service \
//!      (e.g. DynamoDB when storing a checkpoint)., detail: attempt 3"
//! );
//! ```
//!
//! ## Enriching While Propagating
//!
//! ```rust
//! use kcl_errors::{ErrorCode, new_error};
//! use std::io;
//!
//! let io_err = io::Error::new(io::ErrorKind::TimedOut, "timeout");
//! let err = new_error(ErrorCode::KinesisClientLibIOError)
//!     .with_detail("shard shardId-000000000007")
//!     .with_cause(&io_err);
//!
//! assert_eq!(err.detail(), "shard shardId-000000000007, cause: timeout");
//! ```
//!
//! ## Shutdown
//!
//! ```rust
//! use kcl_errors::{CheckpointPolicy, ShutdownReason};
//!
//! assert_eq!(ShutdownReason::Zombie.label(), "ZOMBIE");
//! assert_eq!(ShutdownReason::Zombie.checkpoint_policy(), CheckpointPolicy::Forbidden);
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit error log records as `tracing` events

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::result;

pub mod codes;
pub mod convenience;
pub mod definitions;
pub mod logging;
pub mod models;
pub mod shutdown;

pub use codes::*;
pub use definitions::*;
pub use logging::*;
pub use models::*;
pub use shutdown::*;

/// Type alias for Results using our error type.
pub type Result<T> = result::Result<T, ClientLibraryError>;

/// Per-occurrence library error.
///
/// Created by copying a descriptor from the [`REGISTRY`], then enriched while
/// it propagates up the call stack.
///
/// # Key Properties
///
/// - `code`, `retryable` and `status` are fixed at creation; no method changes them
/// - `message` can be replaced wholesale with [`with_message`](Self::with_message)
/// - `detail` is only ever appended to, in call order, separated by `", "`
///
/// # Ownership
///
/// Enrichment methods consume `self` and return it, so an error is enriched
/// by its single owner and, once returned or logged, cannot be mutated through
/// a shared reference.
#[must_use = "errors should be handled or logged"]
#[derive(Debug)]
pub struct ClientLibraryError {
    code: ErrorCode,
    retryable: bool,
    status: u16,
    message: Cow<'static, str>,
    detail: String,
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl ClientLibraryError {
    /// Create an error from the code's canonical descriptor.
    #[inline]
    pub fn new(code: ErrorCode) -> Self {
        Self::from_descriptor(code.descriptor())
    }

    /// Create an error by copying a descriptor.
    #[inline]
    pub fn from_descriptor(descriptor: &ErrorDescriptor) -> Self {
        Self {
            code: descriptor.code(),
            retryable: descriptor.retryable(),
            status: descriptor.status(),
            message: Cow::Borrowed(descriptor.message()),
            detail: String::new(),
            source: None,
        }
    }

    /// Replace the message.
    #[inline]
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Append one detail entry.
    ///
    /// Sets detail if it is empty, otherwise appends `", "` and the entry.
    /// Accepts anything `Display`, including `format_args!`.
    #[inline]
    pub fn with_detail(mut self, detail: impl fmt::Display) -> Self {
        self.push_detail(format_args!("{detail}"));
        self
    }

    /// Append `"cause: <cause>"` to detail, using the same rule as
    /// [`with_detail`](Self::with_detail).
    #[inline]
    pub fn with_cause<E: Error + ?Sized>(mut self, cause: &E) -> Self {
        self.push_detail(format_args!("cause: {cause}"));
        self
    }

    /// [`with_cause`](Self::with_cause) for an optional cause. `None` is a no-op.
    #[inline]
    pub fn with_optional_cause<E: Error + ?Sized>(self, cause: Option<&E>) -> Self {
        match cause {
            Some(cause) => self.with_cause(cause),
            None => self,
        }
    }

    /// Record `source` in detail like [`with_cause`](Self::with_cause) and keep
    /// it as the [`Error::source`] of this error.
    ///
    /// A previously attached source is replaced; its text stays in detail.
    pub fn with_source(mut self, source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        let source = source.into();
        self.push_detail(format_args!("cause: {source}"));
        self.source = Some(source);
        self
    }

    fn push_detail(&mut self, entry: fmt::Arguments<'_>) {
        use fmt::Write;

        if !self.detail.is_empty() {
            self.detail.push_str(", ");
        }
        // Writing into a String only fails if a Display impl reports an error;
        // whatever was written before that stays.
        let _ = self.detail.write_fmt(entry);
    }

    /// Error code.
    #[inline]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Category owning the code's range.
    #[inline]
    pub const fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    /// HTTP-style severity status.
    #[inline]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Current message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Accumulated detail; empty if never enriched.
    #[inline]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Structured log view of this error. See [`LogRecord`].
    #[inline]
    pub fn log_record(&self) -> LogRecord<'_> {
        LogRecord {
            code: self.code,
            retryable: self.retryable,
            status: self.status,
            message: &self.message,
            detail: &self.detail,
            has_source: self.source.is_some(),
        }
    }

    /// Callback-style access to the log view.
    ///
    /// ```rust
    /// # use kcl_errors::{ErrorCode, new_error};
    /// let err = new_error(ErrorCode::LeasingError);
    /// let code = err.with_log_record(|record| record.code().raw());
    /// assert_eq!(code, 41200);
    /// ```
    #[inline]
    pub fn with_log_record<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&LogRecord<'_>) -> R,
    {
        let record = self.log_record();
        f(&record)
    }
}

impl Retryable for ClientLibraryError {
    #[inline]
    fn is_retryable(&self) -> bool {
        self.retryable
    }
}

impl From<ErrorCode> for ClientLibraryError {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

impl fmt::Display for ClientLibraryError {
    /// Format: `"<Retryable|NonRetryable> Error [<code>]: <message>[, detail: <detail>]"`
    ///
    /// Logging-grade text. Machines should read the structured fields instead.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.retryable { "Retryable" } else { "NonRetryable" };
        write!(f, "{} Error [{}]: {}", prefix, self.code, self.message)?;
        if !self.detail.is_empty() {
            write!(f, ", detail: {}", self.detail)?;
        }
        Ok(())
    }
}

impl Error for ClientLibraryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}
