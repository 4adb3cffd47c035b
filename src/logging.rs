//! Structured log record for library errors.
//!
//! # Properties
//!
//! - Borrows from [`ClientLibraryError`](crate::ClientLibraryError) with an explicit lifetime
//! - Cannot outlive the error that created it
//! - Accessors never allocate
//! - [`LogRecord::write_to`] writes straight into the caller's buffer
//!
//! Field names match the wire record (`code`, `tryable`, `status`, `msg`,
//! `detail`) so text logs, JSON logs and `tracing` events line up.
//!
//! With the `tracing` feature, [`LogRecord::emit`] sends the record as one
//! `tracing` event: WARN for retryable errors, ERROR otherwise.

use crate::{ErrorCategory, ErrorCode};
use std::borrow::Cow;
use std::fmt;

/// Maximum length for any individual field in formatted output
const MAX_FIELD_OUTPUT_LEN: usize = 1024;

/// Truncation indicator appended to truncated strings
const TRUNCATION_INDICATOR: &str = "...[TRUNCATED]";

/// Structured log view of a [`ClientLibraryError`](crate::ClientLibraryError).
///
/// # Example
///
/// ```rust
/// # use kcl_errors::{ErrorCode, new_error};
/// let err = new_error(ErrorCode::ThrottlingError).with_detail("PutItem");
/// let mut line = String::new();
/// err.log_record().write_to(&mut line).unwrap();
/// assert!(line.starts_with("code=41005 tryable=true status=429"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    pub(crate) code: ErrorCode,
    pub(crate) retryable: bool,
    pub(crate) status: u16,
    pub(crate) message: &'a str,
    pub(crate) detail: &'a str,
    pub(crate) has_source: bool,
}

impl<'a> LogRecord<'a> {
    /// Write `key=value` pairs without allocating for fields under the limit.
    ///
    /// Message and detail are quoted and truncated to keep a single runaway
    /// detail from flooding the log. `detail` is omitted when empty.
    pub fn write_to(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(
            f,
            "code={} tryable={} status={} category={} msg='{}'",
            self.code,
            self.retryable,
            self.status,
            self.code.category(),
            truncate_with_indicator(self.message)
        )?;

        if !self.detail.is_empty() {
            write!(f, " detail='{}'", truncate_with_indicator(self.detail))?;
        }

        if self.has_source {
            f.write_str(" source=present")?;
        }

        Ok(())
    }

    /// Emit this record as a `tracing` event.
    #[cfg(feature = "tracing")]
    pub fn emit(&self) {
        let msg = truncate_with_indicator(self.message);
        let detail = truncate_with_indicator(self.detail);
        let category = self.code.category().display_name();

        if self.retryable {
            tracing::warn!(
                code = self.code.raw(),
                tryable = true,
                status = self.status,
                category,
                msg = %msg,
                detail = %detail,
                "retryable client library error"
            );
        } else {
            tracing::error!(
                code = self.code.raw(),
                tryable = false,
                status = self.status,
                category,
                msg = %msg,
                detail = %detail,
                "non-retryable client library error"
            );
        }
    }

    /// Error code.
    #[inline]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Category the code's range belongs to.
    #[inline]
    pub const fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    /// Retry classification.
    #[inline]
    pub const fn is_retryable(&self) -> bool {
        self.retryable
    }

    /// Severity status.
    #[inline]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Message, possibly replaced at the call site.
    #[inline]
    pub const fn message(&self) -> &'a str {
        self.message
    }

    /// Accumulated detail, untruncated.
    #[inline]
    pub const fn detail(&self) -> &'a str {
        self.detail
    }

    /// Whether the error retains a boxed source error.
    #[inline]
    pub const fn has_source(&self) -> bool {
        self.has_source
    }
}

impl fmt::Display for LogRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

/// Truncate a field for display.
///
/// Strings over MAX_FIELD_OUTPUT_LEN are cut on a UTF-8 boundary and end
/// with the indicator. Borrows when no truncation is needed.
fn truncate_with_indicator(s: &str) -> Cow<'_, str> {
    if s.len() <= MAX_FIELD_OUTPUT_LEN {
        return Cow::Borrowed(s);
    }

    let max_content_len = MAX_FIELD_OUTPUT_LEN.saturating_sub(TRUNCATION_INDICATOR.len());

    let mut idx = max_content_len;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }

    if idx == 0 {
        return Cow::Borrowed(TRUNCATION_INDICATOR);
    }

    let mut result = String::with_capacity(idx + TRUNCATION_INDICATOR.len());
    result.push_str(&s[..idx]);
    result.push_str(TRUNCATION_INDICATOR);
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::new_error;

    #[test]
    fn write_to_emits_wire_field_names() {
        let err = new_error(ErrorCode::IllegalArgumentError).with_detail("max_records=0");
        let mut line = String::new();
        err.log_record().write_to(&mut line).unwrap();

        assert_eq!(
            line,
            "code=41302 tryable=false status=400 category=Misc \
             msg='Error indicates that a method has been passed an illegal or inappropriate argument.' \
             detail='max_records=0'"
        );
    }

    #[test]
    fn empty_detail_is_omitted() {
        let err = new_error(ErrorCode::KinesisClientLibNotImplemented);
        let line = err.log_record().to_string();
        assert!(!line.contains("detail="));
        assert!(!line.contains("source="));
    }

    #[test]
    fn source_presence_is_flagged() {
        let err = new_error(ErrorCode::LeasingDependencyError).with_source("lease table timeout");
        let line = err.log_record().to_string();
        assert!(line.ends_with(" source=present"));
    }

    #[test]
    fn accessors_mirror_error() {
        let err = new_error(ErrorCode::ThrottlingError).with_detail("x");
        err.with_log_record(|record| {
            assert_eq!(record.code(), ErrorCode::ThrottlingError);
            assert_eq!(record.category(), ErrorCategory::Retryable);
            assert!(record.is_retryable());
            assert_eq!(record.status(), 429);
            assert_eq!(record.message(), err.message());
            assert_eq!(record.detail(), "x");
        });
    }

    #[test]
    fn oversized_detail_is_truncated() {
        let err = new_error(ErrorCode::KinesisClientLibIOError).with_detail("x".repeat(5000));
        let line = err.log_record().to_string();
        assert!(line.len() < 2 * MAX_FIELD_OUTPUT_LEN + 200);
        assert!(line.contains(TRUNCATION_INDICATOR));
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn emit_without_subscriber_is_silent() {
        new_error(ErrorCode::ThrottlingError).with_detail("PutItem").log_record().emit();
        new_error(ErrorCode::ShutdownError).log_record().emit();
    }

    #[test]
    fn no_truncate_when_under_limit() {
        let s = "short string";
        let truncated = truncate_with_indicator(s);
        assert!(matches!(truncated, Cow::Borrowed(_)));
        assert_eq!(truncated, s);
    }

    #[test]
    fn exactly_at_limit() {
        let s = "a".repeat(MAX_FIELD_OUTPUT_LEN);
        let truncated = truncate_with_indicator(&s);
        assert!(matches!(truncated, Cow::Borrowed(_)));
        assert!(!truncated.ends_with(TRUNCATION_INDICATOR));
    }

    #[test]
    fn truncate_utf8_boundary() {
        let s = "й".repeat(MAX_FIELD_OUTPUT_LEN);
        let truncated = truncate_with_indicator(&s);
        assert!(truncated.len() <= MAX_FIELD_OUTPUT_LEN);
        assert!(truncated.ends_with(TRUNCATION_INDICATOR));
    }
}
