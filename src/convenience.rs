//! Convenience macros for creating errors with format strings.
//!
//! # Usage
//!
//! ```rust
//! # use kcl_errors::{ErrorCode, lib_err};
//! let shard = "shardId-000000000003";
//! let err = lib_err!(ErrorCode::BlockedOnParentShardError, "shard {} waits on {}", shard, "shardId-000000000001");
//! assert_eq!(err.detail(), "shard shardId-000000000003 waits on shardId-000000000001");
//! ```
//!
//! Formatting goes through `format_args!`, so the detail is written straight
//! into the error's buffer with no intermediate `String`.

/// Create a [`ClientLibraryError`](crate::ClientLibraryError) from a code, with
/// an optional formatted detail entry.
///
/// - `lib_err!(code)` is [`new_error`](crate::new_error)
/// - `lib_err!(code, "fmt", args..)` is [`new_error_with_detail`](crate::new_error_with_detail)
///
/// # Example
///
/// ```rust
/// # use kcl_errors::{ErrorCode, lib_err};
/// let err = lib_err!(ErrorCode::ThrottlingError, "retry after {}ms", 200);
/// assert_eq!(
///     err.to_string(),
///     "Retryable Error [41005]: Requests are throttled by a service \
///      (e.g. DynamoDB when storing a checkpoint)., detail: retry after 200ms"
/// );
/// ```
#[macro_export]
macro_rules! lib_err {
    ($code:expr $(,)?) => {
        $crate::ClientLibraryError::new($code)
    };
    ($code:expr, $fmt:literal $($arg:tt)*) => {
        $crate::ClientLibraryError::new($code).with_detail(format_args!($fmt $($arg)*))
    };
}

/// Return early with a [`lib_err!`] error.
///
/// # Example
///
/// ```rust
/// # use kcl_errors::{ErrorCode, Result, lib_bail};
/// fn set_max_records(n: u32) -> Result<u32> {
///     if n == 0 || n > 10_000 {
///         lib_bail!(ErrorCode::IllegalArgumentError, "max_records={} outside 1..=10000", n);
///     }
///     Ok(n)
/// }
///
/// assert_eq!(set_max_records(0).unwrap_err().detail(), "max_records=0 outside 1..=10000");
/// ```
#[macro_export]
macro_rules! lib_bail {
    ($($tt:tt)+) => {
        return ::core::result::Result::Err($crate::lib_err!($($tt)+).into())
    };
}

/// Return early with a [`lib_err!`] error unless a condition holds.
///
/// # Example
///
/// ```rust
/// # use kcl_errors::{ErrorCode, Result, lib_ensure};
/// fn shard_iterator(shard_id: &str) -> Result<()> {
///     lib_ensure!(!shard_id.is_empty(), ErrorCode::IllegalArgumentError, "empty shard id");
///     Ok(())
/// }
///
/// assert!(shard_iterator("").is_err());
/// assert!(shard_iterator("shardId-000000000000").is_ok());
/// ```
#[macro_export]
macro_rules! lib_ensure {
    ($cond:expr, $($tt:tt)+) => {
        if !$cond {
            $crate::lib_bail!($($tt)+);
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{ClientLibraryError, ErrorCode, Result, Retryable};

    #[test]
    fn lib_err_without_detail() {
        let err = lib_err!(ErrorCode::LeasingError);
        assert!(err.detail().is_empty());
        assert!(err.is_retryable());
    }

    #[test]
    fn lib_err_formats_detail() {
        let attempt = 4;
        let err = lib_err!(ErrorCode::KinesisClientLibDependencyError, "attempt {attempt} of {}", 5);
        assert_eq!(err.detail(), "attempt 4 of 5");
    }

    #[test]
    fn lib_err_composes_with_enrichment() {
        let err = lib_err!(ErrorCode::InvalidStateError, "a").with_detail("b");
        assert_eq!(err.detail(), "a, b");
    }

    #[test]
    fn lib_bail_returns_early() {
        fn checked(n: i64) -> Result<i64> {
            if n < 0 {
                lib_bail!(ErrorCode::IllegalArgumentError, "negative: {}", n);
            }
            Ok(n)
        }

        assert_eq!(checked(3).unwrap(), 3);
        let err: ClientLibraryError = checked(-1).unwrap_err();
        assert_eq!(err.code(), ErrorCode::IllegalArgumentError);
        assert_eq!(err.detail(), "negative: -1");
    }

    #[test]
    fn lib_ensure_guards() {
        fn not_implemented(flag: bool) -> Result<()> {
            lib_ensure!(flag, ErrorCode::KinesisClientLibNotImplemented);
            Ok(())
        }

        assert!(not_implemented(true).is_ok());
        assert_eq!(
            not_implemented(false).unwrap_err().to_string(),
            "NonRetryable Error [41301]: Not Implemented"
        );
    }
}
