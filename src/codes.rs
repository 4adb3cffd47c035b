//! Error code namespace - stable numeric identity for every library failure.
//!
//! Each failure the client library can report is identified by an integer code.
//! Codes are partitioned into reserved ranges by category, and the ranges are a
//! public contract: consumers may branch on range membership for coarse
//! handling, so a new code must land inside its category's range.
//!
//! # Range Layout
//!
//! - **System** (41000): top-level, unclassified library error
//! - **Retryable** (41001-41099): transient I/O, dependency, throttling, parent shard
//! - **NonRetryable** (41100-41199): invalid state, shutdown-after-stop
//! - **Leasing** (41200-41299): lease store failures
//! - **Misc** (41300-41399): not implemented, illegal argument
//!
//! # Governance
//!
//! The taxonomy is frozen at compile time. [`define_error_codes!`] generates the
//! `ErrorCode` enum together with its descriptor table, and the [`Registry`]
//! built over that table validates, in `const` context, that every code sits in
//! its category's range and that codes are declared in ascending order. A code
//! declared outside its range fails the build.
//!
//! # Example Usage
//!
//! ```rust
//! use kcl_errors::{ErrorCategory, ErrorCode, Retryable};
//!
//! let code = ErrorCode::ThrottlingError;
//! assert_eq!(code.category(), ErrorCategory::Retryable);
//! assert_eq!(ErrorCategory::of(41005), Some(ErrorCategory::Retryable));
//! assert!(code.is_retryable());
//! ```

use crate::{ErrorCode, definitions::ranges};
use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;

// ============================================================================
// Severity Status Codes
// ============================================================================

/// HTTP-style severity codes carried by descriptors.
///
/// The status describes where the condition lives, not who is at fault:
/// 503 means "service-side condition", 4xx means the caller must change
/// something before trying again.
pub mod status {
    /// The caller passed an illegal or inappropriate argument.
    pub const BAD_REQUEST: u16 = 400;
    /// A downstream service throttled the request.
    pub const TOO_MANY_REQUESTS: u16 = 429;
    /// The operation is not implemented.
    pub const NOT_IMPLEMENTED: u16 = 501;
    /// Service-side condition; the default for library failures.
    pub const SERVICE_UNAVAILABLE: u16 = 503;
}

// ============================================================================
// Retry Classification
// ============================================================================

/// Classification of a failure as retryable or fatal.
///
/// Only [`is_retryable`](Retryable::is_retryable) needs an implementation;
/// [`is_fatal`](Retryable::is_fatal) is its inverse.
pub trait Retryable {
    /// Returns `true` if reattempting the operation, typically after backoff,
    /// may succeed.
    fn is_retryable(&self) -> bool;

    /// Returns `true` if reattempting the same operation is not expected to
    /// succeed.
    fn is_fatal(&self) -> bool {
        !self.is_retryable()
    }
}

// ============================================================================
// Error Category (Range Ownership)
// ============================================================================

/// Category owning a reserved range of error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCategory {
    /// Top-level library error (41000).
    System,
    /// Retryable library errors (41001-41099).
    Retryable,
    /// Non-retryable library errors (41100-41199).
    NonRetryable,
    /// Lease store errors (41200-41299).
    Leasing,
    /// Everything else (41300-41399).
    Misc,
}

impl ErrorCategory {
    /// All categories in range order.
    pub const ALL: [ErrorCategory; 5] = [
        Self::System,
        Self::Retryable,
        Self::NonRetryable,
        Self::Leasing,
        Self::Misc,
    ];

    /// Inclusive `(start, end)` bounds of the reserved range.
    #[inline]
    pub const fn bounds(self) -> (i32, i32) {
        match self {
            Self::System => (ranges::SYSTEM_START, ranges::SYSTEM_END),
            Self::Retryable => (ranges::RETRYABLE_START, ranges::RETRYABLE_END),
            Self::NonRetryable => (ranges::NON_RETRYABLE_START, ranges::NON_RETRYABLE_END),
            Self::Leasing => (ranges::LEASING_START, ranges::LEASING_END),
            Self::Misc => (ranges::MISC_START, ranges::MISC_END),
        }
    }

    /// Reserved range as a `RangeInclusive`.
    #[inline]
    pub fn range(self) -> RangeInclusive<i32> {
        let (start, end) = self.bounds();
        start..=end
    }

    /// Check whether `raw` falls inside this category's range.
    #[inline]
    pub const fn contains(self, raw: i32) -> bool {
        let (start, end) = self.bounds();
        raw >= start && raw <= end
    }

    /// Resolve the category owning a raw code.
    ///
    /// Works for codes this build does not know about, as long as they sit in
    /// a reserved range. Returns `None` outside every range.
    pub const fn of(raw: i32) -> Option<Self> {
        let mut i = 0;
        while i < Self::ALL.len() {
            if Self::ALL[i].contains(raw) {
                return Some(Self::ALL[i]);
            }
            i += 1;
        }
        None
    }

    /// Human-readable category name.
    #[inline]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::System => "System",
            Self::Retryable => "Retryable",
            Self::NonRetryable => "NonRetryable",
            Self::Leasing => "Leasing",
            Self::Misc => "Misc",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Error Descriptor (Registry Entry)
// ============================================================================

/// Canonical, immutable description of one error code.
///
/// The retryable flag and status are a taxonomy decision made once, here.
/// Error values copy them at creation and never change them afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ErrorDescriptor {
    code: ErrorCode,
    #[serde(rename = "tryable")]
    retryable: bool,
    status: u16,
    #[serde(rename = "msg")]
    message: &'static str,
}

impl ErrorDescriptor {
    /// Build a descriptor. Used by [`define_error_codes!`].
    #[doc(hidden)]
    pub const fn __internal_new(
        code: ErrorCode,
        retryable: bool,
        status: u16,
        message: &'static str,
    ) -> Self {
        Self {
            code,
            retryable,
            status,
            message,
        }
    }

    /// The code this descriptor belongs to.
    #[inline]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Whether failures with this code may succeed on retry.
    #[inline]
    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    /// HTTP-style severity code.
    #[inline]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Canonical description.
    #[inline]
    pub const fn message(&self) -> &'static str {
        self.message
    }
}

impl Retryable for ErrorDescriptor {
    fn is_retryable(&self) -> bool {
        self.retryable
    }
}

// ============================================================================
// Registry (Frozen Code -> Descriptor Table)
// ============================================================================

/// Read-only mapping from error code to descriptor.
///
/// The only instance is [`REGISTRY`](crate::REGISTRY), a `static` built in
/// `const` context. Nothing can write to it, so any number of threads may read
/// it without synchronization.
#[derive(Debug)]
pub struct Registry {
    entries: &'static [ErrorDescriptor],
}

impl Registry {
    /// Validate and wrap a descriptor table.
    ///
    /// # Panics
    ///
    /// In `const` context (the only way the crate calls it) these are build
    /// failures:
    /// - the table does not line up one-to-one with `ErrorCode::ALL`
    /// - a code lies outside its category's range
    /// - codes are not in strictly ascending order
    pub(crate) const fn new(entries: &'static [ErrorDescriptor]) -> Self {
        assert!(
            entries.len() == ErrorCode::ALL.len(),
            "Descriptor table must cover every error code"
        );

        let mut i = 0;
        while i < entries.len() {
            let code = entries[i].code;
            assert!(
                code.raw() == ErrorCode::ALL[i].raw(),
                "Descriptor table out of step with ErrorCode::ALL"
            );
            assert!(
                code.category().contains(code.raw()),
                "Error code outside its category range"
            );
            assert!(
                !entries[i].message.is_empty(),
                "Error code must carry a message"
            );
            if i > 0 {
                assert!(
                    entries[i - 1].code.raw() < code.raw(),
                    "Error codes must be declared in ascending order"
                );
            }
            i += 1;
        }

        Self { entries }
    }

    /// Descriptor of a defined code. Total: every `ErrorCode` has one.
    #[inline]
    pub fn descriptor_for(&self, code: ErrorCode) -> &'static ErrorDescriptor {
        let entries: &'static [ErrorDescriptor] = self.entries;
        &entries[code.ordinal()]
    }

    /// Descriptor of a raw code received across a process boundary.
    ///
    /// Returns `None` for codes this build does not define.
    pub fn lookup(&self, raw: i32) -> Option<&'static ErrorDescriptor> {
        let entries: &'static [ErrorDescriptor] = self.entries;
        entries
            .binary_search_by_key(&raw, |d| d.code.raw())
            .ok()
            .map(|idx| &entries[idx])
    }

    /// All descriptors in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = &'static ErrorDescriptor> {
        let entries: &'static [ErrorDescriptor] = self.entries;
        entries.iter()
    }

    /// Number of defined codes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false` for the crate registry.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Lookup Failures
// ============================================================================

/// A raw code that is not registered in this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownErrorCode {
    value: i32,
}

impl UnknownErrorCode {
    #[inline]
    pub(crate) const fn new(value: i32) -> Self {
        Self { value }
    }

    /// The rejected raw value.
    #[inline]
    pub const fn value(&self) -> i32 {
        self.value
    }

    /// Category whose range the value falls into, if any.
    #[inline]
    pub const fn category(&self) -> Option<ErrorCategory> {
        ErrorCategory::of(self.value)
    }
}

impl fmt::Display for UnknownErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error code {} is not registered", self.value)
    }
}

impl std::error::Error for UnknownErrorCode {}

// ============================================================================
// Definition Macro
// ============================================================================

/// Define the error code enum and its descriptor table in one place.
///
/// Each entry is `Name = (code, retryable, status, "message")`, grouped under
/// the category that owns its range. Expands to:
///
/// - `pub enum ErrorCode` with `#[repr(i32)]` discriminants
/// - `ErrorCode::ALL` in declaration order
/// - `ErrorCode::category()`
/// - `pub const DESCRIPTORS`, one [`ErrorDescriptor`] per code
///
/// Invoke it exactly once; the crate does so in [`definitions`](crate::definitions).
#[macro_export]
macro_rules! define_error_codes {
    (
        $(
            $category:expr => {
                $(
                    $(#[$meta:meta])*
                    $name:ident = ($raw:literal, $retryable:expr, $status:expr, $message:literal)
                ),* $(,)?
            }
        )*
    ) => {
        /// Stable numeric identity of a library failure.
        ///
        /// Discriminants are the wire values.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(i32)]
        pub enum ErrorCode {
            $( $( $(#[$meta])* $name = $raw, )* )*
        }

        impl ErrorCode {
            /// Every defined code, in declaration (ascending) order.
            pub const ALL: &'static [ErrorCode] = &[ $( $( ErrorCode::$name, )* )* ];

            /// Category this code was declared under.
            #[inline]
            pub const fn category(self) -> $crate::ErrorCategory {
                match self {
                    $( $( ErrorCode::$name => $category, )* )*
                }
            }
        }

        /// Descriptor table, aligned index-for-index with `ErrorCode::ALL`.
        pub const DESCRIPTORS: &[$crate::ErrorDescriptor] = &[
            $( $(
                $crate::ErrorDescriptor::__internal_new(
                    ErrorCode::$name,
                    $retryable,
                    $status,
                    $message,
                ),
            )* )*
        ];
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::REGISTRY;

    #[test]
    fn category_ranges_do_not_overlap() {
        for pair in ErrorCategory::ALL.windows(2) {
            let (_, prev_end) = pair[0].bounds();
            let (next_start, _) = pair[1].bounds();
            assert!(prev_end < next_start);
        }
    }

    #[test]
    fn category_of_resolves_reserved_ranges() {
        assert_eq!(ErrorCategory::of(41000), Some(ErrorCategory::System));
        assert_eq!(ErrorCategory::of(41099), Some(ErrorCategory::Retryable));
        assert_eq!(ErrorCategory::of(41150), Some(ErrorCategory::NonRetryable));
        assert_eq!(ErrorCategory::of(41299), Some(ErrorCategory::Leasing));
        assert_eq!(ErrorCategory::of(41300), Some(ErrorCategory::Misc));
        assert_eq!(ErrorCategory::of(40999), None);
        assert_eq!(ErrorCategory::of(41400), None);
    }

    #[test]
    fn range_matches_contains() {
        for category in ErrorCategory::ALL {
            let (start, end) = category.bounds();
            assert!(category.range().contains(&start));
            assert!(category.contains(end));
            assert!(!category.contains(end + 1));
        }
    }

    #[test]
    fn registry_lookup_hits_defined_codes() {
        let d = REGISTRY.lookup(41005).unwrap();
        assert_eq!(d.code(), ErrorCode::ThrottlingError);
        assert_eq!(d.status(), status::TOO_MANY_REQUESTS);
        assert!(d.retryable());
    }

    #[test]
    fn registry_lookup_misses_are_explicit() {
        assert!(REGISTRY.lookup(0).is_none());
        assert!(REGISTRY.lookup(41006).is_none());
        assert!(REGISTRY.lookup(41300).is_none());
    }

    #[test]
    fn registry_iterates_in_ascending_order() {
        let raws: Vec<i32> = REGISTRY.iter().map(|d| d.code().raw()).collect();
        let mut sorted = raws.clone();
        sorted.sort_unstable();
        assert_eq!(raws, sorted);
        assert_eq!(REGISTRY.len(), ErrorCode::ALL.len());
        assert!(!REGISTRY.is_empty());
    }

    #[test]
    fn descriptor_for_agrees_with_lookup() {
        for &code in ErrorCode::ALL {
            let by_code = REGISTRY.descriptor_for(code);
            let by_raw = REGISTRY.lookup(code.raw()).unwrap();
            assert_eq!(by_code, by_raw);
            assert_eq!(by_code.code(), code);
        }
    }

    #[test]
    fn unknown_code_reports_its_range() {
        let err = UnknownErrorCode::new(41250);
        assert_eq!(err.value(), 41250);
        assert_eq!(err.category(), Some(ErrorCategory::Leasing));
        assert_eq!(err.to_string(), "Error code 41250 is not registered");
    }
}
