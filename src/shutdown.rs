//! Shutdown signaling for record processors.
//!
//! When a worker loses a shard, finishes a shard, or the whole application
//! stops, the orchestration layer hands the record processor a
//! [`ShutdownInput`]. The reason inside decides whether a final checkpoint is
//! safe:
//!
//! | Reason | Delivered through `ShutdownInput` | Checkpoint |
//! |--------|-----------------------------------|------------|
//! | `Requested` | No, separate compatibility path | Optional |
//! | `Terminate` | Yes | Recommended, unlocks child shards |
//! | `Zombie` | Yes | Forbidden, another worker owns the shard |
//!
//! The reason is a single terminal fact, not a state machine: there are no
//! transitions between values.
//!
//! This module never calls the checkpointer. It only carries a borrowed
//! reference supplied by the caller.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Shutdown Reason
// ============================================================================

/// Why a record processor is being shut down.
///
/// Discriminants are the wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ShutdownReason {
    /// The whole application is shutting down. The processor may take a final
    /// checkpoint if it wants to. Not delivered through the reason-bearing
    /// shutdown path.
    Requested = 1,
    /// The shard is closed (resharding) and every record has been delivered.
    /// The processor should checkpoint so child shards can start.
    Terminate = 2,
    /// Processing moved to another worker (failover, load balancing). The
    /// processor must not checkpoint; the new owner may already be ahead.
    Zombie = 3,
}

impl ShutdownReason {
    /// All reasons in wire order.
    pub const ALL: [ShutdownReason; 3] = [Self::Requested, Self::Terminate, Self::Zombie];

    /// Canonical uppercase label.
    #[inline]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Requested => "REQUESTED",
            Self::Terminate => "TERMINATE",
            Self::Zombie => "ZOMBIE",
        }
    }

    /// Numeric wire value.
    #[inline]
    pub const fn raw(self) -> i32 {
        self as i32
    }

    /// Whether a final checkpoint is optional, recommended, or forbidden.
    #[inline]
    pub const fn checkpoint_policy(self) -> CheckpointPolicy {
        match self {
            Self::Requested => CheckpointPolicy::Optional,
            Self::Terminate => CheckpointPolicy::Recommended,
            Self::Zombie => CheckpointPolicy::Forbidden,
        }
    }

    /// Whether this reason reaches the processor through [`ShutdownInput`].
    ///
    /// `Requested` goes through a separate compatibility path instead.
    #[inline]
    pub const fn is_delivered_directly(self) -> bool {
        !matches!(self, Self::Requested)
    }
}

/// Label for a raw shutdown reason value, or `None` if it is not one of the
/// three defined reasons.
#[inline]
pub fn shutdown_reason_label(raw: i32) -> Option<&'static str> {
    ShutdownReason::try_from(raw).ok().map(ShutdownReason::label)
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<i32> for ShutdownReason {
    type Error = UnknownShutdownReason;

    fn try_from(raw: i32) -> std::result::Result<Self, Self::Error> {
        match raw {
            1 => Ok(Self::Requested),
            2 => Ok(Self::Terminate),
            3 => Ok(Self::Zombie),
            _ => Err(UnknownShutdownReason::Value(raw)),
        }
    }
}

impl FromStr for ShutdownReason {
    type Err = UnknownShutdownReason;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|reason| reason.label() == s)
            .ok_or_else(|| UnknownShutdownReason::Label(s.to_owned()))
    }
}

impl Serialize for ShutdownReason {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ShutdownReason {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::unknown_variant(&s, &["REQUESTED", "TERMINATE", "ZOMBIE"])
        })
    }
}

/// A value or label that is not one of the three shutdown reasons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnknownShutdownReason {
    /// Unrecognized numeric value.
    Value(i32),
    /// Unrecognized label.
    Label(String),
}

impl fmt::Display for UnknownShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "Unknown shutdown reason value {}", v),
            Self::Label(l) => write!(f, "Unknown shutdown reason label '{}'", l),
        }
    }
}

impl std::error::Error for UnknownShutdownReason {}

// ============================================================================
// Checkpoint Policy
// ============================================================================

/// What a processor may do about its final checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckpointPolicy {
    /// At the application's discretion.
    Optional,
    /// Should checkpoint; child shards wait on it.
    Recommended,
    /// Must not checkpoint.
    Forbidden,
}

impl CheckpointPolicy {
    /// Whether checkpointing is allowed at all.
    #[inline]
    pub const fn permits_checkpoint(self) -> bool {
        !matches!(self, Self::Forbidden)
    }
}

// ============================================================================
// Checkpointer Seam
// ============================================================================

/// Checkpoint capability owned by the orchestration layer.
///
/// Implemented outside this crate. `sequence_number` of `None` checkpoints at
/// the last record delivered to the processor.
pub trait Checkpointer {
    /// Record progress for the shard.
    fn checkpoint(&self, sequence_number: Option<&str>) -> Result<()>;
}

impl<T: Checkpointer + ?Sized> Checkpointer for &T {
    fn checkpoint(&self, sequence_number: Option<&str>) -> Result<()> {
        (**self).checkpoint(sequence_number)
    }
}

// ============================================================================
// Shutdown Input
// ============================================================================

/// The reason for a shutdown plus the caller's checkpointer.
///
/// Created once per shutdown event and dropped once the processor has reacted.
/// The checkpointer is borrowed for `'a`; its lifetime belongs to the caller.
///
/// # Example
///
/// ```rust
/// use kcl_errors::{Checkpointer, ErrorCode, Result, ShutdownInput, ShutdownReason};
///
/// struct Noop;
/// impl Checkpointer for Noop {
///     fn checkpoint(&self, _: Option<&str>) -> Result<()> { Ok(()) }
/// }
///
/// fn on_shutdown<C: Checkpointer + ?Sized>(input: &ShutdownInput<'_, C>) -> Result<()> {
///     match input.checkpointer_if_permitted() {
///         Some(cp) if input.reason() == ShutdownReason::Terminate => cp.checkpoint(None),
///         _ => Ok(()),
///     }
/// }
///
/// let checkpointer = Noop;
/// on_shutdown(&ShutdownInput::new(ShutdownReason::Terminate, &checkpointer)).unwrap();
/// on_shutdown(&ShutdownInput::new(ShutdownReason::Zombie, &checkpointer)).unwrap();
/// ```
pub struct ShutdownInput<'a, C: Checkpointer + ?Sized> {
    reason: ShutdownReason,
    checkpointer: &'a C,
}

impl<'a, C: Checkpointer + ?Sized> ShutdownInput<'a, C> {
    /// Pair a reason with a borrowed checkpointer.
    #[inline]
    pub const fn new(reason: ShutdownReason, checkpointer: &'a C) -> Self {
        Self { reason, checkpointer }
    }

    /// Why the processor is being shut down.
    #[inline]
    pub const fn reason(&self) -> ShutdownReason {
        self.reason
    }

    /// Checkpoint policy implied by the reason.
    #[inline]
    pub const fn checkpoint_policy(&self) -> CheckpointPolicy {
        self.reason.checkpoint_policy()
    }

    /// The checkpointer, regardless of policy.
    #[inline]
    pub const fn checkpointer(&self) -> &'a C {
        self.checkpointer
    }

    /// The checkpointer, withheld when the reason forbids checkpointing.
    #[inline]
    pub fn checkpointer_if_permitted(&self) -> Option<&'a C> {
        self.checkpoint_policy()
            .permits_checkpoint()
            .then_some(self.checkpointer)
    }
}

impl<C: Checkpointer + ?Sized> Clone for ShutdownInput<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: Checkpointer + ?Sized> Copy for ShutdownInput<'_, C> {}

impl<C: Checkpointer + ?Sized> fmt::Debug for ShutdownInput<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShutdownInput")
            .field("reason", &self.reason)
            .field("checkpointer", &"<external>")
            .finish()
    }
}
