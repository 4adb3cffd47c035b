use kcl_errors::{
    CheckpointPolicy, Checkpointer, ErrorCode, Result, ShutdownInput, ShutdownReason, lib_err,
};
use std::cell::Cell;

/// Stand-in for the worker's lease-table checkpointer.
struct LeaseTableCheckpointer {
    owned: Cell<bool>,
}

impl Checkpointer for LeaseTableCheckpointer {
    fn checkpoint(&self, sequence_number: Option<&str>) -> Result<()> {
        if !self.owned.get() {
            return Err(lib_err!(ErrorCode::ShutdownError, "lease lost before checkpoint"));
        }
        println!("   checkpointed at {}", sequence_number.unwrap_or("<last delivered>"));
        Ok(())
    }
}

/// The record processor's reaction to a shutdown.
fn shutdown<C: Checkpointer + ?Sized>(input: &ShutdownInput<'_, C>) -> Result<()> {
    println!("shutdown: reason={} policy={:?}", input.reason(), input.checkpoint_policy());

    match (input.checkpoint_policy(), input.checkpointer_if_permitted()) {
        // Child shards stay blocked until the parent is checkpointed at SHARD_END.
        (CheckpointPolicy::Recommended, Some(checkpointer)) => checkpointer.checkpoint(None),
        (CheckpointPolicy::Forbidden, _) => {
            println!("   not checkpointing: another worker owns the shard");
            Ok(())
        }
        _ => Ok(()),
    }
}

fn main() {
    println!("--- Shutdown Handling Example ---\n");

    let checkpointer = LeaseTableCheckpointer { owned: Cell::new(true) };

    for reason in ShutdownReason::ALL {
        if !reason.is_delivered_directly() {
            println!("shutdown: reason={} goes through the application shutdown path", reason);
            continue;
        }
        if let Err(err) = shutdown(&ShutdownInput::new(reason, &checkpointer)) {
            println!("   {}", err);
        }
    }

    // A checkpoint attempted after the lease was lost fails non-retryably.
    checkpointer.owned.set(false);
    if let Err(err) = shutdown(&ShutdownInput::new(ShutdownReason::Terminate, &checkpointer)) {
        println!("   {}", err);
    }

    // Raw values from the wire map to labels, unknown ones do not.
    for raw in [2, 3, 9] {
        match ShutdownReason::try_from(raw) {
            Ok(reason) => println!("raw {} -> {}", raw, reason),
            Err(e) => println!("raw {} -> {}", raw, e),
        }
    }
}
