use kcl_errors::{
    ErrorCode, REGISTRY, Result, Retryable, lib_bail, new_error,
};
use std::io;

fn store_checkpoint(table: &str, attempt: u32) -> Result<()> {
    // Simulate a throttled conditional write against the lease table
    if attempt < 3 {
        let cause = io::Error::other("ProvisionedThroughputExceededException");
        return Err(new_error(ErrorCode::ThrottlingError)
            .with_detail(format_args!("table={} attempt={}", table, attempt))
            .with_cause(&cause));
    }
    Ok(())
}

fn validate_max_records(max_records: u32) -> Result<u32> {
    if max_records == 0 {
        lib_bail!(ErrorCode::IllegalArgumentError, "max_records={}", max_records);
    }
    Ok(max_records)
}

fn main() {
    println!("--- Basic Usage Example ---\n");

    // 1. A retryable failure: the caller's retry policy reads the classification,
    //    operators read the formatted line.
    let mut attempt = 1;
    loop {
        match store_checkpoint("orders-app", attempt) {
            Ok(()) => {
                println!("   checkpoint stored on attempt {}", attempt);
                break;
            }
            Err(err) if err.is_retryable() => {
                println!("1. [RETRY] {}", err);
                println!("   log: {}", err.log_record());
                attempt += 1;
            }
            Err(err) => {
                println!("   giving up: {}", err);
                break;
            }
        }
    }

    // 2. A fatal failure: no retry, structured record for the metrics pipeline.
    println!();
    if let Err(err) = validate_max_records(0) {
        println!("2. [FATAL] {}", err);
        err.with_log_record(|log| {
            println!("   Code:      {}", log.code());
            println!("   Category:  {}", log.category());
            println!("   Status:    {}", log.status());
            println!("   Detail:    {}", log.detail());
        });
        match serde_json::to_string(&err) {
            Ok(json) => println!("   Wire:      {}", json),
            Err(e) => println!("   Wire:      <unserializable: {}>", e),
        }
    }

    // 3. The whole taxonomy.
    println!("\n3. [REGISTRY]");
    for descriptor in REGISTRY.iter() {
        println!(
            "   {} {:<5} {} {}",
            descriptor.code(),
            descriptor.retryable(),
            descriptor.status(),
            descriptor.message()
        );
    }
}
