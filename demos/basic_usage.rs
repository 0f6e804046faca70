//! Basic logger usage example
//!
//! Demonstrates a console logger built from configuration, inherited context,
//! key redaction and error reporting.
//!
//! Run with: cargo run --example basic_usage

use context_logger::prelude::*;
use serde_json::json;

fn main() -> Result<()> {
    println!("=== Context Logger - Basic Usage Example ===\n");

    let config = LoggerConfig::default()
        .with_level(LogLevel::Trace)
        .with_context("service", "checkout")
        .hide_key("password")
        .hide_regex("(?i)token");
    let logger = init_logger(&config)?;

    println!("1. Logging at different levels:");
    logger.trace("This is a trace message")?;
    logger.debug("This is a debug message")?;
    logger.info("This is an info message")?;
    logger.warn("This is a warning message")?;
    logger.error("This is an error message")?;

    println!("\n2. Sensitive keys are masked:");
    logger.info_with(
        "User signed in",
        &json!({"user": "ann", "password": "hunter2", "authToken": "abc"}),
    )?;

    println!("\n3. Child loggers inherit context:");
    let request = logger.get_logger_with_context(LogContext::new().with_field("request", "r-17"));
    request.add_to_context(LogContext::new().with_field("step", "payment"));
    request.info("Charging card")?;
    logger.info("Root logger is unaffected")?;

    println!("\n4. Deep payloads are flattened past the depth limit:");
    logger.debug_with("Order", &json!({"order": {"lines": {"sku": {"id": 7}}}}))?;

    println!("\n5. Errors and alerts:");
    logger.send_error("Payment gateway timeout")?;
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml missing");
    logger.alert_error_with(io_error, &json!({"path": "/etc/app"}))?;

    logger.flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
