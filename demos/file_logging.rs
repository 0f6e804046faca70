//! File logging example
//!
//! Demonstrates writing the same records to the console, a text file and a
//! JSON-lines file, all configured from a JSON document.
//!
//! Run with: cargo run --example file_logging

use context_logger::prelude::*;
use serde_json::json;

const CONFIG: &str = r#"{
    "level": "debug",
    "transports": [
        { "type": "Console", "params": { "timestamp": true } },
        { "type": "File", "params": { "filename": "application.log" } },
        { "type": "Json", "params": { "filename": "application.jsonl" } }
    ],
    "addToContext": { "app": "file-demo" },
    "hideKeys": ["password"],
    "maxDepth": 3
}"#;

fn main() -> Result<()> {
    println!("=== Context Logger - File Logging Example ===\n");

    let logger = init_logger(&LoggerConfig::from_json(CONFIG)?)?;

    println!("1. Logging to console, text file and JSON file:");
    logger.info("Application started")?;
    logger.debug_with("Loading configuration", &json!({"path": "config.toml"}))?;
    logger.warn("Using default settings for some options")?;
    logger.info_with(
        "Connecting to database",
        &json!({"db": {"host": "localhost", "user": "app", "password": "secret"}}),
    )?;

    println!("\n2. Performing some operations:");
    for i in 1..=5 {
        let _item = logger.scoped_context("item", i);
        logger.info(format!("Processing item {}/5", i))?;
        if i == 3 {
            logger.warn("Item 3 took longer than expected")?;
        }
    }

    logger.info("All operations completed")?;
    logger.flush()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' and 'application.jsonl' for the output");

    Ok(())
}
