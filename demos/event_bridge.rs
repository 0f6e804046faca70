//! Event bridge and call instrumentation example
//!
//! Demonstrates logging the events of an emitter and the method calls of a
//! wrapped object.
//!
//! Run with: cargo run --example event_bridge

use context_logger::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Context Logger - Event Bridge Example ===\n");

    let logger = init_logger(&LoggerConfig::default())?;

    println!("1. Logging emitter events:");
    let mut emitter = EventEmitter::new();
    let table = EventBindingTable::new()
        .bind("connect", LogLevel::Info)
        .bind("retry", LogLevel::Warn)
        .bind_with(
            "payload",
            LogLevel::Debug,
            Arc::new(|args: &[Value]| -> Result<String> { Ok(format!("{} argument(s)", args.len())) }),
        );
    logger.log_event(&mut emitter, &table);

    emitter.emit("connect", &[json!("db.internal"), json!(5432), json!({"tls": true})])?;
    emitter.emit("retry", &[json!(2)])?;
    emitter.emit("payload", &[json!({"big": "object"}), json!([1, 2, 3])])?;
    emitter.emit("ignored", &[])?;

    println!("\n2. Logging method calls:");
    let inventory = MethodTable::new("inventory")
        .method("reserve", |args| Ok(json!({"reserved": args.first().cloned()})))
        .method("count", |_| Ok(json!(12)));

    let mut inventory = logger.wrap_object(
        inventory,
        MethodWrapSpec::new()
            .wrap("reserve", LogLevel::Info)
            .wrap("count", LogLevel::Debug),
        "Inventory",
    );

    let reserved = inventory.invoke("reserve", vec![json!("sku-1"), json!(3)])?;
    let count = inventory.invoke("count", vec![])?;
    println!("   reserve -> {}, count -> {}", reserved, count);

    if let Err(e) = inventory.invoke("restock", vec![]) {
        logger.send_error(e)?;
    }

    logger.flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
