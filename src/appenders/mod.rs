//! Appender implementations

#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "file")]
pub mod file;
#[cfg(feature = "file")]
pub mod json;
pub mod memory;
#[cfg(feature = "network")]
pub mod network;

#[cfg(feature = "console")]
pub use console::ConsoleAppender;
#[cfg(feature = "file")]
pub use file::FileAppender;
#[cfg(feature = "file")]
pub use json::JsonAppender;
pub use memory::MemoryAppender;
#[cfg(feature = "network")]
pub use network::NetworkAppender;

// Re-export trait for convenience
pub use crate::core::Appender;
