//! Structured logging for VinForge.

pub mod logger;

pub use logger::init_logger;
