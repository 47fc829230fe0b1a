//! Spreadsheet-backed receipt store client for VinForge.

pub mod client;

pub use client::SheetsClient;
