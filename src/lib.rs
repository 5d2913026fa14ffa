//! Ridewise: reward scoring and loyalty tiering for tracked vehicle rides.
//!
//! The crate is a linkable computation library first; the binary in
//! `main.rs` wraps it with an HTTP surface and a small operator CLI.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
