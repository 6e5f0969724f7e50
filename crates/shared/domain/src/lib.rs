//! # Domain Models
//!
//! This crate contains pure domain types with minimal dependencies (`serde` only).
//! Keep it lean: no I/O, no providers, no locking. Just the values the kernel passes around.

pub mod art;
pub mod constants;
pub mod settings;
