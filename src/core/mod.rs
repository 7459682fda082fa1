//! Core board and progression logic
//!
//! This module contains the data types and caches the client keeps in memory.
//! It provides:
//!
//! - [`board`]: Board records, ids and listing order
//! - [`api`]: API client traits and the response envelope
//! - [`hierarchy`]: Board tree cache with ancestor chains
//! - [`level`]: Experience curve (level ↔ experience)
//! - [`upload`]: Upload token cache
//! - [`error`]: Error types for core operations

pub mod api;
pub mod board;
pub mod error;
pub mod hierarchy;
pub mod level;
pub mod upload;

#[cfg(test)]
pub mod test_helpers;
