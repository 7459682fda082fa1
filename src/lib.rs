//! forumkit - client-side building blocks for a web forum
//!
//! Board hierarchy caching, the experience/level curve, board colors and the
//! small helpers a forum client needs around them.
//!
//! # Architecture
//!
//! - [`core`] - Board tree cache, level curve, upload token cache, API traits
//! - [`theme`] - Color parsing and board color derivation
//! - [`notify`] - Toast messages and unread polling
//! - [`session`] - Current user and connection state
//! - [`formatting`] - Date pattern formatting
//! - [`validators`] - Input patterns and mention markup
//! - [`config`] - Site configuration persistence
//! - [`utils`] - Directories and JSON helpers
//!
//! Network access is not part of this crate. Callers implement
//! [`core::api::BoardApi`], [`core::api::UploadApi`] and
//! [`core::api::NotifApi`] over their HTTP client of choice.

// Allow pedantic clippy warnings that are not worth fixing for this codebase
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod core;
pub mod formatting;
pub mod notify;
pub mod session;
pub mod theme;
pub mod utils;
pub mod validators;

// Re-export commonly used types
pub use crate::core::board::{Board, BoardId, OrderSpec};
pub use crate::core::error::{ApiError, Error, Result};
pub use crate::core::hierarchy::{BoardCache, BoardExInfo, BoardIndex};
pub use crate::core::level::{ExperienceCurve, LevelExp, LevelProgress};
