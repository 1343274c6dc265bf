//! # Press Rules
//!
//! The "Press Bible" crate - articles, pools, layout presets and tuning data
//! for The Newsroom. This crate is the single source of truth for content
//! definitions and carries no selection logic.

pub mod articles;
pub mod config;
pub mod import;
pub mod layout;
pub mod pools;

pub use articles::*;
pub use config::*;
pub use import::*;
pub use layout::*;
pub use pools::*;
