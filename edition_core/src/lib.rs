//! # Edition Core (The Newsroom)
//!
//! The assembly engine of the procedural newspaper. This crate builds on
//! `press_rules`, rotates pool queues between editions, selects each day's
//! articles, and binds them onto a layout preset.
//!
//! ## Core Components
//!
//! - **rotation**: Pair-aware, story-ordered rebuilding of eligible queues
//! - **selection**: Weighted genre picks, hype pairs, and the featured draw
//! - **assembly**: Exact preset matching and slot-by-slot page filling
//! - **newsroom**: Owns the pools and produces one edition per call
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: One seeded random stream drives every draw, so equal inputs print equal pages
//! - **Loud degradation**: Data defects are logged and the affected article skipped; only an unprintable page is an error
//! - **Single-writer**: The newsroom owns its pools outright, so no draw can race another

pub mod assembly;
pub mod error;
pub mod newsroom;
pub mod rotation;
pub mod selection;

pub use assembly::*;
pub use error::*;
pub use newsroom::*;
pub use rotation::*;
pub use selection::*;
