#![deny(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used)]

//! Offline compiler for the pinned Unicode property range tables.
//!
//! Raw UCD files flow through a fixed pipeline: [`provider`] supplies the
//! text, [`parse`] turns lines into rows, [`filter`] projects rows onto the
//! emitted categories, [`ranges`] merges and validates them, and [`emit`]
//! renders the final include fragment. [`pipeline`] wires the stages together.

pub mod cli;
pub mod config;
pub mod emit;
pub mod error;
pub mod filter;
pub mod logging;
pub mod parse;
pub mod pipeline;
pub mod provider;
pub mod ranges;

pub use error::{Error, Result};
