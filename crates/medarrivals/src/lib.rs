//! # medarrivals
//!
//! Fetches Mediterranean sea arrival statistics from the UNHCR portal,
//! writes them as CSV and draws charts, per-country maps and an animated
//! browser map.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod browser;
pub mod cli;
pub mod pipeline;

pub use cli::Args;
pub use pipeline::{Pipeline, RunOptions, RunSummary};
