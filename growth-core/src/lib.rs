//! Core 2-D potential-driven branching growth library.
//!
//! Main components:
//! - [`field`] — edge-buffered scalar grid holding the growth potential.
//! - [`circle`] — precomputed pixelated-circle offset tables.
//! - [`cell`] — the growth agent and its survey/multiply lifecycle.
//! - [`engine`] — owns the live-cell set and drives simulation steps.
//! - [`config`] — explicit run configuration and coordinate mapping.
//! - [`sample`] — categorical sampling over neighbor weights.
//! - [`error`] — configuration-error taxonomy.

pub mod cell;
pub mod circle;
pub mod config;
pub mod engine;
pub mod error;
pub mod field;
pub mod sample;
