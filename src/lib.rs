//! Core library for the `bees` CLI.
//!
//! A swarm of already-running machines ("bees") is driven over SSH: each bee
//! runs ApacheBench against the target, the coordinator collects every
//! bee's numbers, and the aggregator folds them into one report with an
//! optional pass/fail verdict. The `bees` binary is the primary interface;
//! library APIs may evolve as the CLI grows.
pub mod args;
pub mod attack;
pub mod config;
pub mod error;
pub mod fleet;
pub mod remote;
pub mod roster;

mod entry;
mod system;

pub use entry::run;
