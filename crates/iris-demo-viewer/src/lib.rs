#![forbid(unsafe_code)]

//! Demo viewer: the reference wiring of the IrisView shell.
//!
//! Shows the full bootstrap an embedder performs — store slices, route
//! table, engine initialization, view registry, one-time mount — against
//! the in-memory host surface. The views here only log and poke the
//! store; real presentation belongs to a real view layer.

pub mod cli;
pub mod views;
