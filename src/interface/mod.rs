//! # Interface Layer
//!
//! User-facing command definitions invoked through the dispatch tree.

pub mod commands;
