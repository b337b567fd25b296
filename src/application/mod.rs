//! # Application Layer
//!
//! Contains the core logic and orchestration of the bot.
//! This includes command discovery, the dispatch tree, ready-time composition and the keep-alive loop.

pub mod composer;
pub mod dispatch;
pub mod keep_alive;
pub mod logging;
pub mod registry;
