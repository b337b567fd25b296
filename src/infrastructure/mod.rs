//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (e.g., InteractionResponder, CommandSync).

pub mod discord;
pub mod http;
pub mod weather;
