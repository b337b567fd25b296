//! # Domain Traits
//!
//! Abstract interfaces for the chat platform and command handlers.
//! Allows for pluggable implementations in the Infrastructure layer.

use async_trait::async_trait;

use crate::domain::types::{CommandSpec, Invocation, Reply};

/// Abstract interface for answering a single interaction (e.g., a Discord slash command)
#[async_trait]
pub trait InteractionResponder: Send + Sync {
    /// Acknowledge now, answer later with `followup`
    async fn defer(&self, ephemeral: bool) -> Result<(), String>;

    /// Answer immediately (only valid when not deferred)
    async fn respond(&self, reply: Reply) -> Result<(), String>;

    /// Send a follow-up message after a deferral
    async fn followup(&self, reply: Reply) -> Result<(), String>;
}

/// Publishes the set of registered commands to the remote platform.
#[async_trait]
pub trait CommandSync: Send + Sync {
    /// Returns the number of commands the platform accepted.
    async fn sync(&self, commands: Vec<CommandSpec>) -> Result<usize, String>;
}

/// Owns the full request/response contract of one command.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(
        &self,
        invocation: &Invocation,
        responder: &dyn InteractionResponder,
    ) -> anyhow::Result<()>;
}
