//! # Echo Context Menu
//!
//! Right-click a message → "Echo" quotes it back into the channel, mentioning its author.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::application::dispatch::DispatchTree;
use crate::domain::error::DispatchError;
use crate::domain::traits::{CommandHandler, InteractionResponder};
use crate::domain::types::{CommandSpec, Invocation, Reply};
use crate::strings::messages;

pub const NAME: &str = "Echo";

pub fn register_command(tree: &mut DispatchTree) -> Result<(), DispatchError> {
    tree.register(CommandSpec::message_context_menu(NAME), Arc::new(EchoCommand))
}

struct EchoCommand;

#[async_trait]
impl CommandHandler for EchoCommand {
    async fn handle(&self, invocation: &Invocation, responder: &dyn InteractionResponder) -> Result<()> {
        let result = async {
            responder.defer(false).await?;
            let target = invocation
                .target
                .as_ref()
                .ok_or_else(|| "interaction has no target message".to_string())?;
            tracing::info!("[Bot] Echoing message: {}", target.content);
            let content = messages::echo_quote(&target.author_mention(), &target.content);
            responder.followup(Reply::text(content).mention_users()).await
        }
        .await;

        if let Err(e) = result {
            tracing::error!("[Bot] Error in echo context command: {}", e);
            responder
                .followup(Reply::text(messages::ERROR_GENERIC).ephemeral())
                .await
                .map_err(|e| anyhow!(e))?;
        }
        Ok(())
    }
}
