//! # Ask Command
//!
//! Handles `/ask <question>`.
//! Echoes the question back after validating that it is non-empty and not too long.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::application::dispatch::DispatchTree;
use crate::domain::error::DispatchError;
use crate::domain::traits::{CommandHandler, InteractionResponder};
use crate::domain::types::{CommandSpec, Invocation, Reply};
use crate::strings::messages;

pub const NAME: &str = "ask";

pub fn register_command(tree: &mut DispatchTree) -> Result<(), DispatchError> {
    tree.register(
        CommandSpec::slash(NAME, messages::ASK_DESCRIPTION).option(
            "question",
            messages::ASK_OPTION_DESCRIPTION,
            true,
        ),
        Arc::new(AskCommand),
    )
}

pub fn answer(question: &str) -> String {
    if question.trim().is_empty() {
        messages::ERROR_EMPTY_QUESTION.to_string()
    } else if question.chars().count() > messages::MAX_QUESTION_LENGTH {
        messages::error_long_question()
    } else {
        question.to_string()
    }
}

struct AskCommand;

#[async_trait]
impl CommandHandler for AskCommand {
    async fn handle(&self, invocation: &Invocation, responder: &dyn InteractionResponder) -> Result<()> {
        let result = async {
            responder.defer(false).await?;
            let question = invocation.option("question").unwrap_or_default();
            tracing::info!("[Bot] Received question: {}", question);
            responder.followup(Reply::text(answer(question))).await
        }
        .await;

        if let Err(e) = result {
            tracing::error!("[Bot] Error in ask command: {}", e);
            responder
                .followup(Reply::text(messages::ERROR_GENERIC))
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dispatch::tests::RecordingResponder;

    fn tree() -> DispatchTree {
        let mut tree = DispatchTree::new();
        register_command(&mut tree).unwrap();
        tree
    }

    #[test]
    fn test_answer_validation() {
        assert_eq!(answer("hello"), "hello");
        assert_eq!(answer("   "), messages::ERROR_EMPTY_QUESTION);
        assert_eq!(answer(&"あ".repeat(200)), "あ".repeat(200));
        assert_eq!(answer(&"あ".repeat(201)), messages::error_long_question());
    }

    #[test]
    fn test_registers_slash_with_required_question() {
        let tree = tree();
        let spec = &tree.get(NAME).unwrap().spec;
        assert_eq!(spec.options.len(), 1);
        assert!(spec.options[0].required);
    }

    #[tokio::test]
    async fn test_defers_then_follows_up() {
        let responder = RecordingResponder::default();
        let invocation = Invocation::new(NAME, "alice").with_option("question", "元気？");
        tree().dispatch(&invocation, &responder).await.unwrap();
        assert_eq!(responder.calls(), vec!["defer:false", "followup:元気？"]);
    }

    #[tokio::test]
    async fn test_failure_sends_generic_error() {
        let responder = RecordingResponder::failing_defer();
        let invocation = Invocation::new(NAME, "alice").with_option("question", "hi");
        tree().dispatch(&invocation, &responder).await.unwrap();
        assert_eq!(
            responder.calls(),
            vec![format!("followup:{}", messages::ERROR_GENERIC)]
        );
    }
}
