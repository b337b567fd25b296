//! # Dispatch Tree
//!
//! Maps command names to their handlers. Built once by the registration functions,
//! read-only afterwards, and published to the platform as a single set.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::error::DispatchError;
use crate::domain::traits::{CommandHandler, InteractionResponder};
use crate::domain::types::{CommandSpec, Invocation};

/// Platform limit for command names.
const MAX_NAME_LEN: usize = 32;

pub struct RegisteredCommand {
    pub spec: CommandSpec,
    handler: Arc<dyn CommandHandler>,
}

#[derive(Default)]
pub struct DispatchTree {
    commands: BTreeMap<String, RegisteredCommand>,
}

impl DispatchTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a handler. A second registration under the same name replaces the first.
    pub fn register(
        &mut self,
        mut spec: CommandSpec,
        handler: Arc<dyn CommandHandler>,
    ) -> Result<(), DispatchError> {
        let name = spec.name.trim();
        if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
            return Err(DispatchError::InvalidName(spec.name));
        }

        // Published and looked up under the same name.
        let name = name.to_string();
        spec.name = name.clone();
        debug!(command = %name, kind = ?spec.kind, "registering command");
        if let Some(previous) = self
            .commands
            .insert(name.clone(), RegisteredCommand { spec, handler })
        {
            warn!(
                command = %name,
                previous_kind = ?previous.spec.kind,
                "command registered twice, keeping the latest"
            );
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredCommand> {
        self.commands.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    /// Specs of every registered command, ordered by name.
    pub fn specs(&self) -> Vec<CommandSpec> {
        self.commands.values().map(|c| c.spec.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub async fn dispatch(
        &self,
        invocation: &Invocation,
        responder: &dyn InteractionResponder,
    ) -> Result<(), DispatchError> {
        let Some(command) = self.get(&invocation.command) else {
            warn!(command = %invocation.command, user = %invocation.user, "unknown command");
            return Err(DispatchError::UnknownCommand(invocation.command.clone()));
        };

        command
            .handler
            .handle(invocation, responder)
            .await
            .map_err(|source| DispatchError::Handler {
                command: invocation.command.clone(),
                source,
            })
    }
}
