//! # Command Composer
//!
//! Runs on every gateway ready event. The first call discovers the registration
//! functions, applies them to a fresh tree and freezes it; every call then publishes
//! the frozen set to the platform exactly once. Reconnects therefore re-sync the same
//! commands without re-registering them.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{error, info, warn};

use crate::application::dispatch::DispatchTree;
use crate::application::registry::{CommandRegistry, RegisterFn};
use crate::domain::error::CommandLoadError;
use crate::domain::traits::CommandSync;

/// What a single ready event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyReport {
    /// True only for the event that built the tree.
    pub composed: bool,
    pub commands: usize,
    /// Commands accepted by the platform, or the sync error.
    pub synced: Result<usize, String>,
}

/// Invokes each registration function once, in order. Failures are logged and skipped.
pub fn apply(tree: &mut DispatchTree, register_fns: &[(String, RegisterFn)]) -> Vec<CommandLoadError> {
    let mut failures = Vec::new();
    for (unit, register) in register_fns {
        if let Err(e) = register(tree) {
            let failure = CommandLoadError::Register {
                unit: unit.clone(),
                reason: e.to_string(),
            };
            warn!("{}", failure);
            failures.push(failure);
        }
    }
    failures
}

pub struct CommandComposer {
    registry: Arc<CommandRegistry>,
    namespace: String,
    tree: OnceCell<Arc<DispatchTree>>,
}

impl CommandComposer {
    pub fn new(registry: Arc<CommandRegistry>, namespace: impl Into<String>) -> Self {
        Self {
            registry,
            namespace: namespace.into(),
            tree: OnceCell::new(),
        }
    }

    /// The composed tree, once the first ready event has run.
    pub fn tree(&self) -> Option<Arc<DispatchTree>> {
        self.tree.get().cloned()
    }

    fn compose(&self) -> DispatchTree {
        let register_fns = self.registry.discover(&self.namespace);
        let mut tree = DispatchTree::new();
        let failures = apply(&mut tree, &register_fns);
        let failed: Vec<&str> = failures.iter().map(CommandLoadError::unit).collect();
        if tree.is_empty() {
            warn!("No commands registered from namespace '{}'", self.namespace);
        }
        info!(
            registered = tree.len(),
            failed = ?failed,
            "Dispatch tree composed: [{}]",
            tree.names().join(", ")
        );
        tree
    }

    pub async fn on_ready(&self, sync: &dyn CommandSync) -> ReadyReport {
        let mut composed = false;
        let composed_now = &mut composed;
        let tree = self
            .tree
            .get_or_init(|| async move {
                *composed_now = true;
                Arc::new(self.compose())
            })
            .await
            .clone();

        if !composed {
            info!("Ready fired again, reusing the composed command tree");
        }

        let synced = sync.sync(tree.specs()).await;
        match &synced {
            Ok(count) => info!("Synced {} commands with the platform", count),
            Err(e) => error!("Failed to sync commands: {}", e),
        }

        ReadyReport {
            composed,
            commands: tree.len(),
            synced,
        }
    }
}
