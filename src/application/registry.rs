//! # Command Registry
//!
//! Holds the static manifest of command-definition units, grouped by namespace.
//! Discovery walks a namespace in lexicographic unit order, asks every unit for its
//! registration function and skips the units that fail, so one broken command never
//! keeps the others from registering.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::application::dispatch::DispatchTree;
use crate::domain::error::{CommandLoadError, DispatchError};

/// Attaches one or more named handlers to the tree.
pub type RegisterFn = Arc<dyn Fn(&mut DispatchTree) -> Result<(), DispatchError> + Send + Sync>;

/// Produces a unit's registration function. `Ok(None)` means the unit loaded but exports nothing.
pub type LoaderFn = Box<dyn Fn() -> anyhow::Result<Option<RegisterFn>> + Send + Sync>;

/// A self-contained command definition known by name.
pub struct CommandUnit {
    pub name: String,
    loader: LoaderFn,
}

impl CommandUnit {
    pub fn new(name: impl Into<String>, loader: LoaderFn) -> Self {
        Self {
            name: name.into(),
            loader,
        }
    }

    /// A unit that always exports the given registration function.
    pub fn exporting<F>(name: impl Into<String>, register: F) -> Self
    where
        F: Fn(&mut DispatchTree) -> Result<(), DispatchError> + Send + Sync + 'static,
    {
        let register: RegisterFn = Arc::new(register);
        Self::new(name, Box::new(move || Ok(Some(register.clone()))))
    }

    fn load(&self) -> Result<RegisterFn, CommandLoadError> {
        match (self.loader)() {
            Ok(Some(register)) => Ok(register),
            Ok(None) => Err(CommandLoadError::MissingExport {
                unit: self.name.clone(),
            }),
            Err(e) => Err(CommandLoadError::Load {
                unit: self.name.clone(),
                reason: format!("{e:#}"),
            }),
        }
    }
}

/// Outcome of one discovery pass.
#[derive(Default)]
pub struct Discovery {
    pub loaded: Vec<(String, RegisterFn)>,
    pub failures: Vec<CommandLoadError>,
}

impl Discovery {
    pub fn unit_names(&self) -> Vec<&str> {
        self.loaded.iter().map(|(name, _)| name.as_str()).collect()
    }
}

#[derive(Default)]
pub struct CommandRegistry {
    namespaces: BTreeMap<String, BTreeMap<String, CommandUnit>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration of a whole namespace.
    pub fn with_namespace(mut self, namespace: &str, units: Vec<CommandUnit>) -> Self {
        for unit in units {
            self.add_unit(namespace, unit);
        }
        self
    }

    pub fn add_unit(&mut self, namespace: &str, unit: CommandUnit) {
        let units = self.namespaces.entry(namespace.to_string()).or_default();
        if units.contains_key(&unit.name) {
            warn!(namespace, unit = %unit.name, "command unit declared twice, keeping the latest");
        }
        units.insert(unit.name.clone(), unit);
    }

    pub fn namespaces(&self) -> Vec<&str> {
        self.namespaces.keys().map(String::as_str).collect()
    }

    /// Registration functions of every loadable unit in `namespace`, in unit-name order,
    /// each paired with its unit name. Never fails: an unknown namespace yields an empty list.
    pub fn discover(&self, namespace: &str) -> Vec<(String, RegisterFn)> {
        self.discover_report(namespace).loaded
    }

    pub fn discover_report(&self, namespace: &str) -> Discovery {
        info!("Loading commands from namespace: {}", namespace);
        let mut discovery = Discovery::default();

        let Some(units) = self.namespaces.get(namespace) else {
            error!("Command namespace '{}' not found, starting with no commands", namespace);
            return discovery;
        };

        for (name, unit) in units {
            info!("Attempting to load command unit: {}", name);
            match unit.load() {
                Ok(register) => {
                    info!("Loaded command from unit: {}", name);
                    discovery.loaded.push((name.clone(), register));
                }
                Err(e) => {
                    warn!(unit = e.unit(), "{}", e);
                    discovery.failures.push(e);
                }
            }
        }

        info!(
            loaded = ?discovery.unit_names(),
            skipped = discovery.failures.len(),
            "Command discovery finished for namespace '{}'",
            namespace
        );
        discovery
    }
}
