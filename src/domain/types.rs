//! # Domain Types
//!
//! Platform-neutral descriptions of commands, invocations and replies.

use std::collections::HashMap;

/// How a command is surfaced in the chat client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Typed by the user from the command picker.
    Slash,
    /// Invoked from the right-click menu of a message.
    MessageContextMenu,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: String,
    pub description: String,
    pub required: bool,
}

/// Everything the remote platform needs to publish a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: String,
    pub description: String,
    pub kind: CommandKind,
    pub options: Vec<OptionSpec>,
}

impl CommandSpec {
    pub fn slash(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: CommandKind::Slash,
            options: Vec::new(),
        }
    }

    /// Context menu entries carry no description on the platform side.
    pub fn message_context_menu(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind: CommandKind::MessageContextMenu,
            options: Vec::new(),
        }
    }

    /// Adds a string option.
    pub fn option(mut self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.options.push(OptionSpec {
            name: name.into(),
            description: description.into(),
            required,
        });
        self
    }
}

/// The message a context menu command was invoked on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetMessage {
    pub author_id: u64,
    pub content: String,
}

impl TargetMessage {
    pub fn author_mention(&self) -> String {
        format!("<@{}>", self.author_id)
    }
}

/// A single user interaction routed to a command handler.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub command: String,
    pub user: String,
    pub options: HashMap<String, String>,
    pub target: Option<TargetMessage>,
}

impl Invocation {
    pub fn new(command: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            user: user.into(),
            ..Default::default()
        }
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    pub fn with_target(mut self, target: TargetMessage) -> Self {
        self.target = Some(target);
        self
    }

    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }
}

/// Outgoing message content plus delivery flags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reply {
    pub content: String,
    pub ephemeral: bool,
    /// Allow user mentions to ping. Role and everyone mentions are never allowed.
    pub mention_users: bool,
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    pub fn mention_users(mut self) -> Self {
        self.mention_users = true;
        self
    }
}
