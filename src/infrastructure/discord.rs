//! # Discord Gateway Adapter
//!
//! Implements the domain traits on top of `serenity`: interaction replies, command
//! publishing, and the event handler that composes the dispatch tree on ready and
//! routes application command interactions through it.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use serenity::all::{
    Client, Command, CommandInteraction, CommandOptionType, CommandType, Context, CreateAllowedMentions,
    CreateCommand, CreateCommandOption, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, EventHandler, GatewayIntents, Http, Interaction, Ready,
    ResolvedTarget, ResolvedValue,
};
use tracing::{error, info, warn};

use crate::application::composer::CommandComposer;
use crate::domain::traits::{CommandSync, InteractionResponder};
use crate::domain::types::{CommandKind, CommandSpec, Invocation, Reply, TargetMessage};
use crate::strings::logs;

fn allowed_mentions(reply: &Reply) -> CreateAllowedMentions {
    CreateAllowedMentions::new()
        .all_users(reply.mention_users)
        .all_roles(false)
        .everyone(false)
}

/// Answers one application command interaction.
pub struct DiscordResponder {
    http: Arc<Http>,
    interaction: CommandInteraction,
}

impl DiscordResponder {
    pub fn new(http: Arc<Http>, interaction: CommandInteraction) -> Self {
        Self { http, interaction }
    }
}

#[async_trait]
impl InteractionResponder for DiscordResponder {
    async fn defer(&self, ephemeral: bool) -> Result<(), String> {
        let result = if ephemeral {
            self.interaction.defer_ephemeral(&self.http).await
        } else {
            self.interaction.defer(&self.http).await
        };
        result.map_err(|e| e.to_string())
    }

    async fn respond(&self, reply: Reply) -> Result<(), String> {
        let message = CreateInteractionResponseMessage::new()
            .content(reply.content.clone())
            .ephemeral(reply.ephemeral)
            .allowed_mentions(allowed_mentions(&reply));
        self.interaction
            .create_response(&self.http, CreateInteractionResponse::Message(message))
            .await
            .map_err(|e| e.to_string())
    }

    async fn followup(&self, reply: Reply) -> Result<(), String> {
        let builder = CreateInteractionResponseFollowup::new()
            .content(reply.content.clone())
            .ephemeral(reply.ephemeral)
            .allowed_mentions(allowed_mentions(&reply));
        self.interaction
            .create_followup(&self.http, builder)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

/// Publishes commands globally, replacing whatever set the application had before.
pub struct DiscordCommandSync {
    http: Arc<Http>,
}

impl DiscordCommandSync {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl CommandSync for DiscordCommandSync {
    async fn sync(&self, commands: Vec<CommandSpec>) -> Result<usize, String> {
        let builders = commands.iter().map(to_create_command).collect();
        Command::set_global_commands(&self.http, builders)
            .await
            .map(|published| published.len())
            .map_err(|e| e.to_string())
    }
}

pub fn to_create_command(spec: &CommandSpec) -> CreateCommand {
    match spec.kind {
        CommandKind::Slash => spec.options.iter().fold(
            CreateCommand::new(&spec.name)
                .kind(CommandType::ChatInput)
                .description(&spec.description),
            |command, option| {
                command.add_option(
                    CreateCommandOption::new(CommandOptionType::String, &option.name, &option.description)
                        .required(option.required),
                )
            },
        ),
        CommandKind::MessageContextMenu => CreateCommand::new(&spec.name).kind(CommandType::Message),
    }
}

fn invocation_from(command: &CommandInteraction) -> Invocation {
    let mut invocation = Invocation::new(command.data.name.clone(), command.user.name.clone());

    for option in command.data.options() {
        let value = match option.value {
            ResolvedValue::String(s) => s.to_string(),
            ResolvedValue::Integer(i) => i.to_string(),
            ResolvedValue::Number(n) => n.to_string(),
            ResolvedValue::Boolean(b) => b.to_string(),
            _ => continue,
        };
        invocation = invocation.with_option(option.name, value);
    }

    if let Some(ResolvedTarget::Message(message)) = command.data.target() {
        invocation = invocation.with_target(TargetMessage {
            author_id: message.author.id.get(),
            content: message.content.clone(),
        });
    }
    invocation
}

struct Handler {
    composer: Arc<CommandComposer>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        let sync = DiscordCommandSync::new(ctx.http.clone());
        self.composer.on_ready(&sync).await;
        info!("[Discord] Logged in as {}", ready.user.tag());
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };
        let Some(tree) = self.composer.tree() else {
            warn!(command = %command.data.name, "interaction received before commands were composed");
            return;
        };

        let invocation = invocation_from(&command);
        info!(
            "[Bot] /{} from {} ({} options)",
            invocation.command,
            invocation.user,
            invocation.options.len()
        );
        let responder = DiscordResponder::new(ctx.http.clone(), command);
        if let Err(e) = tree.dispatch(&invocation, &responder).await {
            error!("[Bot] {}", e);
        }
    }
}

/// Connects to the gateway and processes events until the connection fails for good.
pub async fn run(token: &str, composer: Arc<CommandComposer>) -> Result<()> {
    let mut client = Client::builder(token, GatewayIntents::non_privileged())
        .event_handler(Handler { composer })
        .await
        .context("Failed to build Discord client")?;

    info!("{}", logs::GATEWAY_CONNECTING);
    client.start().await.context("Discord gateway connection failed")
}
