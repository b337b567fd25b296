//! # Command Definitions
//!
//! Each submodule is one command unit exposing a single registration function.
//! `units` is the manifest the registry discovers them from.

pub mod ask;
pub mod echo;
pub mod temperature;

use std::sync::Arc;

use crate::application::registry::{CommandUnit, RegisterFn};
use crate::domain::config::AppConfig;
use crate::infrastructure::weather::WeatherClient;

/// Namespace the bot composes its dispatch tree from.
pub const NAMESPACE: &str = "commands";

pub fn units(config: &AppConfig) -> Vec<CommandUnit> {
    let weather_token = config.open_weather_api_token.clone();

    vec![
        CommandUnit::exporting("ask_command", ask::register_command),
        CommandUnit::exporting("echo_message_command", echo::register_command),
        CommandUnit::new(
            "temperature_command",
            Box::new(move || -> anyhow::Result<Option<RegisterFn>> {
                let client = match &weather_token {
                    Some(token) => Some(WeatherClient::new(token.clone()).map_err(anyhow::Error::msg)?),
                    None => None,
                };
                let register: RegisterFn = Arc::new(temperature::register_with(client));
                Ok(Some(register))
            }),
        ),
    ]
}
