//! # Temperature Command
//!
//! Handles `/temperature`.
//! Reports the current weather at Attu Island and Ko Samui, fetched concurrently.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::future::join_all;

use crate::application::dispatch::DispatchTree;
use crate::domain::error::DispatchError;
use crate::domain::traits::{CommandHandler, InteractionResponder};
use crate::domain::types::{CommandSpec, Invocation, Reply};
use crate::infrastructure::weather::{Conditions, Location, WeatherClient};
use crate::strings::messages;

pub const NAME: &str = "temperature";

pub const LOCATIONS: [Location; 2] = [
    Location {
        name: "アッツ島",
        lat: 52.8413,
        lon: 173.1700,
    },
    Location {
        name: "サムイ島",
        lat: 9.5120,
        lon: 100.0136,
    },
];

/// Registration function bound to an optional weather client.
/// Without a client the command still registers and explains the missing token.
pub fn register_with(
    client: Option<WeatherClient>,
) -> impl Fn(&mut DispatchTree) -> Result<(), DispatchError> + Send + Sync + 'static {
    move |tree: &mut DispatchTree| {
        tree.register(
            CommandSpec::slash(NAME, messages::TEMPERATURE_DESCRIPTION),
            Arc::new(TemperatureCommand {
                client: client.clone(),
            }),
        )
    }
}

/// Fenced block with one line per location.
pub fn format_report(results: &[(&str, Option<Conditions>)]) -> String {
    let mut report = String::from("```");
    for (name, conditions) in results {
        match conditions {
            Some(c) => report.push_str(&messages::weather_line(name, &c.description, c.temp)),
            None => report.push_str(&messages::weather_failed_line(name)),
        }
    }
    report.push_str("```");
    report
}

struct TemperatureCommand {
    client: Option<WeatherClient>,
}

impl TemperatureCommand {
    async fn report(&self, client: &WeatherClient) -> String {
        let fetched = join_all(LOCATIONS.iter().map(|location| client.current(location))).await;
        let results: Vec<(&str, Option<Conditions>)> = LOCATIONS
            .iter()
            .zip(fetched)
            .map(|(location, result)| match result {
                Ok(conditions) => (location.name, Some(conditions)),
                Err(e) => {
                    tracing::error!("{}", e);
                    (location.name, None)
                }
            })
            .collect();
        format_report(&results)
    }
}

#[async_trait]
impl CommandHandler for TemperatureCommand {
    async fn handle(&self, _invocation: &Invocation, responder: &dyn InteractionResponder) -> Result<()> {
        let Some(client) = &self.client else {
            tracing::error!("[Bot] OPEN_WEATHER_API_TOKEN is not set");
            return responder
                .respond(Reply::text(messages::ERROR_NO_WEATHER_TOKEN))
                .await
                .map_err(|e| anyhow!(e));
        };

        let result = async {
            responder.defer(false).await?;
            let report = self.report(client).await;
            tracing::info!("[Bot] Sending weather report: {}", report);
            responder.followup(Reply::text(report)).await
        }
        .await;

        if let Err(e) = result {
            tracing::error!("[Bot] Error in temperature command: {}", e);
            responder
                .followup(Reply::text(messages::ERROR_GENERIC))
                .await
                .map_err(|e| anyhow!(e))?;
        }
        Ok(())
    }
}
